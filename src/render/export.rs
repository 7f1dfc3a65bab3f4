//! Standalone printable export
//!
//! The export reuses `render_pages`, so page count, window height and
//! content offsets are the preview's by construction. The flow inside each
//! window is laid out from the same `Geometry` the breaks were chosen
//! against: every leaf node is absolutely positioned at its measured span,
//! so the content under an offset is the content that was measured there.

use crate::content::{ContentFlow, NodeId};
use crate::layout::{Geometry, PageBreakList, PageFormat, PaperSize};
use crate::render::{footer_label, render_pages, Page};
use chrono::{DateTime, Utc};

/// Share of the page width given to the side column
pub const SIDEBAR_SHARE: f32 = 0.32;

/// A serialized multi-page document
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub html: String,
    /// Pages the document was written from
    pub pages: Vec<Page>,
    pub paper: PaperSize,
}

impl ExportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Serialize the flow into a print-ready HTML document
pub fn export_document(
    flow: &ContentFlow,
    geometry: &Geometry,
    breaks: &PageBreakList,
    format: &PageFormat,
    title: &str,
) -> ExportDocument {
    let pages = render_pages(breaks, format);
    let markup = flow_markup(flow, geometry);
    let (width_mm, height_mm) = format.paper.dimensions_mm();
    let (main_width, side_width) = column_widths(flow, format.width_px);
    let flow_height = if geometry.total_height.is_finite() {
        geometry.total_height.max(0.0)
    } else {
        0.0
    };

    let mut html = String::with_capacity(2048 + markup.len() * pages.len());
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str("<style>\n");
    html.push_str(&format!(
        "@page {{ size: {}mm {}mm; margin: 0; }}\n",
        width_mm, height_mm
    ));
    html.push_str("html, body { margin: 0; padding: 0; }\n");
    html.push_str("body { -webkit-print-color-adjust: exact; print-color-adjust: exact; }\n");
    html.push_str(&format!(
        ".cv-page {{ position: relative; width: {}px; height: {}px; overflow: hidden; \
         page-break-after: always; break-after: page; }}\n",
        format.width_px, format.height_px
    ));
    html.push_str(".cv-page:last-child { page-break-after: auto; break-after: auto; }\n");
    html.push_str(&format!(
        ".cv-window {{ position: absolute; left: 0; top: {}px; width: {}px; height: {}px; overflow: hidden; }}\n",
        format.margin_top_px,
        format.width_px,
        format.usable_height()
    ));
    html.push_str(&format!(
        ".cv-flow {{ position: relative; width: {}px; height: {}px; }}\n",
        format.width_px, flow_height
    ));
    html.push_str(".cv-node { position: absolute; box-sizing: border-box; overflow: hidden; }\n");
    html.push_str(&format!(".cv-full {{ left: 0; width: {}px; }}\n", format.width_px));
    html.push_str(&format!(".cv-main {{ left: 0; width: {}px; }}\n", main_width));
    html.push_str(&format!(
        ".cv-side {{ left: {}px; width: {}px; }}\n",
        main_width, side_width
    ));
    html.push_str(&format!(
        ".cv-footer {{ position: absolute; left: 0; top: {}px; width: {}px; height: {}px; \
         display: flex; align-items: center; justify-content: center; font-size: 10px; }}\n",
        format.footer_top(),
        format.width_px,
        format.footer_height_px
    ));
    html.push_str("</style>\n</head>\n<body>\n<main class=\"cv-pages\">\n");

    for page in &pages {
        html.push_str(&format!(
            "<section class=\"cv-page\" data-page=\"{}\" data-offset=\"{}\">\
             <div class=\"cv-window\"><div class=\"cv-flow\" style=\"transform: translateY(-{}px)\">",
            page.index, page.content_offset, page.content_offset
        ));
        html.push_str(&markup);
        html.push_str(&format!(
            "</div></div><div class=\"cv-footer\">{}</div></section>\n",
            footer_label(page.index, pages.len())
        ));
    }

    html.push_str("</main>\n</body>\n</html>\n");

    ExportDocument {
        html,
        pages,
        paper: format.paper,
    }
}

/// Positioned markup of every measured leaf node, in rendering order
///
/// Fragments come from the template layer and are embedded verbatim. Nodes
/// the measurement did not report are left out.
pub fn flow_markup(flow: &ContentFlow, geometry: &Geometry) -> String {
    let mut out = String::new();
    for node in flow.node_ids().into_iter().filter(NodeId::is_leaf) {
        let Some(markup) = flow.markup(node) else {
            continue;
        };
        match geometry.span(node) {
            Some(span) if span.is_valid() => {
                out.push_str(&format!(
                    "<div class=\"cv-node {}\" data-node=\"{}\" style=\"{}\">",
                    column_class(node),
                    node,
                    node_style(span.top, span.height())
                ));
                out.push_str(markup);
                out.push_str("</div>");
            }
            Some(span) => log::debug!("not exporting {} with empty span {:?}", node, span),
            None => log::warn!("{} was not measured, leaving it out of the export", node),
        }
    }
    out
}

/// Inline style placing a node at its measured span
pub fn node_style(top: f32, height: f32) -> String {
    format!("top: {}px; height: {}px;", top, height)
}

fn column_class(node: NodeId) -> &'static str {
    match node {
        NodeId::Header => "cv-full",
        NodeId::SidebarBlock { .. } => "cv-side",
        _ => "cv-main",
    }
}

fn column_widths(flow: &ContentFlow, width: f32) -> (f32, f32) {
    if flow.sidebar_blocks().is_empty() {
        (width, 0.0)
    } else {
        let side = width * SIDEBAR_SHARE;
        (width - side, side)
    }
}

/// `cv-<slugified-name>-<unix millis>.<ext>`
pub fn export_file_name(name: &str, ext: &str, at: DateTime<Utc>) -> String {
    let slug = slug::slugify(name);
    let slug = if slug.is_empty() { "untitled".to_string() } else { slug };
    format!(
        "cv-{}-{}.{}",
        slug,
        at.timestamp_millis(),
        ext.trim_start_matches('.')
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Block, Section};
    use crate::layout::{
        compute_breaks, LayoutMeasurer, PageBands, PaginationRules, StackMeasurer, CSS_PX_PER_MM,
    };
    use chrono::TimeZone;

    fn flow() -> ContentFlow {
        ContentFlow::new()
            .with_header("Ada Lovelace", 120.0)
            .with_section(Section::new(
                Block::new("<h2>Work</h2>", 30.0),
                vec![Block::new("<p>Engine</p>", 90.0)],
            ))
            .with_sidebar(vec![Block::new("<p>Skills</p>", 40.0)])
    }

    #[test]
    fn test_export_structure() {
        let format = PageFormat::new(PaperSize::Letter, CSS_PX_PER_MM, PageBands::default());
        let usable = format.usable_height();
        let geometry = StackMeasurer::default().measure(&flow(), format.width_px);
        let breaks = compute_breaks(usable * 2.5, usable, &[], &PaginationRules::default());
        let doc = export_document(&flow(), &geometry, &breaks, &format, "Ada <CV>");

        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.html.matches("class=\"cv-page\"").count(), 3);
        assert!(doc.html.contains("@page { size: 215.9mm 279.4mm; margin: 0; }"));
        assert!(doc.html.contains("page-break-after: always"));
        assert!(doc.html.contains("<title>Ada &lt;CV&gt;</title>"));
        assert!(doc.html.contains("<div class=\"cv-footer\">3 / 3</div>"));
        for page in &doc.pages {
            let transform = format!("translateY(-{}px)", page.content_offset);
            assert!(doc.html.contains(&transform), "missing {}", transform);
        }
    }

    #[test]
    fn test_nodes_placed_at_measured_spans() {
        let flow = flow();
        let geometry = StackMeasurer::default().measure(&flow, 794.0);
        let markup = flow_markup(&flow, &geometry);

        assert!(markup.contains(
            "<div class=\"cv-node cv-main\" data-node=\"entry-0-0\" style=\"top: 178px; height: 90px;\"><p>Engine</p></div>"
        ));
        // Side column starts level with the main column, not below it
        assert!(markup.contains(
            "<div class=\"cv-node cv-side\" data-node=\"sidebar-0\" style=\"top: 136px; height: 40px;\"><p>Skills</p></div>"
        ));
        let work = markup.find("<h2>Work</h2>").unwrap();
        let skills = markup.find("<p>Skills</p>").unwrap();
        assert!(work < skills);
    }

    #[test]
    fn test_sidebar_column_rules() {
        let format = PageFormat::new(PaperSize::A4, CSS_PX_PER_MM, PageBands::default());
        let geometry = StackMeasurer::default().measure(&flow(), format.width_px);
        let doc = export_document(&flow(), &geometry, &PageBreakList::single(), &format, "CV");

        let (main, side) = column_widths(&flow(), format.width_px);
        assert!(main > 0.0 && side > 0.0);
        let side_rule = format!(".cv-side {{ left: {}px; width: {}px; }}", main, side);
        let flow_rule = format!(
            ".cv-flow {{ position: relative; width: {}px; height: 268px; }}",
            format.width_px
        );
        assert!(doc.html.contains(&side_rule));
        assert!(doc.html.contains(&flow_rule));
    }

    #[test]
    fn test_unmeasured_nodes_left_out() {
        let flow = flow();
        let mut geometry = Geometry::new(200.0);
        geometry.insert(NodeId::Header, crate::layout::Span::new(0.0, 120.0));

        let markup = flow_markup(&flow, &geometry);
        assert!(markup.contains("data-node=\"header\""));
        assert!(!markup.contains("Engine"));
    }

    #[test]
    fn test_export_file_name() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            export_file_name("Ada Lovelace", "html", at),
            "cv-ada-lovelace-1700000000123.html"
        );
        assert_eq!(export_file_name("  ", ".pdf", at), "cv-untitled-1700000000123.pdf");
    }
}
