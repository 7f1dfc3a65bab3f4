//! Page windows: the on-screen rendering of a break list
//!
//! Every page shows the whole flow through a fixed-height, clipped window
//! translated up by the page's start offset, followed by a footer band. The
//! export serializer renders from the same `Page` list.

use crate::layout::{PageBreakList, PageFormat};
use crate::Rect;
use serde::{Deserialize, Serialize};

/// Vertical gap between pages in the preview, before zoom
pub const PREVIEW_PAGE_GAP: f32 = 24.0;

/// One rendered page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub index: usize,
    /// Offset into the flow shown at the top of the window
    pub content_offset: f32,
    pub viewport_height: f32,
}

/// Derive pages from a break list
pub fn render_pages(breaks: &PageBreakList, format: &PageFormat) -> Vec<Page> {
    let viewport_height = format.usable_height();
    breaks
        .iter()
        .enumerate()
        .map(|(index, content_offset)| Page {
            index,
            content_offset,
            viewport_height,
        })
        .collect()
}

/// Footer text for a page
pub fn footer_label(page_index: usize, page_count: usize) -> String {
    format!("{} / {}", page_index + 1, page_count)
}

/// A display item to render, in page-local unscaled pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    /// Clipped window onto the flow
    ContentWindow { clip: Rect, translate_y: f32 },
    /// Fixed footer band
    Footer { rect: Rect, label: String },
}

/// Display list for a single page
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPage {
    pub page_index: usize,
    /// Position and size in the scrolling preview, zoom applied
    pub bounds: Rect,
    pub items: Vec<DisplayItem>,
}

impl DisplayPage {
    /// Window geometry for a page
    pub fn for_page(page: &Page, page_count: usize, format: &PageFormat, zoom: f32) -> Self {
        let y = page.index as f32 * (format.height_px + PREVIEW_PAGE_GAP) * zoom;

        Self {
            page_index: page.index,
            bounds: Rect::new(0.0, y, format.width_px * zoom, format.height_px * zoom),
            items: vec![
                DisplayItem::ContentWindow {
                    clip: Rect::new(0.0, format.margin_top_px, format.width_px, page.viewport_height),
                    translate_y: -page.content_offset,
                },
                DisplayItem::Footer {
                    rect: Rect::new(0.0, format.footer_top(), format.width_px, format.footer_height_px),
                    label: footer_label(page.index, page_count),
                },
            ],
        }
    }

    pub fn translate_y(&self) -> Option<f32> {
        self.items.iter().find_map(|item| match item {
            DisplayItem::ContentWindow { translate_y, .. } => Some(*translate_y),
            _ => None,
        })
    }
}

/// Complete display list for the preview
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub generation: u64,
    pub zoom: f32,
    pub pages: Vec<DisplayPage>,
}

impl DisplayList {
    /// Build the preview; zoom scales page bounds only, never offsets
    pub fn build(pages: &[Page], format: &PageFormat, zoom: f32, generation: u64) -> Self {
        Self {
            generation,
            zoom,
            pages: pages
                .iter()
                .map(|page| DisplayPage::for_page(page, pages.len(), format, zoom))
                .collect(),
        }
    }

    /// Pages intersecting a scroll viewport
    pub fn visible_pages(&self, viewport: Rect) -> impl Iterator<Item = &DisplayPage> + '_ {
        self.pages
            .iter()
            .filter(move |page| page.bounds.intersects(&viewport))
    }

    /// Height of the scrolling preview, zoom applied
    pub fn total_height(&self) -> f32 {
        self.pages
            .last()
            .map(|p| p.bounds.y + p.bounds.height)
            .unwrap_or(0.0)
    }
}
