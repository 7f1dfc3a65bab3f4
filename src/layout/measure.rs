//! Layout measurement boundary
//!
//! The engine never talks to a rendering surface directly. A host supplies a
//! `LayoutMeasurer` that renders the flow at the page width somewhere off
//! screen and reports pixel boxes. `StackMeasurer` computes those boxes from
//! the intrinsic block heights; `RecordedGeometry` replays boxes measured by
//! the host (a hidden DOM probe in the browser).

use crate::content::{ContentFlow, NodeId};
use crate::error::Result;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// CSS reference ratio: 96 px per inch
pub const CSS_PX_PER_MM: f32 = 96.0 / 25.4;

/// Vertical extent of a node relative to the top of the flow
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Span {
    pub top: f32,
    pub bottom: f32,
}

impl Span {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Finite and non-empty
    pub fn is_valid(&self) -> bool {
        self.top.is_finite() && self.bottom.is_finite() && self.bottom > self.top
    }
}

/// Result of one measurement pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub total_height: f32,
    spans: FxHashMap<NodeId, Span>,
}

impl Geometry {
    pub fn new(total_height: f32) -> Self {
        Self {
            total_height,
            spans: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, node: NodeId, span: Span) {
        self.spans.insert(node, span);
    }

    /// Measured box of a node, if the probe rendered it
    pub fn span(&self, node: NodeId) -> Option<Span> {
        self.spans.get(&node).copied()
    }

    pub fn node_count(&self) -> usize {
        self.spans.len()
    }
}

/// Capability: render a flow at a width and report its geometry
pub trait LayoutMeasurer {
    fn measure(&self, flow: &ContentFlow, width: f32) -> Geometry;

    /// Pixels per millimetre of the rendering surface
    fn px_per_mm(&self) -> f32 {
        CSS_PX_PER_MM
    }
}

/// Spacing used when stacking blocks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StackMetrics {
    /// Between the header and both columns
    pub header_gap: f32,
    pub section_gap: f32,
    /// Before each entry, after the title or previous entry
    pub entry_gap: f32,
    pub block_gap: f32,
}

impl Default for StackMetrics {
    fn default() -> Self {
        Self {
            header_gap: 16.0,
            section_gap: 24.0,
            entry_gap: 12.0,
            block_gap: 16.0,
        }
    }
}

/// Deterministic measurer stacking intrinsic heights
///
/// Header spans the full width. The main column and the sidebar both start
/// below it and are stacked independently; total height is the taller column.
/// Heights are assumed to be at the target width already, so `width` only
/// matters to real rendering surfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackMeasurer {
    pub metrics: StackMetrics,
}

impl StackMeasurer {
    pub fn new(metrics: StackMetrics) -> Self {
        Self { metrics }
    }
}

impl LayoutMeasurer for StackMeasurer {
    fn measure(&self, flow: &ContentFlow, _width: f32) -> Geometry {
        let m = &self.metrics;
        let mut geometry = Geometry::new(0.0);

        let header_bottom = flow.header.height.max(0.0);
        if header_bottom > 0.0 {
            geometry.insert(NodeId::Header, Span::new(0.0, header_bottom));
        }

        let has_body = !flow.sections.is_empty() || !flow.sidebar_blocks().is_empty();
        let column_top = if has_body && header_bottom > 0.0 {
            header_bottom + m.header_gap
        } else {
            header_bottom
        };

        let mut y = column_top;
        for (section, s) in flow.sections.iter().enumerate() {
            if section > 0 {
                y += m.section_gap;
            }
            let section_top = y;
            y += s.title.height.max(0.0);
            geometry.insert(NodeId::SectionTitle { section }, Span::new(section_top, y));

            for (entry, block) in s.entries.iter().enumerate() {
                y += m.entry_gap;
                let top = y;
                y += block.height.max(0.0);
                geometry.insert(NodeId::Entry { section, entry }, Span::new(top, y));
            }
            geometry.insert(NodeId::Section { section }, Span::new(section_top, y));
        }
        let main_bottom = y;

        let mut y = column_top;
        for (block, b) in flow.sidebar_blocks().iter().enumerate() {
            if block > 0 {
                y += m.block_gap;
            }
            let top = y;
            y += b.height.max(0.0);
            geometry.insert(NodeId::SidebarBlock { block }, Span::new(top, y));
        }

        geometry.total_height = header_bottom.max(main_bottom).max(y);
        geometry
    }
}

/// One measured node as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasuredNode {
    pub node: NodeId,
    pub top: f32,
    pub bottom: f32,
}

/// Geometry measured by the host, replayed as a measurer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedGeometry {
    pub total_height: f32,
    #[serde(default)]
    pub nodes: Vec<MeasuredNode>,
    #[serde(default)]
    pub px_per_mm: Option<f32>,
}

impl RecordedGeometry {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl LayoutMeasurer for RecordedGeometry {
    fn measure(&self, _flow: &ContentFlow, _width: f32) -> Geometry {
        let mut geometry = Geometry::new(self.total_height);
        for n in &self.nodes {
            geometry.insert(n.node, Span::new(n.top, n.bottom));
        }
        geometry
    }

    fn px_per_mm(&self) -> f32 {
        self.px_per_mm
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(CSS_PX_PER_MM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Block, Section};

    #[test]
    fn test_stack_measurer_columns() {
        let flow = ContentFlow::new()
            .with_header("Ada", 100.0)
            .with_section(Section::new(
                Block::sized(30.0),
                vec![Block::sized(200.0), Block::sized(150.0)],
            ))
            .with_sidebar(vec![Block::sized(120.0), Block::sized(80.0)]);

        let geometry = StackMeasurer::default().measure(&flow, 794.0);

        assert_eq!(geometry.span(NodeId::Header), Some(Span::new(0.0, 100.0)));
        assert_eq!(
            geometry.span(NodeId::SectionTitle { section: 0 }),
            Some(Span::new(116.0, 146.0))
        );
        assert_eq!(
            geometry.span(NodeId::Entry { section: 0, entry: 0 }),
            Some(Span::new(158.0, 358.0))
        );
        assert_eq!(
            geometry.span(NodeId::Entry { section: 0, entry: 1 }),
            Some(Span::new(370.0, 520.0))
        );
        assert_eq!(
            geometry.span(NodeId::Section { section: 0 }),
            Some(Span::new(116.0, 520.0))
        );
        assert_eq!(
            geometry.span(NodeId::SidebarBlock { block: 1 }),
            Some(Span::new(252.0, 332.0))
        );
        assert_eq!(geometry.total_height, 520.0);
    }

    #[test]
    fn test_empty_flow_measures_zero() {
        let geometry = StackMeasurer::default().measure(&ContentFlow::new(), 794.0);
        assert_eq!(geometry.total_height, 0.0);
        assert_eq!(geometry.node_count(), 0);
    }

    #[test]
    fn test_recorded_geometry() {
        let json = r#"{
            "totalHeight": 1800,
            "pxPerMm": 3.78,
            "nodes": [
                { "node": { "kind": "header" }, "top": 0, "bottom": 140 },
                { "node": { "kind": "sidebarBlock", "block": 0 }, "top": 150, "bottom": 400 }
            ]
        }"#;

        let recorded = RecordedGeometry::from_json(json).unwrap();
        let geometry = recorded.measure(&ContentFlow::new(), 794.0);

        assert_eq!(geometry.total_height, 1800.0);
        assert_eq!(
            geometry.span(NodeId::SidebarBlock { block: 0 }),
            Some(Span::new(150.0, 400.0))
        );
        assert_eq!(recorded.px_per_mm(), 3.78);
    }

    #[test]
    fn test_recorded_ratio_falls_back() {
        let recorded = RecordedGeometry {
            px_per_mm: Some(0.0),
            ..Default::default()
        };
        assert_eq!(recorded.px_per_mm(), CSS_PX_PER_MM);
    }
}
