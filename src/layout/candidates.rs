//! Candidate extraction: indivisible units the break calculator avoids cutting

use crate::content::{ContentFlow, NodeId};
use crate::layout::measure::{Geometry, LayoutMeasurer};

/// Measured span of a unit that should not straddle a page boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub top: f32,
    pub bottom: f32,
}

impl Candidate {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    /// True if a cut at `y` would slice through this unit
    pub fn straddles(&self, y: f32) -> bool {
        self.top < y && y < self.bottom
    }
}

/// Output of one measure + extract pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Measurement {
    pub total_height: f32,
    /// Sorted ascending by `top`
    pub candidates: Vec<Candidate>,
}

impl Measurement {
    /// Candidates and a sanitized total from an existing measurement pass
    pub fn from_geometry(flow: &ContentFlow, geometry: &Geometry) -> Self {
        let total_height = if geometry.total_height.is_finite() {
            geometry.total_height.max(0.0)
        } else {
            0.0
        };

        Self {
            total_height,
            candidates: extract_candidates(flow, geometry),
        }
    }
}

/// Run the measurer at `width` and extract candidates from its geometry
pub fn measure_candidates(
    flow: &ContentFlow,
    measurer: &dyn LayoutMeasurer,
    width: f32,
) -> Measurement {
    Measurement::from_geometry(flow, &measurer.measure(flow, width))
}

/// Extract candidates in flow order, sorted by top
///
/// Sections with two or more entries contribute their title and each entry
/// separately; smaller sections stay whole.
pub fn extract_candidates(flow: &ContentFlow, geometry: &Geometry) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(geometry.node_count());
    let mut push = |node: NodeId| match geometry.span(node) {
        Some(span) if span.is_valid() => candidates.push(Candidate::new(span.top, span.bottom)),
        Some(span) => log::debug!("skipping degenerate span {:?} for {:?}", span, node),
        None => log::debug!("no measured span for {:?}", node),
    };

    push(NodeId::Header);

    for (section, s) in flow.sections.iter().enumerate() {
        if s.is_decomposable() {
            push(NodeId::SectionTitle { section });
            for entry in 0..s.entries.len() {
                push(NodeId::Entry { section, entry });
            }
        } else {
            push(NodeId::Section { section });
        }
    }

    for block in 0..flow.sidebar_blocks().len() {
        push(NodeId::SidebarBlock { block });
    }

    candidates.sort_by(|a, b| a.top.total_cmp(&b.top));
    candidates
}
