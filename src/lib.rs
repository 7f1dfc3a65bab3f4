//! cv-pager: pagination engine for a print-ready CV editor
//!
//! This crate slices a single laid-out content flow into fixed-height pages:
//! - Pixel measurement through an injected `LayoutMeasurer`
//! - Candidate extraction so headings, entries and sidebar blocks stay whole
//! - Greedy, forward-only page-break selection
//! - Clipped page windows shared by the live preview and the printable export
//! - Change coordination with settle deferral, debouncing and stale-result guards

pub mod config;
pub mod content;
pub mod coordinator;
pub mod error;
pub mod layout;
pub mod render;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPaginator;

// Re-export primary types
pub use config::PagerConfig;
pub use content::{Block, ContentFlow, Header, NodeId, Section, Sidebar};
pub use coordinator::{Change, ChangeCoordinator, Completion, CoordinatorState, PaginationUpdate};
pub use error::{PagerError, Result};
pub use layout::{
    Candidate, Geometry, LayoutMeasurer, PageBands, PageBreakList, PageFormat, PaginationRules,
    PaperSize, RecordedGeometry, StackMeasurer,
};
pub use render::{DisplayList, DisplayPage, ExportDocument, Page, PageDiff};

/// Preview rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Measure, extract candidates and choose page breaks in one pass
///
/// Zero-height or otherwise degenerate measurements paginate as one page.
pub fn paginate(
    flow: &ContentFlow,
    format: &PageFormat,
    measurer: &dyn LayoutMeasurer,
    rules: &PaginationRules,
) -> PageBreakList {
    let geometry = measurer.measure(flow, format.width_px);
    paginate_measured(flow, &geometry, format, rules)
}

/// Choose page breaks from geometry that has already been measured
pub fn paginate_measured(
    flow: &ContentFlow,
    geometry: &Geometry,
    format: &PageFormat,
    rules: &PaginationRules,
) -> PageBreakList {
    let measurement = layout::Measurement::from_geometry(flow, geometry);
    layout::compute_breaks(
        measurement.total_height,
        format.usable_height(),
        &measurement.candidates,
        rules,
    )
}
