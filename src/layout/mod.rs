//! Measurement, candidate extraction and page-break calculation

mod candidates;
mod format;
mod measure;
mod pagination;

pub use candidates::{extract_candidates, measure_candidates, Candidate, Measurement};
pub use format::{PageBands, PageFormat, PaperSize};
pub use measure::{
    Geometry, LayoutMeasurer, MeasuredNode, RecordedGeometry, Span, StackMeasurer, StackMetrics,
    CSS_PX_PER_MM,
};
pub use pagination::{
    compute_breaks, uniform_breaks, PageBreakList, PaginationRules, MAX_PAGES,
};
