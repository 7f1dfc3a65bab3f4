//! Render output: page windows, preview diffs and the printable export

mod diff;
mod display;
mod export;

pub use diff::{PageDiff, PagePatch};
pub use display::{
    footer_label, render_pages, DisplayItem, DisplayList, DisplayPage, Page, PREVIEW_PAGE_GAP,
};
pub use export::{
    export_document, export_file_name, flow_markup, node_style, ExportDocument, SIDEBAR_SHARE,
};
