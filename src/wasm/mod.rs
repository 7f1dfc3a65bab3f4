//! WASM bindings for the paginator

pub mod flat_buffer;

use crate::content::ContentFlow;
use crate::coordinator::{Change, ChangeCoordinator, Completion, MeasurementTicket};
use crate::layout::{PaperSize, RecordedGeometry, StackMeasurer};
use crate::render::footer_label;
use crate::{PagerConfig, PagerError};
use flat_buffer::PageBuffer;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

impl From<PagerError> for JsValue {
    fn from(err: PagerError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// WASM-exposed paginator wrapper
#[wasm_bindgen]
pub struct WasmPaginator {
    coordinator: ChangeCoordinator,
    /// Used by `tick` when the host does not measure the DOM itself
    measurer: StackMeasurer,
    /// Ticket handed to the host by `pollMeasurement`
    ticket: Option<MeasurementTicket>,
    buffer: PageBuffer,
}

#[wasm_bindgen]
impl WasmPaginator {
    /// Create a paginator with the default config (A4)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::from_config(PagerConfig::default())
    }

    /// Create a paginator from a JSON config
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<WasmPaginator, JsValue> {
        Ok(Self::from_config(PagerConfig::from_json(json)?))
    }

    /// Replace the content flow (JSON snapshot from the template layer)
    #[wasm_bindgen(js_name = setContent)]
    pub fn set_content(&mut self, json: &str) -> Result<(), JsValue> {
        let flow = ContentFlow::from_json(json)?;
        self.coordinator.notify(Change::Content(flow))?;
        Ok(())
    }

    /// Switch paper size ("A4" or "Letter")
    #[wasm_bindgen(js_name = setPaperSize)]
    pub fn set_paper_size(&mut self, name: &str) -> Result<(), JsValue> {
        let paper: PaperSize = name.parse()?;
        self.coordinator.notify(Change::Paper(paper))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), JsValue> {
        self.coordinator.notify(Change::Zoom(zoom))?;
        Ok(())
    }

    /// Report a container resize (debounced)
    #[wasm_bindgen(js_name = notifyResize)]
    pub fn notify_resize(&mut self) -> Result<(), JsValue> {
        self.coordinator.notify(Change::Resize)?;
        Ok(())
    }

    pub fn refresh(&mut self) -> Result<(), JsValue> {
        self.coordinator.notify(Change::Refresh)?;
        Ok(())
    }

    /// Cache the probe's px/mm ratio
    #[wasm_bindgen(js_name = setUnitRatio)]
    pub fn set_unit_ratio(&mut self, px_per_mm: f32) {
        self.coordinator.set_unit_ratio(px_per_mm);
    }

    /// One scheduling tick using intrinsic heights; true if pages changed
    pub fn tick(&mut self) -> bool {
        self.ticket = None;
        self.coordinator.tick(&self.measurer).is_some()
    }

    /// One scheduling tick for hosts that measure the DOM themselves.
    /// Returns the probe width when a measurement is due, or -1.
    #[wasm_bindgen(js_name = pollMeasurement)]
    pub fn poll_measurement(&mut self) -> f32 {
        match self.coordinator.poll() {
            Some(ticket) => {
                self.ticket = Some(ticket);
                ticket.width
            }
            None => -1.0,
        }
    }

    /// Generation of the outstanding measurement, or -1
    #[wasm_bindgen(js_name = measurementGeneration)]
    pub fn measurement_generation(&self) -> f64 {
        self.ticket.map(|t| t.generation as f64).unwrap_or(-1.0)
    }

    /// Hand back probe geometry (JSON); false if it was superseded
    #[wasm_bindgen(js_name = completeMeasurement)]
    pub fn complete_measurement(&mut self, geometry_json: &str) -> Result<bool, JsValue> {
        let Some(ticket) = self.ticket.take() else {
            return Ok(false);
        };
        let recorded = RecordedGeometry::from_json(geometry_json)?;
        match self.coordinator.complete_measurement(ticket, &recorded) {
            Completion::Applied(_) => Ok(true),
            Completion::Discarded { .. } => Ok(false),
        }
    }

    /// Get page count
    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.coordinator.page_count()
    }

    /// Get page start offsets
    #[wasm_bindgen(js_name = getBreaks)]
    pub fn get_breaks(&self) -> Vec<f32> {
        self.coordinator.breaks().as_slice().to_vec()
    }

    /// Get pages and page geometry (returns JSON)
    #[wasm_bindgen(js_name = getRenderData)]
    pub fn get_render_data(&self) -> String {
        let format = self.coordinator.page_format();
        let page_count = self.coordinator.pages().len();
        let render_data = RenderData {
            generation: self.coordinator.generation(),
            zoom: self.coordinator.zoom(),
            page_width: format.width_px,
            page_height: format.height_px,
            window_top: format.margin_top_px,
            footer_top: format.footer_top(),
            footer_height: format.footer_height_px,
            pages: self
                .coordinator
                .pages()
                .iter()
                .map(|page| PageRenderData {
                    page_index: page.index,
                    content_offset: page.content_offset,
                    viewport_height: page.viewport_height,
                    footer_label: footer_label(page.index, page_count),
                })
                .collect(),
        };
        serde_json::to_string(&render_data).unwrap_or_default()
    }

    /// Fill the flat page buffer; read pointers afterwards
    #[wasm_bindgen(js_name = writePageBuffer)]
    pub fn write_page_buffer(&mut self) {
        let format = self.coordinator.page_format();
        self.buffer.write_pages(
            self.coordinator.generation(),
            self.coordinator.pages(),
            &format,
            self.coordinator.zoom(),
        );
    }

    #[wasm_bindgen(js_name = u32Ptr)]
    pub fn u32_ptr(&self) -> u32 {
        self.buffer.u32_ptr()
    }

    #[wasm_bindgen(js_name = u32Len)]
    pub fn u32_len(&self) -> u32 {
        self.buffer.u32_len()
    }

    #[wasm_bindgen(js_name = f32Ptr)]
    pub fn f32_ptr(&self) -> u32 {
        self.buffer.f32_ptr()
    }

    #[wasm_bindgen(js_name = f32Len)]
    pub fn f32_len(&self) -> u32 {
        self.buffer.f32_len()
    }

    /// Standalone printable HTML for the current pages
    #[wasm_bindgen(js_name = exportHtml)]
    pub fn export_html(&self) -> String {
        self.coordinator.export().html
    }

    /// `cv-<name>-<timestamp>.<ext>` for the download
    #[wasm_bindgen(js_name = exportFileName)]
    pub fn export_file_name(&self, ext: &str) -> String {
        self.coordinator.export_file_name(ext, chrono::Utc::now())
    }
}

impl WasmPaginator {
    fn from_config(config: PagerConfig) -> Self {
        Self {
            measurer: StackMeasurer::new(config.stack),
            coordinator: ChangeCoordinator::new(config),
            ticket: None,
            buffer: PageBuffer::new(),
        }
    }

    pub fn coordinator(&self) -> &ChangeCoordinator {
        &self.coordinator
    }
}

impl Default for WasmPaginator {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable render data for JS
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderData {
    pub generation: u64,
    pub zoom: f32,
    pub page_width: f32,
    pub page_height: f32,
    pub window_top: f32,
    pub footer_top: f32,
    pub footer_height: f32,
    pub pages: Vec<PageRenderData>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRenderData {
    pub page_index: usize,
    pub content_offset: f32,
    pub viewport_height: f32,
    pub footer_label: String,
}
