//! Change coordination: when to re-measure and re-paginate
//!
//! The host delivers changes as messages and drives a cooperative clock by
//! calling `tick` (or `poll` + `complete_measurement` when it measures
//! asynchronously). Content and paper changes wait one tick so the rendering
//! surface can settle; resizes are debounced. Every change bumps the
//! generation, and a measurement started under an older generation is
//! discarded instead of applied.

use crate::config::PagerConfig;
use crate::content::ContentFlow;
use crate::error::{PagerError, Result};
use crate::layout::{
    Geometry, LayoutMeasurer, PageBreakList, PageFormat, PaperSize, CSS_PX_PER_MM,
};
use crate::paginate_measured;
use crate::render::{
    export_document, export_file_name, render_pages, DisplayList, ExportDocument, Page, PageDiff,
};
use chrono::{DateTime, Utc};

/// Ticks a content or paper change waits before measuring
const SETTLE_TICKS: u32 = 1;

/// A change notification from the host
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// New content snapshot from the template layer
    Content(ContentFlow),
    Paper(PaperSize),
    /// View-only scale factor
    Zoom(f32),
    /// The preview container changed size
    Resize,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Stable,
    Recomputing,
}

/// Permission to measure, tagged with the generation it was issued under
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementTicket {
    pub generation: u64,
    /// Target width of the probe
    pub width: f32,
}

/// Newly published pagination
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationUpdate {
    pub generation: u64,
    pub breaks: PageBreakList,
    pub pages: Vec<Page>,
    pub diff: PageDiff,
}

/// Outcome of handing a measurement back
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Applied(PaginationUpdate),
    /// A newer change arrived after the ticket was issued
    Discarded { ticket: u64, current: u64 },
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    ticks_remaining: u32,
}

pub struct ChangeCoordinator {
    config: PagerConfig,
    flow: ContentFlow,
    zoom: f32,
    /// Cached once per session
    px_per_mm: Option<f32>,
    state: CoordinatorState,
    generation: u64,
    pending: Option<Pending>,
    in_flight: Option<u64>,
    breaks: PageBreakList,
    pages: Vec<Page>,
    /// Flow and geometry the published breaks were chosen against
    measured_flow: ContentFlow,
    geometry: Geometry,
}

impl ChangeCoordinator {
    /// Coordinator with an empty flow; the first tick paginates it
    pub fn new(config: PagerConfig) -> Self {
        Self {
            config,
            flow: ContentFlow::new(),
            zoom: 1.0,
            px_per_mm: None,
            state: CoordinatorState::Recomputing,
            generation: 1,
            pending: Some(Pending { ticks_remaining: 0 }),
            in_flight: None,
            breaks: PageBreakList::single(),
            pages: Vec::new(),
            measured_flow: ContentFlow::new(),
            geometry: Geometry::default(),
        }
    }

    /// Deliver a change
    pub fn notify(&mut self, change: Change) -> Result<()> {
        let delay = match change {
            Change::Content(flow) => {
                self.flow = flow;
                SETTLE_TICKS
            }
            Change::Paper(paper) => {
                self.config.paper = paper;
                SETTLE_TICKS
            }
            Change::Zoom(zoom) => {
                if !zoom.is_finite() || zoom <= 0.0 {
                    return Err(PagerError::InvalidZoom(zoom));
                }
                self.zoom = zoom;
                0
            }
            Change::Resize => self.config.resize_debounce_ticks,
            Change::Refresh => 0,
        };

        self.generation += 1;
        self.state = CoordinatorState::Recomputing;
        let ticks_remaining = match self.pending {
            Some(p) => p.ticks_remaining.max(delay),
            None => delay,
        };
        self.pending = Some(Pending { ticks_remaining });
        log::debug!(
            "generation {}: scheduled recompute in {} tick(s)",
            self.generation,
            ticks_remaining
        );
        Ok(())
    }

    /// Advance the clock; returns a ticket when a measurement is due
    pub fn poll(&mut self) -> Option<MeasurementTicket> {
        let pending = self.pending.as_mut()?;
        if pending.ticks_remaining > 0 {
            pending.ticks_remaining -= 1;
            return None;
        }
        self.pending = None;
        Some(self.begin_measurement())
    }

    /// Issue a ticket for the current generation immediately
    pub fn begin_measurement(&mut self) -> MeasurementTicket {
        self.in_flight = Some(self.generation);
        MeasurementTicket {
            generation: self.generation,
            width: self.page_format().width_px,
        }
    }

    /// Measure with `measurer`, then paginate unless the ticket is stale
    ///
    /// The first measurement of a session also caches the measurer's px/mm
    /// ratio; if that changes the page width the result is discarded and a
    /// new measurement is scheduled.
    pub fn complete_measurement(
        &mut self,
        ticket: MeasurementTicket,
        measurer: &dyn LayoutMeasurer,
    ) -> Completion {
        if self.px_per_mm.is_none() {
            self.set_unit_ratio(measurer.px_per_mm());
        }
        if self.in_flight == Some(ticket.generation) {
            self.in_flight = None;
        }
        if ticket.generation != self.generation {
            log::debug!(
                "discarding measurement for generation {} (now {})",
                ticket.generation,
                self.generation
            );
            return Completion::Discarded {
                ticket: ticket.generation,
                current: self.generation,
            };
        }

        let format = self.page_format();
        let geometry = measurer.measure(&self.flow, format.width_px);
        let breaks = paginate_measured(&self.flow, &geometry, &format, &self.config.rules);
        let pages = render_pages(&breaks, &format);
        let diff = PageDiff::between(&self.pages, &pages, self.generation);

        self.breaks = breaks.clone();
        self.pages = pages.clone();
        self.measured_flow = self.flow.clone();
        self.geometry = geometry;
        if self.pending.is_none() && self.in_flight.is_none() {
            self.state = CoordinatorState::Stable;
        }

        Completion::Applied(PaginationUpdate {
            generation: self.generation,
            breaks,
            pages,
            diff,
        })
    }

    /// Synchronous scheduling step: poll, measure and apply
    pub fn tick(&mut self, measurer: &dyn LayoutMeasurer) -> Option<PaginationUpdate> {
        if self.px_per_mm.is_none() {
            self.set_unit_ratio(measurer.px_per_mm());
        }
        let ticket = self.poll()?;
        match self.complete_measurement(ticket, measurer) {
            Completion::Applied(update) => Some(update),
            Completion::Discarded { .. } => None,
        }
    }

    /// Cache the px/mm ratio; non-positive values fall back to the CSS ratio
    ///
    /// A recompute is scheduled only when the effective page width changes.
    pub fn set_unit_ratio(&mut self, px_per_mm: f32) {
        let ratio = if px_per_mm.is_finite() && px_per_mm > 0.0 {
            px_per_mm
        } else {
            CSS_PX_PER_MM
        };
        let previous = self.px_per_mm.unwrap_or(CSS_PX_PER_MM);
        self.px_per_mm = Some(ratio);
        if previous != ratio {
            self.schedule_if_idle();
        }
    }

    /// Cached px/mm ratio, if one has been acquired
    pub fn unit_ratio(&self) -> Option<f32> {
        self.px_per_mm
    }

    /// Forget the cached ratio so the next tick asks the measurer again
    pub fn reset_unit_ratio(&mut self) {
        self.px_per_mm = None;
        self.schedule_if_idle();
    }

    fn schedule_if_idle(&mut self) {
        if self.pending.is_none() {
            self.generation += 1;
            self.state = CoordinatorState::Recomputing;
            self.pending = Some(Pending { ticks_remaining: 0 });
        }
    }

    /// Current page geometry
    pub fn page_format(&self) -> PageFormat {
        self.config
            .page_format(self.px_per_mm.unwrap_or(CSS_PX_PER_MM))
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn breaks(&self) -> &PageBreakList {
        &self.breaks
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Page count for UI display; at least one
    pub fn page_count(&self) -> usize {
        self.breaks.page_count()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn flow(&self) -> &ContentFlow {
        &self.flow
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// Preview display list for the published pages
    pub fn display_list(&self) -> DisplayList {
        let format = self.page_format();
        let pages = render_pages(&self.breaks, &format);
        DisplayList::build(&pages, &format, self.zoom, self.generation)
    }

    /// Printable document from the published breaks and the geometry they
    /// were computed against
    pub fn export(&self) -> ExportDocument {
        let title = match self.measured_flow.display_name() {
            "" => "CV".to_string(),
            name => format!("CV - {}", name),
        };
        export_document(
            &self.measured_flow,
            &self.geometry,
            &self.breaks,
            &self.page_format(),
            &title,
        )
    }

    /// Geometry of the last applied measurement
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Export file name for the current content
    pub fn export_file_name(&self, ext: &str, at: DateTime<Utc>) -> String {
        export_file_name(self.flow.display_name(), ext, at)
    }
}

impl Default for ChangeCoordinator {
    fn default() -> Self {
        Self::new(PagerConfig::default())
    }
}
