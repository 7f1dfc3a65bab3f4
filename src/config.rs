//! Engine configuration

use crate::error::{PagerError, Result};
use crate::layout::{PageBands, PageFormat, PaginationRules, PaperSize, StackMetrics};
use serde::{Deserialize, Serialize};

/// Settings for pagination, page geometry and change coalescing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagerConfig {
    pub paper: PaperSize,
    pub bands: PageBands,
    pub rules: PaginationRules,
    pub stack: StackMetrics,
    /// Ticks without a further resize before the pipeline runs
    pub resize_debounce_ticks: u32,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            bands: PageBands::default(),
            rules: PaginationRules::default(),
            stack: StackMetrics::default(),
            resize_debounce_ticks: 2,
        }
    }
}

impl PagerConfig {
    /// Parse a (possibly partial) JSON config; missing keys take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if !config.rules.is_valid() {
            return Err(PagerError::InvalidRules {
                min_advance: config.rules.min_advance,
                gap: config.rules.gap,
            });
        }
        Ok(config)
    }

    pub fn page_format(&self, px_per_mm: f32) -> PageFormat {
        PageFormat::new(self.paper, px_per_mm, self.bands)
    }
}
