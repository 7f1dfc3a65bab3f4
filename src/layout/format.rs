//! Physical page formats and their pixel geometry

use crate::error::{PagerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical paper size selected in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

impl PaperSize {
    /// Width and height in millimetres
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::Letter => (215.9, 279.4),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::Letter => "Letter",
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaperSize {
    type Err = PagerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PaperSize::A4),
            "letter" | "us-letter" => Ok(PaperSize::Letter),
            _ => Err(PagerError::UnknownPaperSize(s.to_string())),
        }
    }
}

/// Vertical bands reserved on every page, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageBands {
    pub margin_top_px: f32,
    pub margin_bottom_px: f32,
    pub footer_height_px: f32,
    /// Slack that keeps the last visible line off the clipping edge
    pub buffer_px: f32,
}

impl Default for PageBands {
    fn default() -> Self {
        Self {
            margin_top_px: 40.0,
            margin_bottom_px: 40.0,
            footer_height_px: 32.0,
            buffer_px: 8.0,
        }
    }
}

/// Pixel geometry of one printed page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFormat {
    pub paper: PaperSize,
    pub width_px: f32,
    pub height_px: f32,
    pub margin_top_px: f32,
    pub margin_bottom_px: f32,
    pub footer_height_px: f32,
    pub buffer_px: f32,
}

impl PageFormat {
    /// Derive pixel geometry from a paper size and the session's px/mm ratio
    pub fn new(paper: PaperSize, px_per_mm: f32, bands: PageBands) -> Self {
        let (width_mm, height_mm) = paper.dimensions_mm();
        Self {
            paper,
            width_px: width_mm * px_per_mm,
            height_px: height_mm * px_per_mm,
            margin_top_px: bands.margin_top_px,
            margin_bottom_px: bands.margin_bottom_px,
            footer_height_px: bands.footer_height_px,
            buffer_px: bands.buffer_px,
        }
    }

    /// Height available to content on every page
    pub fn usable_height(&self) -> f32 {
        self.height_px
            - self.margin_top_px
            - self.margin_bottom_px
            - self.footer_height_px
            - self.buffer_px
    }

    /// Top edge of the footer band, relative to the page
    pub fn footer_top(&self) -> f32 {
        self.height_px - self.margin_bottom_px - self.footer_height_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CSS_PX_PER_MM;

    #[test]
    fn test_usable_height() {
        let format = PageFormat {
            paper: PaperSize::A4,
            width_px: 800.0,
            height_px: 1000.0,
            margin_top_px: 40.0,
            margin_bottom_px: 40.0,
            footer_height_px: 32.0,
            buffer_px: 8.0,
        };
        assert_eq!(format.usable_height(), 880.0);
        assert_eq!(format.footer_top(), 928.0);
    }

    #[test]
    fn test_paper_dimensions() {
        let a4 = PageFormat::new(PaperSize::A4, CSS_PX_PER_MM, PageBands::default());
        let letter = PageFormat::new(PaperSize::Letter, CSS_PX_PER_MM, PageBands::default());

        assert!((a4.width_px - 793.7).abs() < 0.1);
        assert!((a4.height_px - 1122.5).abs() < 0.1);
        assert!((letter.height_px - 1056.0).abs() < 0.1);
        assert!(a4.usable_height() > letter.usable_height());
    }

    #[test]
    fn test_parse_paper() {
        assert_eq!("a4".parse::<PaperSize>().unwrap(), PaperSize::A4);
        assert_eq!(" Letter ".parse::<PaperSize>().unwrap(), PaperSize::Letter);
        assert!(matches!(
            "legal".parse::<PaperSize>(),
            Err(PagerError::UnknownPaperSize(_))
        ));
    }
}
