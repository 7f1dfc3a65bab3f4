//! Flat buffer protocol for zero-copy WASM bridge
//!
//! Binary format for page geometry:
//!
//! ## u32 Buffer Layout:
//! ```text
//! [0]     MAGIC (0x43565047 = "CVPG" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 1)
//! [2]     generation_lo
//! [3]     generation_hi
//! [4]     page_count
//! [5..]   per-page: [page_index]
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! [0..4]  page: [width, height, zoom, window_top]
//! [4..]   per-page: [content_offset, viewport_height, footer_top, footer_height]
//! ```

use crate::layout::PageFormat;
use crate::render::Page;

/// Magic number for format validation: "CVPG"
pub const MAGIC: u32 = 0x43565047;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 5;

/// Header size in f32 elements
pub const F32_HEADER_SIZE: usize = 4;

/// Number of f32 values per page
pub const F32_PER_PAGE: usize = 4;

/// Page buffer for zero-copy WASM transfer
pub struct PageBuffer {
    /// Integer data (header, page indices)
    pub u32_data: Vec<u32>,
    /// Float data (page geometry, window offsets)
    pub f32_data: Vec<f32>,
}

impl Default for PageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageBuffer {
    pub fn new() -> Self {
        Self {
            u32_data: Vec::with_capacity(64),
            f32_data: Vec::with_capacity(128),
        }
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.f32_data.clear();
    }

    /// Rewrite the buffer for a page list.
    /// JS holds pointers into these vectors, so capacity is reserved up
    /// front and pointers must be re-read after every call.
    pub fn write_pages(&mut self, generation: u64, pages: &[Page], format: &PageFormat, zoom: f32) {
        self.clear();
        self.u32_data.reserve(HEADER_SIZE + pages.len());
        self.f32_data.reserve(F32_HEADER_SIZE + pages.len() * F32_PER_PAGE);

        self.u32_data.push(MAGIC);                            // [0] magic number
        self.u32_data.push(SCHEMA_VERSION);                   // [1] schema version
        self.u32_data.push((generation & 0xFFFFFFFF) as u32); // [2] generation_lo
        self.u32_data.push((generation >> 32) as u32);        // [3] generation_hi
        self.u32_data.push(pages.len() as u32);               // [4] page_count

        self.f32_data.push(format.width_px);
        self.f32_data.push(format.height_px);
        self.f32_data.push(zoom);
        self.f32_data.push(format.margin_top_px);

        for page in pages {
            self.u32_data.push(page.index as u32);

            self.f32_data.push(page.content_offset);
            self.f32_data.push(page.viewport_height);
            self.f32_data.push(format.footer_top());
            self.f32_data.push(format.footer_height_px);
        }
    }

    /// Read back the page list (used by tests and native hosts)
    pub fn read_pages(&self) -> Vec<Page> {
        if self.u32_data.len() < HEADER_SIZE || self.u32_data[0] != MAGIC {
            return Vec::new();
        }
        let count = self.u32_data[4] as usize;
        (0..count)
            .filter_map(|i| {
                let index = *self.u32_data.get(HEADER_SIZE + i)? as usize;
                let base = F32_HEADER_SIZE + i * F32_PER_PAGE;
                Some(Page {
                    index,
                    content_offset: *self.f32_data.get(base)?,
                    viewport_height: *self.f32_data.get(base + 1)?,
                })
            })
            .collect()
    }

    pub fn u32_ptr(&self) -> u32 {
        self.u32_data.as_ptr() as u32
    }

    pub fn u32_len(&self) -> u32 {
        self.u32_data.len() as u32
    }

    pub fn f32_ptr(&self) -> u32 {
        self.f32_data.as_ptr() as u32
    }

    pub fn f32_len(&self) -> u32 {
        self.f32_data.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PaperSize;

    fn format() -> PageFormat {
        PageFormat {
            paper: PaperSize::A4,
            width_px: 794.0,
            height_px: 1123.0,
            margin_top_px: 40.0,
            margin_bottom_px: 40.0,
            footer_height_px: 32.0,
            buffer_px: 8.0,
        }
    }

    fn pages() -> Vec<Page> {
        vec![
            Page {
                index: 0,
                content_offset: 0.0,
                viewport_height: 1003.0,
            },
            Page {
                index: 1,
                content_offset: 742.0,
                viewport_height: 1003.0,
            },
        ]
    }

    #[test]
    fn test_header_layout() {
        let mut buf = PageBuffer::new();
        buf.write_pages((7u64 << 32) | 3, &pages(), &format(), 1.25);

        assert_eq!(buf.u32_data[0], MAGIC);
        assert_eq!(buf.u32_data[1], SCHEMA_VERSION);
        assert_eq!(buf.u32_data[2], 3, "generation_lo");
        assert_eq!(buf.u32_data[3], 7, "generation_hi");
        assert_eq!(buf.u32_data[4], 2, "page_count");
        assert_eq!(buf.f32_data[..F32_HEADER_SIZE], [794.0, 1123.0, 1.25, 40.0]);
    }

    #[test]
    fn test_page_geometry() {
        let mut buf = PageBuffer::new();
        buf.write_pages(1, &pages(), &format(), 1.0);

        let second = F32_HEADER_SIZE + F32_PER_PAGE;
        assert_eq!(buf.u32_data[HEADER_SIZE + 1], 1);
        assert_eq!(buf.f32_data[second], 742.0, "content offset");
        assert_eq!(buf.f32_data[second + 2], 1051.0, "footer top");
        assert_eq!(buf.read_pages(), pages());
    }

    #[test]
    fn test_rewrite_replaces_previous_contents() {
        let mut buf = PageBuffer::new();
        buf.write_pages(1, &pages(), &format(), 1.0);
        buf.write_pages(2, &pages()[..1], &format(), 1.0);

        assert_eq!(buf.u32_len() as usize, HEADER_SIZE + 1);
        assert_eq!(buf.f32_len() as usize, F32_HEADER_SIZE + F32_PER_PAGE);
        assert_eq!(buf.read_pages().len(), 1);
    }

    #[test]
    fn test_read_rejects_bad_magic() {
        let mut buf = PageBuffer::new();
        buf.write_pages(1, &pages(), &format(), 1.0);
        buf.u32_data[0] = 0;
        assert!(buf.read_pages().is_empty());
    }
}
