//! Page diff protocol for incremental preview updates

use crate::render::Page;

/// A single patch operation for the preview host
#[derive(Debug, Clone, PartialEq)]
pub enum PagePatch {
    /// Append a page that did not exist before
    InsertPage { page: Page },
    /// Existing page whose window moved or resized
    UpdatePage { page: Page },
    /// Drop a trailing page
    RemovePage { page_index: usize },
}

/// Complete diff between two published page lists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageDiff {
    pub generation: u64,
    pub patches: Vec<PagePatch>,
}

impl PageDiff {
    /// Create empty diff
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            patches: Vec::new(),
        }
    }

    /// Compare the previously published pages with the new ones
    pub fn between(previous: &[Page], current: &[Page], generation: u64) -> Self {
        let mut diff = Self::new(generation);

        for (prev, curr) in previous.iter().zip(current) {
            if prev != curr {
                diff.add_patch(PagePatch::UpdatePage { page: *curr });
            }
        }

        for page in current.iter().skip(previous.len()) {
            diff.add_patch(PagePatch::InsertPage { page: *page });
        }

        // Remove from the end so indices stay valid while applying
        for page_index in (current.len()..previous.len()).rev() {
            diff.add_patch(PagePatch::RemovePage { page_index });
        }

        diff
    }

    /// Add a patch
    pub fn add_patch(&mut self, patch: PagePatch) {
        self.patches.push(patch);
    }

    /// Check if there are any patches
    pub fn has_patches(&self) -> bool {
        !self.patches.is_empty()
    }

    /// Get patch count
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(index: usize, content_offset: f32) -> Page {
        Page {
            index,
            content_offset,
            viewport_height: 800.0,
        }
    }

    #[test]
    fn test_unchanged_pages_produce_no_patches() {
        let pages = vec![page(0, 0.0), page(1, 742.0)];
        let diff = PageDiff::between(&pages, &pages, 3);
        assert!(!diff.has_patches());
        assert_eq!(diff.generation, 3);
    }

    #[test]
    fn test_growth_and_shift() {
        let previous = vec![page(0, 0.0), page(1, 800.0)];
        let current = vec![page(0, 0.0), page(1, 742.0), page(2, 1542.0)];
        let diff = PageDiff::between(&previous, &current, 4);

        assert_eq!(diff.patch_count(), 2);
        assert_eq!(diff.patches[0], PagePatch::UpdatePage { page: page(1, 742.0) });
        assert_eq!(diff.patches[1], PagePatch::InsertPage { page: page(2, 1542.0) });
    }

    #[test]
    fn test_shrink_removes_from_the_end() {
        let previous = vec![page(0, 0.0), page(1, 800.0), page(2, 1600.0)];
        let current = vec![page(0, 0.0)];
        let diff = PageDiff::between(&previous, &current, 5);

        assert_eq!(
            diff.patches,
            vec![
                PagePatch::RemovePage { page_index: 2 },
                PagePatch::RemovePage { page_index: 1 },
            ]
        );
    }
}
