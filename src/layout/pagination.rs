//! Page-break calculation for fixed-height pages

use crate::layout::candidates::Candidate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Upper bound on pages produced for a single flow
pub const MAX_PAGES: usize = 1000;

/// Pagination rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationRules {
    /// Minimum distance a shifted break must move past the previous break
    pub min_advance: f32,
    /// Breathing room left above a unit when the break is shifted to it
    pub gap: f32,
}

impl Default for PaginationRules {
    fn default() -> Self {
        Self {
            min_advance: 60.0,
            gap: 8.0,
        }
    }
}

impl PaginationRules {
    /// Both distances finite and non-negative
    pub fn is_valid(&self) -> bool {
        self.min_advance.is_finite()
            && self.min_advance >= 0.0
            && self.gap.is_finite()
            && self.gap >= 0.0
    }

    /// Negative distances clamped to zero, non-finite ones reset to defaults
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let clamp = |value: f32, fallback: f32| {
            if value.is_finite() {
                value.max(0.0)
            } else {
                fallback
            }
        };
        Self {
            min_advance: clamp(self.min_advance, defaults.min_advance),
            gap: clamp(self.gap, defaults.gap),
        }
    }
}

/// Offsets into the flow at which each page starts
///
/// Always starts at 0, strictly increasing, never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBreakList(Vec<f32>);

impl PageBreakList {
    /// One page starting at the top of the flow
    pub fn single() -> Self {
        Self(vec![0.0])
    }

    pub fn page_count(&self) -> usize {
        self.0.len()
    }

    pub fn offset(&self, page_index: usize) -> Option<f32> {
        self.0.get(page_index).copied()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.0.iter().copied()
    }

    fn last(&self) -> f32 {
        self.0.last().copied().unwrap_or(0.0)
    }
}

impl Default for PageBreakList {
    fn default() -> Self {
        Self::single()
    }
}

/// Choose page start offsets for a flow of `total_height`
///
/// Greedy and forward-only: each naive cut one page below the previous break
/// is moved up to just above the first unit it would slice, provided that
/// still advances at least `min_advance`. Otherwise the cut is forced at the
/// naive offset, splitting whatever is there (including units taller than a
/// page).
///
/// Output is capped at `MAX_PAGES`; taller flows are truncated with a warning.
pub fn compute_breaks(
    total_height: f32,
    usable_height: f32,
    candidates: &[Candidate],
    rules: &PaginationRules,
) -> PageBreakList {
    if !usable_height.is_finite() || usable_height <= 0.0 {
        log::warn!(
            "usable page height {} leaves no room for content, using a single page",
            usable_height
        );
        return PageBreakList::single();
    }
    if !total_height.is_finite() || total_height <= usable_height {
        return PageBreakList::single();
    }
    if candidates.is_empty() {
        return uniform_breaks(total_height, usable_height);
    }

    let rules = if rules.is_valid() {
        *rules
    } else {
        let sanitized = rules.sanitized();
        log::warn!("invalid pagination rules {:?}, using {:?}", rules, sanitized);
        sanitized
    };
    let total_height = capped_height(total_height, usable_height);

    let mut breaks = PageBreakList::single();
    let mut cursor = usable_height;

    while cursor < total_height && breaks.page_count() < MAX_PAGES {
        let straddling: SmallVec<[&Candidate; 4]> =
            candidates.iter().filter(|c| c.straddles(cursor)).collect();

        if let Some(first_top) = straddling.iter().map(|c| c.top).reduce(f32::min) {
            let safe_y = first_top - rules.gap;
            let last = breaks.last();
            if safe_y > last && safe_y - last > rules.min_advance {
                breaks.0.push(safe_y);
                cursor = safe_y + usable_height;
                continue;
            }
            log::debug!(
                "forced cut at {}: shift to {} advances less than {}",
                cursor,
                safe_y,
                rules.min_advance
            );
        }

        breaks.0.push(cursor);
        cursor += usable_height;
    }

    breaks
}

/// Fixed-height chunking used when no candidates could be extracted
pub fn uniform_breaks(total_height: f32, usable_height: f32) -> PageBreakList {
    if !usable_height.is_finite() || usable_height <= 0.0 || total_height <= usable_height {
        return PageBreakList::single();
    }
    let total_height = capped_height(total_height, usable_height);
    let pages = ((total_height / usable_height).ceil() as usize).clamp(1, MAX_PAGES);
    PageBreakList((0..pages).map(|i| i as f32 * usable_height).collect())
}

fn capped_height(total_height: f32, usable_height: f32) -> f32 {
    let limit = usable_height * MAX_PAGES as f32;
    if total_height > limit {
        log::warn!(
            "flow height {} exceeds {} pages of {}, truncating",
            total_height,
            MAX_PAGES,
            usable_height
        );
        limit
    } else {
        total_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USABLE: f32 = 800.0;

    fn breaks(total: f32, candidates: &[Candidate]) -> Vec<f32> {
        compute_breaks(total, USABLE, candidates, &PaginationRules::default())
            .as_slice()
            .to_vec()
    }

    fn assert_well_formed(list: &[f32]) {
        assert_eq!(list[0], 0.0);
        assert!(list.windows(2).all(|w| w[0] < w[1]), "not increasing: {:?}", list);
    }

    #[test]
    fn test_fits_on_one_page() {
        assert_eq!(breaks(500.0, &[]), vec![0.0]);
        assert_eq!(breaks(800.0, &[Candidate::new(700.0, 900.0)]), vec![0.0]);
    }

    #[test]
    fn test_uniform_chunking_without_candidates() {
        assert_eq!(breaks(2000.0, &[]), vec![0.0, 800.0, 1600.0]);
        assert_eq!(breaks(1600.0, &[]), vec![0.0, 800.0]);
    }

    #[test]
    fn test_shift_above_straddling_candidate() {
        let list = breaks(1600.0, &[Candidate::new(750.0, 900.0)]);
        assert_eq!(list, vec![0.0, 742.0, 1542.0]);
    }

    #[test]
    fn test_forced_cut_for_oversized_candidate() {
        let list = breaks(1600.0, &[Candidate::new(0.0, 1200.0)]);
        assert_eq!(list, vec![0.0, 800.0]);
    }

    #[test]
    fn test_forced_cut_when_shift_too_small() {
        // Shift to 42 would advance less than 60 from 0
        let list = breaks(1600.0, &[Candidate::new(50.0, 900.0)]);
        assert_eq!(list, vec![0.0, 800.0]);
    }

    #[test]
    fn test_earliest_straddler_wins() {
        let candidates = [
            Candidate::new(600.0, 1000.0),
            Candidate::new(700.0, 850.0),
        ];
        let list = breaks(1500.0, &candidates);
        assert_eq!(list[1], 592.0);
        assert_well_formed(&list);
    }

    #[test]
    fn test_touching_boundary_is_not_straddling() {
        let list = breaks(1700.0, &[Candidate::new(400.0, 800.0), Candidate::new(800.0, 1000.0)]);
        assert_eq!(list, vec![0.0, 800.0, 1600.0]);
    }

    #[test]
    fn test_degenerate_inputs_yield_single_page() {
        let rules = PaginationRules::default();
        assert_eq!(compute_breaks(5000.0, 0.0, &[], &rules), PageBreakList::single());
        assert_eq!(compute_breaks(5000.0, -10.0, &[], &rules), PageBreakList::single());
        assert_eq!(compute_breaks(0.0, USABLE, &[], &rules), PageBreakList::single());
        assert_eq!(compute_breaks(f32::NAN, USABLE, &[], &rules), PageBreakList::single());
    }

    #[test]
    fn test_negative_rules_are_clamped() {
        let rules = PaginationRules {
            min_advance: -20.0,
            gap: 8.0,
        };
        let list = compute_breaks(1600.0, USABLE, &[Candidate::new(8.0, 900.0)], &rules);

        // Shift to 0 would not advance, so the cut is forced
        assert_eq!(list.as_slice(), [0.0, 800.0]);
    }

    #[test]
    fn test_negative_gap_never_lengthens_a_page() {
        let rules = PaginationRules {
            min_advance: 60.0,
            gap: -500.0,
        };
        let list = compute_breaks(1600.0, USABLE, &[Candidate::new(750.0, 900.0)], &rules);

        assert_eq!(list.as_slice(), [0.0, 750.0, 1550.0]);
        assert!(!rules.is_valid());
        assert_eq!(rules.sanitized().gap, 0.0);
    }

    #[test]
    fn test_huge_flow_is_capped() {
        let list = breaks(1.0e10, &[]);
        assert_eq!(list.len(), MAX_PAGES);
        assert_well_formed(&list);

        let list = breaks(1.0e11, &[Candidate::new(750.0, 900.0)]);
        assert!(list.len() <= MAX_PAGES);
        assert_well_formed(&list);
    }

    #[test]
    fn test_invariants_on_dense_content() {
        // Entries of varying height, every one straddles something eventually
        let mut candidates = Vec::new();
        let mut y = 0.0;
        for i in 0..60 {
            let h = 90.0 + (i % 7) as f32 * 35.0;
            candidates.push(Candidate::new(y, y + h));
            y += h + 12.0;
        }
        let first = breaks(y, &candidates);
        let second = breaks(y, &candidates);

        assert_well_formed(&first);
        assert_eq!(first, second);
        for pair in first.windows(2) {
            assert!(pair[1] - pair[0] <= USABLE);
        }
    }
}
