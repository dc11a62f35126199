//! In-memory merging of interval sequences.

use crate::error::Result;
use crate::interval::Interval;
use crate::text::parse_intervals;

/// Merge overlapping intervals.
///
/// The result is sorted ascending by start and no two of its intervals
/// overlap or share an endpoint. Runs in place: one unstable sort by start,
/// then a single compaction pass over the same vector, so peak memory stays
/// proportional to the input length. Empty and singleton inputs come back
/// unchanged.
pub fn merge(mut intervals: Vec<Interval>) -> Vec<Interval> {
    if intervals.len() < 2 {
        return intervals;
    }

    // Ties on the start value can land in any order; the scan below keeps
    // the larger end either way.
    intervals.sort_unstable_by_key(|interval| interval.x);

    let mut last = 0;
    for i in 1..intervals.len() {
        let next = intervals[i];
        match intervals[last].merge_sorted(&next) {
            Some(joined) => intervals[last] = joined,
            None => {
                last += 1;
                intervals[last] = next;
            }
        }
    }
    intervals.truncate(last + 1);
    intervals
}

/// Parse `text` and merge it: the whole-list-in-memory pipeline.
pub fn merge_text(text: &str) -> Result<Vec<Interval>> {
    Ok(merge(parse_intervals(text.as_bytes())?))
}
