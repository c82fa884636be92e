//! Coalescing and clustering of intervals within each sequence.

use std::collections::BTreeSet;

use crate::models::{Interval, Track};

///
/// Merge overlapping and adjacent intervals of one start-ordered set into
/// maximal spans. Intervals that merge with nothing are kept as they are.
///
pub fn coalesce_set(intervals: &BTreeSet<Interval>) -> BTreeSet<Interval> {
    let mut merged = BTreeSet::new();
    let mut iter = intervals.iter();
    let Some(first) = iter.next() else {
        return merged;
    };

    let mut current = *first;
    for interval in iter {
        if current.touches(interval) {
            current.end = current.end.max(interval.end);
        } else {
            merged.insert(current);
            current = *interval;
        }
    }
    merged.insert(current);

    merged
}

impl Track {
    /// A copy of the track with overlapping and adjacent intervals merged.
    pub fn coalesced(&self) -> Track {
        let mut out = Track::new();
        out.id = self.id.clone();
        for (seq, set) in self.by_sequence() {
            out.insert_sequence(seq.as_str(), coalesce_set(set));
        }
        out
    }

    pub fn coalesce_in_place(&mut self) {
        for set in self.sources_mut().values_mut() {
            *set = coalesce_set(set);
        }
    }

    /// True when no two intervals on a sequence overlap or touch.
    pub fn is_coalesced(&self) -> bool {
        self.by_sequence().values().all(|set| {
            set.iter()
                .zip(set.iter().skip(1))
                .all(|(a, b)| !a.touches(b))
        })
    }

    ///
    /// True when the track covers a single sequence without gaps.
    ///
    pub fn is_contiguous(&self) -> bool {
        if self.sequence_count() != 1 {
            return false;
        }
        self.by_sequence()
            .values()
            .all(|set| coalesce_set(set).len() == 1)
    }

    ///
    /// Group intervals whose start lies within `max_space` positions of the
    /// furthest end reached by the current group. Groups of at least
    /// `threshold` intervals are reported as one spanning interval; a group
    /// of one keeps its interval.
    ///
    pub fn cluster(&self, max_space: u32, threshold: usize) -> Track {
        let mut out = Track::new();

        for (seq, set) in self.by_sequence() {
            let mut clusters = BTreeSet::new();
            let mut iter = set.iter();
            let Some(first) = iter.next() else {
                continue;
            };

            let mut span = *first;
            let mut members = 1usize;
            for interval in iter {
                if interval.start as u64 <= span.end as u64 + max_space as u64 {
                    span.end = span.end.max(interval.end);
                    members += 1;
                } else {
                    if members >= threshold {
                        clusters.insert(span);
                    }
                    span = *interval;
                    members = 1;
                }
            }
            if members >= threshold {
                clusters.insert(span);
            }

            out.insert_sequence(seq.as_str(), clusters);
        }

        out
    }
}
