//! Interval algebra over tracks.
//!
//! Every operator works sequence by sequence: intervals are only ever
//! compared with intervals on the same sequence, so the per-sequence sweeps
//! run in parallel on the rayon pool and their outputs are gathered into a
//! fresh [Track].
//!
//! Operators fall in two families:
//!
//! - interval level (`AND`, `OR`, `MINUS`, `sAND`, `sMINUS`, `POS`): whole
//!   input intervals are kept or dropped, never trimmed.
//! - coordinate level (`bAND`, `bOR`, `bMINUS`): boolean logic on positions,
//!   producing new intervals. `bAND` and `bMINUS` expect coalesced input;
//!   [apply] coalesces for them.
//!
//! When either side is empty the result is empty, except for the
//! difference operators, which return the left side unchanged.

use std::collections::BTreeSet;

use glodb_core::models::track::sorted_by_end_desc;
use glodb_core::{Interval, Track};
use rayon::prelude::*;

use crate::constraints::Spacing;
use crate::operator::Operator;

type IntervalSet = BTreeSet<Interval>;

///
/// Run `sweep` over every sequence present on both sides. With
/// `keep_left_only`, sequences found only on the left are copied through.
///
fn per_sequence<F>(left: &Track, right: &Track, keep_left_only: bool, sweep: F) -> Track
where
    F: Fn(&IntervalSet, &IntervalSet) -> IntervalSet + Sync + Send,
{
    let pairs: Vec<(&String, &IntervalSet, Option<&IntervalSet>)> = left
        .by_sequence()
        .iter()
        .map(|(seq, l)| (seq, l, right.intervals_on(seq)))
        .filter(|(_, _, r)| keep_left_only || r.is_some())
        .collect();

    let parts: Vec<(&String, IntervalSet)> = pairs
        .into_par_iter()
        .map(|(seq, l, r)| match r {
            Some(r) => (seq, sweep(l, r)),
            None => (seq, l.clone()),
        })
        .collect();

    let mut out = Track::new();
    for (seq, set) in parts {
        out.insert_sequence(seq.as_str(), set);
    }
    out
}

///
/// Answers "does this interval overlap anything in the set" in `O(log n)`.
///
/// Starts are sorted; `max_end[k]` is the largest end among the first
/// `k + 1` intervals. An interval `q` overlaps the set iff some interval
/// starting at or before `q.end` reaches `q.start`.
///
struct OverlapIndex {
    starts: Vec<u32>,
    max_end: Vec<u32>,
}

impl OverlapIndex {
    fn new(set: &IntervalSet) -> Self {
        let mut starts = Vec::with_capacity(set.len());
        let mut max_end = Vec::with_capacity(set.len());
        let mut reach = 0u32;
        for interval in set {
            reach = reach.max(interval.end);
            starts.push(interval.start);
            max_end.push(reach);
        }
        OverlapIndex { starts, max_end }
    }

    fn overlaps(&self, query: &Interval) -> bool {
        let k = self.starts.partition_point(|&s| s <= query.end);
        k > 0 && self.max_end[k - 1] >= query.start
    }
}

/// Intervals of `set` that overlap at least one interval of `other`.
fn overlapping(set: &IntervalSet, other: &IntervalSet) -> IntervalSet {
    let index = OverlapIndex::new(other);
    set.iter().filter(|i| index.overlaps(i)).copied().collect()
}

/// AND: every interval, from either side, overlapping the other side.
pub fn and(left: &Track, right: &Track) -> Track {
    if left.is_empty() || right.is_empty() {
        return Track::new();
    }
    per_sequence(left, right, false, |l, r| {
        let mut out = overlapping(l, r);
        out.extend(overlapping(r, l));
        out
    })
}

/// OR: union of both sides. Identical intervals collapse.
pub fn or(left: &Track, right: &Track) -> Track {
    let (larger, smaller) = if left.count() < right.count() {
        (right, left)
    } else {
        (left, right)
    };
    let mut out = larger.clone();
    out.id = None;
    out.add_track(smaller);
    out
}

/// MINUS: left intervals overlapping nothing on the right.
pub fn minus(left: &Track, right: &Track) -> Track {
    if left.is_empty() || right.is_empty() {
        return unnamed(left);
    }
    per_sequence(left, right, true, |l, r| {
        let index = OverlapIndex::new(r);
        l.iter().filter(|i| !index.overlaps(i)).copied().collect()
    })
}

/// sAND: left intervals with an identical interval on the right.
pub fn s_and(left: &Track, right: &Track) -> Track {
    if left.is_empty() || right.is_empty() {
        return Track::new();
    }
    per_sequence(left, right, false, |l, r| {
        let (small, large) = if l.len() <= r.len() { (l, r) } else { (r, l) };
        small
            .iter()
            .filter(|i| large.contains(*i))
            .copied()
            .collect()
    })
}

/// sMINUS: left intervals without an identical interval on the right.
pub fn s_minus(left: &Track, right: &Track) -> Track {
    if left.is_empty() || right.is_empty() {
        return unnamed(left);
    }
    per_sequence(left, right, true, |l, r| l.difference(r).copied().collect())
}

///
/// POS: every interval, from either side, taking part in a pair `(a, b)`
/// with `a` on the left and `b` on the right whose gap `b.start - a.end`
/// lies within `spacing`.
///
pub fn pos(left: &Track, right: &Track, spacing: &Spacing) -> Track {
    if left.is_empty() || right.is_empty() || spacing.is_empty() {
        return Track::new();
    }
    per_sequence(left, right, false, |l, r| spacing_join(l, r, spacing))
}

///
/// Sweep for one sequence.
///
/// A right interval `b` pairs with the left intervals whose end lies in
/// `[b.start - max_pos, b.start - min_pos]`. Walking `b` by descending start
/// moves that window monotonically down, so over the left intervals sorted
/// by descending end the partners of each `b` form a contiguous run
/// `[hi, lo)` whose bounds only ever advance. Matched runs are recorded in a
/// difference array and resolved with one prefix sum.
///
fn spacing_join(left: &IntervalSet, right: &IntervalSet, spacing: &Spacing) -> IntervalSet {
    let by_end = sorted_by_end_desc(left);

    let mut runs = vec![0i64; by_end.len() + 1];
    let mut out = IntervalSet::new();
    let (mut hi, mut lo) = (0usize, 0usize);

    for b in right.iter().rev() {
        let window_hi = b.start as i64 - spacing.min_pos;
        let window_lo = b.start as i64 - spacing.max_pos;

        while hi < by_end.len() && by_end[hi].end as i64 > window_hi {
            hi += 1;
        }
        lo = lo.max(hi);
        while lo < by_end.len() && by_end[lo].end as i64 >= window_lo {
            lo += 1;
        }

        if hi < lo {
            out.insert(*b);
            runs[hi] += 1;
            runs[lo] -= 1;
        }
    }

    let mut open = 0i64;
    for (a, delta) in by_end.iter().zip(runs.iter()) {
        open += delta;
        if open > 0 {
            out.insert(*a);
        }
    }

    out
}

/// bOR: union of both sides, coalesced into maximal spans.
pub fn b_or(left: &Track, right: &Track) -> Track {
    let mut out = or(left, right);
    out.coalesce_in_place();
    out
}

///
/// bAND: positions covered by both sides. Both sides must be coalesced.
///
pub fn b_and(left: &Track, right: &Track) -> Track {
    if left.is_empty() || right.is_empty() {
        return Track::new();
    }
    per_sequence(left, right, false, |l, r| {
        let l: Vec<&Interval> = l.iter().collect();
        let r: Vec<&Interval> = r.iter().collect();
        let mut out = IntervalSet::new();
        let (mut i, mut j) = (0usize, 0usize);

        while i < l.len() && j < r.len() {
            if let Some(shared) = l[i].intersection(r[j]) {
                out.insert(shared);
            }
            if l[i].end < r[j].end {
                i += 1;
            } else {
                j += 1;
            }
        }
        out
    })
}

///
/// bMINUS: positions of the left side not covered by the right side. Left
/// intervals are split around the right intervals they overlap. Both sides
/// must be coalesced.
///
pub fn b_minus(left: &Track, right: &Track) -> Track {
    if left.is_empty() || right.is_empty() {
        return unnamed(left);
    }
    per_sequence(left, right, true, |l, r| {
        let r: Vec<&Interval> = r.iter().collect();
        let mut out = IntervalSet::new();
        let mut first = 0usize;

        for a in l {
            while first < r.len() && r[first].end < a.start {
                first += 1;
            }

            // start of the uncovered fragment of `a`
            let mut open = a.start as u64;
            let mut j = first;
            while j < r.len() && r[j].start <= a.end && open <= a.end as u64 {
                if r[j].start as u64 > open {
                    out.insert(Interval {
                        start: open as u32,
                        end: r[j].start - 1,
                    });
                }
                open = open.max(r[j].end as u64 + 1);
                j += 1;
            }

            if open <= a.end as u64 {
                out.insert(Interval {
                    start: open as u32,
                    end: a.end,
                });
            }
        }
        out
    })
}

fn unnamed(track: &Track) -> Track {
    let mut out = track.clone();
    out.id = None;
    out
}

///
/// Combine `left` with `right` under `operator`. `spacing` is only read by
/// [Operator::Pos]. Both sides are coalesced before `bAND` and `bMINUS`.
///
pub fn apply(left: &Track, operator: Operator, right: &Track, spacing: &Spacing) -> Track {
    match operator {
        Operator::Pos => pos(left, right, spacing),
        Operator::And => and(left, right),
        Operator::Or => or(left, right),
        Operator::Minus => minus(left, right),
        Operator::SAnd => s_and(left, right),
        Operator::SMinus => s_minus(left, right),
        Operator::BOr => b_or(left, right),
        Operator::BAnd => b_and(&left.coalesced(), &right.coalesced()),
        Operator::BMinus => b_minus(&left.coalesced(), &right.coalesced()),
    }
}

/// The interval algebra as methods on [Track]. All methods return new tracks.
pub trait TrackAlgebra {
    fn and(&self, other: &Track) -> Track;
    fn or(&self, other: &Track) -> Track;
    fn minus(&self, other: &Track) -> Track;
    fn s_and(&self, other: &Track) -> Track;
    fn s_minus(&self, other: &Track) -> Track;
    fn pos(&self, other: &Track, spacing: &Spacing) -> Track;
    fn b_and(&self, other: &Track) -> Track;
    fn b_or(&self, other: &Track) -> Track;
    fn b_minus(&self, other: &Track) -> Track;

    /// Dispatch on `operator`, see [apply].
    fn combine(&self, operator: Operator, other: &Track, spacing: &Spacing) -> Track;
}

impl TrackAlgebra for Track {
    fn and(&self, other: &Track) -> Track {
        and(self, other)
    }

    fn or(&self, other: &Track) -> Track {
        or(self, other)
    }

    fn minus(&self, other: &Track) -> Track {
        minus(self, other)
    }

    fn s_and(&self, other: &Track) -> Track {
        s_and(self, other)
    }

    fn s_minus(&self, other: &Track) -> Track {
        s_minus(self, other)
    }

    fn pos(&self, other: &Track, spacing: &Spacing) -> Track {
        pos(self, other, spacing)
    }

    fn b_and(&self, other: &Track) -> Track {
        b_and(self, other)
    }

    fn b_or(&self, other: &Track) -> Track {
        b_or(self, other)
    }

    fn b_minus(&self, other: &Track) -> Track {
        b_minus(self, other)
    }

    fn combine(&self, operator: Operator, other: &Track, spacing: &Spacing) -> Track {
        apply(self, operator, other, spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn make_track(intervals: Vec<(&str, u32, u32)>) -> Track {
        intervals
            .into_iter()
            .map(|(seq, start, end)| (seq, Interval::new(start, end).unwrap()))
            .collect()
    }

    #[fixture]
    fn wide() -> Track {
        make_track(vec![("chr1", 0, 100), ("chr2", 10, 20)])
    }

    #[fixture]
    fn narrow() -> Track {
        make_track(vec![
            ("chr1", 5, 6),
            ("chr1", 50, 60),
            ("chr1", 200, 210),
            ("chr3", 0, 5),
        ])
    }

    #[rstest]
    fn test_overlap_index_uses_running_max_end() {
        let set: IntervalSet = [
            Interval::new(0, 100).unwrap(),
            Interval::new(5, 6).unwrap(),
            Interval::new(10, 12).unwrap(),
        ]
        .into_iter()
        .collect();
        let index = OverlapIndex::new(&set);
        assert!(index.overlaps(&Interval::new(50, 60).unwrap()));
        assert!(index.overlaps(&Interval::new(100, 110).unwrap()));
        assert!(!index.overlaps(&Interval::new(101, 110).unwrap()));
    }

    #[rstest]
    fn test_and_keeps_wide_and_narrow(wide: Track, narrow: Track) {
        let result = and(&wide, &narrow);
        assert_eq!(
            result,
            make_track(vec![("chr1", 0, 100), ("chr1", 5, 6), ("chr1", 50, 60)])
        );
        assert_eq!(result, and(&narrow, &wide));
    }

    #[rstest]
    fn test_minus_passes_left_only_sequences(wide: Track, narrow: Track) {
        assert_eq!(minus(&wide, &narrow), make_track(vec![("chr2", 10, 20)]));
        assert_eq!(
            minus(&narrow, &wide),
            make_track(vec![("chr1", 200, 210), ("chr3", 0, 5)])
        );
    }

    #[rstest]
    fn test_empty_operands(wide: Track) {
        let empty = Track::new();
        assert!(and(&wide, &empty).is_empty());
        assert!(s_and(&empty, &wide).is_empty());
        assert!(pos(&wide, &empty, &Spacing::exact(1)).is_empty());
        assert_eq!(minus(&wide, &empty), wide);
        assert_eq!(s_minus(&wide, &empty), wide);
        assert_eq!(b_minus(&wide, &empty), wide);
        assert_eq!(or(&empty, &wide), wide);
    }

    #[rstest]
    fn test_s_and_and_s_minus() {
        let left = make_track(vec![("chr1", 0, 10), ("chr1", 20, 30), ("chr2", 0, 10)]);
        let right = make_track(vec![("chr1", 0, 10), ("chr1", 20, 31)]);
        assert_eq!(s_and(&left, &right), make_track(vec![("chr1", 0, 10)]));
        assert_eq!(
            s_minus(&left, &right),
            make_track(vec![("chr1", 20, 30), ("chr2", 0, 10)])
        );
    }

    #[rstest]
    fn test_or_drops_id() {
        let mut left = make_track(vec![("chr1", 0, 10)]);
        left.id = Some("left".to_string());
        let right = make_track(vec![("chr1", 0, 10), ("chr2", 0, 1)]);
        let result = or(&left, &right);
        assert_eq!(result.count(), 2);
        assert_eq!(result.id, None);
    }

    #[rstest]
    fn test_pos_negative_window() {
        // b starts 2 positions before a ends
        let left = make_track(vec![("chr1", 0, 10)]);
        let right = make_track(vec![("chr1", 8, 20), ("chr1", 11, 20)]);
        assert_eq!(
            pos(&left, &right, &Spacing::new(-3, -1)),
            make_track(vec![("chr1", 0, 10), ("chr1", 8, 20)])
        );
    }

    #[rstest]
    fn test_pos_shared_windows() {
        // both left intervals end at 10; both right intervals start at 12
        let left = make_track(vec![("chr1", 0, 10), ("chr1", 5, 10), ("chr1", 0, 3)]);
        let right = make_track(vec![("chr1", 12, 15), ("chr1", 12, 20), ("chr1", 40, 41)]);
        assert_eq!(
            pos(&left, &right, &Spacing::new(1, 2)),
            make_track(vec![
                ("chr1", 0, 10),
                ("chr1", 5, 10),
                ("chr1", 12, 15),
                ("chr1", 12, 20),
            ])
        );
    }

    #[rstest]
    fn test_pos_inverted_window_matches_nothing() {
        let left = make_track(vec![("chr1", 0, 10)]);
        let right = make_track(vec![("chr1", 11, 20)]);
        assert!(pos(&left, &right, &Spacing::new(2, 1)).is_empty());
    }

    #[rstest]
    fn test_b_and_splits_on_boundaries() {
        let left = make_track(vec![("chr1", 0, 20)]);
        let right = make_track(vec![("chr1", 5, 8), ("chr1", 15, 30)]);
        assert_eq!(
            b_and(&left, &right),
            make_track(vec![("chr1", 5, 8), ("chr1", 15, 20)])
        );
    }

    #[rstest]
    fn test_b_minus_cuts_holes() {
        let left = make_track(vec![("chr1", 0, 20), ("chr1", 30, 40)]);
        let right = make_track(vec![("chr1", 0, 2), ("chr1", 5, 8), ("chr1", 18, 32)]);
        assert_eq!(
            b_minus(&left, &right),
            make_track(vec![("chr1", 3, 4), ("chr1", 9, 17), ("chr1", 33, 40)])
        );
    }

    #[rstest]
    fn test_b_minus_at_coordinate_limit() {
        let left = make_track(vec![("chr1", u32::MAX - 10, u32::MAX)]);
        let right = make_track(vec![("chr1", u32::MAX - 5, u32::MAX)]);
        assert_eq!(
            b_minus(&left, &right),
            make_track(vec![("chr1", u32::MAX - 10, u32::MAX - 6)])
        );
    }

    #[rstest]
    fn test_apply_coalesces_for_coordinate_operators() {
        let left = make_track(vec![("chr1", 0, 10), ("chr1", 5, 20)]);
        let right = make_track(vec![("chr1", 8, 9)]);
        let spacing = Spacing::default();
        assert_eq!(
            apply(&left, Operator::BMinus, &right, &spacing),
            make_track(vec![("chr1", 0, 7), ("chr1", 10, 20)])
        );
        assert_eq!(
            left.combine(Operator::BAnd, &right, &spacing),
            make_track(vec![("chr1", 8, 9)])
        );
    }
}
