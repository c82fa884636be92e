//! Membership filters over a [Track].
//!
//! Each filter removes the intervals that fail its test and drops any
//! sequence left without intervals. Inverted bounds (`max < min`) are
//! reported through the log and leave the track untouched.

use log::error;

use crate::models::{Interval, Track};

impl Track {
    ///
    /// Keep only the intervals on `sequence` (compared case-insensitively).
    /// An empty sequence name leaves the track untouched.
    ///
    pub fn filter_by_sequence(&mut self, sequence: &str) {
        if sequence.is_empty() {
            return;
        }
        self.sources_mut()
            .retain(|seq, _| seq.eq_ignore_ascii_case(sequence));
    }

    ///
    /// Keep intervals whose width lies within `[min, max]`.
    ///
    pub fn filter_by_length(&mut self, min: u32, max: u32) {
        if max < min {
            error!("The max length is less than the min length, when filtering on length.");
            return;
        }
        for set in self.sources_mut().values_mut() {
            set.retain(|i| (min..=max).contains(&i.width()));
        }
        self.prune();
    }

    ///
    /// Keep intervals lying entirely within `[min, max]`. A `max` of `None`
    /// runs to the end of the sequence.
    ///
    pub fn filter_by_seq_pos(&mut self, min: u32, max: Option<u32>) {
        if max.is_some_and(|max| max < min) {
            error!(
                "The max pos is less than the min pos, when filtering on sequence position."
            );
            return;
        }
        for set in self.sources_mut().values_mut() {
            set.retain(|i| i.start >= min && max.is_none_or(|max| i.end <= max));
        }
        self.prune();
    }

    ///
    /// Keep intervals that belong to a run of repeats.
    ///
    /// Walking each sequence in start order, an interval continues the
    /// current run when its start lies in the window opened by the run:
    /// `[end + min_within, end + max_within]`, or `[start, end + max_within]`
    /// when `min_within` is 0 so that overlapping intervals count. The window
    /// follows the run member reaching furthest right. A run longer than
    /// `max_repeat` is cut and the excess starts a new run. Runs with fewer
    /// than `min_repeat` members are removed.
    ///
    /// Nothing is filtered unless both repeat bounds are at least 2.
    ///
    pub fn filter_by_repeat(
        &mut self,
        min_repeat: u32,
        max_repeat: u32,
        min_within: u32,
        max_within: u32,
    ) {
        if max_repeat < min_repeat {
            error!("The max repeat is less than the min repeat, when filtering on repeats.");
            return;
        }
        if max_within < min_within {
            error!("The max within is less than the min within, when filtering on repeats.");
            return;
        }
        if min_repeat < 2 || max_repeat < 2 {
            return;
        }

        for set in self.sources_mut().values_mut() {
            let runs = repeat_runs(set.iter(), max_repeat as usize, min_within, max_within);
            for run in runs {
                if run.len() < min_repeat as usize {
                    for interval in run {
                        set.remove(&interval);
                    }
                }
            }
        }
        self.prune();
    }
}

/// The start window `[lo, hi]` a run opens after `interval`.
fn repeat_window(interval: &Interval, min_within: u32, max_within: u32) -> (u64, u64) {
    let lo = match min_within {
        0 => interval.start as u64,
        w => interval.end as u64 + w as u64,
    };
    (lo, interval.end as u64 + max_within as u64)
}

/// Split start-ordered intervals into runs of repeats.
fn repeat_runs<'a, I>(
    intervals: I,
    max_repeat: usize,
    min_within: u32,
    max_within: u32,
) -> Vec<Vec<Interval>>
where
    I: Iterator<Item = &'a Interval>,
{
    let mut runs: Vec<Vec<Interval>> = Vec::new();
    let mut current: Vec<Interval> = Vec::new();
    let mut window = (0u64, 0u64);

    for interval in intervals {
        let start = interval.start as u64;
        let continues = !current.is_empty() && start >= window.0 && start <= window.1;

        if continues && current.len() < max_repeat {
            current.push(*interval);
            let next = repeat_window(interval, min_within, max_within);
            if next.1 > window.1 {
                window = next;
            }
        } else {
            if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
            current.push(*interval);
            window = repeat_window(interval, min_within, max_within);
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}
