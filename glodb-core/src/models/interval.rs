use std::cmp::Ordering;
use std::fmt::{self, Display};

/// Represent a range from [start, end]
/// Both ends are inclusive, so a single position has `start == end`.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Ord for Interval {
    #[inline]
    fn cmp(&self, other: &Interval) -> Ordering {
        match self.start.cmp(&other.start) {
            Ordering::Less => Ordering::Less,
            Ordering::Greater => Ordering::Greater,
            Ordering::Equal => self.end.cmp(&other.end),
        }
    }
}

impl PartialOrd for Interval {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Interval {
    ///
    /// Create a new interval, `None` when `start > end`.
    ///
    pub fn new(start: u32, end: u32) -> Option<Interval> {
        if start > end {
            return None;
        }
        Some(Interval { start, end })
    }

    /// Number of positions covered by the interval.
    #[inline]
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Check if two intervals share at least one position
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Overlapping, or touching with no gap (`end + 1 == start`).
    #[inline]
    pub fn touches(&self, other: &Interval) -> bool {
        (self.start as u64) <= other.end as u64 + 1 && (other.start as u64) <= self.end as u64 + 1
    }

    /// Compute the shared positions of two intervals
    #[inline]
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        Interval::new(self.start.max(other.start), self.end.min(other.end))
    }

    #[inline]
    pub fn contains_pos(&self, pos: u32) -> bool {
        self.start <= pos && pos <= self.end
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

///
/// An interval anchored to the sequence it lives on.
///
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Feature<'a> {
    pub sequence: &'a str,
    pub interval: Interval,
}

impl Display for Feature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.sequence, self.interval.start, self.interval.end)
    }
}
