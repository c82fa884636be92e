//! Constraint bounds carried by an operation node.
//!
//! Setters reject inverted bounds (`max < min`): the error is logged and
//! returned, and the previous bounds stay in force.

use glodb_core::Track;
use log::error;

use crate::errors::{QueryError, Result};

/// Interval width bounds. A `max` of 0 leaves the filter inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LengthBounds {
    pub min: u32,
    pub max: u32,
}

impl LengthBounds {
    pub fn is_active(&self) -> bool {
        self.max != 0
    }
}

/// Upper bound of a sequence position filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeqPosMax {
    /// No position filtering.
    #[default]
    Unset,
    /// Up to the end of the sequence.
    End,
    At(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeqPosBounds {
    pub min: u32,
    pub max: SeqPosMax,
}

impl SeqPosBounds {
    pub fn is_active(&self) -> bool {
        self.max != SeqPosMax::Unset
    }

    /// The explicit upper position, `None` when running to the sequence end.
    pub fn upper(&self) -> Option<u32> {
        match self.max {
            SeqPosMax::At(max) => Some(max),
            _ => None,
        }
    }
}

///
/// Repeat bounds. The filter only runs when both `min_repeat` and
/// `max_repeat` are at least 2.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatBounds {
    pub min_repeat: u32,
    pub max_repeat: u32,
    pub min_within: u32,
    pub max_within: u32,
}

impl Default for RepeatBounds {
    fn default() -> Self {
        RepeatBounds {
            min_repeat: 1,
            max_repeat: 1,
            min_within: 0,
            max_within: 0,
        }
    }
}

impl RepeatBounds {
    pub fn is_active(&self) -> bool {
        self.min_repeat >= 2 && self.max_repeat >= 2
    }
}

///
/// Admissible gap `b.start - a.end` between a left interval `a` and a right
/// interval `b` in a spacing join. Negative values mean `b` starts before
/// `a` ends. A window with `min_pos > max_pos` matches nothing.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub min_pos: i64,
    pub max_pos: i64,
}

impl Spacing {
    pub fn new(min_pos: i64, max_pos: i64) -> Self {
        Spacing { min_pos, max_pos }
    }

    /// A window admitting exactly one gap value.
    pub fn exact(pos: i64) -> Self {
        Spacing::new(pos, pos)
    }

    pub fn is_empty(&self) -> bool {
        self.min_pos > self.max_pos
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Constraints {
    pub length: LengthBounds,
    pub seq_pos: SeqPosBounds,
    pub repeat: RepeatBounds,
    pub spacing: Spacing,
}

fn inverted(kind: &str, min: i64, max: i64) -> QueryError {
    QueryError::InvalidBounds {
        kind: kind.to_string(),
        min,
        max,
    }
}

impl Constraints {
    pub fn set_length(&mut self, min: u32, max: u32) -> Result<()> {
        if max < min {
            error!("The max length is less than the min length, when filtering on length.");
            return Err(inverted("length", min as i64, max as i64));
        }
        self.length = LengthBounds { min, max };
        Ok(())
    }

    ///
    /// Set the sequence position bounds. A `max` of -1 runs to the end of
    /// the sequence and a `max` of 0 disables the filter.
    ///
    pub fn set_seq_pos(&mut self, min: u32, max: i64) -> Result<()> {
        let bound = match max {
            -1 => SeqPosMax::End,
            0 if min == 0 => SeqPosMax::Unset,
            m if m < min as i64 => {
                error!(
                    "The max pos is less than the min pos, when filtering on sequence position."
                );
                return Err(inverted("sequence position", min as i64, max));
            }
            m => SeqPosMax::At(u32::try_from(m).unwrap_or(u32::MAX)),
        };
        self.seq_pos = SeqPosBounds { min, max: bound };
        Ok(())
    }

    pub fn set_repeat(
        &mut self,
        min_repeat: u32,
        max_repeat: u32,
        min_within: u32,
        max_within: u32,
    ) -> Result<()> {
        if max_repeat < min_repeat {
            error!("The max repeat is less than the min repeat, when filtering on repeats.");
            return Err(inverted("repeat", min_repeat as i64, max_repeat as i64));
        }
        if max_within < min_within {
            error!("The max within is less than the min within, when filtering on repeats.");
            return Err(inverted("within", min_within as i64, max_within as i64));
        }
        self.repeat = RepeatBounds {
            min_repeat,
            max_repeat,
            min_within,
            max_within,
        };
        Ok(())
    }

    pub fn set_spacing(&mut self, min_pos: i64, max_pos: i64) {
        self.spacing = Spacing::new(min_pos, max_pos);
    }

    ///
    /// Run the active filters over `track`: length, then sequence position,
    /// then repeats.
    ///
    pub fn apply(&self, track: &mut Track) {
        if self.length.is_active() {
            track.filter_by_length(self.length.min, self.length.max);
        }
        if self.seq_pos.is_active() {
            track.filter_by_seq_pos(self.seq_pos.min, self.seq_pos.upper());
        }
        if self.repeat.is_active() {
            let r = self.repeat;
            track.filter_by_repeat(r.min_repeat, r.max_repeat, r.min_within, r.max_within);
        }
    }

    /// True when [Constraints::apply] would leave every track untouched.
    pub fn is_passthrough(&self) -> bool {
        !self.length.is_active() && !self.seq_pos.is_active() && !self.repeat.is_active()
    }
}
