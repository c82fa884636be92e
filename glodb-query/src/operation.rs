//! Operation nodes: one step of a query.
//!
//! A node holds either a track (a leaf) or a nested list of nodes (a
//! group), the operator that combines it with everything before it, and
//! the constraints applied to it once resolved.

use std::fmt::{self, Display};

use glodb_core::{Feature, Interval, Track};

use crate::constraints::{Constraints, Spacing};
use crate::errors::Result;
use crate::operator::Operator;

#[derive(Debug, Clone)]
pub enum Operand {
    Leaf(Track),
    Group(Vec<Operation>),
}

/// Memoized result of resolving a node, empty until the node is resolved.
#[derive(Debug, Clone, Default)]
pub struct Resolution(Option<Track>);

impl Resolution {
    pub fn track(&self) -> Option<&Track> {
        self.0.as_ref()
    }

    fn track_mut(&mut self) -> Option<&mut Track> {
        self.0.as_mut()
    }

    pub fn is_resolved(&self) -> bool {
        self.0.is_some()
    }

    /// Cache `track` and hand back the cached copy.
    pub fn store(&mut self, track: Track) -> &Track {
        self.0.insert(track)
    }

    /// Move the cached track out, leaving the node unresolved.
    pub fn take(&mut self) -> Option<Track> {
        self.0.take()
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

///
/// Position of a walk over a node's resolved track. Holds the last feature
/// returned rather than a borrow of the track.
///
#[derive(Debug, Clone, Default)]
pub struct FeatureCursor {
    last: Option<(String, Interval)>,
}

impl FeatureCursor {
    pub fn reset(&mut self) {
        self.last = None;
    }

    fn position(&self) -> Option<(&str, Interval)> {
        self.last.as_ref().map(|(seq, i)| (seq.as_str(), *i))
    }

    fn advance(&mut self, feature: &Feature<'_>) {
        self.last = Some((feature.sequence.to_string(), feature.interval));
    }
}

#[derive(Debug, Clone)]
pub struct Operation {
    operator: Option<Operator>,
    operand: Operand,
    negate: bool,
    ignore: bool,
    sequence: Option<String>,
    constraints: Constraints,
    resolution: Resolution,
    cursor: FeatureCursor,
    matched: usize,
}

impl Operation {
    fn new(operand: Operand) -> Self {
        Operation {
            operator: None,
            operand,
            negate: false,
            ignore: false,
            sequence: None,
            constraints: Constraints::default(),
            resolution: Resolution::default(),
            cursor: FeatureCursor::default(),
            matched: 0,
        }
    }

    /// A leaf over a copy of `track`.
    pub fn leaf(track: Track) -> Self {
        Operation::new(Operand::Leaf(track))
    }

    /// A leaf over the union of several tracks.
    pub fn union_of<'a, I>(tracks: I) -> Self
    where
        I: IntoIterator<Item = &'a Track>,
    {
        let mut union = Track::new();
        for track in tracks {
            union.add_track(track);
        }
        Operation::leaf(union)
    }

    pub fn group(children: Vec<Operation>) -> Self {
        Operation::new(Operand::Group(children))
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn with_negate(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    pub fn with_ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn set_operator(&mut self, operator: Option<Operator>) {
        self.operator = operator;
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    pub(crate) fn operand_mut(&mut self) -> &mut Operand {
        &mut self.operand
    }

    pub fn is_group(&self) -> bool {
        matches!(self.operand, Operand::Group(_))
    }

    pub fn is_negate(&self) -> bool {
        self.negate
    }

    pub fn set_negate(&mut self, negate: bool) {
        if self.negate != negate {
            self.invalidate();
        }
        self.negate = negate;
    }

    /// Whether the node's matches are left out of the final presentation.
    pub fn is_ignore(&self) -> bool {
        self.ignore
    }

    pub fn set_ignore(&mut self, ignore: bool) {
        self.ignore = ignore;
    }

    pub fn sequence(&self) -> Option<&str> {
        self.sequence.as_deref()
    }

    ///
    /// Restrict the node to one sequence. Leaf tracks are filtered now;
    /// groups pass the restriction on to every child.
    ///
    pub fn set_sequence(&mut self, sequence: &str) {
        self.sequence = Some(sequence.to_string());
        match &mut self.operand {
            Operand::Leaf(track) => track.filter_by_sequence(sequence),
            Operand::Group(children) => {
                for child in children.iter_mut() {
                    child.set_sequence(sequence);
                }
            }
        }
        if let Some(track) = self.resolution.track_mut() {
            track.filter_by_sequence(sequence);
        }
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn spacing(&self) -> Spacing {
        self.constraints.spacing
    }

    ///
    /// Set the interval width bounds. A `max` of 0 disables the filter.
    ///
    /// # Errors
    /// Inverted bounds are rejected and the previous bounds are kept.
    pub fn set_length(&mut self, min: u32, max: u32) -> Result<()> {
        self.constraints.set_length(min, max)?;
        self.invalidate();
        Ok(())
    }

    /// Set the position bounds; a `max` of -1 runs to the end of the sequence.
    pub fn set_seq_pos(&mut self, min: u32, max: i64) -> Result<()> {
        self.constraints.set_seq_pos(min, max)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_repeat(
        &mut self,
        min_repeat: u32,
        max_repeat: u32,
        min_within: u32,
        max_within: u32,
    ) -> Result<()> {
        self.constraints
            .set_repeat(min_repeat, max_repeat, min_within, max_within)?;
        self.invalidate();
        Ok(())
    }

    /// Set the spacing window read by the `POS` operator.
    pub fn set_spacing(&mut self, min_pos: i64, max_pos: i64) {
        self.constraints.set_spacing(min_pos, max_pos);
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_resolved()
    }

    pub fn resolved(&self) -> Option<&Track> {
        self.resolution.track()
    }

    pub(crate) fn resolution_mut(&mut self) -> &mut Resolution {
        &mut self.resolution
    }

    /// Drop the cached result so the next resolution recomputes it.
    pub fn invalidate(&mut self) {
        self.resolution.clear();
        self.cursor.reset();
    }

    /// Number of features the node currently holds.
    pub fn num_features(&self) -> usize {
        match (self.resolution.track(), &self.operand) {
            (Some(track), _) => track.count(),
            (None, Operand::Leaf(track)) => track.count(),
            (None, Operand::Group(_)) => 0,
        }
    }

    /// Number of fold steps in which this node produced a non-empty result.
    pub fn matched(&self) -> usize {
        self.matched
    }

    pub(crate) fn record_match(&mut self) {
        self.matched += 1;
    }

    pub fn reset_cursor(&mut self) {
        self.cursor.reset();
    }

    /// Whether the cursor has features left to return.
    pub fn has_next_feature(&self) -> bool {
        self.resolution
            .track()
            .is_some_and(|track| track.next_after(self.cursor.position()).is_some())
    }

    /// The next feature of the resolved track, `None` when exhausted or unresolved.
    pub fn next_feature(&mut self) -> Option<Feature<'_>> {
        let track = self.resolution.track()?;
        let next = track.next_after(self.cursor.position())?;
        self.cursor.advance(&next);
        Some(next)
    }

    /// Rewind the cursor and return the first feature.
    pub fn first_feature(&mut self) -> Option<Feature<'_>> {
        self.cursor.reset();
        self.next_feature()
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operator) = self.operator {
            write!(f, "{} ", operator)?;
        }
        if self.negate {
            write!(f, "!")?;
        }
        match &self.operand {
            Operand::Leaf(track) => write!(f, "{}", track.id.as_deref().unwrap_or("<track>"))?,
            Operand::Group(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")?;
            }
        }
        if let Some(seq) = &self.sequence {
            write!(f, " on {}", seq)?;
        }
        Ok(())
    }
}
