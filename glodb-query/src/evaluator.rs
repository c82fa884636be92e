//! Folding a list of operations into a single track.

use glodb_core::{SequencePool, Track, TrackPool};
use log::{debug, trace, warn};
use serde::Deserialize;

use crate::algebra;
use crate::complement::complement;
use crate::errors::{QueryError, Result};
use crate::operation::{Operand, Operation};

/// What negation does when a track does not fit its sequence lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NegationPolicy {
    /// Log a warning and negate to an empty track.
    #[default]
    #[serde(alias = "failsoft")]
    FailSoft,
    /// Abort the evaluation with the error.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct EvaluatorConfig {
    #[serde(default)]
    pub negation: NegationPolicy,
}

///
/// Evaluates operation lists against a set of known sequences.
///
/// The first operation seeds the result; every following operation is
/// resolved and combined into it with its own operator. Groups resolve by
/// evaluating their children first.
///
pub struct Evaluator<'a> {
    sequences: &'a SequencePool,
    config: EvaluatorConfig,
}

impl<'a> Evaluator<'a> {
    pub fn new(sequences: &'a SequencePool) -> Self {
        Evaluator {
            sequences,
            config: EvaluatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    ///
    /// Evaluate `operations` left to right.
    ///
    /// # Errors
    /// - [QueryError::EmptyExpression] for an empty list
    /// - [QueryError::MissingOperator] when a node after the first has no operator
    /// - negation errors under [NegationPolicy::Strict]
    pub fn evaluate(&self, operations: &mut [Operation]) -> Result<Track> {
        let Some((first, rest)) = operations.split_first_mut() else {
            return Err(QueryError::EmptyExpression);
        };

        if let Some(operator) = first.operator() {
            debug!(
                "Ignoring operator {} on the first operation, it has no left operand",
                operator
            );
        }

        let mut result = self.resolve(first)?.clone();
        result.id = None;

        for (i, operation) in rest.iter_mut().enumerate() {
            let position = i + 1;
            let operator = operation
                .operator()
                .ok_or(QueryError::MissingOperator { position })?;
            let spacing = operation.spacing();

            let right = self.resolve(operation)?;
            trace!("Step {}: {} {} {}", position, result, operator, right);
            result = algebra::apply(&result, operator, right, &spacing);

            if !result.is_empty() {
                operation.record_match();
            }
            debug!("Step {} ({}) left {} features", position, operator, result.count());
        }

        Ok(result)
    }

    ///
    /// Resolve one node: evaluate its children if it is a group, then run
    /// its length, position and repeat filters, then negate it if asked.
    /// The result is cached on the node and its cursor is rewound.
    ///
    pub fn resolve<'o>(&self, operation: &'o mut Operation) -> Result<&'o Track> {
        let track = match operation.resolution_mut().take() {
            Some(track) => track,
            None => {
                let mut track = match operation.operand_mut() {
                    Operand::Leaf(track) => track.clone(),
                    Operand::Group(children) => {
                        debug!("Resolving group of {} operations", children.len());
                        self.evaluate(children)?
                    }
                };

                operation.constraints().apply(&mut track);

                if operation.is_negate() {
                    track = self.negate(&track)?;
                }
                track
            }
        };

        operation.reset_cursor();
        Ok(operation.resolution_mut().store(track))
    }

    fn negate(&self, track: &Track) -> Result<Track> {
        match complement(track, self.sequences) {
            Ok(gaps) => Ok(gaps),
            Err(e) if self.config.negation == NegationPolicy::FailSoft => {
                warn!("Unable to negate {}: {}. Using an empty track.", track, e);
                Ok(Track::new())
            }
            Err(e) => Err(e),
        }
    }

    ///
    /// Evaluate `operations` and register the result under `id`, replacing
    /// (with a warning) any track already registered there.
    ///
    pub fn compute(
        &self,
        operations: &mut [Operation],
        id: &str,
        pool: &mut TrackPool,
    ) -> Result<String> {
        let result = self.evaluate(operations)?;
        pool.replace(id, result);
        Ok(id.to_string())
    }

    ///
    /// Evaluate `operations` and register the result under `id`, or under a
    /// generated id when `id` is taken. Returns the id used.
    ///
    pub fn solve(
        &self,
        operations: &mut [Operation],
        id: &str,
        pool: &mut TrackPool,
    ) -> Result<String> {
        let result = self.evaluate(operations)?;
        Ok(pool.insert_or_rename(id, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;
    use glodb_core::Interval;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn make_track(intervals: Vec<(&str, u32, u32)>) -> Track {
        intervals
            .into_iter()
            .map(|(seq, start, end)| (seq, Interval::new(start, end).unwrap()))
            .collect()
    }

    #[fixture]
    fn sequences() -> SequencePool {
        vec![("S", 40)].into_iter().collect()
    }

    #[fixture]
    fn track1() -> Track {
        make_track(vec![("S", 5, 9), ("S", 15, 19), ("S", 25, 29)])
    }

    #[fixture]
    fn track2() -> Track {
        make_track(vec![("S", 10, 14), ("S", 20, 24), ("S", 30, 34)])
    }

    #[rstest]
    fn test_empty_expression(sequences: SequencePool) {
        let evaluator = Evaluator::new(&sequences);
        assert!(matches!(
            evaluator.evaluate(&mut []),
            Err(QueryError::EmptyExpression)
        ));
    }

    #[rstest]
    fn test_missing_operator(sequences: SequencePool, track1: Track, track2: Track) {
        let evaluator = Evaluator::new(&sequences);
        let mut ops = vec![Operation::leaf(track1), Operation::leaf(track2)];
        assert!(matches!(
            evaluator.evaluate(&mut ops),
            Err(QueryError::MissingOperator { position: 1 })
        ));
    }

    #[rstest]
    fn test_first_operator_is_ignored(sequences: SequencePool, track1: Track) {
        let evaluator = Evaluator::new(&sequences);
        let mut ops = vec![Operation::leaf(track1.clone()).with_operator(Operator::And)];
        assert_eq!(evaluator.evaluate(&mut ops).unwrap(), track1);
    }

    #[rstest]
    fn test_fold_and_match_count(sequences: SequencePool, track1: Track, track2: Track) {
        let evaluator = Evaluator::new(&sequences);
        let mut ops = vec![
            Operation::leaf(track1.clone()),
            Operation::leaf(track2).with_operator(Operator::BOr),
            Operation::leaf(track1).with_operator(Operator::SAnd),
        ];
        let result = evaluator.evaluate(&mut ops).unwrap();
        assert!(result.is_empty());
        assert_eq!(ops[1].matched(), 1);
        assert_eq!(ops[2].matched(), 0);
        assert!(ops.iter().all(|op| op.is_resolved()));
    }

    #[rstest]
    fn test_group_filters_then_negates(sequences: SequencePool, track1: Track, track2: Track) {
        let evaluator = Evaluator::new(&sequences);
        let mut group = Operation::group(vec![
            Operation::leaf(track1),
            Operation::leaf(track2).with_operator(Operator::Or),
        ])
        .with_negate(true);
        group.set_seq_pos(20, -1).unwrap();

        let resolved = evaluator.resolve(&mut group).unwrap();
        assert_eq!(
            resolved,
            &make_track(vec![("S", 0, 19), ("S", 35, 39)])
        );
    }

    #[rstest]
    fn test_resolution_is_cached(sequences: SequencePool, track1: Track, track2: Track) {
        let evaluator = Evaluator::new(&sequences);
        let mut leaf = Operation::leaf(track1.clone());
        assert_eq!(evaluator.resolve(&mut leaf).unwrap(), &track1);

        leaf.resolution_mut().store(track2.clone());
        assert_eq!(evaluator.resolve(&mut leaf).unwrap(), &track2);
        assert!(leaf.is_resolved());

        leaf.invalidate();
        assert_eq!(evaluator.resolve(&mut leaf).unwrap(), &track1);
    }

    #[rstest]
    fn test_leaf_resolution_does_not_touch_operand(sequences: SequencePool, track1: Track) {
        let evaluator = Evaluator::new(&sequences);
        let mut leaf = Operation::leaf(track1.clone());
        leaf.set_length(1, 4).unwrap();
        assert!(evaluator.resolve(&mut leaf).unwrap().is_empty());
        assert!(matches!(leaf.operand(), Operand::Leaf(t) if *t == track1));
    }

    #[rstest]
    fn test_group_without_match_is_cached_empty(
        sequences: SequencePool,
        track1: Track,
        track2: Track,
    ) {
        let evaluator = Evaluator::new(&sequences);
        let mut group = Operation::group(vec![
            Operation::leaf(track1),
            Operation::leaf(track2).with_operator(Operator::And),
        ]);
        assert!(evaluator.resolve(&mut group).unwrap().is_empty());
        assert_eq!(group.resolved(), Some(&Track::new()));
    }

    #[rstest]
    fn test_negation_policies(sequences: SequencePool) {
        let outside = make_track(vec![("S", 30, 50)]);

        let soft = Evaluator::new(&sequences);
        let mut ops = vec![Operation::leaf(outside.clone()).with_negate(true)];
        assert!(soft.evaluate(&mut ops).unwrap().is_empty());

        let strict = Evaluator::new(&sequences).with_config(EvaluatorConfig {
            negation: NegationPolicy::Strict,
        });
        let mut ops = vec![Operation::leaf(outside).with_negate(true)];
        assert!(matches!(
            strict.evaluate(&mut ops),
            Err(QueryError::BoundsExceeded { .. })
        ));
    }

    #[rstest]
    fn test_compute_and_solve(sequences: SequencePool, track1: Track) {
        let evaluator = Evaluator::new(&sequences);
        let mut pool = TrackPool::new();

        let mut ops = vec![Operation::leaf(track1.clone())];
        assert_eq!(evaluator.compute(&mut ops, "q", &mut pool).unwrap(), "q");
        let mut ops = vec![Operation::leaf(Track::new())];
        assert_eq!(evaluator.compute(&mut ops, "q", &mut pool).unwrap(), "q");
        assert!(pool.get("q").unwrap().is_empty());

        let mut ops = vec![Operation::leaf(track1)];
        assert_eq!(evaluator.solve(&mut ops, "q", &mut pool).unwrap(), "_q_1");
        assert_eq!(pool.len(), 2);
    }
}
