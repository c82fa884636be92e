//! Query evaluation over glodb tracks.
//!
//! A query is an ordered list of [Operation]s. The first one seeds the
//! result and each following one is combined into it with its [Operator]:
//!
//! | Operator | Keeps |
//! |---|---|
//! | `AND` | intervals of either side overlapping the other side |
//! | `OR` | intervals of both sides |
//! | `MINUS` | left intervals overlapping nothing on the right |
//! | `sAND` | left intervals with an identical right interval |
//! | `sMINUS` | left intervals without an identical right interval |
//! | `POS` | intervals of either side in a pair spaced within a window |
//! | `bAND` (`&&`) | positions covered by both sides |
//! | `bOR` (`\|\|`) | positions covered by either side |
//! | `bMINUS` (`-`) | positions of the left side not covered by the right |
//!
//! Operations may be nested groups, and carry length, position and repeat
//! filters plus an optional negation against the sequence lengths.
//!
//! # Example
//!
//! ```no_run
//! use glodb_core::{SequencePool, Track};
//! use glodb_query::{Evaluator, Operation, Operator};
//!
//! let sequences = SequencePool::try_from("genome.chrom.sizes").unwrap();
//! let genes = Track::try_from("genes.bed").unwrap();
//! let peaks = Track::try_from("peaks.bed").unwrap();
//!
//! let mut ops = vec![
//!     Operation::leaf(genes),
//!     Operation::leaf(peaks).with_operator(Operator::And),
//! ];
//! let result = Evaluator::new(&sequences).evaluate(&mut ops).unwrap();
//! ```

pub mod algebra;
pub mod complement;
pub mod constraints;
pub mod errors;
pub mod evaluator;
pub mod operation;
pub mod operator;
pub mod plan;

// re-exports
pub use algebra::{TrackAlgebra, apply};
pub use complement::{complement, complement_or_empty};
pub use constraints::{Constraints, Spacing};
pub use errors::{QueryError, Result};
pub use evaluator::{Evaluator, EvaluatorConfig, NegationPolicy};
pub use operation::{Operand, Operation};
pub use operator::Operator;
pub use plan::{QueryPlan, run_plan};
