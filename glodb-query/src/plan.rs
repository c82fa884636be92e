//! Query plans: a TOML description of the tracks to load and the
//! operations to evaluate over them.
//!
//! ```toml
//! result = "spaced"
//! chrom_sizes = "genome.chrom.sizes"
//!
//! [evaluator]
//! negation = "strict"
//!
//! [[tracks]]
//! name = "promoters"
//! path = "promoters.bed"
//!
//! [[tracks]]
//! name = "genes"
//! path = "genes.bed.gz"
//!
//! [[steps]]
//! track = "promoters"
//!
//! [[steps]]
//! operator = "POS"
//! track = "genes"
//! spacing = [1, 100]
//! ```
//!
//! A step names either a `track` or a nested `group` of steps. Relative
//! paths are resolved against the directory holding the plan file.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use glodb_core::{SequencePool, Track, TrackPool};
use log::{debug, info};
use serde::Deserialize;

use crate::errors::{QueryError, Result};
use crate::evaluator::{Evaluator, EvaluatorConfig};
use crate::operation::Operation;
use crate::operator::Operator;

/// Default name of a plan's result track.
pub const DEFAULT_RESULT_NAME: &str = "query";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrackSource {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RepeatStep {
    pub min: u32,
    pub max: u32,
    #[serde(default)]
    pub min_within: u32,
    #[serde(default)]
    pub max_within: u32,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Step {
    pub track: Option<String>,
    pub group: Option<Vec<Step>>,
    pub operator: Option<Operator>,
    #[serde(default)]
    pub negate: bool,
    #[serde(default)]
    pub ignore: bool,
    pub sequence: Option<String>,
    /// `[min, max]` interval width
    pub length: Option<(u32, u32)>,
    /// `[min, max]` position, max -1 for the end of the sequence
    pub seq_pos: Option<(u32, i64)>,
    pub repeat: Option<RepeatStep>,
    /// `[min, max]` gap for the POS operator
    pub spacing: Option<(i64, i64)>,
}

impl Step {
    /// Build the operation node this step describes.
    pub fn to_operation(&self, tracks: &TrackPool) -> Result<Operation> {
        let mut operation = match (&self.track, &self.group) {
            (Some(name), None) => {
                let track = tracks
                    .get(name)
                    .ok_or_else(|| QueryError::UnknownTrack(name.clone()))?;
                Operation::leaf(track.clone())
            }
            (None, Some(steps)) => {
                if steps.is_empty() {
                    return Err(QueryError::Plan("a group needs at least one step".to_string()));
                }
                let children = steps
                    .iter()
                    .map(|step| step.to_operation(tracks))
                    .collect::<Result<Vec<_>>>()?;
                Operation::group(children)
            }
            _ => {
                return Err(QueryError::Plan(
                    "a step names exactly one of `track` or `group`".to_string(),
                ));
            }
        };

        operation.set_operator(self.operator);
        operation.set_negate(self.negate);
        operation.set_ignore(self.ignore);

        if let Some(sequence) = &self.sequence {
            operation.set_sequence(sequence);
        }
        if let Some((min, max)) = self.length {
            operation.set_length(min, max)?;
        }
        if let Some((min, max)) = self.seq_pos {
            operation.set_seq_pos(min, max)?;
        }
        if let Some(r) = self.repeat {
            operation.set_repeat(r.min, r.max, r.min_within, r.max_within)?;
        }
        if let Some((min, max)) = self.spacing {
            operation.set_spacing(min, max);
        }

        Ok(operation)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QueryPlan {
    pub result: Option<String>,
    pub chrom_sizes: Option<PathBuf>,
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    #[serde(default)]
    pub tracks: Vec<TrackSource>,
    pub steps: Vec<Step>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl TryFrom<&Path> for QueryPlan {
    type Error = QueryError;

    fn try_from(value: &Path) -> Result<Self> {
        let content = read_to_string(value)?;
        let mut plan: QueryPlan = content.parse()?;
        plan.base_dir = value
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(plan)
    }
}

impl FromStr for QueryPlan {
    type Err = QueryError;

    /// Parse a plan; relative paths resolve against the working directory.
    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl QueryPlan {
    pub fn result_name(&self) -> &str {
        self.result.as_deref().unwrap_or(DEFAULT_RESULT_NAME)
    }

    fn locate(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    ///
    /// Read every track the plan lists, registered under its plan name.
    ///
    /// # Errors
    /// Unreadable BED files, and names listed twice.
    pub fn load_tracks(&self) -> Result<TrackPool> {
        let mut pool = TrackPool::new();
        for source in &self.tracks {
            let path = self.locate(&source.path);
            debug!("Loading track {} from {}", source.name, path.display());
            let track = Track::try_from(path.as_path())?;
            pool.insert(&source.name, track)?;
        }
        Ok(pool)
    }

    /// Sequence lengths from `chrom_sizes`, or an empty pool without one.
    pub fn load_sequences(&self) -> Result<SequencePool> {
        match &self.chrom_sizes {
            Some(path) => Ok(SequencePool::try_from(self.locate(path).as_path())?),
            None => Ok(SequencePool::new()),
        }
    }

    /// Turn the steps into operation nodes over `tracks`.
    pub fn to_operations(&self, tracks: &TrackPool) -> Result<Vec<Operation>> {
        self.steps
            .iter()
            .map(|step| step.to_operation(tracks))
            .collect()
    }

    ///
    /// Load the plan's inputs and evaluate it. The result carries the plan's
    /// result name, or a generated one when that name is already used by an
    /// input track.
    ///
    pub fn run(&self) -> Result<Track> {
        let mut pool = self.load_tracks()?;
        let sequences = self.load_sequences()?;
        let mut operations = self.to_operations(&pool)?;

        let evaluator = Evaluator::new(&sequences).with_config(self.evaluator);
        let id = evaluator.solve(&mut operations, self.result_name(), &mut pool)?;
        info!("Query result registered as {}", id);

        pool.remove(&id).ok_or(QueryError::UnknownTrack(id))
    }
}

/// Load the plan at `path` and evaluate it.
pub fn run_plan<P: AsRef<Path>>(path: P) -> Result<Track> {
    QueryPlan::try_from(path.as_ref())?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glodb_core::Interval;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn get_test_path(file_name: &str) -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data/plans")
            .join(file_name)
    }

    fn make_track(intervals: Vec<(&str, u32, u32)>) -> Track {
        intervals
            .into_iter()
            .map(|(seq, start, end)| (seq, Interval::new(start, end).unwrap()))
            .collect()
    }

    #[fixture]
    fn pool() -> TrackPool {
        let mut pool = TrackPool::new();
        pool.insert("a", make_track(vec![("S", 0, 9), ("T", 0, 9)]))
            .unwrap();
        pool.insert("b", make_track(vec![("S", 5, 20)])).unwrap();
        pool
    }

    #[rstest]
    fn test_parse_nested_plan() {
        let plan: QueryPlan = r#"
            [[steps]]
            track = "a"

            [[steps]]
            operator = "||"
            negate = true
            sequence = "S"
            length = [1, 30]

            [[steps.group]]
            track = "b"

            [[steps.group]]
            operator = "sMINUS"
            track = "a"
            seq_pos = [0, -1]
        "#
        .parse()
        .unwrap();

        assert_eq!(plan.result_name(), DEFAULT_RESULT_NAME);
        assert_eq!(plan.steps.len(), 2);
        let group = plan.steps[1].group.as_ref().unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group[1].operator, Some(Operator::SMinus));
        assert_eq!(plan.steps[1].operator, Some(Operator::BOr));
    }

    #[rstest]
    fn test_to_operations(pool: TrackPool) {
        let plan: QueryPlan = r#"
            [[steps]]
            track = "a"
            sequence = "S"

            [[steps]]
            operator = "POS"
            track = "b"
            spacing = [-5, -4]
        "#
        .parse()
        .unwrap();

        let ops = plan.to_operations(&pool).unwrap();
        assert_eq!(ops[0].num_features(), 1);
        assert_eq!(ops[1].spacing().min_pos, -5);
        assert_eq!(ops[1].operator(), Some(Operator::Pos));
    }

    #[rstest]
    #[case("[[steps]]\ntrack = \"missing\"")]
    #[case("[[steps]]\noperator = \"AND\"")]
    #[case("[[steps]]\ntrack = \"a\"\nlength = [10, 2]")]
    fn test_bad_steps(pool: TrackPool, #[case] plan: &str) {
        let plan: QueryPlan = plan.parse().unwrap();
        assert!(plan.to_operations(&pool).is_err());
    }

    #[rstest]
    fn test_bpos_is_rejected() {
        let plan = "[[steps]]\ntrack = \"a\"\n[[steps]]\noperator = \".\"\ntrack = \"a\"";
        assert!(plan.parse::<QueryPlan>().is_err());
    }

    #[rstest]
    fn test_run_plan_file() {
        let result = run_plan(get_test_path("spacing.toml")).unwrap();
        assert_eq!(result.id.as_deref(), Some("adjacent"));
        assert_eq!(
            result,
            make_track(vec![
                ("S", 5, 9),
                ("S", 10, 14),
                ("S", 15, 19),
                ("S", 20, 24),
                ("S", 25, 29),
                ("S", 30, 34),
            ])
        );
    }

    #[rstest]
    fn test_plan_paths_and_result_name() {
        let dir = tempdir().unwrap();
        let tracks = std::env::current_dir()
            .unwrap()
            .join("../tests/data/tracks");
        std::fs::copy(tracks.join("track1.bed"), dir.path().join("local.bed")).unwrap();

        // one relative path, one absolute; the result name collides with an input
        let plan_path = dir.path().join("plan.toml");
        let mut file = std::fs::File::create(&plan_path).unwrap();
        writeln!(
            file,
            "result = \"first\"\n\n[[tracks]]\nname = \"first\"\npath = \"local.bed\"\n\n[[tracks]]\nname = \"second\"\npath = {:?}\n\n[[steps]]\ntrack = \"first\"\n\n[[steps]]\noperator = \"AND\"\ntrack = \"second\"",
            tracks.join("track2.bed").to_string_lossy()
        )
        .unwrap();
        drop(file);

        let result = run_plan(&plan_path).unwrap();
        assert_eq!(result.id.as_deref(), Some("_first_1"));
        assert_eq!(result, make_track(vec![("S", 50, 60), ("S", 55, 65)]));
    }

    #[rstest]
    fn test_missing_track_file_fails() {
        let dir = tempdir().unwrap();
        let plan_path = dir.path().join("plan.toml");
        std::fs::write(
            &plan_path,
            "[[tracks]]\nname = \"a\"\npath = \"absent.bed\"\n\n[[steps]]\ntrack = \"a\"\n",
        )
        .unwrap();
        assert!(matches!(run_plan(&plan_path), Err(QueryError::Track(_))));
    }

    #[rstest]
    fn test_run_plan_with_negation() {
        let result = run_plan(get_test_path("negated_group.toml")).unwrap();
        assert_eq!(result, make_track(vec![("S", 35, 39)]));
    }
}
