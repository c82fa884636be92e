//! Core models for glodb.
//!
//! This crate holds the data the query engine works on:
//!
//! - [Interval]: a closed `[start, end]` range of positions
//! - [Track]: intervals grouped by the sequence they are anchored to
//! - [SequencePool]: sequence lengths, usually read from a chrom.sizes file
//! - [TrackPool]: a registry of named tracks
//!
//! Tracks also carry the membership filters (length, sequence position,
//! repeats) and the coalescing and clustering passes.
//!
//! # Example
//!
//! ```no_run
//! use glodb_core::models::Track;
//!
//! let track = Track::try_from("peaks.bed").unwrap();
//! let merged = track.coalesced();
//! merged.to_bed("merged.bed").unwrap();
//! ```

pub mod errors;
pub mod filters;
pub mod merge;
pub mod models;
pub mod utils;

// re-exports
pub use errors::{Result, TrackError};
pub use models::{Feature, Interval, Sequence, SequencePool, Track, TrackPool};
