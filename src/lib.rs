//! Core library for the tnea-cutoff command line application.
//!
//! The library exposes the pipeline stages that power the command-line
//! interface as well as the integration tests. Responsibilities are kept
//! narrow: IO adapters (HTTP fetch, spreadsheet, CSV and document writers) live
//! under [`tnea::cutoff::io`], the fixed record schema inside
//! [`tnea::cutoff::model`], the raw-to-canonical conversion in
//! [`tnea::cutoff::normalize`], filtering and sorting in
//! [`tnea::cutoff::query`], and the run orchestration under
//! [`tnea::cutoff::pipeline`].

pub mod tnea;

pub use tnea::cutoff::{
    FetchError, Result, ToolError, config, error, export, io, listing, model, normalize, pipeline,
    query,
};
