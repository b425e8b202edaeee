//! Pipeline orchestration for Interlinker.
//!
//! This crate ties together loading, indexing, linking, and output into the
//! end-to-end [`pipeline::run`] workflow.

pub mod pipeline;
pub mod report;
pub mod writer;
