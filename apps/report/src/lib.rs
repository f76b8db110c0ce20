//! `resume-report` library crate.
//!
//! Ingests heterogeneous resume-parsing output (structured job arrays
//! under varying field names plus free-form text blocks) and produces one
//! canonical, deduplicated work-experience list with computed durations,
//! rendered as a fixed-layout text report.
//!
//! The binary is a thin wrapper around this library so the pipeline stays
//! testable and reusable without a host process.

pub mod cli;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod report;
