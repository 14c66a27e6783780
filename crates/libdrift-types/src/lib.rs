//! Stable DTOs and IDs used across the libdrift workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable string IDs, codes and status tokens
//! - canonical manifest path handling
//! - the manifest format tag shared by parsers, config and reports

#![forbid(unsafe_code)]

pub mod ids;
pub mod manifest;
pub mod path;
pub mod receipt;

pub use manifest::{ManifestFormat, UnknownFormatTag};
pub use path::RepoPath;
pub use receipt::{
    DriftData, Finding, LibdriftData, LibdriftReport, Location, ManifestStatus, MismatchData,
    RepoVersion, ReportEnvelope, RepositorySummary, RunGit, RunMeta, RunMode, SCHEMA_REPORT_V1,
    Severity, ToolMeta, Verdict, VerdictCounts, VerdictStatus,
};
