//! Client, normalizer and exporter for a multi-agent pull-request review service.
//!
//! The service does the analysis; this crate submits work to it, reshapes the
//! response into per-agent findings plus a severity summary, and writes JSON or
//! PDF exports of a held result.

pub mod agents;
pub mod app;
pub mod cli;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod ext;
pub mod model;
pub mod normalize;
pub mod progress;
pub mod render;
pub mod util;

pub use client::{HttpReviewApi, ReviewApi, DEFAULT_BASE_URL};
pub use dashboard::Dashboard;
pub use error::ReviewError;
pub use export::{ExportFormat, ExportOutcome, Exporter};
pub use model::{ReviewRequest, ViewModel};
pub use normalize::normalize;
