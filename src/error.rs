// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Single failure type for review-service calls, normalization and export
// role: errors/taxonomy
// outputs: ReviewError with a human-readable message() suitable for notifications
// invariants:
// - Transport and service failures carry one message; callers never need to tell them apart
// - Service display text is exactly the extracted detail (no status prefix)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
  /// Network unreachable, connection reset, or an unreadable response body.
  #[error("{0}")]
  Transport(String),

  /// Non-2xx response from the review service.
  #[error("{message}")]
  Service { status: u16, message: String },

  /// The service accepted an async job but later reported it as failed.
  #[error("{message}")]
  Job { job_id: String, message: String },

  /// Response parsed as JSON but did not match the expected shape.
  #[error("unexpected response shape: {0}")]
  Schema(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("an export is already in progress")]
  ExportInProgress,
}

impl ReviewError {
  /// Short text shown to the user.
  pub fn message(&self) -> String {
    self.to_string()
  }

  /// HTTP status for service-reported failures.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Service { status, .. } => Some(*status),
      _ => None,
    }
  }
}

impl From<ureq::Error> for ReviewError {
  fn from(e: ureq::Error) -> Self {
    Self::Transport(e.to_string())
  }
}
