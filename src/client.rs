// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed HTTP access to the review service (review, format, PDF, health, info, async jobs)
// role: client/review-service
// inputs: Base URL (default http://localhost:8000), optional global timeout
// outputs: Raw review JSON, FormattedReview, PDF bytes, status objects
// side_effects: Network calls to the configured service
// invariants:
// - Non-2xx and transport failures surface as one ReviewError with a readable message
// - No retries; no partial results on failure
// - JSON error bodies: `detail` string, else "HTTP error! status: N"; unparseable => "Unknown error"
// - PDF error bodies: `detail`, then `message`, then the raw text; empty => "Unknown error"
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use ureq::http::Response;
use ureq::{Agent, Body};

use crate::error::ReviewError;
use crate::ext::serde_json::JsonFetch;
use crate::model::{AsyncJob, FormattedReview, JobStatus, ReviewRequest, ServiceInfo};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Upper bound on a downloaded PDF body.
pub const MAX_PDF_BYTES: u64 = 64 * 1024 * 1024;

const UNKNOWN_ERROR: &str = "Unknown error";

// --- Trait seam for the review service ---
pub trait ReviewApi {
  /// `POST /review`. Returns the response body verbatim; see [`crate::normalize::normalize`].
  fn review_pr(&self, request: &ReviewRequest) -> Result<serde_json::Value, ReviewError>;
  /// `POST /format-review`.
  fn format_review(&self, data: &serde_json::Value) -> Result<FormattedReview, ReviewError>;
  /// `POST /generate-pdf`.
  fn generate_pdf(&self, data: &serde_json::Value) -> Result<Vec<u8>, ReviewError>;
  /// `GET /health`.
  fn health_check(&self) -> Result<serde_json::Value, ReviewError>;
  /// `GET /`.
  fn service_info(&self) -> Result<ServiceInfo, ReviewError>;
  /// `POST /review/async`.
  fn submit_review_async(&self, request: &ReviewRequest) -> Result<AsyncJob, ReviewError>;
  /// `GET /review/status/{job_id}`.
  fn review_status(&self, job_id: &str) -> Result<JobStatus, ReviewError>;
}

pub struct HttpReviewApi {
  base_url: String,
  agent: Agent,
}

impl HttpReviewApi {
  /// `timeout = None` keeps the transport defaults.
  pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
    let agent: Agent = Agent::config_builder()
      .http_status_as_error(false)
      .timeout_global(timeout)
      .build()
      .into();

    Self { base_url: base_url.trim_end_matches('/').to_string(), agent }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  fn post_json(&self, path: &str, body: &impl Serialize) -> Result<Response<Body>, ReviewError> {
    let url = self.url(path);
    let resp = self
      .agent
      .post(&url)
      .header("User-Agent", "pr-review-dashboard")
      .send_json(body)?;
    debug!(method = "POST", path, status = resp.status().as_u16(), "review service responded");
    Ok(resp)
  }

  fn get(&self, path: &str) -> Result<Response<Body>, ReviewError> {
    let url = self.url(path);
    let resp = self
      .agent
      .get(&url)
      .header("Accept", "application/json")
      .header("User-Agent", "pr-review-dashboard")
      .call()?;
    debug!(method = "GET", path, status = resp.status().as_u16(), "review service responded");
    Ok(resp)
  }
}

/// Decode a success body, or turn a failure body into a `Service` error.
fn json_or_detail<T: DeserializeOwned>(mut resp: Response<Body>) -> Result<T, ReviewError> {
  let status = resp.status().as_u16();
  if !resp.status().is_success() {
    let text = resp.body_mut().read_to_string().unwrap_or_default();
    return Err(ReviewError::Service { status, message: detail_message(status, &text) });
  }
  resp
    .body_mut()
    .read_json::<T>()
    .map_err(|e| ReviewError::Transport(format!("malformed response body: {e}")))
}

/// Message for a failed JSON endpoint.
pub fn detail_message(status: u16, body: &str) -> String {
  match serde_json::from_str::<serde_json::Value>(body) {
    Ok(v) => v.fetch("detail").text().unwrap_or_else(|| status_message(status)),
    Err(_) => UNKNOWN_ERROR.to_string(),
  }
}

/// Message for a failed PDF request: JSON `detail`/`message`, else the raw text.
pub fn pdf_error_message(body: &str) -> String {
  if body.trim().is_empty() {
    return UNKNOWN_ERROR.to_string();
  }
  match serde_json::from_str::<serde_json::Value>(body) {
    Ok(v) => v.first_text(&["detail", "message"]).unwrap_or_else(|| body.to_string()),
    Err(_) => body.to_string(),
  }
}

fn status_message(status: u16) -> String {
  format!("HTTP error! status: {status}")
}

impl ReviewApi for HttpReviewApi {
  fn review_pr(&self, request: &ReviewRequest) -> Result<serde_json::Value, ReviewError> {
    json_or_detail(self.post_json("/review", request)?)
  }

  fn format_review(&self, data: &serde_json::Value) -> Result<FormattedReview, ReviewError> {
    json_or_detail(self.post_json("/format-review", data)?)
  }

  fn generate_pdf(&self, data: &serde_json::Value) -> Result<Vec<u8>, ReviewError> {
    let mut resp = self.post_json("/generate-pdf", data)?;
    let status = resp.status().as_u16();

    if !resp.status().is_success() {
      let text = resp.body_mut().read_to_string().unwrap_or_default();
      return Err(ReviewError::Service { status, message: pdf_error_message(&text) });
    }

    resp
      .body_mut()
      .with_config()
      .limit(MAX_PDF_BYTES)
      .read_to_vec()
      .map_err(|e| ReviewError::Transport(format!("reading PDF body: {e}")))
  }

  fn health_check(&self) -> Result<serde_json::Value, ReviewError> {
    let mut resp = self.get("/health")?;
    let status = resp.status().as_u16();

    if !resp.status().is_success() {
      return Err(ReviewError::Service { status, message: format!("Health check failed: {status}") });
    }

    resp
      .body_mut()
      .read_json::<serde_json::Value>()
      .map_err(|e| ReviewError::Transport(format!("malformed response body: {e}")))
  }

  fn service_info(&self) -> Result<ServiceInfo, ReviewError> {
    json_or_detail(self.get("/")?)
  }

  fn submit_review_async(&self, request: &ReviewRequest) -> Result<AsyncJob, ReviewError> {
    json_or_detail(self.post_json("/review/async", request)?)
  }

  fn review_status(&self, job_id: &str) -> Result<JobStatus, ReviewError> {
    json_or_detail(self.get(&format!("/review/status/{job_id}"))?)
  }
}
