// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the wire model of the review service and the derived view model shown to users
// role: model/types
// outputs: Serializable request/response structs; ViewModel with findings, summary and retained raw response
// invariants:
// - Optional wire fields default instead of failing (null and absent are equivalent)
// - `review` is the only required object in a response
// - ViewModel.raw_data is never mutated after construction
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::agents::AgentKind;

/// Treat `null` the same as an absent list.
pub(crate) fn nullable_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

fn nullable_map<'de, D>(d: D) -> Result<BTreeMap<String, i64>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<BTreeMap<String, i64>>::deserialize(d)?.unwrap_or_default())
}

/// Body of `POST /review` and `POST /review/async`.
///
/// Exactly one of `github_url` / `diff_content` should be set; the constructors
/// guarantee it, the client does not re-check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReviewRequest {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub github_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub diff_content: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pr_metadata: Option<serde_json::Value>,
}

impl ReviewRequest {
  pub fn github(url: impl Into<String>) -> Self {
    Self { github_url: Some(url.into()), ..Self::default() }
  }

  pub fn diff(content: impl Into<String>) -> Self {
    Self { diff_content: Some(content.into()), ..Self::default() }
  }

  pub fn with_metadata(mut self, metadata: Option<serde_json::Value>) -> Self {
    self.pr_metadata = metadata;
    self
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Issue {
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub severity: Option<String>,
  #[serde(default)]
  pub line_number: Option<i64>,
  #[serde(default)]
  pub filename: Option<String>,
  #[serde(default)]
  pub code_snippet: Option<String>,
  #[serde(default)]
  pub issue_description: Option<String>,
  #[serde(default)]
  pub recommendation: Option<String>,
  #[serde(default)]
  pub reasoning: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PrMetadata {
  #[serde(default)]
  pub pr_number: Option<i64>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub author: Option<String>,
  #[serde(default)]
  pub branch: Option<String>,
  #[serde(default)]
  pub files_changed: Option<i64>,
  #[serde(default)]
  pub additions: Option<i64>,
  #[serde(default)]
  pub deletions: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AggregatedReview {
  #[serde(default)]
  pub overall_assessment: Option<String>,
  #[serde(default)]
  pub approval_status: Option<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub critical_blockers: Vec<Issue>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub all_issues: Vec<Issue>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub strengths: Vec<String>,
  #[serde(default, deserialize_with = "nullable_map")]
  pub summary_by_category: BTreeMap<String, i64>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub priority_actions: Vec<String>,
}

/// Typed view of a `POST /review` result.
///
/// `agent_analyses` stays loosely typed here; each agent's payload is parsed by
/// [`AgentKind::parse`] during normalization.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReviewResponse {
  #[serde(default)]
  pub pr_metadata: Option<PrMetadata>,
  pub review: AggregatedReview,
  #[serde(default)]
  pub agent_analyses: Option<serde_json::Map<String, serde_json::Value>>,
  #[serde(default)]
  pub processing_time: Option<f64>,
}

/// `POST /format-review` result.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FormattedReview {
  pub formatted_report: String,
  #[serde(default)]
  pub original_data: serde_json::Value,
}

/// `GET /` result.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ServiceInfo {
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub service: Option<String>,
  #[serde(default)]
  pub version: Option<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub agents: Vec<String>,
}

/// `POST /review/async` result.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AsyncJob {
  pub job_id: String,
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
  Processing,
  Completed,
  Failed,
}

/// `GET /review/status/{job_id}` result.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JobStatus {
  pub status: JobState,
  #[serde(default)]
  pub result: Option<serde_json::Value>,
  #[serde(default)]
  pub error: Option<String>,
}

// --- View model ---

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Finding {
  pub severity: String,
  pub category: String,
  pub message: String,
  pub file: String,
  pub line: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AgentFindings {
  pub agent_name: String,
  #[serde(skip)]
  pub agent: Option<AgentKind>,
  pub findings: Vec<Finding>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Summary {
  pub total_issues: usize,
  pub critical: usize,
  pub warning: usize,
  pub suggestion: usize,
  pub info: usize,
  pub final_review: String,
  pub processing_time: Option<f64>,
}

/// UI-ready restructuring of one review result.
///
/// Replaced wholesale by the next submission. `raw_data` is shared, so an
/// export started from this value keeps its snapshot even if a newer result
/// arrives meanwhile.
#[derive(Debug, Serialize, Clone)]
pub struct ViewModel {
  pub agent_analyses: Vec<AgentFindings>,
  pub summary: Summary,
  pub raw_data: Arc<serde_json::Value>,
  #[serde(skip)]
  pub response: ReviewResponse,
}

impl ViewModel {
  pub fn approval_status(&self) -> Option<&str> {
    self.response.review.approval_status.as_deref()
  }

  pub fn pr_metadata(&self) -> Option<&PrMetadata> {
    self.response.pr_metadata.as_ref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn request_serializes_only_populated_source() {
    let v = serde_json::to_value(ReviewRequest::github("https://github.com/o/r/pull/1")).unwrap();
    assert_eq!(v, json!({"github_url": "https://github.com/o/r/pull/1"}));

    let v = serde_json::to_value(ReviewRequest::diff("diff --git a b").with_metadata(Some(json!({"title": "t"})))).unwrap();
    assert_eq!(v, json!({"diff_content": "diff --git a b", "pr_metadata": {"title": "t"}}));
  }

  #[test]
  fn response_tolerates_nulls_and_missing_lists() {
    let v = json!({
      "pr_metadata": null,
      "review": {"overall_assessment": null, "all_issues": null, "strengths": null},
      "processing_time": 1.25
    });
    let r: ReviewResponse = serde_json::from_value(v).unwrap();
    assert!(r.review.all_issues.is_empty());
    assert!(r.review.strengths.is_empty());
    assert!(r.agent_analyses.is_none());
    assert_eq!(r.processing_time, Some(1.25));
  }

  #[test]
  fn response_requires_review_object() {
    let err = serde_json::from_value::<ReviewResponse>(json!({"agent_analyses": {}})).unwrap_err();
    assert!(err.to_string().contains("review"));
  }

  #[test]
  fn job_status_parses_lowercase_states() {
    let s: JobStatus = serde_json::from_value(json!({"status": "failed", "error": "Could not process PR"})).unwrap();
    assert_eq!(s.status, JobState::Failed);
    assert_eq!(s.error.as_deref(), Some("Could not process PR"));
  }
}
