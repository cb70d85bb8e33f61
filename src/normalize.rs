// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn a raw review-service response into the ViewModel (per-agent findings + severity summary)
// role: transform/normalize
// inputs: Raw response JSON exactly as received
// outputs: ViewModel holding findings, summary and the untouched raw response
// invariants:
// - Only the five fixed agents contribute, in fixed order; unknown keys are ignored
// - Agents whose flattened findings are empty are omitted (never an empty entry)
// - critical + warning + suggestion + info == total_issues == review.all_issues.len()
// - Per-agent severities and all_issues buckets are computed independently and not reconciled
// errors: ReviewError::Schema when `review` is missing or an agent payload has the wrong shape
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agents::AgentKind;
use crate::error::ReviewError;
use crate::model::{AgentFindings, Finding, Issue, ReviewResponse, Summary, ViewModel};

pub const NO_FINAL_REVIEW: &str = "No final review available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBucket {
  Critical,
  Warning,
  Suggestion,
  Info,
}

impl SeverityBucket {
  /// Case-insensitive; anything unrecognized (or missing) is `Info`.
  pub fn classify(severity: Option<&str>) -> Self {
    let s = severity.unwrap_or_default().to_lowercase();
    match s.as_str() {
      "critical" | "high" => Self::Critical,
      "medium" | "warning" => Self::Warning,
      "low" | "suggestion" => Self::Suggestion,
      _ => Self::Info,
    }
  }
}

pub fn normalize(raw: serde_json::Value) -> Result<ViewModel, ReviewError> {
  let response = ReviewResponse::deserialize(&raw).map_err(|e| ReviewError::Schema(format!("review response: {e}")))?;

  let agent_analyses = flatten_agents(response.agent_analyses.as_ref())?;
  let summary = summarize(
    &response.review.all_issues,
    response.review.overall_assessment.as_deref(),
    response.processing_time,
  );

  Ok(ViewModel { agent_analyses, summary, raw_data: Arc::new(raw), response })
}

pub fn flatten_agents(
  analyses: Option<&serde_json::Map<String, serde_json::Value>>,
) -> Result<Vec<AgentFindings>, ReviewError> {
  let Some(analyses) = analyses else {
    return Ok(Vec::new());
  };

  let mut out = Vec::new();

  for kind in AgentKind::ALL {
    let Some(runs) = analyses.get(kind.key()).and_then(|v| v.as_array()) else {
      continue;
    };

    let mut findings = Vec::new();
    for run in runs.iter().filter(|r| !r.is_null()) {
      let analysis = kind.parse(run)?;
      findings.extend(analysis.issues().iter().map(|issue| finding_from_issue(issue, kind)));
    }

    if !findings.is_empty() {
      out.push(AgentFindings { agent_name: kind.display_name().to_string(), agent: Some(kind), findings });
    }
  }

  Ok(out)
}

pub fn finding_from_issue(issue: &Issue, kind: AgentKind) -> Finding {
  Finding {
    severity: non_blank(issue.severity.as_deref()).map(str::to_lowercase).unwrap_or_else(|| "info".to_string()),
    category: non_blank(issue.category.as_deref()).unwrap_or(kind.key()).to_string(),
    message: issue.issue_description.clone().unwrap_or_default(),
    file: issue.filename.clone().unwrap_or_default(),
    line: issue.line_number,
  }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
  s.filter(|s| !s.trim().is_empty())
}

pub fn summarize(all_issues: &[Issue], overall_assessment: Option<&str>, processing_time: Option<f64>) -> Summary {
  let mut summary = Summary {
    total_issues: all_issues.len(),
    final_review: overall_assessment.unwrap_or(NO_FINAL_REVIEW).to_string(),
    processing_time,
    ..Summary::default()
  };

  for issue in all_issues {
    match SeverityBucket::classify(issue.severity.as_deref()) {
      SeverityBucket::Critical => summary.critical += 1,
      SeverityBucket::Warning => summary.warning += 1,
      SeverityBucket::Suggestion => summary.suggestion += 1,
      SeverityBucket::Info => summary.info += 1,
    }
  }

  summary
}
