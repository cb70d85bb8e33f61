// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fixed configuration of the five review agents and typed parsing of their payloads
// role: model/agents
// inputs: One per-run payload (serde_json::Value) from agent_analyses[<key>]
// outputs: AgentAnalysis variants exposing the agent's issue list
// invariants:
// - AgentKind::ALL order is logic, security, performance, readability, testing
// - Each agent's issue list lives under its own field name; the binding is static
// - Absent issue field => empty list; wrong shape => ReviewError::Schema
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};

use crate::error::ReviewError;
use crate::model::{nullable_vec, Issue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
  Logic,
  Security,
  Performance,
  Readability,
  Testing,
}

impl AgentKind {
  pub const ALL: [AgentKind; 5] = [
    AgentKind::Logic,
    AgentKind::Security,
    AgentKind::Performance,
    AgentKind::Readability,
    AgentKind::Testing,
  ];

  /// Key under `agent_analyses` in a review response.
  pub fn key(self) -> &'static str {
    match self {
      Self::Logic => "logic",
      Self::Security => "security",
      Self::Performance => "performance",
      Self::Readability => "readability",
      Self::Testing => "testing",
    }
  }

  pub fn display_name(self) -> &'static str {
    match self {
      Self::Logic => "Logic Analysis",
      Self::Security => "Security Analysis",
      Self::Performance => "Performance Analysis",
      Self::Readability => "Readability Analysis",
      Self::Testing => "Testing Analysis",
    }
  }

  /// Field inside this agent's payload that holds its issues.
  pub fn issue_field(self) -> &'static str {
    match self {
      Self::Logic => "issues",
      Self::Security => "vulnerabilities",
      Self::Performance => "bottlenecks",
      Self::Readability => "style_issues",
      Self::Testing => "test_quality_issues",
    }
  }

  pub fn from_key(key: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|k| k.key() == key)
  }

  /// Parse one analysis pass produced by this agent.
  pub fn parse(self, payload: &serde_json::Value) -> Result<AgentAnalysis, ReviewError> {
    let schema_err = |e: serde_json::Error| {
      ReviewError::Schema(format!("agent_analyses.{} ({}): {}", self.key(), self.issue_field(), e))
    };
    let analysis = match self {
      Self::Logic => AgentAnalysis::Logic(LogicAnalysis::deserialize(payload).map_err(schema_err)?),
      Self::Security => AgentAnalysis::Security(SecurityAnalysis::deserialize(payload).map_err(schema_err)?),
      Self::Performance => {
        AgentAnalysis::Performance(PerformanceAnalysis::deserialize(payload).map_err(schema_err)?)
      }
      Self::Readability => {
        AgentAnalysis::Readability(ReadabilityAnalysis::deserialize(payload).map_err(schema_err)?)
      }
      Self::Testing => AgentAnalysis::Testing(TestingAnalysis::deserialize(payload).map_err(schema_err)?),
    };
    Ok(analysis)
  }
}

impl std::fmt::Display for AgentKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.key())
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct LogicAnalysis {
  #[serde(default, deserialize_with = "nullable_vec")]
  pub issues: Vec<Issue>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub potential_bugs: Vec<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub edge_cases_missing: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SecurityAnalysis {
  #[serde(default, deserialize_with = "nullable_vec")]
  pub vulnerabilities: Vec<Issue>,
  #[serde(default)]
  pub security_score: Option<i64>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub critical_issues: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PerformanceAnalysis {
  #[serde(default, deserialize_with = "nullable_vec")]
  pub bottlenecks: Vec<Issue>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub optimization_suggestions: Vec<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub complexity_warnings: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ReadabilityAnalysis {
  #[serde(default, deserialize_with = "nullable_vec")]
  pub style_issues: Vec<Issue>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub naming_suggestions: Vec<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub documentation_needed: Vec<String>,
  #[serde(default)]
  pub readability_score: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TestingAnalysis {
  #[serde(default, deserialize_with = "nullable_vec")]
  pub missing_tests: Vec<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub test_coverage_concerns: Vec<String>,
  #[serde(default, deserialize_with = "nullable_vec")]
  pub test_quality_issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgentAnalysis {
  Logic(LogicAnalysis),
  Security(SecurityAnalysis),
  Performance(PerformanceAnalysis),
  Readability(ReadabilityAnalysis),
  Testing(TestingAnalysis),
}

impl AgentAnalysis {
  pub fn kind(&self) -> AgentKind {
    match self {
      Self::Logic(_) => AgentKind::Logic,
      Self::Security(_) => AgentKind::Security,
      Self::Performance(_) => AgentKind::Performance,
      Self::Readability(_) => AgentKind::Readability,
      Self::Testing(_) => AgentKind::Testing,
    }
  }

  pub fn issues(&self) -> &[Issue] {
    match self {
      Self::Logic(a) => &a.issues,
      Self::Security(a) => &a.vulnerabilities,
      Self::Performance(a) => &a.bottlenecks,
      Self::Readability(a) => &a.style_issues,
      Self::Testing(a) => &a.test_quality_issues,
    }
  }
}
