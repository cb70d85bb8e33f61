// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Render a ViewModel for the terminal (summary panel, assessment, actions, per-agent findings)
// role: presentation/terminal
// inputs: ViewModel
// outputs: Plain UTF-8 text; JSON view via serde for --json
// invariants: Pure; agent sections appear in ViewModel order; empty sections are skipped
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt::Write;

use serde::Serialize;

use crate::model::{Finding, ServiceInfo, ViewModel};

/// JSON shape printed by `--json`: the view model without its raw snapshot.
#[derive(Serialize)]
pub struct ViewJson<'a> {
  pub agent_analyses: &'a [crate::model::AgentFindings],
  pub summary: &'a crate::model::Summary,
}

pub fn view_json(vm: &ViewModel) -> ViewJson<'_> {
  ViewJson { agent_analyses: &vm.agent_analyses, summary: &vm.summary }
}

pub fn render_text(vm: &ViewModel) -> String {
  let mut out = String::new();
  let s = &vm.summary;

  if let Some(meta) = vm.pr_metadata() {
    let number = meta.pr_number.map(|n| format!("#{n} ")).unwrap_or_default();
    let title = meta.title.as_deref().unwrap_or("(untitled)");
    let _ = write!(out, "PR {number}{title}");
    if let Some(author) = &meta.author {
      let _ = write!(out, " by {author}");
    }
    out.push('\n');
  }

  if let Some(status) = vm.approval_status() {
    let _ = writeln!(out, "Status: {status}");
  }
  let _ = writeln!(
    out,
    "Issues: {} total | {} critical | {} warning | {} suggestion | {} info",
    s.total_issues, s.critical, s.warning, s.suggestion, s.info
  );
  if let Some(t) = s.processing_time {
    let _ = writeln!(out, "Processing time: {t:.2}s");
  }

  let _ = writeln!(out, "\nFinal review\n");
  for line in s.final_review.lines() {
    let _ = writeln!(out, "  {line}");
  }

  let review = &vm.response.review;
  if !review.priority_actions.is_empty() {
    let _ = writeln!(out, "\nPriority actions");
    for (i, action) in review.priority_actions.iter().enumerate() {
      let _ = writeln!(out, "  {}. {}", i + 1, action);
    }
  }
  if !review.strengths.is_empty() {
    let _ = writeln!(out, "\nStrengths");
    for strength in &review.strengths {
      let _ = writeln!(out, "  - {strength}");
    }
  }

  for group in &vm.agent_analyses {
    let _ = writeln!(out, "\n{} ({})", group.agent_name, group.findings.len());
    for f in &group.findings {
      let _ = writeln!(out, "  {}", finding_line(f));
    }
  }

  out
}

pub fn finding_line(f: &Finding) -> String {
  let location = match (f.file.is_empty(), f.line) {
    (true, _) => String::new(),
    (false, Some(line)) => format!(" {}:{}", f.file, line),
    (false, None) => format!(" {}", f.file),
  };
  format!("[{}] {}{} - {}", f.severity, f.category, location, f.message)
}

pub fn render_service_info(info: &ServiceInfo) -> String {
  let mut out = String::new();
  let _ = writeln!(
    out,
    "{} {} ({})",
    info.service.as_deref().unwrap_or("review service"),
    info.version.as_deref().unwrap_or("?"),
    info.status.as_deref().unwrap_or("unknown")
  );
  for agent in &info.agents {
    let _ = writeln!(out, "  - {agent}");
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::normalize::normalize;
  use serde_json::json;

  fn vm() -> ViewModel {
    normalize(json!({
      "pr_metadata": {"pr_number": 42, "title": "Add cache", "author": "octo"},
      "review": {
        "overall_assessment": "Mostly good.\nOne blocker.",
        "approval_status": "CHANGES_REQUESTED",
        "all_issues": [{"severity": "high"}, {"severity": "low"}],
        "strengths": ["clear naming"],
        "priority_actions": ["fix injection"]
      },
      "agent_analyses": {
        "security": [{"vulnerabilities": [
          {"severity": "HIGH", "issue_description": "sql injection", "filename": "db.py", "line_number": 12}
        ]}],
        "readability": [{"style_issues": [{"issue_description": "long function"}]}]
      },
      "processing_time": 3.14159
    }))
    .unwrap()
  }

  #[test]
  fn text_contains_summary_and_sections() {
    let text = render_text(&vm());
    assert!(text.starts_with("PR #42 Add cache by octo\n"));
    assert!(text.contains("Status: CHANGES_REQUESTED"));
    assert!(text.contains("Issues: 2 total | 1 critical | 0 warning | 1 suggestion | 0 info"));
    assert!(text.contains("Processing time: 3.14s"));
    assert!(text.contains("  One blocker."));
    assert!(text.contains("  1. fix injection"));
    assert!(text.contains("  - clear naming"));
    assert!(text.contains("Security Analysis (1)\n  [high] security db.py:12 - sql injection"));
    assert!(text.contains("Readability Analysis (1)\n  [info] readability - long function"));
    let sec = text.find("Security Analysis").unwrap();
    let read = text.find("Readability Analysis").unwrap();
    assert!(sec < read);
  }

  #[test]
  fn view_json_omits_raw_data() {
    let model = vm();
    let v = serde_json::to_value(view_json(&model)).unwrap();
    assert!(v.get("raw_data").is_none());
    assert_eq!(v["summary"]["total_issues"], 2);
    assert_eq!(v["agent_analyses"][0]["agent_name"], "Security Analysis");
  }

  #[test]
  fn service_info_lists_agents() {
    let info = ServiceInfo {
      status: Some("operational".into()),
      service: Some("PR Review Agent".into()),
      version: Some("1.0.0".into()),
      agents: vec!["Logic Analysis".into()],
    };
    let text = render_service_info(&info);
    assert_eq!(text, "PR Review Agent 1.0.0 (operational)\n  - Logic Analysis\n");
  }
}
