// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Execute a normalized CLI action against the review service (review, export, health, info)
// role: orchestration/commands
// inputs: EffectiveConfig; stdout writer; stdin for --diff -
// outputs: Rendered review, notifications and exported files
// side_effects: Network calls; reads diff/input files; writes saved responses and exports
// invariants:
// - Human output goes to `out`; progress and logs go to stderr
// - Export failures end the command with an error after a failure notification
// errors: Surfaced via anyhow with the service's message as the outermost text
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::{Action, EffectiveConfig, ExportConfig, ReviewSource};
use crate::client::{HttpReviewApi, ReviewApi};
use crate::dashboard::Dashboard;
use crate::model::ReviewRequest;
use crate::progress::ProgressEvent;
use crate::render;

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
  let default = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

pub fn run(cfg: &EffectiveConfig, out: &mut dyn Write) -> Result<()> {
  let api = HttpReviewApi::new(&cfg.base_url, cfg.timeout_secs.map(Duration::from_secs));
  run_with(&api, cfg, out)
}

pub fn run_with(api: &dyn ReviewApi, cfg: &EffectiveConfig, out: &mut dyn Write) -> Result<()> {
  match &cfg.action {
    Action::Review { source, metadata, wait_async, poll_secs, save, json, export } => {
      let request = build_request(source, metadata.clone())?;
      let out_dir = export.as_ref().map(|e| e.out_dir.as_str()).unwrap_or(".");
      let mut dashboard = Dashboard::new(api, out_dir);

      let vm = if *wait_async {
        dashboard.submit_async(&request, Duration::from_secs(*poll_secs), report_progress)?
      } else {
        dashboard.submit(&request)?
      };

      if let Some(path) = save {
        write_raw(Path::new(path), &vm.raw_data)?;
      }

      if *json {
        serde_json::to_writer_pretty(&mut *out, &render::view_json(vm))?;
        writeln!(out)?;
      } else {
        write!(out, "{}", render::render_text(vm))?;
      }

      if let Some(e) = export {
        run_export(&dashboard, e, out)?;
      }
      Ok(())
    }
    Action::Export { input, export } => {
      let bytes = std::fs::read(input).with_context(|| format!("reading {input}"))?;
      let raw: serde_json::Value =
        serde_json::from_slice(&bytes).with_context(|| format!("{input} is not valid JSON"))?;
      let mut dashboard = Dashboard::new(api, export.out_dir.as_str());
      dashboard.load(raw).with_context(|| format!("{input} is not a review response"))?;
      run_export(&dashboard, export, out)
    }
    Action::Health => {
      let status = api.health_check()?;
      serde_json::to_writer_pretty(&mut *out, &status)?;
      writeln!(out)?;
      Ok(())
    }
    Action::Info => {
      let info = api.service_info()?;
      write!(out, "{}", render::render_service_info(&info))?;
      Ok(())
    }
  }
}

fn build_request(source: &ReviewSource, metadata: Option<serde_json::Value>) -> Result<ReviewRequest> {
  let request = match source {
    ReviewSource::GithubUrl { url } => ReviewRequest::github(url.clone()),
    ReviewSource::DiffFile { path } => {
      let text = std::fs::read_to_string(path).with_context(|| format!("reading diff {path}"))?;
      ReviewRequest::diff(text)
    }
    ReviewSource::DiffStdin => {
      let mut text = String::new();
      std::io::stdin().read_to_string(&mut text).context("reading diff from stdin")?;
      ReviewRequest::diff(text)
    }
  };
  Ok(request.with_metadata(metadata))
}

fn report_progress(event: &ProgressEvent) {
  match event {
    ProgressEvent::Submitted { job_id } => eprintln!("submitted review job {job_id}"),
    ProgressEvent::State { job_id, state, elapsed } => {
      eprintln!("job {job_id}: {state:?} after {:.1}s", elapsed.as_secs_f64())
    }
  }
}

fn write_raw(path: &Path, raw: &serde_json::Value) -> Result<()> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, serde_json::to_vec_pretty(raw)?).with_context(|| format!("writing {}", path.display()))
}

fn run_export(dashboard: &Dashboard<'_>, export: &ExportConfig, out: &mut dyn Write) -> Result<()> {
  match dashboard.export(export.format, export.formatted) {
    Ok(outcome) => {
      writeln!(out, "{}", outcome.notification())?;
      Ok(())
    }
    Err(e) => {
      let msg = e.message();
      Err(anyhow::Error::new(e).context(format!("{} export failed: {}", export.format.label(), msg)))
    }
  }
}
