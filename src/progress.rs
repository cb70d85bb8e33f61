// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Report review progress honestly: a single pending indicator for sync calls, real job states for async ones
// role: orchestration/progress
// inputs: ReviewApi; async job id; poll interval
// outputs: Raw review JSON when the job completes; ProgressEvent callbacks on each state change
// side_effects: Sleeps between polls
// invariants:
// - Only states reported by the service are surfaced; nothing is synthesized
// - Callback fires once per distinct state, not once per poll
// - No cancellation: polling ends only on completed, failed, or a request error
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::{Duration, Instant};

use tracing::info;

use crate::client::ReviewApi;
use crate::error::ReviewError;
use crate::model::{JobState, ReviewRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
  Submitted { job_id: String },
  State { job_id: String, state: JobState, elapsed: Duration },
}

/// One pending operation, timed from construction.
pub struct PendingIndicator {
  label: String,
  started: Instant,
}

impl PendingIndicator {
  pub fn start(label: impl Into<String>) -> Self {
    let label = label.into();
    info!("waiting for {label}");
    Self { label, started: Instant::now() }
  }

  pub fn elapsed(&self) -> Duration {
    self.started.elapsed()
  }

  pub fn finish(self) -> Duration {
    let elapsed = self.elapsed();
    info!(elapsed_ms = elapsed.as_millis() as u64, "{} finished", self.label);
    elapsed
  }
}

/// Submit via `POST /review/async` and poll until the job settles.
pub fn review_via_job(
  api: &dyn ReviewApi,
  request: &ReviewRequest,
  interval: Duration,
  mut on_event: impl FnMut(&ProgressEvent),
) -> Result<serde_json::Value, ReviewError> {
  let job = api.submit_review_async(request)?;
  on_event(&ProgressEvent::Submitted { job_id: job.job_id.clone() });
  wait_for_job(api, &job.job_id, interval, on_event)
}

pub fn wait_for_job(
  api: &dyn ReviewApi,
  job_id: &str,
  interval: Duration,
  mut on_event: impl FnMut(&ProgressEvent),
) -> Result<serde_json::Value, ReviewError> {
  let started = Instant::now();
  let mut last: Option<JobState> = None;

  loop {
    let status = api.review_status(job_id)?;

    if last != Some(status.status) {
      last = Some(status.status);
      on_event(&ProgressEvent::State { job_id: job_id.to_string(), state: status.status, elapsed: started.elapsed() });
    }

    match status.status {
      JobState::Completed => {
        return status
          .result
          .ok_or_else(|| ReviewError::Schema(format!("job {job_id} completed without a result")));
      }
      JobState::Failed => {
        return Err(ReviewError::Job {
          job_id: job_id.to_string(),
          message: status.error.unwrap_or_else(|| "Review job failed".to_string()),
        });
      }
      JobState::Processing => std::thread::sleep(interval),
    }
  }
}
