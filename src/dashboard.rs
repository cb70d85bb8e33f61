// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Hold the current review result and drive submit / export against it
// role: orchestration/session
// inputs: ReviewApi; ReviewRequest per submission; export format choice
// outputs: Current ViewModel; ExportOutcome
// invariants:
// - A submission replaces the current result wholesale; a failed submission leaves none
// - Exports read an Arc snapshot of raw_data, never a newer result
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::client::ReviewApi;
use crate::error::ReviewError;
use crate::export::{ExportFormat, ExportOutcome, Exporter};
use crate::model::{ReviewRequest, ViewModel};
use crate::normalize::normalize;
use crate::progress::{self, PendingIndicator, ProgressEvent};

pub struct Dashboard<'a> {
  api: &'a dyn ReviewApi,
  exporter: Exporter<'a>,
  current: Option<ViewModel>,
}

impl<'a> Dashboard<'a> {
  pub fn new(api: &'a dyn ReviewApi, out_dir: impl Into<PathBuf>) -> Self {
    Self { api, exporter: Exporter::new(api, out_dir), current: None }
  }

  pub fn with_now_millis(mut self, ms: Option<i64>) -> Self {
    self.exporter = self.exporter.with_now_millis(ms);
    self
  }

  pub fn current(&self) -> Option<&ViewModel> {
    self.current.as_ref()
  }

  /// Synchronous `POST /review`.
  pub fn submit(&mut self, request: &ReviewRequest) -> Result<&ViewModel, ReviewError> {
    self.current = None;
    let pending = PendingIndicator::start("review service");
    let raw = self.api.review_pr(request)?;
    pending.finish();
    self.load(raw)
  }

  /// `POST /review/async` followed by status polling.
  pub fn submit_async(
    &mut self,
    request: &ReviewRequest,
    interval: Duration,
    on_event: impl FnMut(&ProgressEvent),
  ) -> Result<&ViewModel, ReviewError> {
    self.current = None;
    let raw = progress::review_via_job(self.api, request, interval, on_event)?;
    self.load(raw)
  }

  /// Make `raw` (a previously received response) the current result.
  pub fn load(&mut self, raw: serde_json::Value) -> Result<&ViewModel, ReviewError> {
    self.current = None;
    let vm = normalize(raw)?;
    Ok(self.current.insert(vm))
  }

  pub fn raw_snapshot(&self) -> Option<Arc<serde_json::Value>> {
    self.current.as_ref().map(|vm| Arc::clone(&vm.raw_data))
  }

  pub fn export(&self, format: ExportFormat, formatted: bool) -> Result<ExportOutcome, ReviewError> {
    let raw = self
      .raw_snapshot()
      .ok_or_else(|| ReviewError::Schema("no review result to export".to_string()))?;
    self.exporter.export(&raw, format, formatted)
  }

  pub fn is_exporting(&self) -> bool {
    self.exporter.is_exporting()
  }
}
