use pr_review_dashboard::client::ReviewApi;
use pr_review_dashboard::model::{AsyncJob, FormattedReview, JobStatus, ReviewRequest, ServiceInfo};
use pr_review_dashboard::{Dashboard, ExportFormat, ReviewError};
use serde_json::{json, Value};
use test_support::{read_fixture_json, tempdir};

struct FormattingApi;

impl ReviewApi for FormattingApi {
  fn review_pr(&self, _r: &ReviewRequest) -> Result<Value, ReviewError> {
    Ok(read_fixture_json("review_response.json"))
  }
  fn format_review(&self, data: &Value) -> Result<FormattedReview, ReviewError> {
    Ok(FormattedReview { formatted_report: "## Summary\nRequest changes.".into(), original_data: data.clone() })
  }
  fn generate_pdf(&self, _d: &Value) -> Result<Vec<u8>, ReviewError> {
    Err(ReviewError::Service { status: 500, message: "boom".into() })
  }
  fn health_check(&self) -> Result<Value, ReviewError> {
    Ok(json!({"status": "healthy"}))
  }
  fn service_info(&self) -> Result<ServiceInfo, ReviewError> {
    Ok(ServiceInfo::default())
  }
  fn submit_review_async(&self, _r: &ReviewRequest) -> Result<AsyncJob, ReviewError> {
    Err(ReviewError::Transport("not used".into()))
  }
  fn review_status(&self, _id: &str) -> Result<JobStatus, ReviewError> {
    Err(ReviewError::Transport("not used".into()))
  }
}

fn schema() -> jsonschema::Validator {
  let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/schemas/review-response.schema.json");
  let schema: Value = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
  jsonschema::validator_for(&schema).expect("valid schema")
}

fn assert_valid(v: &Value) {
  let validator = schema();
  let errors: Vec<String> = validator.iter_errors(v).map(|e| e.to_string()).collect();
  assert!(errors.is_empty(), "schema errors: {errors:?}");
}

#[test]
fn fixtures_match_schema() {
  assert_valid(&read_fixture_json("review_response.json"));
  assert_valid(&read_fixture_json("review_response_sparse.json"));
}

#[test]
fn exported_json_matches_schema() {
  let td = tempdir();
  let api = FormattingApi;
  let mut d = Dashboard::new(&api, td.path()).with_now_millis(Some(1_700_000_000_000));
  d.submit(&ReviewRequest::github("https://github.com/o/r/pull/128")).unwrap();

  let plain = d.export(ExportFormat::Json, false).unwrap();
  assert!(plain.path.ends_with("pr-review-1700000000000.json"));
  let v: Value = serde_json::from_slice(&std::fs::read(&plain.path).unwrap()).unwrap();
  assert_valid(&v);
  assert_eq!(v, read_fixture_json::<Value, _>("review_response.json"));

  let td2 = tempdir();
  let mut d = Dashboard::new(&api, td2.path()).with_now_millis(Some(1_700_000_000_001));
  d.submit(&ReviewRequest::github("https://github.com/o/r/pull/128")).unwrap();
  let formatted = d.export(ExportFormat::Json, true).unwrap();
  assert!(formatted.formatted);
  let v: Value = serde_json::from_slice(&std::fs::read(&formatted.path).unwrap()).unwrap();
  assert_valid(&v);
  assert_eq!(v["review"]["overall_assessment"], "## Summary\nRequest changes.");
  assert_eq!(v["review"]["approval_status"], "CHANGES_REQUESTED");
}

#[test]
fn failed_pdf_export_writes_nothing() {
  let td = tempdir();
  let api = FormattingApi;
  let mut d = Dashboard::new(&api, td.path());
  d.submit(&ReviewRequest::diff("d")).unwrap();

  let err = d.export(ExportFormat::Pdf, false).unwrap_err();
  assert_eq!(err.message(), "boom");
  assert!(test_support::list_files(td.path()).is_empty());
  assert!(!d.is_exporting());
}
