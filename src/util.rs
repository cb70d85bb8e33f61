// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for paths, export file naming, clock overrides, and man page rendering
// role: utilities/helpers
// inputs: Various primitives; paths; clap CommandFactory
// outputs: Canonicalized paths, export file names, epoch millis, man page text
// invariants:
// - export_file_name pattern is pr-review-<epoch-millis>.<ext>
// - effective_millis honors an override so tests are deterministic
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use clap::CommandFactory;

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> String {
  let p = p.as_ref();
  let pb: PathBuf = match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  };
  pb.to_string_lossy().to_string()
}

/// Returns the effective "now" in epoch milliseconds given an optional override.
pub fn effective_millis(override_ms: Option<i64>) -> i64 {
  override_ms.unwrap_or_else(|| chrono::Utc::now().timestamp_millis())
}

/// `pr-review-<epoch-millis>.<ext>`
pub fn export_file_name(epoch_millis: i64, ext: &str) -> String {
  format!("pr-review-{}.{}", epoch_millis, ext)
}

/// `export_file_name` with a `-N` suffix for `n > 0`, used when the plain name is taken.
pub fn export_file_name_nth(epoch_millis: i64, ext: &str, n: u32) -> String {
  match n {
    0 => export_file_name(epoch_millis, ext),
    n => format!("pr-review-{}-{}.{}", epoch_millis, n, ext),
  }
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
