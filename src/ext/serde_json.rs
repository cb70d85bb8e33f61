// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dotted-path lookups into serde_json::Value with typed extraction, used to pull messages out of error bodies
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper for typed extraction with defaults
// invariants: No panics; missing paths yield None; blank strings count as absent
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;

/// Wrapper around a JSON location to allow typed extraction via a clear second step.
pub struct JsonFetched<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> JsonFetched<'a> {
  /// Attempt to deserialize the fetched value as `T`.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| T::deserialize(v).ok())
  }

  /// A non-blank string at this location.
  pub fn text(&self) -> Option<String> {
    self.to::<String>().filter(|s| !s.trim().is_empty())
  }
}

/// Extension to fetch nested values via dotted paths like "review.overall_assessment".
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;

  /// First non-blank string among `paths`, in order.
  fn first_text(&self, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|p| self.fetch(p).text())
  }
}

impl JsonFetch for serde_json::Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    let inner = path
      .split('.')
      .filter(|key| !key.is_empty())
      .try_fold(self, |cur, key| cur.get(key));
    JsonFetched { inner }
  }
}
