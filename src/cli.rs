use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::client::DEFAULT_BASE_URL;
use crate::export::ExportFormat;
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "pr-review",
    version,
    about = "Submit a GitHub pull request (or raw diff) to the PR review service and export the result",
    long_about = None
)]
pub struct Cli {
  /// Base URL of the review service
  #[arg(long, env = "PR_REVIEW_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
  pub base_url: String,

  /// Request timeout in seconds (default: no timeout beyond the transport's)
  #[arg(long, env = "PR_REVIEW_TIMEOUT_SECS", global = true)]
  pub timeout_secs: Option<u64>,

  /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  #[command(subcommand)]
  pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Review a pull request or diff and print the findings
  Review(ReviewArgs),
  /// Export a previously saved review response
  Export(ExportArgs),
  /// Check that the review service is up
  Health,
  /// Show the service name, version and active agents
  Info,
}

#[derive(Args, Debug, Default)]
pub struct ReviewArgs {
  /// GitHub pull request URL, e.g. https://github.com/owner/repo/pull/123
  #[arg(long)]
  pub url: Option<String>,

  /// Path to a unified diff ("-" reads stdin)
  #[arg(long)]
  pub diff: Option<PathBuf>,

  /// Free-form PR metadata as a JSON object (sent with --diff)
  #[arg(long)]
  pub metadata: Option<String>,

  /// Submit as a background job and poll its status instead of waiting on one request
  #[arg(long)]
  pub wait_async: bool,

  /// Poll interval for --wait-async, in seconds
  #[arg(long, default_value_t = 2)]
  pub poll_secs: u64,

  /// Write the raw service response to this file
  #[arg(long)]
  pub save: Option<PathBuf>,

  /// Print the view model as JSON instead of text
  #[arg(long)]
  pub json: bool,

  #[command(flatten)]
  pub export: ExportOpts,
}

#[derive(Args, Debug, Default)]
pub struct ExportArgs {
  /// Saved raw review response (JSON)
  #[arg(long)]
  pub input: PathBuf,

  #[command(flatten)]
  pub export: ExportOpts,
}

#[derive(Args, Debug, Default)]
pub struct ExportOpts {
  /// Export the result as a file
  #[arg(long = "export", value_enum)]
  pub format: Option<ExportFormat>,

  /// Replace the assessment with the service's LLM-formatted report (JSON export only)
  #[arg(long)]
  pub formatted: bool,

  /// Directory for exported files
  #[arg(long, default_value = ".")]
  pub out_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewSource {
  GithubUrl { url: String },
  DiffFile { path: String },
  DiffStdin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
  pub format: ExportFormat,
  pub formatted: bool,
  pub out_dir: String, // absolute path for stability
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
  Review {
    source: ReviewSource,
    metadata: Option<serde_json::Value>,
    wait_async: bool,
    poll_secs: u64,
    save: Option<String>,
    json: bool,
    export: Option<ExportConfig>,
  },
  Export {
    input: String,
    export: ExportConfig,
  },
  Health,
  Info,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub base_url: String,
  pub timeout_secs: Option<u64>,
  pub verbose: u8,
  pub action: Action,
}

static RE_PR_URL: Lazy<regex::Regex> =
  Lazy::new(|| regex::Regex::new(r"^https?://(?:www\.)?github\.com/[^/\s]+/[^/\s]+/pull/\d+/?(?:[?#].*)?$").unwrap());

pub fn is_github_pr_url(url: &str) -> bool {
  RE_PR_URL.is_match(url.trim())
}

fn normalize_export(opts: ExportOpts) -> Result<Option<ExportConfig>> {
  let Some(format) = opts.format else {
    if opts.formatted {
      bail!("--formatted requires --export json");
    }
    return Ok(None);
  };
  if opts.formatted && format != ExportFormat::Json {
    bail!("--formatted only applies to --export json");
  }
  Ok(Some(ExportConfig { format, formatted: opts.formatted, out_dir: util::canonicalize_lossy(&opts.out_dir) }))
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let base_url = cli.base_url.trim().trim_end_matches('/').to_string();
  if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
    bail!("--base-url must be an http(s) URL, got {:?}", cli.base_url);
  }

  let action = match cli.command {
    Some(Command::Review(args)) => {
      let source = match (&args.url, &args.diff) {
        (Some(url), None) => {
          if !is_github_pr_url(url) {
            bail!("Not a GitHub pull request URL: {url}");
          }
          ReviewSource::GithubUrl { url: url.trim().to_string() }
        }
        (None, Some(p)) if p.as_os_str() == "-" => ReviewSource::DiffStdin,
        (None, Some(p)) => ReviewSource::DiffFile { path: util::canonicalize_lossy(p) },
        (None, None) => bail!("Provide one of --url or --diff"),
        (Some(_), Some(_)) => bail!("Ambiguous input: choose only one of --url | --diff"),
      };

      let metadata = match &args.metadata {
        Some(text) => {
          let v: serde_json::Value = serde_json::from_str(text).context("--metadata is not valid JSON")?;
          if !v.is_object() {
            bail!("--metadata must be a JSON object");
          }
          Some(v)
        }
        None => None,
      };

      if args.wait_async && args.poll_secs == 0 {
        bail!("--poll-secs must be at least 1");
      }

      Action::Review {
        source,
        metadata,
        wait_async: args.wait_async,
        poll_secs: args.poll_secs,
        save: args.save.as_deref().map(util::canonicalize_lossy),
        json: args.json,
        export: normalize_export(args.export)?,
      }
    }
    Some(Command::Export(args)) => {
      let Some(export) = normalize_export(args.export)? else {
        bail!("export requires --export json|pdf");
      };
      Action::Export { input: util::canonicalize_lossy(&args.input), export }
    }
    Some(Command::Health) => Action::Health,
    Some(Command::Info) => Action::Info,
    None => bail!("No command given; see --help"),
  };

  Ok(EffectiveConfig { base_url, timeout_secs: cli.timeout_secs, verbose: cli.verbose, action })
}
