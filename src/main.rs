use anyhow::Result;
use clap::Parser;

use pr_review_dashboard::cli::{normalize, Cli};
use pr_review_dashboard::{app, util};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  app::init_tracing(cli.verbose);

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: run the action
  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  app::run(&cfg, &mut out)
}
