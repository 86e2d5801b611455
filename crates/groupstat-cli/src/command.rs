use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::Parser;
use groupstat_data::loader;

use crate::{
    prompt::{Prompter as _, TerminalPrompter},
    report,
    session::{Session, Settings},
    util,
};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Spreadsheet to analyze; a file dialog opens when omitted
    file: Option<PathBuf>,
    /// Worksheet to read instead of the first one
    #[arg(long)]
    sheet: Option<String>,
    /// Significance level for the ANOVA gate and post-hoc tests
    #[arg(long, default_value_t = 0.05, value_parser = util::parse_alpha)]
    alpha: f64,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    util::init_logging(args.verbose);

    let mut out = io::stdout().lock();
    let Some(path) = args.file.or_else(util::pick_spreadsheet) else {
        report::write_no_file_selected(&mut out)?;
        return Ok(());
    };

    let dataset = loader::load_workbook(&path, args.sheet.as_deref())
        .with_context(|| format!("Failed to load {}", path.display()))?;
    anyhow::ensure!(
        dataset.column_count() > 0,
        "{} has no columns",
        path.display()
    );

    report::write_load_summary(&mut out, &util::file_name(&path), &dataset)?;

    let mut prompter = TerminalPrompter::new();
    let settings = Settings { alpha: args.alpha };
    let outcome = Session::new(&dataset, &mut prompter, &mut out, settings).run()?;
    tracing::info!(%outcome, "session finished");

    out.flush().context("Failed to flush stdout")?;
    prompter.pause("Press Enter to exit...")?;
    Ok(())
}
