use clap::{Args, Parser, Subcommand};

use self::{
    describe::DescribeArg, lifetable::LifetableArg, mass::MassArg, survival::SurvivalArg,
};

mod describe;
mod lifetable;
mod mass;
mod survival;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to compute
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Summarize the distribution described by a histogram
    Describe(#[clap(flatten)] DescribeArg),
    /// Print pmf, cmf and rcmf of a histogram bin by bin
    Mass(#[clap(flatten)] MassArg),
    /// Survival estimators for a histogram of totals and observed events
    Survival(#[clap(flatten)] SurvivalArg),
    /// Survival estimators for raw (time, is_censored) observations
    Lifetable(#[clap(flatten)] LifetableArg),
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct OutputArg {
    /// Output format: table, json or csv
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,

    /// Write results to this file instead of stdout
    #[arg(long)]
    pub output: Option<std::path::PathBuf>,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Describe(arg) => describe::run(&arg)?,
        Mode::Mass(arg) => mass::run(&arg)?,
        Mode::Survival(arg) => survival::run(&arg)?,
        Mode::Lifetable(arg) => lifetable::run(&arg)?,
    }
    Ok(())
}
