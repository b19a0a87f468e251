use std::path::PathBuf;

use anyhow::Context as _;
use bucketstats::{SurvivalPair, summary::SurvivalTable};
use clap::Args;

use crate::{
    command::{OutputArg, OutputFormat},
    report,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct SurvivalArg {
    /// Path to the histogram of total counts per bin
    pub histogram: PathBuf,

    /// Path to the histogram of observed events per bin
    /// Defaults to the totals (no censoring)
    #[arg(long)]
    pub observed: Option<PathBuf>,

    #[clap(flatten)]
    pub output: OutputArg,
}

pub(crate) fn run(arg: &SurvivalArg) -> anyhow::Result<()> {
    let total = util::read_histogram_file(&arg.histogram)?;
    let observed = arg
        .observed
        .as_ref()
        .map(util::read_histogram_file)
        .transpose()?;
    let pair = SurvivalPair::new(total, observed).with_context(|| {
        format!(
            "Observed events do not match the totals in {}",
            arg.histogram.display()
        )
    })?;

    write_survival_table(&SurvivalTable::new(&pair), &arg.output)
}

pub(super) fn write_survival_table(table: &SurvivalTable, arg: &OutputArg) -> anyhow::Result<()> {
    let output = Output::create(arg.output.as_deref())?;
    match arg.format {
        OutputFormat::Json => output.emit_json(table),
        OutputFormat::Table => output.emit(|w| report::write_survival_table(w, table)),
        OutputFormat::Csv => output.emit(|w| report::write_survival_csv(w, table)),
    }
}
