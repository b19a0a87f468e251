use std::path::PathBuf;

use bucketstats::{DiscreteDistribution, summary::DistributionSummary};
use clap::Args;

use crate::{
    command::{OutputArg, OutputFormat},
    report,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct DescribeArg {
    /// Path to the histogram JSON file
    pub histogram: PathBuf,

    #[clap(flatten)]
    pub output: OutputArg,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    if arg.output.format == OutputFormat::Csv {
        anyhow::bail!("CSV output is not supported by `describe`; use table or json");
    }

    let hist = util::read_histogram_file(&arg.histogram)?;
    let dist = DiscreteDistribution::new(hist);
    let Some(summary) = DistributionSummary::new(&dist) else {
        anyhow::bail!("Histogram has no bins: {}", arg.histogram.display());
    };
    if let Err(e) = dist.mode() {
        eprintln!("Note: {e}");
    }

    let output = Output::create(arg.output.output.as_deref())?;
    match arg.output.format {
        OutputFormat::Json => output.emit_json(&summary),
        OutputFormat::Table | OutputFormat::Csv => {
            output.emit(|w| report::write_summary(w, &summary))
        }
    }
}
