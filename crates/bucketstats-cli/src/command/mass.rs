use std::path::PathBuf;

use bucketstats::{DiscreteDistribution, summary::MassTable};
use clap::Args;

use crate::{
    command::{OutputArg, OutputFormat},
    report,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct MassArg {
    /// Path to the histogram JSON file
    pub histogram: PathBuf,

    #[clap(flatten)]
    pub output: OutputArg,
}

pub(crate) fn run(arg: &MassArg) -> anyhow::Result<()> {
    let hist = util::read_histogram_file(&arg.histogram)?;
    let dist = DiscreteDistribution::new(hist);
    if dist.sum() == 0.0 {
        eprintln!("Warning: total weight is zero; mass functions are undefined");
    }
    let table = MassTable::new(&dist);

    let output = Output::create(arg.output.output.as_deref())?;
    match arg.output.format {
        OutputFormat::Json => output.emit_json(&table),
        OutputFormat::Table => output.emit(|w| report::write_mass_table(w, &table)),
        OutputFormat::Csv => output.emit(|w| report::write_mass_csv(w, &table)),
    }
}
