//! Survival analysis from raw observations
//!
//! Reads a JSON array of `[time, is_censored]` pairs, bins it by time and
//! reports the same estimators as the `survival` command.

use std::path::PathBuf;

use bucketstats::{SurvivalPair, summary::SurvivalTable};
use clap::Args;

use crate::{command::OutputArg, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct LifetableArg {
    /// Path to the observations JSON file
    pub observations: PathBuf,

    #[clap(flatten)]
    pub output: OutputArg,
}

pub(crate) fn run(arg: &LifetableArg) -> anyhow::Result<()> {
    let observations = util::read_observations_file(&arg.observations)?;
    let censored = observations.iter().filter(|(_, c)| *c).count();
    eprintln!(
        "Loaded {} observations ({censored} censored)",
        observations.len()
    );

    let pair = SurvivalPair::from_observations(observations);
    eprintln!("Binned into {} distinct times", pair.total().len());

    super::survival::write_survival_table(&SurvivalTable::new(&pair), &arg.output)
}
