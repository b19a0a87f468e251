//! Text tables and CSV rendering for command results
//!
//! Every function writes to an arbitrary [`io::Write`], so the same code
//! serves stdout, output files and tests.

use std::io::{self, Write};

use bucketstats::summary::{DistributionSummary, MassTable, SurvivalTable};
use serde::Serialize;

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or("N/A".to_string(), |v| format!("{v:.3}"))
}

fn fmt_list(values: &[f64]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn write_summary<W>(w: &mut W, summary: &DistributionSummary) -> io::Result<()>
where
    W: Write,
{
    writeln!(w, "Distribution Summary")?;
    writeln!(w, "====================")?;
    writeln!(w, "  {:<14} {:>12}", "Bins", summary.bins)?;
    writeln!(w, "  {:<14} {:>12}", "Support", summary.support_size)?;
    writeln!(w, "  {:<14} {:>12.3}", "Total", summary.total)?;
    writeln!(w, "  {:<14} {:>12.6}", "Mean", summary.mean)?;
    writeln!(w, "  {:<14} {:>12.1}", "Median(rank)", summary.median)?;
    writeln!(w, "  {:<14} {:>12.6}", "Median(key)", summary.median_key)?;
    writeln!(w, "  {:<14} {:>12}", "Modes", fmt_list(&summary.modes))?;
    writeln!(w, "  {:<14} {:>12.6}", "Variance", summary.variance)?;
    writeln!(w, "  {:<14} {:>12.6}", "Std Dev", summary.std_dev)?;
    writeln!(w, "  {:<14} {:>12.6}", "Entropy(bits)", summary.entropy)?;
    Ok(())
}

pub fn write_mass_table<W>(w: &mut W, table: &MassTable) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        w,
        "  {:>12} {:>12} {:>10} {:>10} {:>10}",
        "Key", "Weight", "PMF", "CMF", "RCMF"
    )?;
    // key(12) + weight(12) + pmf(10) + cmf(10) + rcmf(10) + spaces(4)
    writeln!(w, "  {}", "-".repeat(58))?;
    for row in &table.rows {
        writeln!(
            w,
            "  {:>12} {:>12} {:>10.6} {:>10.6} {:>10.6}",
            row.key, row.weight, row.pmf, row.cmf, row.rcmf
        )?;
    }
    Ok(())
}

pub fn write_mass_csv<W>(w: &mut W, table: &MassTable) -> io::Result<()>
where
    W: Write,
{
    write_csv_rows(w, &table.rows)
}

pub fn write_survival_table<W>(w: &mut W, table: &SurvivalTable) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        w,
        "  {:>10} {:>8} {:>8} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Key", "Total", "Events", "AtRisk", "Survival", "KM", "Var(KM)", "NA", "Var(NA)",
    )?;
    // key(10) + counts(8 * 3) + estimators(10 * 5) + spaces(8)
    writeln!(w, "  {}", "-".repeat(92))?;
    for row in &table.rows {
        writeln!(
            w,
            "  {:>10} {:>8} {:>8} {:>8} {:>10.6} {:>10.6} {:>10.6} {:>10.6} {:>10.6}",
            row.key,
            row.total,
            row.observed,
            row.at_risk,
            row.survival,
            row.kaplan_meier,
            row.var_kaplan_meier,
            row.nelson_aalen,
            row.var_nelson_aalen,
        )?;
    }
    writeln!(w)?;
    writeln!(w, "  Median survival (KM): {}", fmt_opt(table.median_survival))?;
    Ok(())
}

pub fn write_survival_csv<W>(w: &mut W, table: &SurvivalTable) -> io::Result<()>
where
    W: Write,
{
    write_csv_rows(w, &table.rows)
}

/// One CSV record per row, with a header taken from the row's field names.
fn write_csv_rows<W, R>(w: &mut W, rows: &[R]) -> io::Result<()>
where
    W: Write,
    R: Serialize,
{
    let mut writer = csv::Writer::from_writer(w);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()
}
