use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use pmj_cov::color::ColorMap;
use pmj_cov::config::Roster;
use pmj_cov::data::{filter, loader};
use pmj_cov::figure;
use pmj_cov::stats::{aggregate, variability};

/// Generate the spinal level inter-rater variability figure and COV table.
///
/// Reads the per-subject, per-rater `*label-rootlet*_pmj_distance.csv` files
/// produced by the rootlets-to-spinal-levels step, then writes
/// `figure_inter_rater_variability.png` and
/// `table_inter_rater_variability.csv` into the input directory.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the data_processed folder with the per-subject CSV files.
    #[arg(short = 'i', long = "input", value_name = "DIR")]
    input: PathBuf,
}

fn run(args: &Args) -> Result<()> {
    let records = loader::load_directory(&args.input)?;
    let records = filter::cervical_only(records);
    log::info!("{} cervical-level records", records.len());

    let roster = Roster::default();
    let colors = ColorMap::from_roster(&roster);

    figure::render(
        &records,
        &roster,
        &colors,
        &args.input.join(figure::FIGURE_FILE),
    )?;

    let entries = aggregate::aggregate_midpoints(&records, &roster)?;
    let table = variability::reduce(&entries, &roster);
    variability::write_csv(&table, &args.input.join(variability::TABLE_FILE))?;

    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}
