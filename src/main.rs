use anyhow::Context;
use clap::Parser;
use energiekompas::input::ingest_for_processing;
use energiekompas::output::FileOutput;
use energiekompas::report;
use energiekompas::scenario::Scenario;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct EnergiekompasArgs {
    /// JSON calculation request.
    input_file: String,
    /// Only write the JSON results, skip the text report and cost CSV.
    #[arg(long, default_value_t = false)]
    json_only: bool,
    #[arg(long, short, default_value_t = false)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = EnergiekompasArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default tracing subscriber failed")?;

    let input_file = args.input_file.as_str();
    let input_file_ext = Path::new(input_file).extension().and_then(OsStr::to_str);
    let input_file_stem = match input_file_ext {
        Some(ext) => &input_file[..(input_file.len() - ext.len() - 1)],
        None => input_file,
    };

    let calculation_input = ingest_for_processing(BufReader::new(
        File::open(Path::new(input_file))
            .with_context(|| format!("could not open input file {input_file}"))?,
    ))?;
    let scenario = Scenario::from_input(&calculation_input);
    let results = scenario.run();

    let output = FileOutput::new(
        Path::new(input_file_stem)
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf(),
        format!(
            "{}_{{}}",
            Path::new(input_file_stem)
                .file_name()
                .and_then(OsStr::to_str)
                .unwrap_or("energiekompas")
        ),
    );
    report::write_json(&output, &results)?;
    if !args.json_only {
        report::write_text_report(&output, &scenario, &results)?;
        report::write_cost_csv(&output, &results)?;
    }

    info!(
        "heat demand: {:.0} kWh/year (Htot {:.1} W/K)",
        results.heat_demand.demand_kwh, results.heat_demand.total_coefficient
    );
    info!(
        "annual cost: {:.0} EUR ({:.0}-{:.0})",
        results.costs.total_cost, results.costs.total_cost_low, results.costs.total_cost_high
    );
    info!(
        "indicative DPE: {} ({:.0} kWh/m²/year)",
        results.dpe.class, results.dpe.intensity_kwh_per_m2
    );

    Ok(())
}
