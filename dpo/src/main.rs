use std::fs;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use dpo::config::DpoConfig;
use dpo::io::cli::Cli;
use dpo::pipeline::DemandSource;
use dpo::simulator::Simulator;
use dpo::{io, pipeline};
use log::{info, warn};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config: DpoConfig = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            DpoConfig::default()
        }
        Some(config_file) => io::read_json(&config_file).context("incorrect config file format")?,
    };

    info!("[MAIN] Successfully parsed DpoConfig: {config:?}");

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!("could not create solution folder: {:?}", args.solution_folder)
        })?;
    }

    let simulator = || Simulator::new(config.simulator.clone());

    let demand = match (&args.forecast_file, &args.demand_file) {
        (Some(forecast_file), demand_file) => {
            if demand_file.is_some() {
                warn!("[MAIN] Both a forecast and a demand file provided, the demand file is ignored");
            }
            DemandSource::Forecast(io::read_json(forecast_file)?)
        }
        (None, Some(demand_file)) => DemandSource::History(io::read_json(demand_file)?),
        (None, None) => {
            warn!("[MAIN] No demand file provided, simulating demand history");
            DemandSource::History(simulator()?.demand_rows()?)
        }
    };
    let supply = match &args.supply_file {
        Some(supply_file) => io::read_json(supply_file)?,
        None => {
            warn!("[MAIN] No supply file provided, simulating supply table");
            simulator()?.supply_rows()
        }
    };

    let output = pipeline::run(&config, &demand, &supply)?;
    pipeline::write_output(&output, &args.solution_folder)?;

    output.into_result()
}
