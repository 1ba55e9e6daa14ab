use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Demand history (JSON array of {city, day, demand}), simulated when absent
    #[arg(short, long, value_name = "FILE")]
    pub demand_file: Option<PathBuf>,
    /// Persisted forecast (JSON array of {city, day, demand_p10, demand_p50, demand_p90}).
    /// Skips forecasting, the demand file is then ignored
    #[arg(short, long, value_name = "FILE")]
    pub forecast_file: Option<PathBuf>,
    /// Supply table (JSON array of warehouse-city lanes), simulated when absent
    #[arg(short = 'u', long, value_name = "FILE")]
    pub supply_file: Option<PathBuf>,
    #[arg(short, long, value_name = "FOLDER")]
    pub solution_folder: PathBuf,
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    pub log_level: LevelFilter,
}
