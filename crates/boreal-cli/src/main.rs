//! Boreal command-line interface.
//!
//! Generate primary-electron samples from TOML job files:
//! ```sh
//! boreal generate job.toml -n 10000 --seed 1
//! boreal validate job.toml
//! boreal field --alt-min 0 --alt-max 1000
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "boreal")]
#[command(about = "Boreal: precipitation source terms for electron transport runs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate primary samples from a TOML job configuration.
    Generate {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Number of events to generate.
        #[arg(short, long, default_value_t = 1000)]
        n_events: usize,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// RNG seed for reproducible batches (default: from entropy).
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate a configuration file without generating samples.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Tabulate the dipole field strength against altitude.
    Field {
        /// Lowest altitude (km).
        #[arg(long, default_value_t = 0.0)]
        alt_min: f64,
        /// Highest altitude (km).
        #[arg(long, default_value_t = 1000.0)]
        alt_max: f64,
        /// Number of table rows.
        #[arg(long, default_value_t = 21)]
        points: usize,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            n_events,
            output,
            seed,
        } => {
            println!("Boreal Source Generator");
            println!("=======================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let samples = runner::run_generation(&job, n_events, seed)?;
            println!("Generated {} samples.", samples.len());

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_csv {
                let csv_path = out_dir.join("samples.csv");
                runner::write_samples_csv(&samples, &csv_path, &job)?;
            }

            if job.output.save_json {
                let json_path = out_dir.join("samples.json");
                runner::write_samples_json(&samples, &json_path)?;
            }

            println!("Generation complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            // Resolving the source also checks mode flags and replay files.
            let _source = runner::build_source(&job)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Field {
            alt_min,
            alt_max,
            points,
        } => {
            runner::print_field_profile(alt_min, alt_max, points);
            Ok(())
        }
    }
}
