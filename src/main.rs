mod ai;
mod catalog;
mod config;
mod globe;
mod orbit;
mod session;
#[cfg(test)]
mod test_support;
mod web;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::ai::{CredentialStore, GeminiClient};
use crate::catalog::{is_searchable, CatalogClient};
use crate::config::Config;
use crate::orbit::Propagator;

#[derive(Parser)]
#[command(name = "sat-globe")]
#[command(about = "Real-time satellite tracking on a rotating globe")]
struct Cli {
    /// Configuration file (YAML). Built-in defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve,
    /// Search the TLE catalog by name
    Search { term: String },
    /// Print the TLE of a satellite
    Tle { id: u32 },
    /// Print orbital parameters and the ground track of a satellite
    Orbit {
        /// Catalog id to fetch the TLE for
        #[arg(required_unless_present = "file")]
        id: Option<u32>,
        /// Read the TLE from a file (optional name line plus two element lines)
        #[arg(long, conflicts_with = "id")]
        file: Option<PathBuf>,
    },
    /// Ask the AI service to describe a satellite
    Describe { name: String },
    /// Validate a configuration file
    Validate { file: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => validate(&file),
        command => match Config::load(cli.config.as_deref()) {
            Ok(config) => run(command, config).await,
            Err(e) => {
                eprintln!("Config error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(command: Commands, config: Config) -> ExitCode {
    match command {
        Commands::Serve => serve(config).await,
        Commands::Search { term } => search(&config, &term).await,
        Commands::Tle { id } => tle(&config, id).await,
        Commands::Orbit { id, file } => orbit(&config, id, file.as_deref()).await,
        Commands::Describe { name } => describe(&config, &name).await,
        Commands::Validate { file } => validate(&file),
    }
}

fn validate(path: &Path) -> ExitCode {
    match Config::from_file(path) {
        Ok(config) => {
            println!("Configuration is valid");
            println!("  bind:        {}", config.web.bind);
            println!("  catalog:     {}", config.catalog.base_url);
            println!("  recommended: {} satellites", config.catalog.recommended.len());
            println!("  ai model:    {}", config.ai.model);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: Config) -> ExitCode {
    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn catalog_client(config: &Config) -> Option<CatalogClient> {
    match CatalogClient::new(&config.catalog) {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Cannot create catalog client: {}", e);
            None
        }
    }
}

async fn search(config: &Config, term: &str) -> ExitCode {
    if !is_searchable(term, config.catalog.min_query_len) {
        eprintln!(
            "Enter at least {} characters to search.",
            config.catalog.min_query_len
        );
        return ExitCode::FAILURE;
    }
    let Some(client) = catalog_client(config) else {
        return ExitCode::FAILURE;
    };

    match client.search(term).await {
        Ok(satellites) if satellites.is_empty() => {
            println!("No satellites found.");
            ExitCode::SUCCESS
        }
        Ok(satellites) => {
            for sat in satellites {
                println!("{:>6}  {}", sat.satellite_id, sat.name);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Search failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn tle(config: &Config, id: u32) -> ExitCode {
    let Some(client) = catalog_client(config) else {
        return ExitCode::FAILURE;
    };

    match client.fetch_tle(id).await {
        Ok(tle) => {
            println!("{}", tle.name);
            println!("{}", tle.line1);
            println!("{}", tle.line2);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("TLE fetch failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn orbit(config: &Config, id: Option<u32>, file: Option<&Path>) -> ExitCode {
    let loaded = match (file, id) {
        (Some(path), _) => load_tle_file(path),
        (None, Some(id)) => fetch_propagator(config, id).await,
        (None, None) => Err("either a catalog id or --file is required".to_string()),
    };
    let (name, propagator) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let now = Utc::now();
    match propagator.orbital_data(now) {
        Ok(data) => {
            println!("{} at {}", name, now.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("  altitude:    {:.2} km", data.altitude_km);
            println!("  velocity:    {:.2} km/s", data.velocity_km_s);
            println!("  period:      {:.2} min", data.period_min);
            println!("  inclination: {:.2}°", data.inclination_deg);
        }
        Err(e) => {
            eprintln!("Propagation failed: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let globe = &config.globe;
    let track = propagator.ground_track(
        now,
        Duration::minutes(globe.track_past_min.into()),
        Duration::minutes(globe.track_future_min.into()),
        Duration::minutes(globe.track_step_min.into()),
    );
    println!("Ground track ({} points):", track.len());
    for point in track {
        println!("  {:>8.3} {:>8.3}", point.lon_deg, point.lat_deg);
    }
    ExitCode::SUCCESS
}

fn load_tle_file(path: &Path) -> Result<(String, Propagator), String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;
    let propagator =
        Propagator::from_text(&text).map_err(|e| format!("Invalid TLE in {}: {}", path.display(), e))?;
    let name = propagator
        .elements()
        .object_name
        .clone()
        .unwrap_or_else(|| path.display().to_string());
    Ok((name, propagator))
}

async fn fetch_propagator(config: &Config, id: u32) -> Result<(String, Propagator), String> {
    let client = CatalogClient::new(&config.catalog)
        .map_err(|e| format!("Cannot create catalog client: {}", e))?;
    let tle = client
        .fetch_tle(id)
        .await
        .map_err(|e| format!("TLE fetch failed: {}", e))?;
    let propagator =
        Propagator::from_tle(&tle).map_err(|e| format!("Invalid TLE for {}: {}", tle.name, e))?;
    Ok((tle.name, propagator))
}

async fn describe(config: &Config, name: &str) -> ExitCode {
    let key = CredentialStore::new(config.ai.credential_file.clone()).initial_key(&config.ai.env_var);
    let client = match GeminiClient::new(&config.ai, &key) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Cannot use the Gemini API key: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match client.describe(name).await {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Description failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
