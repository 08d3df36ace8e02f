//! weatherdash command line interface

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, error};

use weatherdash::chart;
use weatherdash::config::DashboardConfig;
use weatherdash::export::{self, ExportFormat};
use weatherdash::logging;
use weatherdash::render::{DashboardView, LocationList, ProvinceList};
use weatherdash::timeline::{TimeRange, parse_bound};
use weatherdash::{BmkgClient, DashboardRequest, ForecastService, Result};

#[derive(Parser)]
#[command(name = "weatherdash", version)]
#[command(about = "BMKG weather forecast dashboard", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "WEATHERDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Selection {
    /// ADM1 code (e.g. 32) or province name (e.g. "jawa barat")
    #[arg(short, long)]
    region: Option<String>,

    /// Regency/city label or ADM2 code; defaults to the first one
    #[arg(short, long)]
    location: Option<String>,

    /// Start of the local time range, e.g. "2025-01-01 06:00"
    #[arg(long)]
    from: Option<String>,

    /// End of the local time range (inclusive)
    #[arg(long)]
    to: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List provinces and their ADM1 codes
    Provinces,

    /// List the locations of one province
    Locations {
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Show the dashboard for one location
    Show {
        #[command(flatten)]
        selection: Selection,

        /// Print every selected record
        #[arg(long)]
        table: bool,

        /// Leave out the map section
        #[arg(long)]
        no_map: bool,

        /// Write Plotly chart JSON into this directory
        #[arg(long)]
        charts: Option<PathBuf>,
    },

    /// Export the selected records
    Export {
        #[command(flatten)]
        selection: Selection,

        /// csv or json
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Output file or directory; `-` writes to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Selection {
    fn into_request(self, default_region: &str) -> Result<DashboardRequest> {
        let start = self.from.as_deref().map(parse_bound).transpose()?;
        let end = self.to.as_deref().map(parse_bound).transpose()?;
        Ok(DashboardRequest {
            region: self.region.unwrap_or_else(|| default_region.to_string()),
            location: self.location,
            range: TimeRange::new(start, end)?,
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match DashboardConfig::load_from_path(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.logging, cli.verbose) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    debug!("Configuration loaded: {:?}", config);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &DashboardConfig) -> Result<()> {
    let client = BmkgClient::new(&config.api)?;
    let mut service = ForecastService::new(client, &config.cache);
    let default_region = config.defaults.region.as_str();

    match command {
        Commands::Provinces => {
            let provinces = service.provinces().await?;
            print!("{}", ProvinceList(&provinces));
        }
        Commands::Locations { region } => {
            let adm1 = service
                .resolve_region(region.as_deref().unwrap_or(default_region))
                .await?;
            let response = service.forecast(&adm1).await?;
            if let Some(province) = response.province_name() {
                println!("{province} (ADM1 {adm1})");
            }
            print!("{}", LocationList(&response.locations()));
        }
        Commands::Show {
            selection,
            table,
            no_map,
            charts,
        } => {
            let request = selection.into_request(default_region)?;
            let Some(dashboard) = service.dashboard(&request).await? else {
                println!("No forecast data available for this province.");
                return Ok(());
            };

            print!(
                "{}",
                DashboardView {
                    dashboard: &dashboard,
                    show_table: table,
                    show_map: !no_map,
                }
            );

            if let Some(dir) = charts {
                let written = chart::write_figures(&dir, &dashboard.trends, &dashboard.windrose)?;
                println!("\nWrote {} chart file(s) to {}", written.len(), dir.display());
            }
        }
        Commands::Export {
            selection,
            format,
            output,
        } => {
            let request = selection.into_request(default_region)?;
            let (file_name, records) = match service.dashboard(&request).await? {
                Some(dashboard) => (
                    export::default_file_name(&dashboard.adm1, &dashboard.location_label, format),
                    dashboard.selected,
                ),
                None => {
                    // Province without locations: header-only CSV or `[]`.
                    let adm1 = service.resolve_region(&request.region).await?;
                    eprintln!("No forecast data available for this province.");
                    (export::default_file_name(&adm1, "empty", format), Vec::new())
                }
            };

            let path = match output {
                Some(path) if path.as_os_str() == "-" => {
                    print!("{}", format.render(&records)?);
                    return Ok(());
                }
                Some(path) if path.is_dir() => path.join(file_name),
                Some(path) => path,
                None => PathBuf::from(file_name),
            };

            export::write_file(&path, format, &records)?;
            println!(
                "Wrote {} record(s) as {} to {}",
                records.len(),
                format,
                path.display()
            );
        }
    }
    Ok(())
}
