//! callboard - live-show control server
//!
//! Subcommands:
//! - `callboard serve` - plan the show and serve it over HTTP
//! - `callboard timeline` - print the planned timeline JSON and exit
//! - `callboard mock` - print a generated show
//! - `callboard validate <SHOW>` - validate a show file

use anyhow::{Context, Result};
use callboard::config::CallboardConfig;
use callboard::web::{self, WebState};
use clap::{Parser, Subcommand};
use showgraph::{generate, MockParams, Show};
use showplan::build_timeline;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "callboard")]
#[command(about = "Live-show control server and timeline planner")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Listen address (overrides config)
        #[arg(short, long)]
        addr: Option<String>,

        /// Config file path (default: ./callboard.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show file to serve (default: embedded demo show)
        #[arg(long)]
        show: Option<PathBuf>,

        /// Run a command once the listener is up, then exit with its status;
        /// `{port}` is substituted with the bound port
        #[arg(long)]
        run_and_exit: Option<String>,
    },

    /// Print the planned timeline JSON and exit
    Timeline {
        /// Show file to plan (default: embedded demo show)
        #[arg(long)]
        show: Option<PathBuf>,

        /// Single-line output instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Print a generated mock show
    Mock {
        #[arg(long, default_value_t = 4)]
        tracks: usize,

        #[arg(long, default_value_t = 6)]
        scenes: usize,

        #[arg(long, default_value_t = 4)]
        cues_per_scene: usize,

        #[arg(long, default_value_t = 2)]
        blocks_per_cue: usize,
    },

    /// Validate a show file
    Validate {
        /// Show file to check
        show: PathBuf,
    },
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level.to_string())),
        )
        .init();
}

fn load_show(path: Option<&Path>) -> Result<Show> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read show file {}", path.display()))?,
        None => callboard::DEMO_SHOW_JSON.to_string(),
    };
    serde_json::from_str(&raw).context("failed to parse show JSON")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            addr,
            config,
            show,
            run_and_exit,
        } => {
            let mut config = CallboardConfig::load_from(config.as_deref())?;
            if let Some(addr) = addr {
                config.bind.addr = addr;
            }
            if let Some(show) = show {
                config.show.path = Some(show);
            }
            init_tracing(&config.telemetry.log_level);

            // Precedence: show file, then configured mock, then the demo.
            let show = match (config.show.path.as_deref(), config.show.mock) {
                (Some(path), _) => load_show(Some(path))?,
                (None, Some(mock)) => generate(mock),
                (None, None) => load_show(None)?,
            };
            let timeline = build_timeline(&show).context("failed to plan show")?;
            tracing::info!(
                tracks = timeline.tracks.len(),
                rows = timeline.row_count(),
                blocks = timeline.blocks.len(),
                "show planned"
            );

            let state = WebState {
                show: Arc::new(show),
                timeline: Arc::new(timeline),
            };
            web::serve(&config.bind.addr, state, run_and_exit).await?;
        }

        Commands::Timeline { show, compact } => {
            init_tracing("warn");
            let show = load_show(show.as_deref())?;
            let timeline = build_timeline(&show).context("failed to plan show")?;
            let json = if compact {
                serde_json::to_string(&timeline)?
            } else {
                serde_json::to_string_pretty(&timeline)?
            };
            println!("{json}");
        }

        Commands::Mock {
            tracks,
            scenes,
            cues_per_scene,
            blocks_per_cue,
        } => {
            init_tracing("warn");
            let show = generate(MockParams {
                num_tracks: tracks,
                num_scenes: scenes,
                cues_per_scene,
                blocks_per_cue,
            });
            println!("{}", serde_json::to_string_pretty(&show)?);
        }

        Commands::Validate { show } => {
            init_tracing("warn");
            let show = load_show(Some(&show))?;
            show.validate()?;
            println!("ok");
        }
    }

    Ok(())
}
