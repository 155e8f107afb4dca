// ===== cellforge/src/main.rs =====
use cellforge::config::CellConfig;
use cellforge::error::CfResult;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Reorganizes small-group cells with minimal overlap", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with search/roster settings; explicit flags still win.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Shuffle(cmd::shuffle::ShuffleArgs),
    Score(cmd::score::ScoreArgs),
}

fn main() {
    // 1. Parse raw matches so file config can be merged under explicit flags
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let outcome = match &cli.command {
        Commands::Shuffle(args) => {
            resolve_config(&cli, &args.config, matches.subcommand_matches("shuffle"))
                .and_then(|config| cmd::shuffle::run(args, &config))
        }
        Commands::Score(args) => cmd::score::run(args),
    };

    if let Err(e) = outcome {
        error!("❌ {}", e);
        process::exit(1);
    }
}

fn resolve_config(
    cli: &Cli,
    flags: &CellConfig,
    sub_matches: Option<&ArgMatches>,
) -> CfResult<CellConfig> {
    let Some(path) = &cli.config else {
        return Ok(flags.clone());
    };

    info!("⚙️  Loading config from: {}", path);
    let mut config = CellConfig::load_from_file(path)?;
    if let Some(sub) = sub_matches {
        config.merge_from_cli(flags, sub);
    }
    Ok(config)
}
