use crate::cmd::read_text;
use crate::reports::{self, OutputFormat};
use cellforge::api::{reorganize_cells_with, CellRequest};
use cellforge::config::CellConfig;
use cellforge::error::CfResult;
use cellforge::optimizer::runner::Progress;
use clap::Args;
use fastrand::Rng;
use std::io;
use tracing::{debug, info};

#[derive(Args, Debug, Clone)]
pub struct ShuffleArgs {
    #[command(flatten)]
    pub config: CellConfig,

    /// Target total member count; missing members are filled with placeholders.
    #[arg(short = 't', long)]
    pub total: String,

    #[arg(short = 'c', long)]
    pub cells: String,

    /// File with the previous cells, one per line ("-" for stdin).
    #[arg(short = 'p', long)]
    pub previous: Option<String>,

    /// Newly joining members, whitespace separated.
    #[arg(short = 'n', long, default_value = "")]
    pub new: String,

    #[arg(long)]
    pub new_file: Option<String>,

    /// Leader of the next cell, in cell order. Repeat per cell.
    #[arg(short = 'l', long = "leader")]
    pub leaders: Vec<String>,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    #[arg(short = 'f', long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub fn run(args: &ShuffleArgs, config: &CellConfig) -> CfResult<()> {
    let previous = match &args.previous {
        Some(path) => read_text(path)?,
        None => String::new(),
    };

    let mut new_members = args.new.clone();
    if let Some(path) = &args.new_file {
        new_members.push('\n');
        new_members.push_str(&read_text(path)?);
    }

    let request = CellRequest::from_form(
        &args.total,
        &args.cells,
        &previous,
        &new_members,
        &args.leaders,
    )?;

    let mut rng = match args.seed {
        Some(s) => Rng::with_seed(s),
        None => Rng::new(),
    };

    info!(
        "🔀 Shuffling into {} cells ({} trials)",
        args.cells, config.search.trials
    );
    let hook = |p: Progress| {
        debug!(
            "Worker {} | Trial {:5} | Best overlap: {}",
            p.worker, p.trial, p.best_overlap
        );
    };
    let report = reorganize_cells_with(&request, config, &mut rng, &hook)?;

    match args.format {
        OutputFormat::Table => {
            reports::print_cells(&report);
            reports::print_summary(&report);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Csv => reports::write_csv(&report, io::stdout().lock())?,
    }
    Ok(())
}
