use crate::cmd::read_text;
use crate::reports;
use cellforge::api::score_partition;
use cellforge::error::CfResult;
use cellforge::optimizer::overlap::OverlapMetric;
use clap::Args;
use strum::IntoEnumIterator;

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Previous cells, one per line ("-" for stdin).
    #[arg(short = 'p', long)]
    pub previous: String,

    /// Cells to audit against the previous ones.
    #[arg(short = 'r', long)]
    pub current: String,

    /// Only report this metric (default: all).
    #[arg(short = 'm', long)]
    pub metric: Option<OverlapMetric>,
}

pub fn run(args: &ScoreArgs) -> CfResult<()> {
    let previous = read_text(&args.previous)?;
    let current = read_text(&args.current)?;

    let metrics: Vec<OverlapMetric> = match args.metric {
        Some(m) => vec![m],
        None => OverlapMetric::iter().collect(),
    };

    let rows: Vec<(OverlapMetric, usize, usize)> = metrics
        .into_iter()
        .map(|m| {
            (
                m,
                score_partition(&previous, &current, m),
                score_partition(&previous, &previous, m),
            )
        })
        .collect();

    reports::print_score_report(&rows);
    Ok(())
}
