// ===== cellforge/src/api.rs =====
use crate::config::CellConfig;
use crate::error::{CellForgeError, CfResult};
use crate::optimizer::overlap::{partition_overlap, OverlapMetric};
use crate::optimizer::runner::{OptimizationOptions, Optimizer, ProgressHook};
use crate::roster::{parse_members, parse_partition, validate_leaders, Partition, Roster};
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The five inputs of the reorganization form.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CellRequest {
    pub total_members: i64,
    pub cell_count: i64,
    pub previous_cells_text: String,
    pub new_members_text: String,
    pub leaders: Vec<String>,
}

impl CellRequest {
    /// Builds a request from raw form fields. Counts that are not integers are
    /// rejected with the same error as non-positive ones.
    pub fn from_form<S: AsRef<str>>(
        total_members: &str,
        cell_count: &str,
        previous_cells_text: &str,
        new_members_text: &str,
        leaders: &[S],
    ) -> CfResult<Self> {
        let total_members = total_members
            .trim()
            .parse()
            .map_err(|_| CellForgeError::InvalidTotalMembers)?;
        let cell_count = cell_count
            .trim()
            .parse()
            .map_err(|_| CellForgeError::InvalidCellCount)?;

        Ok(Self {
            total_members,
            cell_count,
            previous_cells_text: previous_cells_text.to_string(),
            new_members_text: new_members_text.to_string(),
            leaders: leaders.iter().map(|l| l.as_ref().to_string()).collect(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellReport {
    pub cells: Partition,
    pub total_members: usize,
    pub min_overlap: usize,
    pub cell_count: usize,
    pub average_size: f64,
    pub leaders: Vec<String>,
    pub placeholders: usize,
    pub trials: usize,
}

/// Reorganizes cells with an unseeded RNG and no progress hook.
pub fn reorganize_cells(request: &CellRequest, config: &CellConfig) -> CfResult<CellReport> {
    reorganize_cells_with(request, config, &mut Rng::new(), &())
}

pub fn reorganize_cells_seeded(
    request: &CellRequest,
    config: &CellConfig,
    seed: u64,
) -> CfResult<CellReport> {
    reorganize_cells_with(request, config, &mut Rng::with_seed(seed), &())
}

/// Validates the request, builds the member universe and runs the trial
/// search. Nothing is computed unless every input check passes.
pub fn reorganize_cells_with<H: ProgressHook>(
    request: &CellRequest,
    config: &CellConfig,
    rng: &mut Rng,
    hook: &H,
) -> CfResult<CellReport> {
    config.validate()?;

    let total_target = positive(request.total_members).ok_or(CellForgeError::InvalidTotalMembers)?;
    let cell_count = positive(request.cell_count).ok_or(CellForgeError::InvalidCellCount)?;
    let leaders = validate_leaders(&request.leaders)?;

    let previous = parse_partition(&request.previous_cells_text);
    let new_members = parse_members(&request.new_members_text);
    let roster = Roster::build(
        &previous,
        &new_members,
        leaders,
        total_target,
        &config.roster.extra_prefix,
    );

    if roster.len() > total_target {
        warn!(
            "Roster lists {} unique members but {} were requested; using {}",
            roster.len(),
            total_target,
            roster.len()
        );
    }

    let optimizer = Optimizer::new(
        &roster,
        &previous,
        cell_count,
        OptimizationOptions::from(config),
    )?;
    let result = optimizer.run(rng, hook)?;

    let total_members = roster.len();
    let average_size = (total_members as f64 / cell_count as f64 * 10.0).round() / 10.0;

    info!(
        "Reorganized {} members into {} cells: overlap {} after {} trials",
        total_members, cell_count, result.overlap, result.trials
    );

    Ok(CellReport {
        cells: result.cells,
        total_members,
        min_overlap: result.overlap,
        cell_count,
        average_size,
        leaders: roster.leaders,
        placeholders: roster.extras,
        trials: result.trials,
    })
}

/// Overlap of an existing assignment against the previous one.
pub fn score_partition(previous_text: &str, current_text: &str, metric: OverlapMetric) -> usize {
    partition_overlap(
        &parse_partition(previous_text),
        &parse_partition(current_text),
        metric,
    )
}

fn positive(n: i64) -> Option<usize> {
    usize::try_from(n).ok().filter(|&n| n > 0)
}
