use crate::config::CellConfig;
use crate::error::{CellForgeError, CfResult};
use crate::optimizer::overlap::{OverlapIndex, OverlapMetric};
use crate::optimizer::{BestCandidate, Improvement, Searcher};
use crate::roster::{Partition, Roster};
use fastrand::Rng;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

pub struct OptimizationOptions {
    pub trials: usize,
    pub yield_every: usize,
    pub threads: usize,
    pub metric: OverlapMetric,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self::from(&CellConfig::default())
    }
}

impl From<&CellConfig> for OptimizationOptions {
    fn from(cfg: &CellConfig) -> Self {
        Self {
            trials: cfg.search.trials,
            yield_every: cfg.search.yield_every,
            threads: cfg.search.threads.max(1),
            metric: cfg.search.metric,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub cells: Partition,
    pub overlap: usize,
    pub trials: usize,
    pub improvements: Vec<Improvement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub worker: usize,
    pub trial: usize,
    pub best_overlap: usize,
}

/// Receives periodic updates while trials run. This is where an event-loop
/// host can yield; threaded hosts can ignore it.
pub trait ProgressHook: Send + Sync {
    fn on_progress(&self, progress: Progress);
}

impl ProgressHook for () {
    fn on_progress(&self, _progress: Progress) {}
}

impl<F> ProgressHook for F
where
    F: Fn(Progress) + Send + Sync,
{
    fn on_progress(&self, progress: Progress) {
        self(progress)
    }
}

pub struct Optimizer<'a> {
    roster: &'a Roster,
    index: OverlapIndex,
    leader_ids: Vec<u32>,
    non_leader_ids: Vec<u32>,
    cell_count: usize,
    options: OptimizationOptions,
}

impl<'a> Optimizer<'a> {
    pub fn new(
        roster: &'a Roster,
        previous: &Partition,
        cell_count: usize,
        options: OptimizationOptions,
    ) -> CfResult<Self> {
        if cell_count == 0 {
            return Err(CellForgeError::InvalidCellCount);
        }
        if roster.leaders.len() > cell_count {
            return Err(CellForgeError::TooManyLeaders {
                leaders: roster.leaders.len(),
                cells: cell_count,
            });
        }

        let ids: HashMap<&str, u32> = roster
            .members
            .iter()
            .enumerate()
            .map(|(i, m)| (m.as_str(), i as u32))
            .collect();
        let lookup = |names: &[String]| -> Vec<u32> {
            names.iter().filter_map(|n| ids.get(n.as_str()).copied()).collect()
        };

        Ok(Self {
            roster,
            index: OverlapIndex::new(previous, &roster.members),
            leader_ids: lookup(&roster.leaders),
            non_leader_ids: lookup(&roster.non_leaders),
            cell_count,
            options,
        })
    }

    pub fn run<H: ProgressHook>(&self, rng: &mut Rng, hook: &H) -> CfResult<OptimizationResult> {
        let opts = &self.options;
        debug!(
            "Running {} trials over {} members into {} cells ({} thread(s), metric {})",
            opts.trials,
            self.roster.len(),
            self.cell_count,
            opts.threads,
            opts.metric
        );

        let outcome = if opts.threads <= 1 {
            self.run_worker(0, opts.trials, 0, rng, hook)
        } else {
            self.run_parallel(rng, hook)
        };

        let best = outcome.best.ok_or(CellForgeError::ComputationFailed)?;
        let cells = best
            .cells
            .iter()
            .map(|cell| {
                cell.iter()
                    .map(|&id| self.roster.members[id as usize].clone())
                    .collect()
            })
            .collect();

        Ok(OptimizationResult {
            cells,
            overlap: best.overlap,
            trials: outcome.trials,
            improvements: outcome.improvements,
        })
    }

    /// Splits the budget into contiguous trial ranges, one per worker, each
    /// with its own RNG stream derived from a single draw of the caller's RNG.
    fn run_parallel<H: ProgressHook>(&self, rng: &mut Rng, hook: &H) -> WorkerOutcome {
        let opts = &self.options;
        let base_seed = rng.u64(..);
        let share = opts.trials / opts.threads;
        let extra = opts.trials % opts.threads;

        let plan: Vec<(usize, usize)> = (0..opts.threads)
            .scan(0, |offset, w| {
                let count = share + usize::from(w < extra);
                let start = *offset;
                *offset += count;
                Some((start, count))
            })
            .collect();

        let outcomes: Vec<WorkerOutcome> = plan
            .par_iter()
            .enumerate()
            .map(|(w, &(offset, count))| {
                let mut worker_rng = Rng::with_seed(base_seed.wrapping_add(w as u64));
                self.run_worker(w, count, offset, &mut worker_rng, hook)
            })
            .collect();

        merge_outcomes(outcomes)
    }

    fn run_worker<H: ProgressHook>(
        &self,
        worker: usize,
        trials: usize,
        offset: usize,
        rng: &mut Rng,
        hook: &H,
    ) -> WorkerOutcome {
        let mut searcher = Searcher::new(
            &self.index,
            &self.leader_ids,
            &self.non_leader_ids,
            self.cell_count,
            self.options.metric,
        );

        let yield_every = self.options.yield_every;
        for done in 1..=trials {
            searcher.trial(rng);
            if yield_every > 0 && done % yield_every == 0 {
                if let Some(best_overlap) = searcher.best_overlap() {
                    hook.on_progress(Progress {
                        worker,
                        trial: done,
                        best_overlap,
                    });
                }
            }
        }

        debug!(
            "Worker {} finished {} trials, best overlap {:?}, {} improvement(s)",
            worker,
            searcher.trials_run,
            searcher.best_overlap(),
            searcher.improvements.len()
        );

        WorkerOutcome {
            best: searcher.best,
            trials: searcher.trials_run,
            improvements: searcher
                .improvements
                .into_iter()
                .map(|imp| Improvement {
                    trial: imp.trial + offset,
                    overlap: imp.overlap,
                })
                .collect(),
        }
    }
}

struct WorkerOutcome {
    best: Option<BestCandidate>,
    trials: usize,
    improvements: Vec<Improvement>,
}

/// Lowest overlap wins, ties go to the lowest worker index. The improvement
/// log is re-filtered so it stays strictly decreasing in global trial order.
fn merge_outcomes(outcomes: Vec<WorkerOutcome>) -> WorkerOutcome {
    let mut best: Option<BestCandidate> = None;
    let mut trials = 0;
    let mut all = Vec::new();

    for outcome in outcomes {
        trials += outcome.trials;
        all.extend(outcome.improvements);
        if let Some(candidate) = outcome.best {
            if best.as_ref().map_or(true, |b| candidate.overlap < b.overlap) {
                best = Some(candidate);
            }
        }
    }

    all.sort_by_key(|imp| imp.trial);
    let mut improvements: Vec<Improvement> = Vec::with_capacity(all.len());
    for imp in all {
        if improvements.last().map_or(true, |last| imp.overlap < last.overlap) {
            improvements.push(imp);
        }
    }

    WorkerOutcome {
        best,
        trials,
        improvements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{parse_partition, validate_leaders};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn roster(prev: &Partition, leaders: &[&str], total: usize) -> Roster {
        let leaders = validate_leaders(leaders).unwrap();
        Roster::build(prev, &[], leaders, total, "Extra")
    }

    #[test]
    fn hook_fires_every_interval() {
        let prev = parse_partition("A B C\nD E F");
        let roster = roster(&prev, &["A", "D"], 6);
        let options = OptimizationOptions {
            trials: 120,
            yield_every: 50,
            ..Default::default()
        };
        let optimizer = Optimizer::new(&roster, &prev, 2, options).unwrap();

        let calls = AtomicUsize::new(0);
        let hook = |p: Progress| {
            assert_eq!(p.trial % 50, 0);
            calls.fetch_add(1, Ordering::SeqCst);
        };
        optimizer.run(&mut Rng::with_seed(3), &hook).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn zero_trials_is_a_computation_failure() {
        let prev = Partition::new();
        let roster = roster(&prev, &[], 4);
        let options = OptimizationOptions {
            trials: 0,
            ..Default::default()
        };
        let optimizer = Optimizer::new(&roster, &prev, 2, options).unwrap();
        let err = optimizer.run(&mut Rng::with_seed(0), &()).unwrap_err();
        assert!(matches!(err, CellForgeError::ComputationFailed));
    }

    #[test]
    fn parallel_run_covers_budget_and_stays_monotone() {
        let prev = parse_partition("A B C D\nE F G H\nI J K L");
        let roster = roster(&prev, &["A", "E", "I"], 12);
        let options = OptimizationOptions {
            trials: 301,
            threads: 4,
            ..Default::default()
        };
        let optimizer = Optimizer::new(&roster, &prev, 3, options).unwrap();
        let result = optimizer.run(&mut Rng::with_seed(11), &()).unwrap();

        assert_eq!(result.trials, 301);
        assert_eq!(result.improvements.last().map(|i| i.overlap), Some(result.overlap));
        assert!(result
            .improvements
            .windows(2)
            .all(|w| w[1].overlap < w[0].overlap));
    }

    #[test]
    fn rejects_more_leaders_than_cells() {
        let prev = Partition::new();
        let roster = roster(&prev, &["A", "B", "C"], 3);
        let err = Optimizer::new(&roster, &prev, 2, OptimizationOptions::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            CellForgeError::TooManyLeaders {
                leaders: 3,
                cells: 2
            }
        ));
    }
}
