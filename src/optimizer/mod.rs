pub mod candidate;
pub mod overlap;
pub mod runner;

use self::candidate::*;
use self::overlap::{OverlapIndex, OverlapMetric};
use fastrand::Rng;
use serde::Serialize;

/// A point where the best overlap strictly improved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Improvement {
    pub trial: usize,
    pub overlap: usize,
}

#[derive(Debug, Clone)]
pub struct BestCandidate {
    pub cells: Vec<Vec<u32>>,
    pub overlap: usize,
}

/// Runs independent shuffle trials over member ids and keeps the best one.
///
/// Each searcher owns its working buffers; parallel runs give every worker
/// its own searcher.
pub struct Searcher<'a> {
    index: &'a OverlapIndex,
    leaders: &'a [u32],
    metric: OverlapMetric,
    sizes: Vec<usize>,

    order: Vec<u32>,
    cells: Vec<Vec<u32>>,
    scratch: Vec<usize>,

    pub best: Option<BestCandidate>,
    pub improvements: Vec<Improvement>,
    pub trials_run: usize,
}

impl<'a> Searcher<'a> {
    pub fn new(
        index: &'a OverlapIndex,
        leaders: &'a [u32],
        non_leaders: &[u32],
        cell_count: usize,
        metric: OverlapMetric,
    ) -> Self {
        Self {
            index,
            leaders,
            metric,
            sizes: cell_sizes(non_leaders.len(), cell_count),
            order: non_leaders.to_vec(),
            cells: Vec::with_capacity(cell_count),
            scratch: Vec::with_capacity(index.old_groups()),
            best: None,
            improvements: Vec::new(),
            trials_run: 0,
        }
    }

    pub fn best_overlap(&self) -> Option<usize> {
        self.best.as_ref().map(|b| b.overlap)
    }

    /// One shuffle, one candidate, one score. Returns the candidate's overlap.
    #[inline(always)]
    pub fn trial(&mut self, rng: &mut Rng) -> usize {
        fisher_yates(rng, &mut self.order);
        fill_cells(self.leaders, &self.order, &self.sizes, &mut self.cells);
        let overlap = self.index.score(&self.cells, self.metric, &mut self.scratch);

        let improved = self.best.as_ref().map_or(true, |b| overlap < b.overlap);
        if improved {
            match self.best.as_mut() {
                Some(best) => {
                    best.cells.clone_from(&self.cells);
                    best.overlap = overlap;
                }
                None => {
                    self.best = Some(BestCandidate {
                        cells: self.cells.clone(),
                        overlap,
                    })
                }
            }
            self.improvements.push(Improvement {
                trial: self.trials_run,
                overlap,
            });
        }

        self.trials_run += 1;
        overlap
    }
}
