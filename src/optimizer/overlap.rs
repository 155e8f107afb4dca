use crate::roster::Partition;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use strum_macros::{Display, EnumIter, EnumString};

/// How the members a new cell shares with an old cell are turned into cost.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OverlapMetric {
    /// Pairs of members that were together before and are together again.
    #[default]
    Pairs,
    /// Raw count of shared members per (old, new) cell pair.
    Members,
}

impl OverlapMetric {
    #[inline(always)]
    pub fn contribution(self, shared: usize) -> usize {
        match self {
            Self::Pairs => shared * shared.saturating_sub(1) / 2,
            Self::Members => shared,
        }
    }
}

/// Previous-cell membership keyed by member id, for scoring id-based candidates.
#[derive(Debug, Clone)]
pub struct OverlapIndex {
    memberships: Vec<Vec<u32>>,
    old_groups: usize,
}

impl OverlapIndex {
    /// `members[id]` is the name of member `id`. Names in `previous` that are
    /// not in `members` are ignored.
    pub fn new(previous: &Partition, members: &[String]) -> Self {
        let ids: HashMap<&str, usize> = members
            .iter()
            .enumerate()
            .map(|(i, m)| (m.as_str(), i))
            .collect();

        let mut memberships = vec![Vec::new(); members.len()];
        for (g, group) in previous.iter().enumerate() {
            for name in group {
                if let Some(&id) = ids.get(name.as_str()) {
                    // A name repeated inside one old group still counts once.
                    if memberships[id].last() != Some(&(g as u32)) {
                        memberships[id].push(g as u32);
                    }
                }
            }
        }

        Self {
            memberships,
            old_groups: previous.len(),
        }
    }

    pub fn old_groups(&self) -> usize {
        self.old_groups
    }

    /// `scratch` is reused between calls to avoid a per-trial allocation.
    pub fn score(&self, cells: &[Vec<u32>], metric: OverlapMetric, scratch: &mut Vec<usize>) -> usize {
        if self.old_groups == 0 {
            return 0;
        }
        scratch.resize(self.old_groups, 0);

        let mut total = 0;
        for cell in cells {
            scratch.iter_mut().for_each(|c| *c = 0);
            for &id in cell {
                for &g in &self.memberships[id as usize] {
                    scratch[g as usize] += 1;
                }
            }
            total += scratch.iter().map(|&shared| metric.contribution(shared)).sum::<usize>();
        }
        total
    }
}

/// Name-based overlap between two partitions, used to audit an existing
/// assignment.
pub fn partition_overlap(previous: &Partition, current: &Partition, metric: OverlapMetric) -> usize {
    let old_sets: Vec<HashSet<&str>> = previous
        .iter()
        .map(|g| g.iter().map(String::as_str).collect())
        .collect();

    current
        .iter()
        .map(|group| {
            let new_set: HashSet<&str> = group.iter().map(String::as_str).collect();
            old_sets
                .iter()
                .map(|old| metric.contribution(old.intersection(&new_set).count()))
                .sum::<usize>()
        })
        .sum()
}
