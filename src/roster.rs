//! Parsing of the free-text roster inputs and construction of the member
//! universe for a single reorganization run.

use crate::error::{CellForgeError, CfResult};
use std::collections::HashSet;

/// Ordered groups of member names.
pub type Partition = Vec<Vec<String>>;

/// One group per non-blank line, names split on whitespace.
pub fn parse_partition(text: &str) -> Partition {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_members)
        .collect()
}

pub fn parse_members(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Trims leader entries, drops blank ones and rejects exact duplicates.
pub fn validate_leaders<S: AsRef<str>>(raw: &[S]) -> CfResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut leaders = Vec::with_capacity(raw.len());
    for entry in raw {
        let name = entry.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name) {
            return Err(CellForgeError::DuplicateLeader {
                name: name.to_string(),
            });
        }
        leaders.push(name.to_string());
    }
    Ok(leaders)
}

/// The deduplicated member universe, split into leaders and everyone else.
///
/// Members keep first-seen order (previous groups, then new members, then
/// leaders, then placeholders) so a seeded shuffle is reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub members: Vec<String>,
    pub leaders: Vec<String>,
    pub non_leaders: Vec<String>,
    pub extras: usize,
}

impl Roster {
    pub fn build(
        previous: &Partition,
        new_members: &[String],
        leaders: Vec<String>,
        target_total: usize,
        extra_prefix: &str,
    ) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut members = Vec::new();

        let candidates = previous
            .iter()
            .flatten()
            .chain(new_members.iter())
            .chain(leaders.iter());
        for name in candidates {
            if seen.insert(name.clone()) {
                members.push(name.clone());
            }
        }

        // Shortfall only: a surplus universe is kept whole.
        let shortfall = target_total.saturating_sub(members.len());
        let mut extras = 0;
        let mut counter = 1;
        while extras < shortfall {
            let name = format!("{}{}", extra_prefix, counter);
            counter += 1;
            if seen.insert(name.clone()) {
                members.push(name);
                extras += 1;
            }
        }

        let leader_set: HashSet<&str> = leaders.iter().map(String::as_str).collect();
        let non_leaders = members
            .iter()
            .filter(|m| !leader_set.contains(m.as_str()))
            .cloned()
            .collect();

        Self {
            members,
            leaders,
            non_leaders,
            extras,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
