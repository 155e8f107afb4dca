use crate::error::{CellForgeError, CfResult};
use crate::optimizer::overlap::OverlapMetric;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CellConfig {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub roster: RosterParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Number of independent shuffle trials.
    #[arg(long, default_value_t = 1000)]
    pub trials: usize,

    /// Invoke the progress hook every N trials (0 disables it).
    #[arg(long, default_value_t = 50)]
    pub yield_every: usize,

    #[arg(long, default_value_t = 1)]
    pub threads: usize,

    #[arg(long, default_value_t = OverlapMetric::Pairs)]
    pub metric: OverlapMetric,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            trials: 1000,
            yield_every: 50,
            threads: 1,
            metric: OverlapMetric::Pairs,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterParams {
    /// Prefix for the placeholder members that fill a shortfall.
    #[arg(long, default_value = "Extra")]
    pub extra_prefix: String,
}

impl Default for RosterParams {
    fn default() -> Self {
        Self {
            extra_prefix: "Extra".to_string(),
        }
    }
}

impl CellConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CellForgeError::Config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content)?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn validate(&self) -> CfResult<()> {
        if self.search.threads == 0 {
            return Err(CellForgeError::Config(
                "threads must be at least 1".to_string(),
            ));
        }
        if self.roster.extra_prefix.split_whitespace().count() != 1 {
            return Err(CellForgeError::Config(format!(
                "extra prefix '{}' must be a single word",
                self.roster.extra_prefix
            )));
        }
        Ok(())
    }

    /// Overwrites fields with values the user typed on the command line,
    /// leaving file-provided values alone when the flag only had its default.
    pub fn merge_from_cli(&mut self, cli: &CellConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(search.trials);
        update_if_present!(search.yield_every);
        update_if_present!(search.threads);
        update_if_present!(search.metric);
        update_if_present!(roster.extra_prefix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form_behaviour() {
        let cfg = CellConfig::default();
        assert_eq!(cfg.search.trials, 1000);
        assert_eq!(cfg.search.yield_every, 50);
        assert_eq!(cfg.search.threads, 1);
        assert_eq!(cfg.search.metric, OverlapMetric::Pairs);
        assert_eq!(cfg.roster.extra_prefix, "Extra");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: CellConfig = serde_json::from_str(r#"{"search": {"trials": 10}}"#).unwrap();
        assert_eq!(cfg.search.trials, 10);
        assert_eq!(cfg.search.yield_every, 50);
        assert_eq!(cfg.roster.extra_prefix, "Extra");
    }

    #[test]
    fn rejects_zero_threads_and_spaced_prefix() {
        let mut cfg = CellConfig::default();
        cfg.search.threads = 0;
        assert!(matches!(cfg.validate(), Err(CellForgeError::Config(_))));

        let mut cfg = CellConfig::default();
        cfg.roster.extra_prefix = "New Guest".to_string();
        assert!(matches!(cfg.validate(), Err(CellForgeError::Config(_))));
    }
}
