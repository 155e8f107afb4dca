use thiserror::Error;

#[derive(Error, Debug)]
pub enum CellForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("invalid total member count")]
    InvalidTotalMembers,

    #[error("invalid cell count")]
    InvalidCellCount,

    #[error("leaders must be unique")]
    DuplicateLeader { name: String },

    #[error("more leaders than cells")]
    TooManyLeaders { leaders: usize, cells: usize },

    #[error("computation failed, retry")]
    ComputationFailed,
}

impl CellForgeError {
    /// True for errors the caller can fix by correcting the form input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidTotalMembers
                | Self::InvalidCellCount
                | Self::DuplicateLeader { .. }
                | Self::TooManyLeaders { .. }
        )
    }
}

pub type CfResult<T> = Result<T, CellForgeError>;
