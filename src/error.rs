use thiserror::Error;

/// Errors surfaced by the expense/budget store.
///
/// The aggregation and alert code never produces these; only operations
/// that touch storage or accept caller input can fail.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Input rejected before it reached the database
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The database was written by a newer schema than this build knows
    #[error("Schema mismatch: database is at version {found}, this build supports up to {supported}")]
    SchemaMismatch { found: i32, supported: i32 },

    /// A stored row could not be decoded
    #[error("Corrupt {table} row {id}: {detail}")]
    CorruptRow {
        table: &'static str,
        id: i64,
        detail: String,
    },
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::Io(_)
                | Self::Csv(_)
                | Self::SchemaMismatch { .. }
                | Self::CorruptRow { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
