use chrono::NaiveDate;

/// Result type alias using RankError
pub type Result<T> = std::result::Result<T, RankError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// test assertions and process exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankErrorKind {
    // Upstream
    /// Network or remote failure talking to the ranking publisher
    SourceUnavailable,
    /// Snapshot content could not be parsed
    MalformedData,

    // Store
    /// A primary-key or unique constraint rejected an insert
    DuplicateKey,
    /// Bulk insert or delete failed at the store level
    WriteFailure,
    /// Commit or rollback failed
    TransactionFailure,
    /// Read-side store failure, connection setup or migrations
    Persistence,

    // Caller
    InvalidInput,
    Cancelled,

    // Internal
    Internal,
}

impl RankErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            RankErrorKind::SourceUnavailable => "ERR_SOURCE_UNAVAILABLE",
            RankErrorKind::MalformedData => "ERR_MALFORMED_DATA",
            RankErrorKind::DuplicateKey => "ERR_DUPLICATE_KEY",
            RankErrorKind::WriteFailure => "ERR_WRITE_FAILURE",
            RankErrorKind::TransactionFailure => "ERR_TRANSACTION_FAILURE",
            RankErrorKind::Persistence => "ERR_PERSISTENCE",
            RankErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            RankErrorKind::Cancelled => "ERR_CANCELLED",
            RankErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether an operation failing with this kind may succeed when repeated
    pub fn is_retryable(&self) -> bool {
        matches!(self, RankErrorKind::SourceUnavailable)
    }
}

/// Canonical structured error type
///
/// Carries a classification plus enough context (operation, snapshot id,
/// target date, pipeline stage) to diagnose a failed run without
/// re-running it.
#[derive(Debug, Clone)]
pub struct RankError {
    kind: RankErrorKind,
    op: Option<String>,
    snapshot_id: Option<String>,
    date: Option<NaiveDate>,
    stage: Option<String>,
    message: String,
    source: Option<Box<RankError>>,
}

impl RankError {
    /// Create a new error with the specified kind
    pub fn new(kind: RankErrorKind) -> Self {
        Self {
            kind,
            op: None,
            snapshot_id: None,
            date: None,
            stage: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add snapshot ID context
    pub fn with_snapshot_id(mut self, id: impl Into<String>) -> Self {
        self.snapshot_id = Some(id.into());
        self
    }

    /// Add target date context
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Add pipeline stage context
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: RankError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> RankErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the snapshot ID context, if any
    pub fn snapshot_id(&self) -> Option<&str> {
        self.snapshot_id.as_deref()
    }

    /// Get the target date context, if any
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Get the pipeline stage context, if any
    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&RankError> {
        self.source.as_deref()
    }

    /// Walk to the innermost error of the source chain
    pub fn root_cause(&self) -> &RankError {
        let mut current = self;
        while let Some(next) = current.source_error() {
            current = next;
        }
        current
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl std::fmt::Display for RankError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if let Some(stage) = &self.stage {
            write!(f, " at stage '{}'", stage)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(snapshot_id) = &self.snapshot_id {
            write!(f, " (snapshot_id: {})", snapshot_id)?;
        }
        if let Some(date) = &self.date {
            write!(f, " (date: {})", date.format("%Y-%m-%d"))?;
        }
        if let Some(source) = &self.source {
            write!(f, ", caused by: {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for RankError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Configuration failures surfaced while loading settings
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<ConfigError> for RankError {
    fn from(err: ConfigError) -> Self {
        RankError::new(RankErrorKind::InvalidInput)
            .with_op("load_settings")
            .with_message(err.to_string())
    }
}
