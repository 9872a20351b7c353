//! Error types for the harness.
//!
//! [`HarnessError`] covers everything that makes a whole command meaningless
//! (unreadable catalog, bad size token, broken config). [`DispatchError`] is
//! scoped to a single task and never aborts a run.

/// Fatal errors raised while loading inputs, parsing arguments or persisting the catalog.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The catalog file exists but could not be read.
    #[error("Failed to read catalog '{path}': {source}")]
    CatalogIo {
        source: std::io::Error,
        path: String,
    },

    /// The catalog file is not a valid `{"tasks": [...]}` document.
    #[error("Failed to parse catalog '{path}': {source}")]
    CatalogParse {
        source: serde_json::Error,
        path: String,
    },

    /// The catalog could not be written back to disk.
    #[error("Failed to write catalog '{path}': {source}")]
    CatalogWrite {
        source: std::io::Error,
        path: String,
    },

    /// The in-memory catalog could not be serialized.
    #[error("Failed to serialize catalog: {source}")]
    CatalogSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// The results file could not be read.
    #[error("Failed to read results file '{path}': {source}")]
    ResultsIo {
        source: std::io::Error,
        path: String,
    },

    /// The results file is not a JSON array.
    #[error("Failed to parse results file '{path}': {source}")]
    ResultsParse {
        source: serde_json::Error,
        path: String,
    },

    /// A size token was not of the form `RxC`.
    #[error("Invalid size '{token}': {reason} (expected e.g. 100x100)")]
    InvalidSize { token: String, reason: String },

    /// The task name does not name a supported computation.
    #[error("Unsupported task kind '{name}' (supported: matrix_multiplication)")]
    UnsupportedTask { name: String },

    /// The config file could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    ConfigIo {
        source: std::io::Error,
        path: String,
    },

    /// The config file is not valid TOML or does not match the schema.
    #[error("Failed to parse config TOML: {source}")]
    ConfigParse {
        #[from]
        source: toml::de::Error,
    },

    /// The config parsed but holds an unusable value.
    #[error("Config validation error: {message}")]
    ConfigValidation { message: String },
}

/// Failure to obtain a response for one dispatched task.
///
/// Each variant is a distinct category the reporter counts and prints
/// separately. A non-2xx status is not an error: it is recorded as an outcome.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The task could not be encoded as a request body.
    #[error("Serialization error: {message}")]
    Serialize { message: String },

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Connection-level failure (DNS resolution, TCP connect, TLS handshake).
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// Any other transport failure, including malformed responses.
    #[error("Request error: {message}")]
    Request { message: String },
}

impl DispatchError {
    /// Returns the error category as a static string for reporting.
    ///
    /// Categories: `"serialize"`, `"timeout"`, `"connection"`, `"request"`.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Serialize { .. } => "serialize",
            Self::Timeout => "timeout",
            Self::Connection { .. } => "connection",
            Self::Request { .. } => "request",
        }
    }

    /// Classify a [`reqwest::Error`] into the appropriate [`DispatchError`] variant.
    pub fn classify_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection {
                message: err.to_string(),
            }
        } else {
            Self::Request {
                message: err.to_string(),
            }
        }
    }
}
