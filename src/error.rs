use thiserror::Error;

/// Main error type for the Cover-Compositor library
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Composition error: {0}")]
    Composition(#[from] CompositionError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reading container/stream information from a media file
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Media file not found: {path}")]
    FileNotFound { path: String },

    #[error("Unrecognized or unreadable media file: {path} - {reason}")]
    Unrecognized { path: String, reason: String },

    #[error("Probe output could not be parsed for {path}: {reason}")]
    InvalidOutput { path: String, reason: String },
}

/// Filter-graph and encode failures
#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("External tool '{tool}' not found on PATH")]
    ToolNotFound { tool: String },

    #[error("Encoding {output} failed ({status}): {stderr}")]
    EncodeFailed {
        output: String,
        status: String,
        stderr: String,
    },

    #[error("Filter graph construction failed: {reason}")]
    GraphConstruction { reason: String },

    #[error("Invalid composition input: {details}")]
    InvalidInput { details: String },

    #[error("Unsupported audio layout in {path}: {count} audio streams (at most one is supported)")]
    UnsupportedAudioLayout { path: String, count: usize },
}

/// An expected stream field was absent or unusable
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Missing required field '{field}' in {path}")]
    MissingField { path: String, field: String },

    #[error("Invalid value for '{field}' in {path}: {value}")]
    InvalidField {
        path: String,
        field: String,
        value: String,
    },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using CompositorError
pub type Result<T> = std::result::Result<T, CompositorError>;

impl CompositorError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Probe(ProbeError::FileNotFound { path }) => {
                format!("Could not find media file '{}'. Please check the path.", path)
            }
            Self::Composition(CompositionError::ToolNotFound { tool }) => {
                format!(
                    "'{}' is required but was not found. Install FFmpeg and make sure it is on PATH.",
                    tool
                )
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
