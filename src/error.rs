use std::path::PathBuf;

/// Errors raised while building or loading field configuration.
///
/// Rendering itself never fails: a field that cannot draw simply draws nothing.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("invalid preset `{name}`: {reason}")]
    InvalidPreset { name: String, reason: String },
    #[error("failed to read scene config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scene config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FieldError>;
