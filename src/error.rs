use thiserror::Error;

pub type Result<T> = std::result::Result<T, PathvizError>;

#[derive(Debug, Error)]
pub enum PathvizError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown finder: {name}")]
    UnknownFinder { name: String },

    #[error("unknown heuristic: {name}")]
    UnknownHeuristic { name: String },
}
