use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShiziError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("active pool has {found} items, need {needed} to build a round")]
    ContentTooSmall { found: usize, needed: usize },

    #[error("malformed backup: {0}")]
    MalformedBackup(String),

    #[error("audio playback failed: {0}")]
    AudioPlayback(String),

    #[error("ShiziError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for ShiziError {
    fn from(error: std::io::Error) -> Self {
        ShiziError::Io(Box::new(error))
    }
}
