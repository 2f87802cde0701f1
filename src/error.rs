//! Error types shared by the music player and the site config loader.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerenadeError {
    /// A playlist must hold at least one track
    #[error("playlist is empty")]
    EmptyPlaylist,

    /// Local storage could not be read or written
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The stored record exists but is not a usable playback state
    #[error("stored playback state is corrupt: {0}")]
    CorruptState(String),

    /// An element the player expects on the page is not there
    #[error("page element missing: {0}")]
    MissingDom(&'static str),

    #[error("invalid site config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SerenadeError>;
