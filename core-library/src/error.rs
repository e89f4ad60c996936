use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LibraryError {
    #[error("Invalid track {id}: {reason}")]
    InvalidTrack { id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, LibraryError>;
