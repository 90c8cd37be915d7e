use thiserror::Error;

use crate::model::{DifficultyError, TagError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error(transparent)]
    Difficulty(#[from] DifficultyError),
}
