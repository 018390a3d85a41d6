use crate::api::error::FetchError;
use crate::config::error::ConfigError;
use crate::fetcher::checkpoint::CheckpointError;
use crate::output::error::OutputError;
use crate::prompt::PromptError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoaaError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}
