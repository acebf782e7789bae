use thiserror::Error;

use crate::reference::ImageReference;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid tag {0}")]
    InvalidFormat(String),

    #[error("tag {0} does not refer to {1}")]
    WrongRegistry(String, String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unable to find a version of {} tagged {}", .0.package(), .0.tag)]
    TagNotFound(ImageReference),

    #[error("listing versions gave up after {0} pages")]
    PageLimit(u32),

    #[error("failed to list package versions: {0:#}")]
    Upstream(anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to delete: {0:#}")]
    Upstream(anyhow::Error),
}

/// The first failure hit while processing a single reference.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}
