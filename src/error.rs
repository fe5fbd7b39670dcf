use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KdIndexError {
    /// A point equal to an existing one was added to a tree configured with
    /// [`DuplicatePolicy::Error`][crate::kdtree::DuplicatePolicy::Error].
    #[error("Cannot add node with duplicate coordinates")]
    DuplicateKey,

    /// A query argument was out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, KdIndexError>;
