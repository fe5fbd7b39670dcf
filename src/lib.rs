#![doc = include_str!("../README.md")]

mod error;
pub mod kdtree;
mod r#type;

pub use error::{KdIndexError, Result};
pub use r#type::IndexableNum;
