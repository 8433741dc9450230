//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified application error handling
//! - Configuration structures
//! - Pagination request and response types

pub mod config;
pub mod error;
pub mod pagination;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use pagination::{Paginated, PaginationMeta, Pagination};
