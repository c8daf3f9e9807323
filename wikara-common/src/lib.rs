//! # WIKARA Common Library
//!
//! Shared code for the WIKARA survey service:
//! - Reference hierarchy model and loading
//! - Spreadsheet export parsing and the sheet store client
//! - Identifier normalization and the export/hierarchy join
//! - Dashboard aggregation, pagination and view state
//! - Submission form model, validation and row building
//! - Configuration loading

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod hierarchy;
pub mod join;
pub mod names;
pub mod normalize;
pub mod pagination;
pub mod reference;
pub mod sheets;
pub mod submission;
pub mod time;

pub use error::{Error, Result};
