//! Core infrastructure for tugtool.
//!
//! This crate provides the language-agnostic pieces of the engine:
//! - Error types and error codes
//! - Engine configuration
//! - Logging setup
//! - Text and indentation utilities
//! - The run-scoped execution context and its data-table sink
//! - The two-phase accumulator used by scanning recipes

pub mod accumulator;
pub mod config;
pub mod data_table;
pub mod error;
pub mod execution;
pub mod logging;
pub mod text;

pub use accumulator::{AccumulatorBuilder, Snapshot};
pub use config::{Config, EngineConfig};
pub use error::{
    OutputErrorCode, PatternError, TemplateApplyError, TemplateCompilationError, TransformError,
    TugError,
};
pub use execution::{Diagnostic, ExecutionContext};
