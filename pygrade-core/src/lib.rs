//! pygrade core library — Python exercise validation and skill assessment.
//!
//! The main entry point is [`pipeline::Analyzer`], which exposes the two
//! pipeline operations (`validate` and `suggest`) plus batch analysis. The
//! [`store`] module persists completed analyses.

pub mod config;
pub mod domain;
pub mod error;
pub mod features;
pub mod parse;
pub mod pipeline;
pub mod score;
pub mod store;
pub mod suggest;
pub mod types;
