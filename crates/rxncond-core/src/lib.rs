//! # rxncond-core
//!
//! Core types shared by the rxncond crates.
//!
//! This crate provides:
//! - [`Error`] / [`Result`] — the single error type for store, parse and shape failures
//! - [`DType`] — numeric encodings an attribute matrix may arrive in
//! - [`AttrMatrix`] — row-major node/edge attribute matrix with typed storage
//! - [`MolGraph`] — a molecule as nodes, directed edges and attribute matrices

pub mod dtype;
pub mod error;
pub mod graph;
pub mod matrix;

pub use dtype::{DType, WithDType};
pub use error::{Error, Result};
pub use graph::MolGraph;
pub use matrix::{AttrData, AttrMatrix};
