//! Core types and trait definitions for the stoa account engine.
//!
//! This crate is deliberately free of HTTP dependencies. It owns the
//! canonical order lifecycle, the free-text status normalizers, the
//! order classifier, the return-history aggregator, and the view
//! assembler. All other crates depend on it; it depends on nothing
//! proprietary.

pub mod classify;
pub mod eligibility;
pub mod error;
pub mod order;
pub mod returns;
pub mod source;
pub mod status;
pub mod view;

pub use error::{Error, Result};
