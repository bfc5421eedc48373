//! Common utilities for the marrow parser crates.
//!
//! This crate provides shared infrastructure used by the tokenizer and the
//! tree builder:
//! - **Warning System** - deduplicated warnings routed through the `log` facade

pub mod warning;
