//! Shared test utilities for the equiv workspace.
//!
//! This crate is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`golden`]: golden fixture loading and scratch directories
//! - [`logging`]: tracing subscriber for test output
//! - [`strategies`]: proptest generators for JSON, XML and CSV documents

pub mod golden;
pub mod logging;
pub mod strategies;
