//! Common test utilities module
//!
//! Provides shared utilities for tests including:
//! - Temporary file management for export tests
//! - Panel fixtures

#![allow(dead_code)]

pub mod fixtures;
pub mod test_utils;

pub use fixtures::{clean_panel_fixture, municipal_panel, panel_from_rows};
pub use test_utils::TempTestDir;
