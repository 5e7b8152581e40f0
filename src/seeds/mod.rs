//! Demo data seeding
//!
//! This module provides the sample company the server starts with, so the
//! schedule screens have something to show without any setup.

pub mod demo;

pub use demo::demo_records;
