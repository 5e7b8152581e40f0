//! # Shiftboard Library
//!
//! Employee scheduling back end: an in-memory record repository, the weekly
//! schedule view model, the service layer and the HTTP API on top of them.

pub mod auth;
pub mod billing;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod schedule;
pub mod seeds;
pub mod server;
pub mod service;
pub mod telemetry;
