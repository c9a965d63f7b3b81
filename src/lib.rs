//! ascii-face library crate.
//!
//! This module exposes the internal components for integration testing.

pub mod app;
pub mod auto_capture;
pub mod ascii;
pub mod camera;
pub mod cli;
pub mod config;
pub mod export;
pub mod input;
pub mod logging;
pub mod pipeline;
pub mod surface;
pub mod terminal;
