//! # harbour - C++ Project Scaffolding
//!
//! harbour creates CMake-based C++ projects and drives the external tools
//! (`cmake`, `make`, `git`, `python3 -m glad`) that fetch, build and run them.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create, build and run a C++20 project with debug logging
//! harbour new --std 20 -g myapp
//!
//! # Rebuild and run it later
//! cd myapp
//! harbour make
//! ```
//!
//! ## Module Organization
//!
//! - [`process`] - Child process execution with full output capture
//! - [`files`] - File access under composed `r`/`w`/`a` open modes
//! - [`config`] - Project configuration (`.harbourConfig`)
//! - [`build`] - CMake configure, make, and binary execution
//! - [`deps`] - Graphics dependency fetching
//! - [`commands`] - CLI command handlers

/// CMake/make orchestration and program execution.
pub mod build;

/// CLI command handlers extracted from main.
pub mod commands;

/// Configuration file parsing (`.harbourConfig`).
pub mod config;

/// Dependency fetching into `external/`.
pub mod deps;

/// File resources with normalized open modes.
pub mod files;

/// `tracing` subscriber setup.
pub mod logging;

/// Subprocess runner.
pub mod process;

/// Generated project files.
pub mod templates;

/// Terminal UI utilities (colors, banners).
pub mod ui;
