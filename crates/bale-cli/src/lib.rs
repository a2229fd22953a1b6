//! bale CLI - build and check bale configurations.
//!
//! The binary is a thin shell over [`bale_bundler::ConfigPipeline`]:
//!
//! - [`cli`] - argument definitions (clap)
//! - [`commands`] - `build` and `check`
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines on stderr
//!
//! The build mode comes from `--mode`, falling back to `NODE_ENV`. This is the
//! only place process state is read; everything below receives an explicit
//! [`Environment`](bale_config::Environment).

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
