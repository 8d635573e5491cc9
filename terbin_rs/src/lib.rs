//! # terbin
//!
//! Scaffold, build and deploy BepInEx mods for *Farlands*, manage local game
//! instances and browse the community mod index.
//!
//! Commands live in a static table ([`cli::dispatch::handlers::BUILTIN_COMMANDS`])
//! and are looked up by name or alias through a [`cli::command::Registry`].
//! Every turn gets its own [`context::Context`] carrying the loaded config,
//! the project manifest and a [`log::Logger`] whose sink decides between
//! console output and the pipe protocol.
//!
//! ```text
//! terbin build            single shot
//! terbin --interactive    read-dispatch loop on stdin
//! terbin --pipe [name]    line server with JSON responses
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod fs_utils;
pub mod index;
pub mod log;
pub mod manifest;
pub mod net;
pub mod opener;
pub mod paths;
pub mod progress;
pub mod response;
pub mod templates;
pub mod toolchain;

pub use cli::{DispatchOutcome, Dispatcher};
pub use context::Context;
pub use error::{Result, TerbinError};
pub use response::{Response, StatusCode};
