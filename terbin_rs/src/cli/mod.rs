//! Command-line front end.
//!
//! ```text
//! argv ──► parser::parse_mode ─┬─ Single       ──► Dispatcher::dispatch (once)
//!                              ├─ Interactive  ──► interactive loop (stdin lines)
//!                              └─ Pipe(name)   ──► pipe server (socket lines, JSON responses)
//! ```
//!
//! - [`command`]: descriptors, aliases, registry, usage text
//! - [`dispatch`]: dispatcher and the command handlers
//! - [`parser`]: mode selection and token helpers
//! - [`interactive`], [`pipe`]: the two loop modes
//! - [`entrypoint`]: shared `main` body

pub mod command;
pub mod dispatch;
pub mod entrypoint;
pub mod interactive;
pub mod parser;
pub mod pipe;

pub use dispatch::{DispatchOutcome, Dispatcher};
pub use parser::Mode;
