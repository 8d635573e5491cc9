//! `terbin --pipe [name]`: line-oriented command server for a host UI.
//!
//! Every received line is one turn. Log lines go back as plain text, and
//! the turn always ends with exactly one JSON response line:
//!
//! ```text
//! > instances list
//! < [INFO] ...
//! < {"Status":{"Code":200,"Message":"ok"},"Content":{"dev":"C:/games/dev"}}
//! ```
//!
//! On Unix the channel is a socket at `<tmp>/terbin-<name>.sock`; elsewhere a
//! loopback TCP listener whose address is printed on startup.

use std::io::{self, BufRead, BufReader, Write};

use anyhow::{Context as _, bail};

use crate::cli::dispatch::{DispatchOutcome, Dispatcher};
use crate::cli::interactive::EXIT_COMMAND;
use crate::cli::parser::helpers::tokenize;
use crate::context::Context;
use crate::log::{Logger, NoPrompt, PipeSink};
use crate::paths::Paths;
use crate::response::Response;

/// What the server should do after a connection ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Client went away; wait for the next one.
    Continue,
    /// `exit` received; shut the server down.
    Exit,
}

/// Run one turn and make sure it produced a response.
fn serve_turn(dispatcher: &Dispatcher, paths: &Paths, line: &str, writer: Box<dyn Write>) {
    let tokens = tokenize(line);
    let log = Logger::new(Box::new(PipeSink::new(writer)), Box::new(NoPrompt));
    let mut ctx = Context::load(paths.clone(), log);

    let outcome = dispatcher.dispatch(&mut ctx, &tokens);
    if let Err(e) = &outcome {
        tracing::warn!(error = %e, line, "pipe command failed");
        ctx.log.error(format!("Command failed: {e:#}"));
    }
    if ctx.log.has_responded() {
        return;
    }
    let fallback = match outcome {
        Ok(DispatchOutcome::Ran { .. }) => Response::ok(),
        Ok(DispatchOutcome::Unknown { token }) => {
            Response::bad_request(format!("Unknown command: {token}"))
        }
        Err(e) => Response::internal_error(format!("{e:#}")),
    };
    ctx.log.respond(fallback);
}

/// Serve turns read from `reader` until end of input or `exit`.
/// `writer` opens a fresh handle onto the client for each turn.
pub fn serve_connection<R, W>(
    dispatcher: &Dispatcher,
    paths: &Paths,
    reader: R,
    mut writer: W,
) -> anyhow::Result<Control>
where
    R: BufRead,
    W: FnMut() -> io::Result<Box<dyn Write>>,
{
    for line in reader.lines() {
        let line = line.context("failed to read from pipe client")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case(EXIT_COMMAND) {
            tracing::info!("exit requested by pipe client");
            return Ok(Control::Exit);
        }
        tracing::debug!(line, "pipe turn");
        serve_turn(dispatcher, paths, line, writer()?);
    }
    Ok(Control::Continue)
}

/// Serve one client. Its I/O failures end only that client's session.
fn serve_client<R, W>(dispatcher: &Dispatcher, paths: &Paths, reader: R, writer: W) -> Control
where
    R: BufRead,
    W: FnMut() -> io::Result<Box<dyn Write>>,
{
    match serve_connection(dispatcher, paths, reader, writer) {
        Ok(control) => control,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "pipe client dropped");
            Control::Continue
        }
    }
}

/// Pipe names become part of a file name; keep them plain.
fn validate_name(name: &str) -> anyhow::Result<()> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !ok {
        bail!("invalid pipe name '{name}': use letters, digits, '-', '_' or '.'");
    }
    Ok(())
}

#[cfg(unix)]
pub fn serve(dispatcher: &Dispatcher, paths: &Paths, name: &str) -> anyhow::Result<()> {
    use std::os::unix::net::UnixListener;

    validate_name(name)?;
    let socket = std::env::temp_dir().join(format!("terbin-{name}.sock"));
    let _ = std::fs::remove_file(&socket);
    let listener = UnixListener::bind(&socket)
        .with_context(|| format!("failed to bind socket {}", socket.display()))?;
    tracing::info!(socket = %socket.display(), "pipe server listening");
    println!("Pipe server listening on {}", socket.display());

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "failed to accept pipe client");
                continue;
            }
        };
        let reader = match stream.try_clone() {
            Ok(clone) => BufReader::new(clone),
            Err(e) => {
                tracing::warn!(error = %e, "failed to clone pipe client stream");
                continue;
            }
        };
        let control = serve_client(dispatcher, paths, reader, || {
            Ok(Box::new(stream.try_clone()?) as Box<dyn Write>)
        });
        if control == Control::Exit {
            break;
        }
    }
    let _ = std::fs::remove_file(&socket);
    Ok(())
}

#[cfg(not(unix))]
pub fn serve(dispatcher: &Dispatcher, paths: &Paths, name: &str) -> anyhow::Result<()> {
    use std::net::TcpListener;

    validate_name(name)?;
    let listener =
        TcpListener::bind(("127.0.0.1", 0)).context("failed to bind loopback listener")?;
    let address = listener.local_addr()?;
    tracing::info!(%address, name, "pipe server listening");
    println!("Pipe server '{name}' listening on {address}");

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "failed to accept pipe client");
                continue;
            }
        };
        let reader = match stream.try_clone() {
            Ok(clone) => BufReader::new(clone),
            Err(e) => {
                tracing::warn!(error = %e, "failed to clone pipe client stream");
                continue;
            }
        };
        let control = serve_client(dispatcher, paths, reader, || {
            Ok(Box::new(stream.try_clone()?) as Box<dyn Write>)
        });
        if control == Control::Exit {
            break;
        }
    }
    Ok(())
}
