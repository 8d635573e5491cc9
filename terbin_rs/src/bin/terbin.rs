use std::any::Any;
use std::panic;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

/// Filter for diagnostic tracing, e.g. `TERBIN_LOG=terbin=debug`.
const LOG_ENV: &str = "TERBIN_LOG";

fn install_broken_pipe_handler() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let payload = info.payload();
        let is_broken = <dyn Any>::downcast_ref::<&str>(payload)
            .is_some_and(|s| s.contains("Broken pipe"))
            || <dyn Any>::downcast_ref::<String>(payload)
                .is_some_and(|s| s.contains("Broken pipe"));

        if is_broken {
            // Downstream closed the pipe (e.g. `terbin help | head`).
            std::process::exit(0);
        }

        default_hook(info);
    }));
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    install_broken_pipe_handler();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match terbin::cli::entrypoint::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("terbin: {e:#}");
            ExitCode::FAILURE
        }
    }
}
