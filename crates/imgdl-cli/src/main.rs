use imgdl_core::logging;

mod cli;

use crate::cli::Cli;
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    let cfg = match cli.load_config() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("imgdl error: {:#}", err);
            std::process::exit(1);
        }
    };

    let dispatch = logging::build_dispatch(&cfg.log).unwrap_or_else(|err| {
        eprintln!("imgdl: file logging unavailable ({:#}), using stderr", err);
        logging::stderr_dispatch()
    });
    logging::install_panic_hook();

    // Top-level error boundary: anything that aborts the batch is logged and
    // turns into exit code 1. Failed URLs are data and keep exit code 0.
    // Panics are logged by the hook above and keep Rust's exit code 101.
    let code = tracing::dispatcher::with_default(&dispatch, || {
        match cli.run(&cfg, dispatch.clone()) {
            Ok(()) => 0,
            Err(err) => {
                tracing::error!("{:#}", err);
                eprintln!("imgdl error: {:#}", err);
                1
            }
        }
    });
    std::process::exit(code);
}
