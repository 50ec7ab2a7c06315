//! Entry point for the `routr` command-line interface.
#![forbid(unsafe_code)]

use env_logger::{Builder, Env};
use log::error;
use routr_cli::{CliError, run};

fn main() {
    dotenvy::dotenv().ok();
    init_logging();
    if let Err(err) = run() {
        exit_with(err);
    }
}

fn init_logging() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}

fn exit_with(err: CliError) -> ! {
    match err {
        // Help and version requests are not failures.
        CliError::ArgumentParsing(parse_err) => parse_err.exit(),
        other => {
            error!("{other}");
            eprintln!("routr: {other}");
            std::process::exit(1);
        }
    }
}
