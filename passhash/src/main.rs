//! `rabbit-passhash` binary. Logs go to stderr so stdout only carries the
//! JSON result.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use rabbit_passhash::cli::{run, Args};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let stdout = io::stdout();
    match run(&args, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
