//! rubblerats: run the swarm simulation headless and print the final
//! snapshot as JSON.
//!
//! Usage:
//!   rubblerats --config swarm.json --ticks 900
//!   rubblerats --empty --commands script.json --realtime

use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use rubblerats_app::options;
use rubblerats_app::runner;

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match options::parse(&args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("{}", options::usage());
            return ExitCode::FAILURE;
        }
    };
    if options.help {
        eprintln!("{}", options::usage());
        return ExitCode::SUCCESS;
    }

    let snapshot = match runner::run(&options) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            error!(error = %err, "run failed");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: failed to encode snapshot: {err}");
            ExitCode::FAILURE
        }
    }
}
