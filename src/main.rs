use std::io::Read;
use std::process::ExitCode;
use std::{env, fs, io};

use chunk_schedule::{solve, SolveRequest};
use log::{error, info};

fn init_logging() {
    env_logger::Builder::from_default_env()
        .format_timestamp(Some(env_logger::fmt::TimestampPrecision::Millis))
        .init();
}

/// Reads the request from the path given as the first argument, or stdin.
fn read_request() -> Result<SolveRequest, String> {
    let input = match env::args().nth(1) {
        Some(path) => {
            fs::read_to_string(&path).map_err(|e| format!("cannot read {path}: {e}"))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("cannot read stdin: {e}"))?;
            buf
        }
    };
    serde_json::from_str(&input).map_err(|e| format!("invalid request: {e}"))
}

fn main() -> ExitCode {
    init_logging();

    let request = match read_request() {
        Ok(request) => request,
        Err(message) => {
            error!("{message}");
            return ExitCode::from(1);
        }
    };
    info!(
        "scheduling {} jobs with {:?}",
        request.jobs.len(),
        request.algorithm
    );

    let result = solve(&request);
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("cannot serialize result: {e}");
            return ExitCode::from(1);
        }
    }

    if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}
