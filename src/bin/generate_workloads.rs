use iocost_bench::config::{messages, KEY_COUNT, WORKLOAD_SEED};
use iocost_bench::error::ErrorContext;
use iocost_bench::experiment::generate_workloads;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    iocost_bench::init_logging();

    println!("=== Workload Generation (N = {}, seed = {}) ===", KEY_COUNT, WORKLOAD_SEED);
    match generate_workloads(Path::new("."), KEY_COUNT, WORKLOAD_SEED).with_context(messages::WORKLOAD_WRITE_FAILED) {
        Ok(paths) => {
            for path in paths {
                println!("wrote {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
