use iocost_bench::config::{messages, INDEX_CONFIGS};
use iocost_bench::error::ErrorContext;
use iocost_bench::experiment::collect_results;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    iocost_bench::init_logging();

    println!("=== Collecting Engine Counters ({} index configurations) ===", INDEX_CONFIGS.len());
    match collect_results(Path::new(".")).with_context(messages::COLLECT_FAILED) {
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
