use iocost_bench::config::{messages, SORT_BLOCK_FACTOR};
use iocost_bench::error::ErrorContext;
use iocost_bench::experiment::sort_report;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    iocost_bench::init_logging();

    println!("=== External Sort vs Theory (b = {}) ===", SORT_BLOCK_FACTOR);
    match sort_report(Path::new("."), SORT_BLOCK_FACTOR).with_context(messages::SORT_REPORT_FAILED) {
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
