use iocost_bench::config::{messages, THEORY_ORDER};
use iocost_bench::error::ErrorContext;
use iocost_bench::experiment::index_report;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    iocost_bench::init_logging();

    println!("=== Multiway Index vs Theory (d = {}) ===", THEORY_ORDER);
    match index_report(Path::new(".")).with_context(messages::INDEX_REPORT_FAILED) {
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
