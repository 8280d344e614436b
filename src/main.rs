//! Varsheet - Command-line tool for exporting design variables per mode

use std::process::ExitCode;

use varsheet::cli;

fn main() -> ExitCode {
    cli::run()
}
