//! # range-gen CLI
//!
//! ## Usage
//! ```bash
//! range-gen ./frames ./ranges.txt 120
//! range-gen --jobs 4 --noise 5 ./frames ./ranges.txt 120
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let code = error.exit_code();
            if code != 0 {
                eprintln!("{}", error);
            }
            ExitCode::from(code)
        }
    }
}
