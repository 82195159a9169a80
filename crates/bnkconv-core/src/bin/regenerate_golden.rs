//! Rewrites `expected.txt` for every golden case that has one.
//!
//! Run from the workspace root. Cases without `expected.txt` are failure
//! cases and are left alone.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use bnkconv_core::convert_bank_file;

fn main() -> ExitCode {
    let cases = match golden_cases() {
        Ok(cases) => cases,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(1);
        }
    };

    let mut failed = false;
    for case in cases {
        let expected = case.join("expected.txt");
        match convert_bank_file(&case.join("input.bnk")) {
            Ok(rendered) => match fs::write(&expected, rendered) {
                Ok(()) => eprintln!("updated {}", expected.display()),
                Err(err) => {
                    eprintln!("error: writing {}: {}", expected.display(), err);
                    failed = true;
                }
            },
            Err(err) => {
                eprintln!("error: {}: {}", case.display(), err);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn golden_cases() -> std::io::Result<Vec<PathBuf>> {
    let mut cases = fs::read_dir(PathBuf::from("tests").join("golden"))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    cases.retain(|case| case.join("input.bnk").is_file() && case.join("expected.txt").is_file());
    cases.sort();
    Ok(cases)
}
