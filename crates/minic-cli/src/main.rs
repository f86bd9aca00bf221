use std::io::{self, Read};

use owo_colors::OwoColorize;

fn main() {
    let mut source = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut source) {
        eprintln!(
            "{}: {}",
            "error".red().bold(),
            format!("Failed to read stdin: {e}").red()
        );
        std::process::exit(1);
    }

    let report = minic_report::run_pipeline(&source);

    // program-level problems live inside the report; only a broken report
    // itself is a process failure
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                format!("Failed to serialize report: {e}").red()
            );
            std::process::exit(1);
        }
    }
}
