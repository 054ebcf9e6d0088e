//! CLI tool for sheetgrid - clipboard decoding and column sizing as JSON
//!
//! Usage:
//!   sheetgrid_cli paste [--html clip.html] < clip.txt    # Decode a clipboard payload
//!   sheetgrid_cli copy < rows.json                        # Encode rows to {text, html}
//!   sheetgrid_cli widths <container> <columns.json>       # Size columns

#![allow(clippy::exit)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Read, Write};

use sheetgrid::clipboard::{self, ClipboardPayload};
use sheetgrid::layout::size_columns;
use sheetgrid::ColumnWidth;

const USAGE: &str = "Usage: sheetgrid_cli paste [--html file] | copy | widths <container|auto> <columns.json>";

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn read_stdin() -> String {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        fail(&format!("Error reading stdin: {}", e));
    }
    input
}

fn print_json(value: &impl serde::Serialize) {
    let json = match serde_json::to_string_pretty(value) {
        Ok(j) => j,
        Err(e) => fail(&format!("Error serializing JSON: {}", e)),
    };
    if let Err(e) = writeln!(io::stdout(), "{}", json) {
        fail(&format!("Error writing output: {}", e));
    }
}

fn paste(args: &[String]) {
    let html = if args.len() > 1 && args[0] == "--html" {
        match fs::read_to_string(&args[1]) {
            Ok(h) => Some(h),
            Err(e) => fail(&format!("Error reading {}: {}", args[1], e)),
        }
    } else {
        None
    };

    let text = read_stdin();
    let payload = ClipboardPayload {
        html,
        text: Some(text),
    };
    print_json(&clipboard::parse(&payload));
}

fn copy() {
    let rows: Vec<Vec<String>> = match serde_json::from_str(&read_stdin()) {
        Ok(r) => r,
        Err(e) => fail(&format!("Expected a JSON array of string arrays: {}", e)),
    };
    print_json(&clipboard::serialize(&rows));
}

fn widths(args: &[String]) {
    if args.len() < 2 {
        fail(USAGE);
    }

    let container = match args[0].as_str() {
        "auto" => None,
        raw => match raw.parse::<f64>() {
            Ok(w) => Some(w),
            Err(e) => fail(&format!("Invalid container width {}: {}", raw, e)),
        },
    };

    let data = match fs::read_to_string(&args[1]) {
        Ok(d) => d,
        Err(e) => fail(&format!("Error reading {}: {}", args[1], e)),
    };
    let columns: Vec<ColumnWidth> = match serde_json::from_str(&data) {
        Ok(c) => c,
        Err(e) => fail(&format!("Error parsing columns: {}", e)),
    };

    print_json(&size_columns(container, &columns));
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        fail(USAGE);
    }

    match args[1].as_str() {
        "paste" => paste(&args[2..]),
        "copy" => copy(),
        "widths" => widths(&args[2..]),
        other => fail(&format!("Unknown command {}\n{}", other, USAGE)),
    }
}
