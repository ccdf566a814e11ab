// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! perfsheet CLI entry point.

fn main() {
    if let Err(e) = perfsheet_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
