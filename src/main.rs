//! Flutter Project Generator Binary

use flutterc::EnhancedCli;
use std::process;

fn main() {
    if let Err(e) = EnhancedCli::new().run() {
        eprintln!("Generation failed: {}", e);
        process::exit(1);
    }
}
