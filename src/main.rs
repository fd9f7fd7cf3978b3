//! CSS modules build tool binary

use std::process;

fn main() {
    let mut cli = cssmodc::cli::Cli::new();
    if let Err(e) = cli.run() {
        eprintln!("Build failed: {}", e);
        process::exit(1);
    }
}
