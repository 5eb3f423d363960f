//! Example demonstrating the severity-filtered handler chain
//!
//! Builds the `uat` layout with a file sink in the temp directory and sends
//! one message per severity through it.

use poolchain::chain::{build_chain, ChainProfile, ChainSinks, Severity};

fn main() {
    tracing_subscriber::fmt::init();

    let log_file = std::env::temp_dir().join("poolchain-demo.log");
    let chain = build_chain(
        ChainProfile::Uat,
        ChainSinks::standard(&log_file, "ops@example.com"),
    );

    println!("Chain: {:?}\n", chain);

    for severity in Severity::ALL {
        let report = chain.log(severity, &format!("{} message", severity));
        let writers = report.written_by();
        println!(
            "{:<8} -> {}",
            severity,
            if writers.is_empty() {
                "nobody".to_string()
            } else {
                writers.join(", ")
            }
        );
        for err in &report.errors {
            eprintln!("  write failed: {}", err);
        }
    }

    println!("\nERROR lines appended to {}", log_file.display());
}
