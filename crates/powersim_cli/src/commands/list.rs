//! List command implementation
//!
//! Prints the families the configuration would run, in run order.

use crate::config::SimConfig;
use crate::Result;

/// Run the list command
pub fn run(config: &SimConfig) -> Result<()> {
    let registry = config.registry()?;

    println!("{:<24} {:<12}", "Family", "Generator");
    println!("{}", "-".repeat(37));
    for entry in registry.iter() {
        println!("{:<24} {:<12}", entry.name, entry.config.kind());
    }
    println!();
    println!("{} families", registry.len());
    Ok(())
}
