//! Check command implementation
//!
//! Validates the merged configuration and the registry it describes.

use tracing::info;

use crate::config::SimConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &SimConfig) -> Result<()> {
    info!("Checking configuration...");
    config.validate()?;
    let registry = config.registry()?;

    println!("Configuration OK");
    println!("  Seed:       {}", config.seed);
    println!("  Rounds:     {}", config.num_rounds);
    println!("  Output dir: {}", config.output_dir.display());
    println!("  Log level:  {}", config.log_level);
    println!(
        "  Families:   {} ({})",
        registry.len(),
        if config.families.is_empty() {
            "built-in"
        } else {
            "configured"
        }
    );
    Ok(())
}
