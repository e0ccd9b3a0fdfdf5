//! Init command - write an example user config

use crate::config::Settings;
use anyhow::Result;
use console::style;
use std::path::Path;

/// Run the init command
pub(super) fn run(path: Option<&Path>) -> Result<()> {
    let (config_path, written) = match path {
        Some(path) => (path.to_path_buf(), Settings::write_example(path)?),
        None => Settings::init_user_config()?,
    };

    if written {
        println!(
            "{} Created {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        println!("\nNext steps:");
        println!("  1. Add an API key (or set GOOGLE_API_KEY / ANTHROPIC_API_KEY)");
        println!("  2. Run: {}", style("adamscore analyze front.json").bold());
    } else {
        println!(
            "{} Config already exists at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    }
    Ok(())
}
