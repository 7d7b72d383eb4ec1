//! Config subcommands handler

use anyhow::{bail, Result};
use std::path::Path;

use turtle::Config;

/// Print the configuration stored at `path` (defaults when missing) as TOML.
pub fn handle_show(path: &Path) -> Result<()> {
    let config = Config::load_from(path)?;
    if !path.exists() {
        eprintln!("# {} not found, showing defaults", path.display());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write the default configuration to `path`.
pub fn handle_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
