//! Configuration commands.

use console::style;

use crate::config::Config;

/// Print the effective configuration as TOML.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    match config.source_path {
        Some(ref path) => println!("# Loaded from {}", path.display()),
        None => println!("# No config file found, showing defaults"),
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Print the path of the config file in use.
pub fn cmd_config_path(config: &Config) -> anyhow::Result<()> {
    match config.source_path {
        Some(ref path) => println!("{}", path.display()),
        None => println!(
            "{} No config file found, using defaults",
            style("!").yellow()
        ),
    }
    Ok(())
}
