//! `scanomatic config`

use anyhow::Result;
use scanomatic_core::Config;
use std::path::Path;

pub fn show(explicit: Option<&Path>) -> Result<()> {
    let config = Config::load(explicit)?;

    match explicit.map(Path::to_path_buf).or_else(Config::default_path) {
        Some(path) if path.exists() => println!("# {}", path.display()),
        Some(path) => println!("# {} (not found, using defaults)", path.display()),
        None => println!("# no config directory, using defaults"),
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
