use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File-level defaults; every key is optional and CLI flags win.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Directory `@@include` paths are resolved against
    pub include_root: Option<PathBuf>,

    /// Initial project name (project mode only)
    pub project_name: Option<String>,

    /// Run in namespace mode
    pub namespace_mode: bool,

    /// Emit the final #undef block; `None` means yes
    pub finalize: Option<bool>,
}

const CONFIG_PATHS: [&str; 4] = ["atpp.toml", "atpp.yaml", "atpp.json", ".atpp.toml"];

/// Load from `explicit`, or the first config file found in the working
/// directory, then overlay `ATPP_*` environment variables.
pub fn load_config(explicit: Option<&Path>) -> Result<Config>
{
    let mut builder = config::Config::builder();

    match explicit
    {
        Some(path) =>
        {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        None =>
        {
            if let Some(path) = CONFIG_PATHS
                .iter()
                .find(|p| Path::new(p).exists())
            {
                builder = builder.add_source(config::File::with_name(path));
            }
        }
    }

    builder = builder.add_source(config::Environment::with_prefix("ATPP"));

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}
