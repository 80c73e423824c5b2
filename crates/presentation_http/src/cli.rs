//! Command line of the `telegen` binary

use std::path::PathBuf;

use clap::Parser;
use infrastructure::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "telegen")]
#[command(author, version, about = "Synthetic log, metric and trace generator", long_about = None)]
pub struct Cli {
    /// Configuration file; `config.toml` in the working directory is tried when unset
    #[arg(short, long, env = "TELEGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load the configuration this command line points at
    ///
    /// `TELEGEN_*` variables override the file in both cases.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any source fails to
    /// deserialize.
    pub fn load_config(&self) -> Result<AppConfig, config::ConfigError> {
        self.config
            .as_deref()
            .map_or_else(AppConfig::load, AppConfig::load_file)
    }
}
