use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::SubscriptionDurations;

/// Service configuration, read from a TOML file
///
/// ```toml
/// [subscriptions]
/// ANNUAL = 12
/// SEMESTRIAL = 6
/// MONTHLY = 1
/// ```
///
/// When the `subscriptions` table is present, only the types it lists can be subscribed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Duration in months of each subscription type
    #[serde(default)]
    pub subscriptions: SubscriptionDurations,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = content.parse::<Config>()?;
        tracing::debug!(path = %path.display(), "configuration loaded");

        Ok(config)
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read configuration file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
