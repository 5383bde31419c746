use crate::error::PublisherError;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use tracing::{debug, info};

pub trait SetDefaults {
    fn set_defaults(&mut self);
}

pub struct ConfigClientConfig {
    config_path: String,
}

impl ConfigClientConfig {
    pub fn new(config_path: String) -> Result<Self, PublisherError> {
        debug!("ConfigClientConfig::new(config_path: {})", config_path);
        Ok(Self { config_path })
    }

    /// Returns `None` when `CONFIG_PATH` is not set; the publisher then runs
    /// on environment variables and defaults alone.
    pub fn from_env() -> Result<Option<Self>, PublisherError> {
        match env::var("CONFIG_PATH") {
            Ok(config_path) if !config_path.is_empty() => Ok(Some(Self::new(config_path)?)),
            _ => Ok(None),
        }
    }
}

pub struct ConfigClient {
    config: ConfigClientConfig,
}

impl ConfigClient {
    pub fn new(config: ConfigClientConfig) -> Self {
        Self { config }
    }

    pub fn read_config_from_file<T>(&self) -> Result<T, PublisherError>
    where
        T: DeserializeOwned + SetDefaults,
    {
        let config_file_contents = fs::read_to_string(&self.config.config_path)?;
        let mut config: T = serde_yaml::from_str(&config_file_contents)?;

        config.set_defaults();

        info!("Loaded config from {}", &self.config.config_path);

        Ok(config)
    }
}
