use std::{env, path::Path};

use log::{info, warn};

use crate::error::OutageError;

pub const API_KEY: &str = "API_KEY";
pub const API_URL: &str = "API_URL";
pub const SITE_ID: &str = "SITE_ID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    /// Always ends with a '/', endpoint paths are appended to it.
    pub api_url: String,
    pub site_id: String,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Config, OutageError> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    /// Read the configuration from the process environment, with `site_id`
    /// taking the place of `SITE_ID` when given.
    pub fn from_env_with_site(site_id: Option<String>) -> Result<Config, OutageError> {
        Config::from_lookup_with_site(|name| env::var(name).ok(), site_id)
    }

    pub fn from_lookup_with_site<F>(lookup: F, site_id: Option<String>) -> Result<Config, OutageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Config::from_lookup(|name| match (name, &site_id) {
            (SITE_ID, Some(id)) => Some(id.clone()),
            _ => lookup(name),
        })
    }

    /// Build the configuration from an arbitrary variable lookup.  Missing or
    /// blank values are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, OutageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| -> Result<String, OutageError> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ => Err(OutageError::ConfigurationMissing(name.to_string())),
            }
        };
        let mut api_url = get(API_URL)?;
        if !api_url.ends_with('/') {
            api_url.push('/');
        }
        Ok(Config {
            api_key: get(API_KEY)?,
            api_url,
            site_id: get(SITE_ID)?,
        })
    }
}

/// Load the dotenv file for the given environment name, e.g. `.env/prod.env`.
/// Falls back to a `.env` file in the working directory.  Variables already
/// set in the process environment are not overwritten.
pub fn load_dotenv(env_name: &str) {
    let path = format!(".env/{}.env", env_name);
    if Path::new(&path).is_file() {
        match dotenvy::from_path(Path::new(&path)) {
            Ok(_) => info!("Loaded configuration from {}", path),
            Err(e) => warn!("Failed to load {}: {}", path, e),
        }
        return;
    }
    match dotenvy::dotenv() {
        Ok(p) => info!("Loaded configuration from {}", p.display()),
        Err(_) => warn!("No dotenv file found, using the process environment only"),
    }
}
