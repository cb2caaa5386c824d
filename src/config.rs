/// Station configuration loader.
///
/// Builds the immutable `Registry` the relay runs against: the built-in
/// station table, optionally extended or overridden by a stations.toml file,
/// with each station's upload secret resolved from the environment once at
/// startup.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::ingest::SourceKind;
use crate::model::{RelayError, Result};
use crate::stations::BUILTIN_STATIONS;
use crate::upload::WINDGURU_UPLOAD_URL;

/// Config file read when `--config` is not given. Its absence is not an error.
pub const DEFAULT_CONFIG_PATH: &str = "stations.toml";

/// Fully resolved configuration for one station.
#[derive(Debug, Clone)]
pub struct StationConfig {
    pub id: String,
    pub name: String,
    pub url: String,
    pub interval_seconds: u32,
    pub source: SourceKind,
    pub remote_id: Option<String>,
    pub secret_env: String,
    pub secret: Option<String>,
}

impl StationConfig {
    /// The upstream station id, for sources that need one.
    pub fn require_remote_id(&self) -> Result<&str> {
        self.remote_id.as_deref().ok_or_else(|| {
            RelayError::Config(format!("station '{}' has no remote_id configured", self.id))
        })
    }
}

/// One `[[station]]` table in stations.toml.
#[derive(Debug, Deserialize)]
struct StationEntry {
    id: String,
    name: Option<String>,
    url: String,
    interval_seconds: u32,
    source: SourceKind,
    remote_id: Option<String>,
    secret_env: Option<String>,
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    upload_url: Option<String>,
    #[serde(default)]
    station: Vec<StationEntry>,
}

/// Default secret variable for a station id, e.g. `lindau-lsc` →
/// `WINDSPEED_PASS_LINDAU_LSC`.
pub fn default_secret_env(id: &str) -> String {
    format!("WINDSPEED_PASS_{}", id.to_uppercase().replace('-', "_"))
}

/// Read-only station lookup, populated once at startup.
#[derive(Debug, Clone)]
pub struct Registry {
    upload_url: String,
    stations: BTreeMap<String, StationConfig>,
}

impl Registry {
    /// Registry of the built-in stations only.
    pub fn builtin<F>(secrets: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let stations = BUILTIN_STATIONS
            .iter()
            .map(|s| {
                let config = StationConfig {
                    id: s.id.to_string(),
                    name: s.name.to_string(),
                    url: s.url.to_string(),
                    interval_seconds: s.interval_seconds,
                    source: s.source,
                    remote_id: s.remote_id.map(str::to_string),
                    secret_env: s.secret_env.to_string(),
                    secret: resolve_secret(&secrets, s.secret_env),
                };
                (config.id.clone(), config)
            })
            .collect();

        Registry {
            upload_url: WINDGURU_UPLOAD_URL.to_string(),
            stations,
        }
    }

    /// Built-in stations with the contents of a stations.toml applied on top.
    /// A file entry with the id of a built-in station replaces it.
    pub fn from_toml_str<F>(contents: &str, secrets: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| RelayError::Config(format!("invalid station config: {}", e)))?;

        let mut registry = Registry::builtin(&secrets);

        if let Some(url) = file.upload_url {
            registry.upload_url = url;
        }

        for entry in file.station {
            let config = resolve_entry(entry, &secrets)?;
            registry.stations.insert(config.id.clone(), config);
        }

        Ok(registry)
    }

    /// Loads the registry.
    ///
    /// With an explicit `path` the file must exist. Without one,
    /// `DEFAULT_CONFIG_PATH` is used if present and the built-in table
    /// otherwise.
    pub fn load<F>(path: Option<&Path>, secrets: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = match path {
            Some(p) => p,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if !default.exists() {
                    return Ok(Registry::builtin(secrets));
                }
                default
            }
        };

        let contents = fs::read_to_string(path)
            .map_err(|e| RelayError::Config(format!("failed to read {}: {}", path.display(), e)))?;

        Registry::from_toml_str(&contents, secrets)
    }

    /// Looks up a station by identifier.
    ///
    /// # Errors
    /// `RelayError::UnknownStation` if the id is not configured.
    pub fn lookup(&self, id: &str) -> Result<&StationConfig> {
        self.stations
            .get(id)
            .ok_or_else(|| RelayError::UnknownStation(id.to_string()))
    }

    /// All stations, ordered by id.
    pub fn stations(&self) -> impl Iterator<Item = &StationConfig> {
        self.stations.values()
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

/// Looks up a station secret. A blank value counts as unset.
fn resolve_secret<F>(secrets: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    secrets(name).filter(|s| !s.trim().is_empty())
}

fn resolve_entry<F>(entry: StationEntry, secrets: &F) -> Result<StationConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if entry.id.trim().is_empty() {
        return Err(RelayError::Config("station id must not be empty".to_string()));
    }
    if entry.url.trim().is_empty() {
        return Err(RelayError::Config(format!("station '{}' has no url", entry.id)));
    }
    if entry.interval_seconds == 0 {
        return Err(RelayError::Config(format!(
            "station '{}' interval_seconds must be positive",
            entry.id
        )));
    }
    if entry.source.requires_remote_id() && entry.remote_id.is_none() {
        return Err(RelayError::Config(format!(
            "station '{}' uses {} and needs a remote_id",
            entry.id,
            entry.source.name()
        )));
    }

    let secret_env = entry
        .secret_env
        .unwrap_or_else(|| default_secret_env(&entry.id));
    let secret = resolve_secret(secrets, &secret_env);

    Ok(StationConfig {
        name: entry.name.unwrap_or_else(|| entry.id.clone()),
        id: entry.id,
        url: entry.url,
        interval_seconds: entry.interval_seconds,
        source: entry.source,
        remote_id: entry.remote_id,
        secret_env,
        secret,
    })
}
