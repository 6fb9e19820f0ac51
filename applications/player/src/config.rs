/// Player configuration
use crate::error::{PlayerError, Result};
use nothing_playback::{PlaybackConfig, RepeatMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "nothing-player.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,

    #[serde(default)]
    pub library: LibrarySettings,

    #[serde(default)]
    pub network: NetworkSettings,
}

/// Remote persistence service; both fields unset means local-only
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerSettings {
    pub url: Option<String>,

    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_volume")]
    pub volume: f32,

    #[serde(default)]
    pub shuffle: bool,

    #[serde(default)]
    pub repeat: RepeatMode,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// JSON track list replacing the bundled sample tracks
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkSettings {
    #[serde(default = "default_start_online")]
    pub start_online: bool,
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `nothing-player.toml` is read
    /// if present. `NOTHING_`-prefixed variables override the file, with `__`
    /// between section and key (`NOTHING_SERVER__URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with NOTHING_)
        settings = settings.add_source(
            config::Environment::with_prefix("NOTHING")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| PlayerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| PlayerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let volume = self.playback.volume;
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(PlayerError::Config(format!(
                "playback.volume must be between 0.0 and 1.0, got {}",
                volume
            )));
        }

        match (&self.server.url, &self.server.access_token) {
            (None, Some(_)) => {
                return Err(PlayerError::Config(
                    "server.access_token is set but server.url is missing (set NOTHING_SERVER__URL)"
                        .to_string(),
                ));
            }
            (Some(url), _) if !url.starts_with("http://") && !url.starts_with("https://") => {
                return Err(PlayerError::Config(format!(
                    "server.url must start with http:// or https://, got {:?}",
                    url
                )));
            }
            _ => {}
        }

        if let Some(path) = &self.library.catalog_path {
            if !path.exists() {
                return Err(PlayerError::Config(format!(
                    "Catalog file not found at {:?}",
                    path
                )));
            }
        }

        Ok(())
    }

    /// Settings for the playback controller
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            volume: self.playback.volume,
            shuffle: self.playback.shuffle,
            repeat: self.playback.repeat,
            ..PlaybackConfig::default()
        }
    }
}

// Default values
fn default_volume() -> f32 {
    1.0
}

fn default_start_online() -> bool {
    true
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            start_online: default_start_online(),
        }
    }
}
