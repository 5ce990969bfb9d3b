use directories::ProjectDirs;
use divvy::{HandleMetrics, TICKS_PER_CIRCLE};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// Where the first sector starts, turning clockwise from there.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    #[strum(serialize = "East", serialize = "e", serialize = "0")]
    East,
    #[strum(serialize = "South", serialize = "s", serialize = "90")]
    South,
    #[strum(serialize = "West", serialize = "w", serialize = "180")]
    West,
    #[strum(serialize = "North", serialize = "n", serialize = "270")]
    North,
}

impl Origin {
    pub fn as_index(&self) -> usize {
        *self as usize
    }

    pub fn zero_angle(&self) -> i64 {
        self.as_index() as i64 * TICKS_PER_CIRCLE / 4
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub dividers: usize,
    pub total: i64,
    pub origin: Origin,
    pub palette: Vec<String>,
    pub handles: HandleMetrics,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dividers: 5,
            total: 100,
            origin: Origin::default(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            handles: HandleMetrics::default(),
        }
    }
}

// Sasha Trubetskoy's 20 distinct colors
const DEFAULT_PALETTE: [&str; 20] = [
    "#e6194B", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6",
    "#bfef45", "#fabebe", "#469990", "#e6beff", "#9A6324", "#fffac8", "#800000", "#aaffc3",
    "#808000", "#ffd8b1", "#000075", "#a9a9a9",
];

/// Command line values that win over the config file, across reloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub dividers: Option<usize>,
    pub total: Option<i64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(dividers) = self.dividers {
            config.dividers = dividers;
        }
        if let Some(total) = self.total {
            config.total = total;
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "divvy", "pie").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("PIE"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Falling back to default config: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    if let Err(e) = watch_config(tx).await {
        log::error!("Config watcher error: {}", e);
    }
}

async fn watch_config(tx: Sender<AppEvent>) -> Result<(), ConfigError> {
    let config_path = get_config_path()?;
    let Some(config_dir) = config_path.parent().map(|p| p.to_path_buf()) else {
        return Ok(());
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return Ok(());
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_deserialization() {
        let cases = vec![
            ("\"east\"", Origin::East),
            ("\"East\"", Origin::East),
            ("\"EAST\"", Origin::East),
            ("\"e\"", Origin::East),
            ("\"0\"", Origin::East),
            ("\"n\"", Origin::North),
            ("\"North\"", Origin::North),
            ("\"270\"", Origin::North),
            ("\"s\"", Origin::South),
        ];

        for (json, expected) in cases {
            let deserialized: Origin = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_origin_zero_angle() {
        assert_eq!(Origin::East.zero_angle(), 0);
        assert_eq!(Origin::South.zero_angle(), 1440);
        assert_eq!(Origin::North.zero_angle(), 4320);
        assert_eq!(Origin::West.zero_angle(), 2880);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"total": 360, "origin": "north", "handles": {"divider_size": 20}}"#)
                .unwrap();
        assert_eq!(config.dividers, 5);
        assert_eq!(config.total, 360);
        assert_eq!(config.origin, Origin::North);
        assert_eq!(config.palette.len(), 20);
        assert_eq!(config.handles.divider_size, 20.0);
        assert_eq!(config.handles.sector_size, 12.0);
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::default();
        Overrides {
            dividers: Some(2),
            total: None,
        }
        .apply(&mut config);
        assert_eq!((config.dividers, config.total), (2, 100));
    }

    #[test]
    fn test_bundled_default_config_parses() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.dividers, 5);
        assert_eq!(config.origin, Origin::North);
        assert_eq!(config.palette.len(), 6);
    }
}
