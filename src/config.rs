//! Application-level configuration loading: roster size, catalog locations and
//! scoring switches.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::GameSettings;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "RATING_PARTY_CONFIG_PATH";
/// Environment variable overriding the number of players.
const PLAYERS_ENV: &str = "RATING_PARTY_PLAYERS";
/// Environment variable overriding the questions file.
const QUESTIONS_ENV: &str = "RATING_PARTY_QUESTIONS";

const DEFAULT_QUESTIONS_FILE: &str = "static/JSON/questions/questions.json";
const DEFAULT_ROUND_CONFIGS_DIR: &str = "static/JSON/playercounts";

#[derive(Debug, Clone, PartialEq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Players that must join before the game starts.
    pub players: usize,
    /// Questions JSON file.
    pub questions_file: PathBuf,
    /// Directory holding one `<n>player.json` round configuration per roster size.
    pub round_configs_dir: PathBuf,
    /// Wait for a moderator before scoring a fully answered round.
    pub require_score_confirmation: bool,
    /// Distance under which the active guess counts as exact.
    pub exact_tolerance: f64,
    /// Token moderators present in `X-Moderator-Token`; moderator routes are open when unset.
    pub moderator_token: Option<String>,
}

impl AppConfig {
    /// Load the configuration from disk and the environment, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = Self::load_from(&path);
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    /// Load the configuration file at `path`, using defaults when it is missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        players = app_config.players,
                        "loaded game config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Apply environment overrides fetched through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(PLAYERS_ENV) {
            match value.trim().parse::<usize>() {
                Ok(players) if players > 0 => self.players = players,
                _ => warn!(%value, "ignoring invalid {PLAYERS_ENV}"),
            }
        }
        if let Some(value) = lookup(QUESTIONS_ENV).filter(|value| !value.is_empty()) {
            self.questions_file = PathBuf::from(value);
        }
    }

    /// Session settings derived from this configuration.
    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            expected_player_count: self.players,
            require_score_confirmation: self.require_score_confirmation,
            exact_tolerance: self.exact_tolerance,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            players: 1,
            questions_file: PathBuf::from(DEFAULT_QUESTIONS_FILE),
            round_configs_dir: PathBuf::from(DEFAULT_ROUND_CONFIGS_DIR),
            require_score_confirmation: false,
            exact_tolerance: 0.0,
            moderator_token: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    players: Option<usize>,
    questions_file: Option<PathBuf>,
    round_configs_dir: Option<PathBuf>,
    require_score_confirmation: Option<bool>,
    exact_tolerance: Option<f64>,
    moderator_token: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();

        let players = match value.players {
            Some(0) => {
                warn!("config requests zero players; using {}", defaults.players);
                defaults.players
            }
            Some(players) => players,
            None => defaults.players,
        };
        let exact_tolerance = match value.exact_tolerance {
            Some(tolerance) if tolerance.is_finite() && tolerance >= 0.0 => tolerance,
            Some(tolerance) => {
                warn!(tolerance, "invalid exact tolerance; using exact equality");
                defaults.exact_tolerance
            }
            None => defaults.exact_tolerance,
        };

        Self {
            players,
            questions_file: value.questions_file.unwrap_or(defaults.questions_file),
            round_configs_dir: value
                .round_configs_dir
                .unwrap_or(defaults.round_configs_dir),
            require_score_confirmation: value
                .require_score_confirmation
                .unwrap_or(defaults.require_score_confirmation),
            exact_tolerance,
            moderator_token: value.moderator_token.filter(|token| !token.is_empty()),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
