use serde::Deserialize;
use std::fs;
use tracing::{info, warn};

use crate::error::Result;
use crate::pathfinding::{Finder, FinderKind, Heuristic};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_cols")]
    pub cols: i32,
    #[serde(default = "default_rows")]
    pub rows: i32,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
}

#[derive(Debug, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_operations_per_second")]
    pub operations_per_second: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub finder: FinderKind,
    #[serde(default)]
    pub heuristic: Heuristic,
    #[serde(default)]
    pub allow_diagonal: bool,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default = "default_trace_path")]
    pub trace_path: String,
}

// Default values
fn default_cols() -> i32 { 64 }
fn default_rows() -> i32 { 36 }
fn default_cell_size() -> f32 { 20.0 }
fn default_operations_per_second() -> u32 { 300 }
fn default_window_title() -> String { "Pathviz - Grid Search Visualizer".to_string() }
fn default_bg_r() -> u8 { 30 }
fn default_bg_g() -> u8 { 30 }
fn default_bg_b() -> u8 { 30 }
fn default_log_filter() -> String { "info".to_string() }
fn default_trace_path() -> String { "search_trace.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
            cell_size: default_cell_size(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            operations_per_second: default_operations_per_second(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            trace_path: default_trace_path(),
        }
    }
}

impl SearchConfig {
    pub fn build_finder(&self) -> Box<dyn Finder> {
        self.finder.build(self.heuristic, self.allow_diagonal)
    }
}

impl Config {
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from `config.toml`, or use defaults if the file
    /// doesn't exist
    pub fn load() -> Self {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path, e);
                    warn!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                info!("No {} found, using default configuration", path);
                Config::default()
            }
        }
    }
}
