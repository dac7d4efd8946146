//! Settings management
//!
//! Settings live in a single JSON file. Every field is optional; anything
//! missing falls back to the built-in defaults, which reproduce the stock
//! preset catalog.

use std::path::{Path, PathBuf};

use nbody_core::glam::DVec3;
use nbody_core::{KernelParams, Simulation, SpawnSpec};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming the settings file.
pub const SETTINGS_ENV: &str = "NBODY_SETTINGS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings from {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize settings")]
    Serialize(#[from] serde_json::Error),

    #[error("no preset named '{name}'")]
    UnknownPreset { name: String },
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub kernel: KernelParams,
    pub presets: Vec<Preset>,
    /// Presets realized at startup, in order.
    pub startup: Vec<String>,
    pub run: RunSettings,
    /// RGBA stops for mass coloring, lightest to heaviest.
    pub palette: Vec<[f32; 4]>,
}

/// A named, reusable spawn spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub spec: SpawnSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Ticks to run before shutting down.
    pub ticks: u64,
    /// Emit a statistics line every this many ticks (0 disables).
    pub log_every: u64,
    /// Remove and re-add the first startup group every this many ticks
    /// (0 disables).
    pub toggle_every: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            ticks: 600,
            log_every: 60,
            toggle_every: 0,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kernel: KernelParams::default(),
            presets: builtin_presets(),
            startup: vec!["Default".to_string()],
            run: RunSettings::default(),
            palette: vec![
                [0.15, 0.25, 0.85, 1.0],
                [0.30, 0.80, 0.95, 1.0],
                [0.95, 0.90, 0.40, 1.0],
                [0.95, 0.45, 0.15, 1.0],
                [0.80, 0.10, 0.10, 1.0],
            ],
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Load from `path` when given, otherwise use the built-in defaults.
    pub fn load_or_default(path: Option<impl AsRef<Path>>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("no settings file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn preset(&self, name: &str) -> Result<&SpawnSpec, SettingsError> {
        self.presets
            .iter()
            .find(|preset| preset.name == name)
            .map(|preset| &preset.spec)
            .ok_or_else(|| SettingsError::UnknownPreset {
                name: name.to_string(),
            })
    }

    /// The specs named by `startup`, in order.
    pub fn startup_specs(&self) -> Result<Vec<SpawnSpec>, SettingsError> {
        self.startup
            .iter()
            .map(|name| self.preset(name).cloned())
            .collect()
    }

    /// Make every catalog preset available to the simulation by name.
    pub fn install_presets(&self, simulation: &mut Simulation) {
        for preset in &self.presets {
            simulation.register_preset(preset.name.clone(), preset.spec.clone());
        }
        debug!(count = self.presets.len(), "presets installed");
    }
}

fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "Default".to_string(),
            spec: SpawnSpec::default(),
        },
        Preset {
            name: "Rotating Disc".to_string(),
            spec: SpawnSpec {
                number_of_particles: 3000,
                center: DVec3::new(0.0, -15.0, 0.0),
                radius: 30.0,
                shape_elipsoid: DVec3::new(1.0, 0.02, 1.0),
                turbulence_strength: 0.01,
                turbulence_elipsoid: DVec3::ONE,
                angular_velocity: 0.004,
                seed: 1,
            },
        },
        Preset {
            name: "Static Disc".to_string(),
            spec: SpawnSpec {
                number_of_particles: 3000,
                center: DVec3::new(0.0, 15.0, 0.0),
                radius: 30.0,
                shape_elipsoid: DVec3::new(1.0, 0.005, 1.0),
                turbulence_strength: 0.0,
                turbulence_elipsoid: DVec3::ONE,
                angular_velocity: 0.0,
                seed: 2,
            },
        },
    ]
}
