//! N-body Services Layer
//!
//! Everything that feeds the simulation from outside the tick loop: the
//! settings file with its preset catalog, and the control-command queue that
//! stands in for an interactive editor.

pub mod control;
pub mod settings;

pub use control::ControlQueue;
pub use settings::{Preset, RunSettings, Settings, SettingsError, SETTINGS_ENV};
