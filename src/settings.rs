//! # Settings Module
//!
//! ## Purpose
//! Keeps every tunable of the crate in one serializable structure so that a
//! simulation driver can read it from a JSON file instead of hardcoding
//! tolerances and policies at call sites.
//!
//! ## Architecture
//! - **KineticsSettings**: top-level configuration, JSON (de)serializable
//! - **RootFindSettings**: tolerances, iteration cap and print level of `RootFind`
//! - **ThermoSettings**: reference-pressure tolerance and mismatch policy,
//!   midpoint continuity check of the piecewise thermo managers
//! - **LogSettings**: level and optional log file for `Utils::logger::init_logger`
//!
//! Every field has a default, and missing keys in a file fall back to it.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "root_find": { "rtol": 1e-5, "atol": 1e-11, "max_iterations": 100, "print_level": 0 },
//!   "thermo": { "pressure_tolerance": 0.1, "pressure_policy": "Overwrite", "check_continuity": true },
//!   "log": { "level": "info", "log_file": null }
//! }
//! ```
//!
//! ## Usage
//! ```rust, ignore
//! use KiRates::settings::KineticsSettings;
//! let settings = KineticsSettings::from_file_or_default("kinetics_config.json");
//! settings.save_config("kinetics_config.json")?;
//! ```

use crate::error::KineticsError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What a thermo manager does when a newly installed species reports a reference
/// pressure different from the one already established.
///
/// In every case a warning goes to the diagnostic sink first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PressureMismatchPolicy {
    /// the new value replaces the stored one, last write wins
    #[default]
    Overwrite,
    /// the first established value is kept
    KeepFirst,
    /// the species is refused with a ConfigurationError
    Reject,
}

/// Tolerances and limits of the bounded root finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootFindSettings {
    /// relative tolerance on the scaled residual
    pub rtol: f64,
    /// absolute tolerance on the residual
    pub atol: f64,
    /// iteration cap of one solve
    pub max_iterations: usize,
    /// 0 - silent, 1 - summary at the end of a solve, 3 - every iteration
    pub print_level: u8,
}

impl Default for RootFindSettings {
    fn default() -> Self {
        Self {
            rtol: 1.0e-5,
            atol: 1.0e-11,
            max_iterations: 100,
            print_level: 0,
        }
    }
}

/// Behaviour of the piecewise thermo managers during `install`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermoSettings {
    /// largest tolerated reference-pressure difference between species, Pa
    pub pressure_tolerance: f64,
    pub pressure_policy: PressureMismatchPolicy,
    /// warn when low and high polynomials disagree at the midpoint
    pub check_continuity: bool,
}

impl Default for ThermoSettings {
    fn default() -> Self {
        Self {
            pressure_tolerance: 0.1,
            pressure_policy: PressureMismatchPolicy::Overwrite,
            check_continuity: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub log_file: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Top-level configuration of the crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KineticsSettings {
    pub root_find: RootFindSettings,
    pub thermo: ThermoSettings,
    pub log: LogSettings,
}

impl KineticsSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a JSON file.
    ///
    /// # Arguments
    /// * `config_file` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(KineticsSettings)` - parsed and validated configuration
    /// * `Err(KineticsError)` - missing file, malformed JSON or out-of-range values
    pub fn load_config<P: AsRef<Path>>(config_file: P) -> Result<Self, KineticsError> {
        let content = fs::read_to_string(config_file)?;
        let settings: KineticsSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads configuration from a JSON file, falling back to defaults.
    ///
    /// A missing file is not an error; an unreadable or invalid one is logged and
    /// replaced by the defaults.
    pub fn from_file_or_default<P: AsRef<Path>>(config_file: P) -> Self {
        let path = config_file.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_config(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "settings file '{}' ignored, defaults are used: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Serializes the configuration as pretty JSON into `config_file`.
    pub fn save_config<P: AsRef<Path>>(&self, config_file: P) -> Result<(), KineticsError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_file, content)?;
        Ok(())
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), KineticsError> {
        let rf = &self.root_find;
        if !(rf.rtol > 0.0) || !rf.rtol.is_finite() {
            return Err(KineticsError::config(
                "KineticsSettings::validate",
                format!("root_find.rtol must be positive, got {}", rf.rtol),
            ));
        }
        if !(rf.atol >= 0.0) || !rf.atol.is_finite() {
            return Err(KineticsError::config(
                "KineticsSettings::validate",
                format!("root_find.atol must be non-negative, got {}", rf.atol),
            ));
        }
        if rf.max_iterations == 0 {
            return Err(KineticsError::config(
                "KineticsSettings::validate",
                "root_find.max_iterations must be at least 1",
            ));
        }
        if !(self.thermo.pressure_tolerance >= 0.0) {
            return Err(KineticsError::config(
                "KineticsSettings::validate",
                format!(
                    "thermo.pressure_tolerance must be non-negative, got {}",
                    self.thermo.pressure_tolerance
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let s = KineticsSettings::new();
        assert_eq!(s.root_find.rtol, 1.0e-5);
        assert_eq!(s.root_find.atol, 1.0e-11);
        assert_eq!(s.root_find.max_iterations, 100);
        assert_eq!(s.thermo.pressure_tolerance, 0.1);
        assert_eq!(s.thermo.pressure_policy, PressureMismatchPolicy::Overwrite);
        assert_eq!(s.log.level, "info");
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let mut s = KineticsSettings::new();
        s.root_find.rtol = 1e-8;
        s.root_find.print_level = 3;
        s.thermo.pressure_policy = PressureMismatchPolicy::Reject;
        s.save_config(file.path()).unwrap();
        let loaded = KineticsSettings::load_config(file.path()).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "thermo": {{ "pressure_policy": "KeepFirst" }} }}"#
        )
        .unwrap();
        let loaded = KineticsSettings::load_config(file.path()).unwrap();
        assert_eq!(loaded.thermo.pressure_policy, PressureMismatchPolicy::KeepFirst);
        assert_eq!(loaded.thermo.pressure_tolerance, 0.1);
        assert_eq!(loaded.root_find, RootFindSettings::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "root_find": {{ "rtol": -1.0 }} }}"#).unwrap();
        let err = KineticsSettings::load_config(file.path()).unwrap_err();
        assert!(err.is_configuration_error());
        // and the lenient loader falls back to defaults
        let s = KineticsSettings::from_file_or_default(file.path());
        assert_eq!(s, KineticsSettings::default());
    }

    #[test]
    fn test_missing_file() {
        let err = KineticsSettings::load_config("no/such/kinetics_config.json").unwrap_err();
        assert!(matches!(err, KineticsError::Io(_)));
        let s = KineticsSettings::from_file_or_default("no/such/kinetics_config.json");
        assert_eq!(s, KineticsSettings::default());
    }

    #[test]
    fn test_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = KineticsSettings::load_config(file.path()).unwrap_err();
        assert!(matches!(err, KineticsError::Serde(_)));
    }
}
