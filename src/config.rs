/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::ConfigError;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub system: SystemConfig,
    pub elevator: ElevatorConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SystemConfig {
    pub n_elevators: usize,
    pub n_floors: i32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    /// Milliseconds per floor step
    pub floor_travel_time: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            n_elevators: 3,
            n_floors: 10,
        }
    }
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        ElevatorConfig {
            floor_travel_time: 1000,
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/

/// Loads the configuration from a TOML file. A missing file gives the defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config_str = match fs::read_to_string(path.as_ref()) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(ConfigError::Io(e)),
    };
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(config_str).map_err(ConfigError::Parse)
}

/***************************************/
/*             Unit tests              */
/***************************************/
