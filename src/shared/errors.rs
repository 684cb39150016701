use std::error::Error;
use std::fmt;
use std::io;

use super::structs::{Floor, Request};

/// A request that can never be serviced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    NonPositiveFloor { start_floor: Floor, end_floor: Floor },
    SameFloor(Floor),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NonPositiveFloor {
                start_floor,
                end_floor,
            } => write!(
                f,
                "floors must be positive (got {} -> {})",
                start_floor, end_floor
            ),
            RequestError::SameFloor(floor) => {
                write!(f, "start and end floor are both {}", floor)
            }
        }
    }
}

impl Error for RequestError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    Rejected(RequestError),
    NoEligibleElevator(Request),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Rejected(e) => write!(f, "request rejected: {}", e),
            DispatchError::NoEligibleElevator(request) => {
                write!(f, "no elevator available for request {}", request)
            }
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DispatchError::Rejected(e) => Some(e),
            DispatchError::NoEligibleElevator(_) => None,
        }
    }
}

impl From<RequestError> for DispatchError {
    fn from(e: RequestError) -> Self {
        DispatchError::Rejected(e)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read configuration file: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse configuration file: {}", e),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}
