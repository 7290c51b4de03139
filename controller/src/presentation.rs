use thiserror::Error;

use climate_wrapper_common::{PresentationCommand, ThermostatMode};

use crate::supervisor::{Supervisor, SupervisorError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresentationWrite {
    Mode(ThermostatMode),
    Target(f32),
    Enable(bool),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PresentationError {
    #[error("invalid mode `{0}`, use off, heat or auto")]
    InvalidMode(String),
    #[error("invalid temperature value `{0}`")]
    InvalidTemperature(String),
    #[error("invalid switch value `{0}`, use on or off")]
    InvalidSwitch(String),
    #[error(transparent)]
    Rejected(#[from] SupervisorError),
}

impl PresentationWrite {
    pub fn parse(command: PresentationCommand, raw: &str) -> Result<Self, PresentationError> {
        let value = raw.trim();
        match command {
            PresentationCommand::Mode => ThermostatMode::parse(value)
                .map(Self::Mode)
                .ok_or_else(|| PresentationError::InvalidMode(value.to_string())),
            PresentationCommand::Target => value
                .parse::<f32>()
                .ok()
                .filter(|target| target.is_finite())
                .map(Self::Target)
                .ok_or_else(|| PresentationError::InvalidTemperature(value.to_string())),
            PresentationCommand::Enable => match value.to_ascii_lowercase().as_str() {
                "on" | "true" | "1" => Ok(Self::Enable(true)),
                "off" | "false" | "0" => Ok(Self::Enable(false)),
                _ => Err(PresentationError::InvalidSwitch(value.to_string())),
            },
        }
    }

    pub fn apply(self, supervisor: &mut Supervisor) -> Result<(), PresentationError> {
        match self {
            Self::Mode(mode) => supervisor.set_mode(mode)?,
            Self::Target(value) => supervisor.set_target_temperature(value)?,
            Self::Enable(enabled) => supervisor.set_enabled(enabled)?,
        }
        Ok(())
    }
}
