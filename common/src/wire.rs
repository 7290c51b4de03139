use serde::{Deserialize, Serialize};

use crate::{
    device::{DeviceChange, DeviceCommand, DeviceSnapshot, Notification},
    error::HostError,
    origin::{EventOrigin, OriginId},
    types::{DeviceAction, DeviceMode},
};

pub const UNAVAILABLE: &str = "unavailable";
const UNKNOWN: &str = "unknown";

pub const MAX_PAYLOAD_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatePayload {
    pub state: DeviceMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hvac_action: Option<DeviceAction>,
    pub current_temperature: f32,
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_temp: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temp: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<EventOrigin>,
}

impl DeviceStatePayload {
    pub fn into_change(self) -> DeviceChange {
        DeviceChange {
            snapshot: DeviceSnapshot {
                mode: self.state,
                action: self.hvac_action,
                current_temperature: self.current_temperature,
                target_temperature: self.temperature,
                min_temp: self.min_temp,
                max_temp: self.max_temp,
            },
            origin: self.context,
        }
    }
}

pub fn parse_device_state(entity_id: &str, raw: &str) -> Result<DeviceChange, HostError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == UNAVAILABLE || trimmed == UNKNOWN {
        return Err(HostError::Unavailable(entity_id.to_string()));
    }

    let payload: DeviceStatePayload =
        serde_json::from_str(trimmed).map_err(|_| HostError::Malformed {
            entity_id: entity_id.to_string(),
            raw: trimmed.to_string(),
        })?;

    if !payload.current_temperature.is_finite() || !payload.temperature.is_finite() {
        return Err(HostError::Malformed {
            entity_id: entity_id.to_string(),
            raw: trimmed.to_string(),
        });
    }
    Ok(payload.into_change())
}

pub fn parse_sensor_reading(entity_id: &str, raw: &str) -> Result<f32, HostError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == UNAVAILABLE || trimmed == UNKNOWN {
        return Err(HostError::Unavailable(entity_id.to_string()));
    }

    match trimmed.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(HostError::Malformed {
            entity_id: entity_id.to_string(),
            raw: trimmed.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommandContext {
    pub id: OriginId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum CommandPayload {
    SetHvacMode {
        hvac_mode: DeviceMode,
        context: CommandContext,
    },
    SetTemperature {
        temperature: f32,
        context: CommandContext,
    },
}

impl CommandPayload {
    pub fn new(command: DeviceCommand, origin: OriginId) -> Self {
        let context = CommandContext { id: origin };
        match command {
            DeviceCommand::SetMode(hvac_mode) => Self::SetHvacMode { hvac_mode, context },
            DeviceCommand::SetTemperature(temperature) => Self::SetTemperature {
                temperature,
                context,
            },
        }
    }

    pub fn command(&self) -> DeviceCommand {
        match *self {
            Self::SetHvacMode { hvac_mode, .. } => DeviceCommand::SetMode(hvac_mode),
            Self::SetTemperature { temperature, .. } => DeviceCommand::SetTemperature(temperature),
        }
    }

    pub fn origin(&self) -> OriginId {
        match self {
            Self::SetHvacMode { context, .. } | Self::SetTemperature { context, .. } => context.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub message: String,
}

impl From<&Notification> for NotificationPayload {
    fn from(notification: &Notification) -> Self {
        Self {
            title: notification.title.clone(),
            message: notification.message.clone(),
        }
    }
}
