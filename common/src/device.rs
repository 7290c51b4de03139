use crate::{
    error::HostError,
    origin::{EventOrigin, OriginId},
    types::{DeviceAction, DeviceMode},
};

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSnapshot {
    pub mode: DeviceMode,
    pub action: Option<DeviceAction>,
    pub current_temperature: f32,
    pub target_temperature: f32,
    pub min_temp: Option<f32>,
    pub max_temp: Option<f32>,
}

impl DeviceSnapshot {
    pub fn difference(&self) -> f32 {
        self.target_temperature - self.current_temperature
    }

    pub fn clamp_target(&self, value: f32) -> f32 {
        let value = self.min_temp.map_or(value, |min| value.max(min));
        self.max_temp.map_or(value, |max| value.min(max))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceChange {
    pub snapshot: DeviceSnapshot,
    pub origin: Option<EventOrigin>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceCommand {
    SetMode(DeviceMode),
    SetTemperature(f32),
}

pub trait ClimateHost: Send + Sync {
    fn read_device(&self, entity_id: &str) -> Result<DeviceSnapshot, HostError>;

    fn read_sensor(&self, entity_id: &str) -> Result<f32, HostError>;

    /// Fire-and-forget; success is only visible through a later read.
    fn send_command(
        &self,
        entity_id: &str,
        command: DeviceCommand,
        origin: OriginId,
    ) -> Result<(), HostError>;

    fn is_present(&self, entity_id: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
}

pub trait NotificationSink: Send + Sync {
    fn create(&self, notification: &Notification);

    fn dismiss(&self, notification_id: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(current: f32, target: f32) -> DeviceSnapshot {
        DeviceSnapshot {
            mode: DeviceMode::Heat,
            action: Some(DeviceAction::Idle),
            current_temperature: current,
            target_temperature: target,
            min_temp: Some(7.0),
            max_temp: Some(30.0),
        }
    }

    #[test]
    fn difference_is_target_minus_current() {
        assert_eq!(snapshot(18.0, 19.5).difference(), 1.5);
    }

    #[test]
    fn clamp_respects_device_limits() {
        let device = snapshot(18.0, 19.0);
        assert_eq!(device.clamp_target(31.0), 30.0);
        assert_eq!(device.clamp_target(5.0), 7.0);
        assert_eq!(device.clamp_target(19.0), 19.0);
    }
}
