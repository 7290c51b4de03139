use climate_wrapper_common::{
    wire::DeviceStatePayload, DeviceAction, DeviceCommand, DeviceMode, EventOrigin,
};

const AMBIENT_C: f32 = 12.0;
const HEAT_RATE_C_PER_S: f32 = 0.02;
const LOSS_RATE_PER_S: f32 = 0.001;
const DEVICE_BIAS_C: f32 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedRoom {
    pub mode: DeviceMode,
    pub device_target: f32,
    pub room_temp: f32,
    pub min_temp: f32,
    pub max_temp: f32,
}

impl Default for SimulatedRoom {
    fn default() -> Self {
        Self {
            mode: DeviceMode::Heat,
            device_target: 18.0,
            room_temp: 17.0,
            min_temp: 7.0,
            max_temp: 30.0,
        }
    }
}

impl SimulatedRoom {
    pub fn device_temp(&self) -> f32 {
        let bias = if self.is_heating() { DEVICE_BIAS_C } else { 0.0 };
        self.room_temp + bias
    }

    pub fn is_heating(&self) -> bool {
        self.mode == DeviceMode::Heat && self.room_temp < self.device_target
    }

    pub fn apply(&mut self, command: DeviceCommand) {
        match command {
            DeviceCommand::SetMode(mode) => self.mode = mode,
            DeviceCommand::SetTemperature(value) => {
                self.device_target = value.clamp(self.min_temp, self.max_temp);
            }
        }
    }

    pub fn step(&mut self, seconds: f32) {
        if self.is_heating() {
            self.room_temp += HEAT_RATE_C_PER_S * seconds;
        }
        self.room_temp -= (self.room_temp - AMBIENT_C) * LOSS_RATE_PER_S * seconds;
    }

    pub fn device_state(&self, context: Option<EventOrigin>) -> DeviceStatePayload {
        let action = match self.mode {
            DeviceMode::Off => DeviceAction::Off,
            _ if self.is_heating() => DeviceAction::Heating,
            _ => DeviceAction::Idle,
        };
        DeviceStatePayload {
            state: self.mode,
            hvac_action: Some(action),
            current_temperature: round_tenth(self.device_temp()),
            temperature: self.device_target,
            min_temp: Some(self.min_temp),
            max_temp: Some(self.max_temp),
            context,
        }
    }

    pub fn sensor_reading(&self) -> String {
        format!("{:.1}", self.room_temp)
    }
}

fn round_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn heats_only_below_device_target() {
        let mut room = SimulatedRoom::default();
        let before = room.room_temp;
        room.step(60.0);
        assert!(room.room_temp > before);

        room.apply(DeviceCommand::SetTemperature(10.0));
        assert!(!room.is_heating());
        let warm = room.room_temp;
        room.step(60.0);
        assert!(room.room_temp < warm);
    }

    #[test]
    fn off_mode_reports_off_action() {
        let mut room = SimulatedRoom::default();
        room.apply(DeviceCommand::SetMode(DeviceMode::Off));

        let state = room.device_state(None);
        assert_eq!(state.state, DeviceMode::Off);
        assert_eq!(state.hvac_action, Some(DeviceAction::Off));
    }

    #[test]
    fn target_is_clamped_to_device_range() {
        let mut room = SimulatedRoom::default();
        room.apply(DeviceCommand::SetTemperature(40.0));
        assert_eq!(room.device_target, 30.0);
    }
}
