use crate::types::{Action, ThermostatMode};

#[derive(Debug, Clone, PartialEq)]
pub struct SharedState {
    pub enabled: bool,
    pub mode: ThermostatMode,
    pub action: Action,
    pub measured_temperature: Option<f32>,
    pub target_temperature: f32,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: ThermostatMode::Auto,
            action: Action::Idle,
            measured_temperature: None,
            target_temperature: 20.0,
        }
    }
}

impl SharedState {
    pub fn heating(&self) -> bool {
        self.action.is_heating()
    }

    pub fn set_mode(&mut self, mode: ThermostatMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        match mode {
            ThermostatMode::Off => self.action = Action::Idle,
            ThermostatMode::Heat => self.action = Action::Heating,
            ThermostatMode::Auto => {}
        }
        true
    }

    pub fn set_target_temperature(&mut self, value: f32) -> bool {
        if (self.target_temperature - value).abs() > f32::EPSILON {
            self.target_temperature = value;
            true
        } else {
            false
        }
    }

    pub fn set_measured_temperature(&mut self, value: f32) {
        self.measured_temperature = Some(value);
    }
}
