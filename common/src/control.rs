use crate::{
    config::ControlConfig,
    device::{DeviceCommand, DeviceSnapshot},
    state::SharedState,
    types::{Action, DeviceMode, ThermostatMode},
};

pub const MANDATED_DEVICE_MODE: DeviceMode = DeviceMode::Heat;

#[derive(Debug, Clone, PartialEq)]
pub struct ControlPlan {
    pub action: Action,
    pub required_target: f32,
    pub commands: Vec<DeviceCommand>,
}

/// Action the virtual thermostat should be in. In Auto the current action is
/// kept while the measured temperature stays inside target ± variance.
pub fn next_action(state: &SharedState, variance: f32) -> Action {
    match state.mode {
        ThermostatMode::Off => Action::Idle,
        ThermostatMode::Heat => Action::Heating,
        ThermostatMode::Auto => {
            let Some(measured) = state.measured_temperature else {
                return state.action;
            };
            match state.action {
                Action::Heating if measured > state.target_temperature + variance => Action::Idle,
                Action::Idle if measured < state.target_temperature - variance => Action::Heating,
                current => current,
            }
        }
    }
}

/// Device target that makes the device heat (or rest) regardless of its own
/// sensor: a fixed offset above or below what the device currently reads.
pub fn required_target(action: Action, device: &DeviceSnapshot, config: &ControlConfig) -> f32 {
    let ideal = match action {
        Action::Heating => device.current_temperature + config.device_offset_c,
        Action::Idle => device.current_temperature - config.device_offset_c,
    };
    device.clamp_target(ideal)
}

pub fn target_in_band(device: &DeviceSnapshot, required: f32, config: &ControlConfig) -> bool {
    (device.target_temperature - required).abs() <= config.target_tolerance_c
}

pub fn plan(
    state: &SharedState,
    device: &DeviceSnapshot,
    variance: f32,
    config: &ControlConfig,
) -> ControlPlan {
    let action = next_action(state, variance);
    let required = required_target(action, device, config);

    let mut commands = Vec::new();
    if state.enabled {
        if !target_in_band(device, required, config) {
            commands.push(DeviceCommand::SetTemperature(required));
        }
        if device.mode != MANDATED_DEVICE_MODE {
            commands.push(DeviceCommand::SetMode(MANDATED_DEVICE_MODE));
        }
    }

    ControlPlan {
        action,
        required_target: required,
        commands,
    }
}
