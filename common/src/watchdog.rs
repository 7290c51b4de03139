use crate::{
    config::ControlConfig,
    control::{required_target, MANDATED_DEVICE_MODE},
    device::{DeviceSnapshot, Notification},
    state::SharedState,
    types::action_label,
};

pub const SAFETY_CHECK_TITLE: &str = "Climate Wrapper | Safety Check";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyCheck {
    Mode,
    Action,
    Band,
}

impl SafetyCheck {
    pub const ALL: [SafetyCheck; 3] = [Self::Mode, Self::Action, Self::Band];

    fn index(self) -> usize {
        match self {
            Self::Mode => 0,
            Self::Action => 1,
            Self::Band => 2,
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Self::Mode => "mode",
            Self::Action => "action",
            Self::Band => "difference",
        }
    }

    pub fn alert_id(self, instance: &str) -> String {
        format!("{instance}.safety_check_{}", self.slug())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlertAction {
    Raise(Notification),
    Dismiss(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CheckCycle {
    consecutive_failures: u32,
    alert_active: bool,
}

#[derive(Debug, Clone)]
pub struct SafetyWatchdog {
    instance: String,
    threshold: u32,
    cycles: [CheckCycle; 3],
}

impl SafetyWatchdog {
    pub fn new(instance: impl Into<String>, threshold: u32) -> Self {
        Self {
            instance: instance.into(),
            threshold: threshold.max(1),
            cycles: [CheckCycle::default(); 3],
        }
    }

    pub fn consecutive_failures(&self, check: SafetyCheck) -> u32 {
        self.cycles[check.index()].consecutive_failures
    }

    pub fn is_alert_active(&self, check: SafetyCheck) -> bool {
        self.cycles[check.index()].alert_active
    }

    pub fn reset_counters(&mut self) {
        for cycle in &mut self.cycles {
            cycle.consecutive_failures = 0;
        }
    }

    pub fn clear_all(&mut self) -> Vec<AlertAction> {
        self.cycles = [CheckCycle::default(); 3];
        SafetyCheck::ALL
            .iter()
            .map(|check| AlertAction::Dismiss(check.alert_id(&self.instance)))
            .collect()
    }

    /// Runs one check cycle. `device` is `None` when the wrapped device could
    /// not be read, which fails every check.
    pub fn evaluate(
        &mut self,
        state: &SharedState,
        device: Option<&DeviceSnapshot>,
        config: &ControlConfig,
    ) -> Vec<AlertAction> {
        let mut actions = Vec::new();
        for check in SafetyCheck::ALL {
            let failure = failure_message(check, state, device, config);
            if let Some(action) = self.record(check, failure) {
                actions.push(action);
            }
        }
        actions
    }

    fn record(&mut self, check: SafetyCheck, failure: Option<String>) -> Option<AlertAction> {
        let threshold = self.threshold;
        let alert_id = check.alert_id(&self.instance);
        let cycle = &mut self.cycles[check.index()];

        let Some(message) = failure else {
            cycle.consecutive_failures = 0;
            if cycle.alert_active {
                cycle.alert_active = false;
                return Some(AlertAction::Dismiss(alert_id));
            }
            return None;
        };

        cycle.consecutive_failures = cycle.consecutive_failures.saturating_add(1);
        if cycle.consecutive_failures >= threshold && !cycle.alert_active {
            cycle.alert_active = true;
            return Some(AlertAction::Raise(Notification {
                id: alert_id,
                title: SAFETY_CHECK_TITLE.to_string(),
                message,
            }));
        }
        None
    }
}

pub fn failure_message(
    check: SafetyCheck,
    state: &SharedState,
    device: Option<&DeviceSnapshot>,
    config: &ControlConfig,
) -> Option<String> {
    let Some(device) = device else {
        return Some(format!(
            "Safety check failed: wrapped device unavailable while checking {}.\nPlease check manually.",
            check.slug()
        ));
    };

    match check {
        SafetyCheck::Mode => (device.mode != MANDATED_DEVICE_MODE).then(|| {
            format!(
                "Safety check failed: Heating Mode mismatch.\n-> Currently {}\n-> Should be {}\nPlease check manually.",
                device.mode.as_str(),
                MANDATED_DEVICE_MODE.as_str()
            )
        }),
        SafetyCheck::Action => (!state.action.matches(device.action)).then(|| {
            format!(
                "Safety check failed: Heating Action mismatch.\n-> Currently {}\n-> Should be {}\nPlease check manually.",
                action_label(device.action),
                state.action.as_str()
            )
        }),
        SafetyCheck::Band => {
            let expected = required_target(state.action, device, config);
            let within = (device.target_temperature - expected).abs() <= config.target_tolerance_c;
            (!within).then(|| {
                format!(
                    "Safety check failed: Temperature Difference mismatch.\n-> Current Temperature: {}\n-> Target Temperature: {}\n-> Should be: {} (±{})\nPlease check manually.",
                    device.current_temperature,
                    device.target_temperature,
                    expected,
                    config.target_tolerance_c
                )
            })
        }
    }
}
