use crate::{
    device::{DeviceChange, Notification},
    origin::IssuedTarget,
    types::DeviceMode,
};

pub const EXTERNAL_CHANGE_TITLE: &str = "Climate Wrapper | External Temperature Change";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Verdict {
    pub external_target: Option<f32>,
    pub external_off: bool,
}

impl Verdict {
    pub fn is_external(&self) -> bool {
        self.external_target.is_some() || self.external_off
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExternalChangeDetector {
    last_observed_target: Option<f32>,
}

impl ExternalChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, target: f32) {
        self.last_observed_target = Some(target);
    }

    pub fn inspect(&mut self, change: &DeviceChange, issued: &IssuedTarget) -> Verdict {
        let new_target = change.snapshot.target_temperature;
        let unchanged = self
            .last_observed_target
            .map(|previous| (previous - new_target).abs() <= f32::EPSILON)
            .unwrap_or(false);
        self.last_observed_target = Some(new_target);

        let external_target = if unchanged
            || issued.is_issued_value(new_target)
            || issued.correlates(change.origin.as_ref())
        {
            None
        } else {
            Some(new_target)
        };

        Verdict {
            external_target,
            external_off: change.snapshot.mode == DeviceMode::Off,
        }
    }
}

pub fn external_change_notification(instance: &str, target: f32) -> Notification {
    Notification {
        id: format!("{instance}.external_change"),
        title: EXTERNAL_CHANGE_TITLE.to_string(),
        message: format!("Climate target temperature change (to {target}) detected."),
    }
}
