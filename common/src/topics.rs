pub const TOPIC_STATE_SUFFIX: &str = "state";
pub const TOPIC_SET_SUFFIX: &str = "set";

pub const TOPIC_CMD_MODE: &str = "cmnd/mode";
pub const TOPIC_CMD_TARGET: &str = "cmnd/target";
pub const TOPIC_CMD_ENABLE: &str = "cmnd/enable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicKind {
    DeviceState(String),
    DeviceSet(String),
    SensorState(String),
    Command(PresentationCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationCommand {
    Mode,
    Target,
    Enable,
}

impl Topics {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn device_state(&self, device_id: &str) -> String {
        format!("{}/climate/{device_id}/{TOPIC_STATE_SUFFIX}", self.base)
    }

    pub fn device_set(&self, device_id: &str) -> String {
        format!("{}/climate/{device_id}/{TOPIC_SET_SUFFIX}", self.base)
    }

    pub fn sensor_state(&self, sensor_id: &str) -> String {
        format!("{}/sensor/{sensor_id}/{TOPIC_STATE_SUFFIX}", self.base)
    }

    pub fn notification(&self, notification_id: &str) -> String {
        format!("{}/notify/{notification_id}", self.base)
    }

    pub fn instance_state(&self, instance: &str) -> String {
        format!("{}/climate_wrapper/{instance}/{TOPIC_STATE_SUFFIX}", self.base)
    }

    pub fn instance_command(&self, instance: &str, command: PresentationCommand) -> String {
        let suffix = match command {
            PresentationCommand::Mode => TOPIC_CMD_MODE,
            PresentationCommand::Target => TOPIC_CMD_TARGET,
            PresentationCommand::Enable => TOPIC_CMD_ENABLE,
        };
        format!("{}/climate_wrapper/{instance}/{suffix}", self.base)
    }

    pub fn instance_command_filter(&self, instance: &str) -> String {
        format!("{}/climate_wrapper/{instance}/cmnd/+", self.base)
    }

    pub fn classify(&self, topic: &str) -> Option<TopicKind> {
        let rest = topic.strip_prefix(&self.base)?.strip_prefix('/')?;
        let parts: Vec<&str> = rest.split('/').collect();
        match parts.as_slice() {
            ["climate", id, TOPIC_STATE_SUFFIX] => Some(TopicKind::DeviceState((*id).to_string())),
            ["climate", id, TOPIC_SET_SUFFIX] => Some(TopicKind::DeviceSet((*id).to_string())),
            ["sensor", id, TOPIC_STATE_SUFFIX] => Some(TopicKind::SensorState((*id).to_string())),
            ["climate_wrapper", _, "cmnd", "mode"] => {
                Some(TopicKind::Command(PresentationCommand::Mode))
            }
            ["climate_wrapper", _, "cmnd", "target"] => {
                Some(TopicKind::Command(PresentationCommand::Target))
            }
            ["climate_wrapper", _, "cmnd", "enable"] => {
                Some(TopicKind::Command(PresentationCommand::Enable))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_classifies_topics() {
        let topics = Topics::new("home/");

        assert_eq!(topics.device_state("radiator"), "home/climate/radiator/state");
        assert_eq!(
            topics.classify("home/climate/radiator/state"),
            Some(TopicKind::DeviceState("radiator".to_string()))
        );
        assert_eq!(
            topics.classify(&topics.sensor_state("hall")),
            Some(TopicKind::SensorState("hall".to_string()))
        );
        assert_eq!(
            topics.classify(&topics.instance_command("lr", PresentationCommand::Enable)),
            Some(TopicKind::Command(PresentationCommand::Enable))
        );
        assert_eq!(
            topics.instance_command_filter("lr"),
            "home/climate_wrapper/lr/cmnd/+"
        );
        assert_eq!(topics.classify("other/climate/radiator/state"), None);
        assert_eq!(topics.classify("homeclimate/radiator/state"), None);
    }
}
