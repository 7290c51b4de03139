use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WrapperConfig {
    pub display_name: String,
    pub wrapped_device_id: String,
    pub sensor_id: String,
    pub temperature_variance: f32,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            display_name: "Climate Wrapper".to_string(),
            wrapped_device_id: String::new(),
            sensor_id: String::new(),
            temperature_variance: 0.5,
        }
    }
}

impl WrapperConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_name.trim().is_empty() {
            return Err(ConfigError::Missing("display_name"));
        }
        if self.wrapped_device_id.trim().is_empty() {
            return Err(ConfigError::Missing("wrapped_device_id"));
        }
        if self.sensor_id.trim().is_empty() {
            return Err(ConfigError::Missing("sensor_id"));
        }
        if !self.temperature_variance.is_finite() || self.temperature_variance <= 0.0 {
            return Err(ConfigError::InvalidVariance(self.temperature_variance));
        }
        Ok(())
    }

    pub fn unique_id(&self) -> String {
        self.display_name.trim().replace(' ', "_").to_lowercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlConfig {
    pub device_offset_c: f32,
    pub target_tolerance_c: f32,
    pub safety_check_interval_ms: u64,
    pub safety_failure_threshold: u32,
    pub external_change_display_ms: u64,
    pub availability_poll_interval_ms: u64,
    pub availability_max_attempts: u32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            device_offset_c: 1.0,
            target_tolerance_c: 0.25,
            safety_check_interval_ms: 60_000,
            safety_failure_threshold: 10,
            external_change_display_ms: 1_000,
            availability_poll_interval_ms: 500,
            availability_max_attempts: 60,
        }
    }
}

impl ControlConfig {
    pub fn sanitize(&mut self) {
        self.device_offset_c = self.device_offset_c.clamp(0.5, 5.0);
        self.target_tolerance_c = self.target_tolerance_c.clamp(0.05, 1.0);
        self.safety_check_interval_ms = self.safety_check_interval_ms.max(1_000);
        self.safety_failure_threshold = self.safety_failure_threshold.max(1);
        self.availability_poll_interval_ms = self.availability_poll_interval_ms.max(50);
        self.availability_max_attempts = self.availability_max_attempts.max(1);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_user: String,
    pub mqtt_pass: String,
    pub base_topic: String,
    pub http_port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mqtt_host: "127.0.0.1".to_string(),
            mqtt_port: 1883,
            mqtt_user: String::new(),
            mqtt_pass: String::new(),
            base_topic: "home".to_string(),
            http_port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub wrapper: WrapperConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            wrapper: WrapperConfig::default(),
            control: ControlConfig::default(),
            network: NetworkConfig::default(),
            timezone: default_timezone(),
        }
    }
}

impl RuntimeConfig {
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.control.sanitize();
        self.wrapper.validate()?;
        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ConfigError::InvalidTimezone(self.timezone.clone()));
        }
        if self.network.base_topic.trim().is_empty() {
            return Err(ConfigError::Missing("network.base_topic"));
        }
        Ok(())
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}
