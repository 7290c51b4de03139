use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThermostatMode {
    Off,
    Heat,
    Auto,
}

impl ThermostatMode {
    pub const ALL: [ThermostatMode; 3] = [Self::Off, Self::Auto, Self::Heat];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Auto => "auto",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" => Some(Self::Off),
            "heat" => Some(Self::Heat),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Idle,
    Heating,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Heating => "heating",
        }
    }

    pub fn is_heating(self) -> bool {
        self == Self::Heating
    }

    pub fn matches(self, device: Option<DeviceAction>) -> bool {
        matches!(
            (self, device),
            (Self::Idle, Some(DeviceAction::Idle)) | (Self::Heating, Some(DeviceAction::Heating))
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceMode {
    Off,
    Heat,
    Cool,
    Auto,
    HeatCool,
    Dry,
    FanOnly,
    #[serde(other)]
    Unknown,
}

impl DeviceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Cool => "cool",
            Self::Auto => "auto",
            Self::HeatCool => "heat_cool",
            Self::Dry => "dry",
            Self::FanOnly => "fan_only",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceAction {
    Off,
    Idle,
    Heating,
    Preheating,
    Cooling,
    Drying,
    Fan,
    #[serde(other)]
    Unknown,
}

impl DeviceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Idle => "idle",
            Self::Heating => "heating",
            Self::Preheating => "preheating",
            Self::Cooling => "cooling",
            Self::Drying => "drying",
            Self::Fan => "fan",
            Self::Unknown => "unknown",
        }
    }
}

pub fn action_label(action: Option<DeviceAction>) -> &'static str {
    action.map_or("none", DeviceAction::as_str)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusState {
    #[serde(rename = "Normal Operation")]
    Normal,
    #[serde(rename = "External Change Detected")]
    ExternalChange,
}

impl StatusState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal Operation",
            Self::ExternalChange => "External Change Detected",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ThermostatView {
    pub name: String,
    #[serde(rename = "uniqueId")]
    pub unique_id: String,
    pub mode: &'static str,
    #[serde(rename = "hvacModes")]
    pub hvac_modes: Vec<&'static str>,
    pub action: &'static str,
    #[serde(rename = "currentTemp")]
    pub current_temp: Option<f32>,
    #[serde(rename = "targetTemp")]
    pub target_temp: f32,
    pub unit: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusView {
    pub name: String,
    #[serde(rename = "uniqueId")]
    pub unique_id: String,
    pub state: &'static str,
    #[serde(rename = "lastChanged")]
    pub last_changed: String,
    #[serde(rename = "changesToday")]
    pub changes_today: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SwitchView {
    pub name: String,
    #[serde(rename = "uniqueId")]
    pub unique_id: String,
    #[serde(rename = "isOn")]
    pub is_on: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewSnapshot {
    pub thermostat: ThermostatView,
    pub status: StatusView,
    #[serde(rename = "enable")]
    pub switch: SwitchView,
}
