pub mod config;
pub mod control;
pub mod detector;
pub mod device;
pub mod error;
pub mod origin;
pub mod state;
pub mod status;
pub mod topics;
pub mod types;
pub mod watchdog;
pub mod wire;

pub use config::{ControlConfig, NetworkConfig, RuntimeConfig, WrapperConfig};
pub use control::{ControlPlan, MANDATED_DEVICE_MODE};
pub use detector::{ExternalChangeDetector, Verdict};
pub use device::{
    ClimateHost, DeviceChange, DeviceCommand, DeviceSnapshot, Notification, NotificationSink,
};
pub use error::{ConfigError, HostError};
pub use origin::{EventOrigin, IssuedTarget, OriginId};
pub use state::SharedState;
pub use status::{ChangeCounter, StatusTracker};
pub use topics::{PresentationCommand, TopicKind, Topics};
pub use types::{
    Action, DeviceAction, DeviceMode, StatusState, StatusView, SwitchView, ThermostatMode,
    ThermostatView, ViewSnapshot,
};
pub use watchdog::{AlertAction, SafetyCheck, SafetyWatchdog};
