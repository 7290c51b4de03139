use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use climate_wrapper_common::{
    control, detector::external_change_notification, AlertAction, ClimateHost, ControlConfig,
    DeviceChange, DeviceCommand, ExternalChangeDetector, HostError, IssuedTarget,
    NotificationSink, OriginId, RuntimeConfig, SafetyWatchdog, SharedState, StatusTracker,
    StatusView, SwitchView, ThermostatMode, ThermostatView, ViewSnapshot, WrapperConfig,
};

pub const MIN_TARGET_C: f32 = 5.0;
pub const MAX_TARGET_C: f32 = 35.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SupervisorError {
    #[error("wrapped device read failed: {0}")]
    Device(HostError),
    #[error("no measured temperature available yet")]
    MissingTemperature,
    #[error("invalid target temperature {0}")]
    InvalidTarget(f32),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeOutcome {
    /// Set when the status view was flagged. The delayed revert must pass it
    /// back so a later flag is not cut short.
    pub flag: Option<u64>,
}

impl ChangeOutcome {
    pub fn flagged(&self) -> bool {
        self.flag.is_some()
    }
}

pub struct Supervisor {
    wrapper: WrapperConfig,
    control: ControlConfig,
    instance: String,
    timezone: Tz,
    state: SharedState,
    issued: IssuedTarget,
    detector: ExternalChangeDetector,
    watchdog: SafetyWatchdog,
    status: StatusTracker,
    host: Arc<dyn ClimateHost>,
    notifier: Arc<dyn NotificationSink>,
    views: watch::Sender<ViewSnapshot>,
}

impl Supervisor {
    pub fn new(
        runtime: &RuntimeConfig,
        host: Arc<dyn ClimateHost>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let timezone = runtime.timezone.parse::<Tz>().unwrap_or(chrono_tz::UTC);
        let instance = runtime.wrapper.unique_id();
        let today = Utc::now().with_timezone(&timezone).date_naive();
        let state = SharedState::default();
        let status = StatusTracker::new(today);
        let initial = build_view(&runtime.wrapper, &instance, &state, &status);
        let (views, _) = watch::channel(initial);

        Self {
            wrapper: runtime.wrapper.clone(),
            control: runtime.control.clone(),
            watchdog: SafetyWatchdog::new(instance.clone(), runtime.control.safety_failure_threshold),
            instance,
            timezone,
            state,
            issued: IssuedTarget::default(),
            detector: ExternalChangeDetector::new(),
            status,
            host,
            notifier,
            views,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn wrapper(&self) -> &WrapperConfig {
        &self.wrapper
    }

    pub fn subscribe_views(&self) -> watch::Receiver<ViewSnapshot> {
        self.views.subscribe()
    }

    pub fn view(&self) -> ViewSnapshot {
        build_view(&self.wrapper, &self.instance, &self.state, &self.status)
    }

    pub fn initialize(&mut self) {
        match self.host.read_sensor(&self.wrapper.sensor_id) {
            Ok(value) => self.state.set_measured_temperature(value),
            Err(err) => warn!("initial temperature reading unusable: {err}"),
        }

        match self.host.read_device(&self.wrapper.wrapped_device_id) {
            Ok(device) => self.detector.observe(device.target_temperature),
            Err(err) => warn!("initial device state unusable: {err}"),
        }

        for action in self.watchdog.clear_all() {
            self.apply_alert(action);
        }

        if let Err(err) = self.update() {
            warn!("initial update skipped: {err}");
        }
    }

    pub fn update(&mut self) -> Result<usize, SupervisorError> {
        let device = self
            .host
            .read_device(&self.wrapper.wrapped_device_id)
            .map_err(SupervisorError::Device)?;

        if self.state.mode == ThermostatMode::Auto && self.state.measured_temperature.is_none() {
            return Err(SupervisorError::MissingTemperature);
        }

        let plan = control::plan(
            &self.state,
            &device,
            self.wrapper.temperature_variance,
            &self.control,
        );
        if plan.action != self.state.action {
            info!(
                "action {} -> {}",
                self.state.action.as_str(),
                plan.action.as_str()
            );
        }
        self.state.action = plan.action;

        let mut issued = 0;
        for command in plan.commands {
            let origin = OriginId::new();
            match command {
                DeviceCommand::SetTemperature(value) => {
                    debug!(
                        "setting device target to {value} (current target {}, device reads {})",
                        device.target_temperature, device.current_temperature
                    );
                    self.issued.record_target(origin, value);
                }
                DeviceCommand::SetMode(mode) => {
                    debug!(
                        "setting device mode to {} (currently {})",
                        mode.as_str(),
                        device.mode.as_str()
                    );
                    self.issued.record_command(origin);
                }
            }

            match self
                .host
                .send_command(&self.wrapper.wrapped_device_id, command, origin)
            {
                Ok(()) => issued += 1,
                Err(err) => warn!("device command {command:?} failed: {err}"),
            }
        }

        self.refresh_views();
        Ok(issued)
    }

    pub fn handle_device_change(&mut self, change: &DeviceChange) -> ChangeOutcome {
        let verdict = self.detector.inspect(change, &self.issued);
        let mut outcome = ChangeOutcome::default();

        if self.state.enabled {
            if let Some(target) = verdict.external_target {
                warn!(
                    "external target change to {target} (last issued {:?})",
                    self.issued.value()
                );
                self.notifier
                    .create(&external_change_notification(&self.instance, target));
                let generation = self.status.external_change(&self.now());
                debug!("{} external changes today", self.status.changes_today());
                outcome.flag = Some(generation);
            }
            if verdict.external_off {
                warn!("wrapped device switched off externally, forcing it back on");
            }
        }

        if let Err(err) = self.update() {
            warn!("update after device change skipped: {err}");
        }
        outcome
    }

    pub fn handle_sensor_reading(&mut self, reading: Result<f32, HostError>) {
        match reading {
            Ok(value) => {
                debug!("measured temperature {value}");
                self.state.set_measured_temperature(value);
            }
            Err(err @ HostError::Malformed { .. }) => {
                warn!("temperature reading dropped: {err}");
                return;
            }
            Err(err) => {
                debug!("temperature reading dropped: {err}");
                return;
            }
        }

        if let Err(err) = self.update() {
            warn!("update after sensor change skipped: {err}");
        }
    }

    pub fn safety_check(&mut self) {
        if !self.state.enabled {
            return;
        }

        let device = match self.host.read_device(&self.wrapper.wrapped_device_id) {
            Ok(device) => Some(device),
            Err(err) => {
                warn!("safety check could not read device: {err}");
                None
            }
        };

        for action in self
            .watchdog
            .evaluate(&self.state, device.as_ref(), &self.control)
        {
            self.apply_alert(action);
        }
    }

    pub fn set_mode(&mut self, mode: ThermostatMode) -> Result<(), SupervisorError> {
        if self.state.set_mode(mode) {
            info!("mode set to {}", mode.as_str());
        }
        self.update().map(|_| ())
    }

    pub fn set_target_temperature(&mut self, value: f32) -> Result<(), SupervisorError> {
        if !value.is_finite() {
            return Err(SupervisorError::InvalidTarget(value));
        }
        let clamped = value.clamp(MIN_TARGET_C, MAX_TARGET_C);
        if self.state.set_target_temperature(clamped) {
            info!("target temperature set to {clamped}");
        }
        self.update().map(|_| ())
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), SupervisorError> {
        if self.state.enabled != enabled {
            info!("wrapper {}", if enabled { "enabled" } else { "disabled" });
            if enabled {
                // Failures seen before the pause are not consecutive with new ones.
                self.watchdog.reset_counters();
            }
        }
        self.state.enabled = enabled;
        if enabled {
            self.update().map(|_| ())
        } else {
            self.refresh_views();
            Ok(())
        }
    }

    pub fn revert_status(&mut self, generation: u64) {
        if self.status.revert(generation) {
            self.refresh_views();
        }
    }

    pub fn control(&self) -> &ControlConfig {
        &self.control
    }

    fn apply_alert(&self, action: AlertAction) {
        match action {
            AlertAction::Raise(notification) => {
                warn!("{}: {}", notification.id, notification.message);
                self.notifier.create(&notification);
            }
            AlertAction::Dismiss(id) => {
                debug!("dismissing {id}");
                self.notifier.dismiss(&id);
            }
        }
    }

    fn refresh_views(&self) {
        self.views.send_replace(self.view());
    }

    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone)
    }
}

fn build_view(
    wrapper: &WrapperConfig,
    instance: &str,
    state: &SharedState,
    status: &StatusTracker,
) -> ViewSnapshot {
    ViewSnapshot {
        thermostat: ThermostatView {
            name: wrapper.display_name.clone(),
            unique_id: instance.to_string(),
            mode: state.mode.as_str(),
            hvac_modes: ThermostatMode::ALL.iter().map(|mode| mode.as_str()).collect(),
            action: state.action.as_str(),
            current_temp: state.measured_temperature,
            target_temp: state.target_temperature,
            unit: "°C",
        },
        status: StatusView {
            name: format!("Last external change of {}", wrapper.wrapped_device_id),
            unique_id: format!("{instance}_status"),
            state: status.state().as_str(),
            last_changed: status.last_changed().to_string(),
            changes_today: status.changes_today(),
        },
        switch: SwitchView {
            name: format!("Enable Wrapper for {}", wrapper.wrapped_device_id),
            unique_id: format!("enable_{instance}"),
            is_on: state.enabled,
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use climate_wrapper_common::{
        Action, DeviceAction, DeviceMode, DeviceSnapshot, EventOrigin, Notification, StatusState,
    };

    pub(crate) struct FakeHost {
        pub device: Mutex<Option<DeviceSnapshot>>,
        pub sensor: Mutex<Result<f32, HostError>>,
        pub sent: Mutex<Vec<(DeviceCommand, OriginId)>>,
        pub stuck: Mutex<bool>,
    }

    impl FakeHost {
        pub(crate) fn new(device: DeviceSnapshot, sensor: f32) -> Self {
            Self {
                device: Mutex::new(Some(device)),
                sensor: Mutex::new(Ok(sensor)),
                sent: Mutex::new(Vec::new()),
                stuck: Mutex::new(false),
            }
        }

        fn sent(&self) -> Vec<(DeviceCommand, OriginId)> {
            self.sent.lock().unwrap().clone()
        }

        fn snapshot(&self) -> DeviceSnapshot {
            self.device.lock().unwrap().clone().unwrap()
        }

        fn set_device(&self, mutate: impl FnOnce(&mut DeviceSnapshot)) {
            let mut device = self.device.lock().unwrap();
            mutate(device.as_mut().unwrap());
        }
    }

    impl ClimateHost for FakeHost {
        fn read_device(&self, entity_id: &str) -> Result<DeviceSnapshot, HostError> {
            self.device
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| HostError::Unavailable(entity_id.to_string()))
        }

        fn read_sensor(&self, _entity_id: &str) -> Result<f32, HostError> {
            self.sensor.lock().unwrap().clone()
        }

        fn send_command(
            &self,
            _entity_id: &str,
            command: DeviceCommand,
            origin: OriginId,
        ) -> Result<(), HostError> {
            self.sent.lock().unwrap().push((command, origin));
            if *self.stuck.lock().unwrap() {
                return Ok(());
            }
            if let Some(device) = self.device.lock().unwrap().as_mut() {
                match command {
                    DeviceCommand::SetMode(mode) => device.mode = mode,
                    DeviceCommand::SetTemperature(value) => device.target_temperature = value,
                }
                let heating =
                    device.mode == DeviceMode::Heat && device.target_temperature > device.current_temperature;
                device.action = Some(if heating {
                    DeviceAction::Heating
                } else {
                    DeviceAction::Idle
                });
            }
            Ok(())
        }

        fn is_present(&self, _entity_id: &str) -> bool {
            self.device.lock().unwrap().is_some()
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeNotifier {
        pub created: Mutex<Vec<Notification>>,
        pub dismissed: Mutex<Vec<String>>,
    }

    impl NotificationSink for FakeNotifier {
        fn create(&self, notification: &Notification) {
            self.created.lock().unwrap().push(notification.clone());
        }

        fn dismiss(&self, notification_id: &str) {
            self.dismissed.lock().unwrap().push(notification_id.to_string());
        }
    }

    pub(crate) fn runtime() -> RuntimeConfig {
        RuntimeConfig {
            wrapper: WrapperConfig {
                display_name: "Living Room".to_string(),
                wrapped_device_id: "radiator".to_string(),
                sensor_id: "hall".to_string(),
                temperature_variance: 0.5,
            },
            ..RuntimeConfig::default()
        }
    }

    pub(crate) fn device(current: f32, target: f32) -> DeviceSnapshot {
        DeviceSnapshot {
            mode: DeviceMode::Heat,
            action: Some(DeviceAction::Idle),
            current_temperature: current,
            target_temperature: target,
            min_temp: Some(5.0),
            max_temp: Some(30.0),
        }
    }

    fn supervisor(host: &Arc<FakeHost>, notifier: &Arc<FakeNotifier>) -> Supervisor {
        Supervisor::new(&runtime(), host.clone(), notifier.clone())
    }

    fn change_from(host: &FakeHost, origin: Option<EventOrigin>) -> DeviceChange {
        DeviceChange {
            snapshot: host.snapshot(),
            origin,
        }
    }

    #[test]
    fn heating_drives_device_one_degree_above_its_reading() {
        let host = Arc::new(FakeHost::new(device(18.0, 15.0), 18.0));
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);

        supervisor.set_mode(ThermostatMode::Heat).unwrap();

        assert_eq!(supervisor.state().action, Action::Heating);
        let sent = host.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, DeviceCommand::SetTemperature(19.0));
    }

    #[test]
    fn repeated_update_issues_at_most_one_correction() {
        let host = Arc::new(FakeHost::new(device(18.0, 25.0), 21.0));
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);
        supervisor.initialize();

        assert_eq!(host.sent().len(), 1);
        assert_eq!(supervisor.update(), Ok(0));
        assert_eq!(host.sent().len(), 1);
        assert_eq!(host.snapshot().target_temperature, 17.0);
    }

    #[test]
    fn self_issued_change_is_not_external_but_foreign_one_is() {
        let host = Arc::new(FakeHost::new(device(18.0, 15.0), 18.0));
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);
        supervisor.initialize();
        supervisor.set_mode(ThermostatMode::Heat).unwrap();

        let (_, origin) = *host.sent().last().unwrap();
        let own = supervisor.handle_device_change(&change_from(&host, Some(EventOrigin::root(origin))));
        assert!(!own.flagged());
        assert!(notifier.created.lock().unwrap().is_empty());

        host.set_device(|device| device.target_temperature = 21.0);
        let foreign = supervisor.handle_device_change(&change_from(&host, None));
        assert!(foreign.flagged());
        assert_eq!(supervisor.view().status.state, StatusState::ExternalChange.as_str());
        assert_eq!(supervisor.view().status.changes_today, 1);

        // The update after the external change put the target back to 19.0;
        // a stale duplicate notification for 21.0 must not alert again.
        host.set_device(|device| device.target_temperature = 21.0);
        let duplicate = supervisor.handle_device_change(&change_from(&host, None));
        assert!(!duplicate.flagged());

        let created = notifier.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].id, "living_room.external_change");

        drop(created);
        supervisor.revert_status(foreign.flag.unwrap());
        assert_eq!(supervisor.view().status.state, StatusState::Normal.as_str());
    }

    #[test]
    fn echo_of_own_mode_command_is_not_external() {
        let host = Arc::new(FakeHost::new(device(18.0, 17.0), 21.0));
        host.set_device(|device| device.mode = DeviceMode::Off);
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);
        supervisor.initialize();

        let (command, origin) = *host.sent().last().unwrap();
        assert_eq!(command, DeviceCommand::SetMode(DeviceMode::Heat));

        // Powering up restores the device's own stored setpoint.
        host.set_device(|device| device.target_temperature = 22.0);
        let echo = EventOrigin {
            id: OriginId::new(),
            parent_id: Some(origin),
        };
        let outcome = supervisor.handle_device_change(&change_from(&host, Some(echo)));

        assert!(!outcome.flagged());
        assert!(notifier.created.lock().unwrap().is_empty());
        assert_eq!(supervisor.view().status.changes_today, 0);
        assert_eq!(host.snapshot().target_temperature, 17.0);
    }

    #[test]
    fn earlier_revert_does_not_end_a_later_flag() {
        let host = Arc::new(FakeHost::new(device(18.0, 17.0), 21.0));
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);
        supervisor.initialize();

        host.set_device(|device| device.target_temperature = 21.0);
        let first = supervisor.handle_device_change(&change_from(&host, None));
        host.set_device(|device| device.target_temperature = 23.0);
        let second = supervisor.handle_device_change(&change_from(&host, None));
        assert_eq!(supervisor.view().status.changes_today, 2);

        supervisor.revert_status(first.flag.unwrap());
        assert_eq!(
            supervisor.view().status.state,
            StatusState::ExternalChange.as_str()
        );

        supervisor.revert_status(second.flag.unwrap());
        assert_eq!(supervisor.view().status.state, StatusState::Normal.as_str());
    }

    #[test]
    fn external_off_is_corrected_immediately() {
        let host = Arc::new(FakeHost::new(device(18.0, 17.0), 21.0));
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);
        supervisor.initialize();
        assert!(host.sent().is_empty());

        host.set_device(|device| device.mode = DeviceMode::Off);
        supervisor.handle_device_change(&change_from(&host, None));

        assert_eq!(
            host.sent().last().map(|(command, _)| *command),
            Some(DeviceCommand::SetMode(DeviceMode::Heat))
        );
        assert_eq!(host.snapshot().mode, DeviceMode::Heat);
    }

    #[test]
    fn auto_without_temperature_refuses_to_update() {
        let host = Arc::new(FakeHost::new(device(18.0, 25.0), 0.0));
        *host.sensor.lock().unwrap() = Err(HostError::Unavailable("hall".to_string()));
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);
        supervisor.initialize();

        assert_eq!(supervisor.update(), Err(SupervisorError::MissingTemperature));
        assert!(host.sent().is_empty());
    }

    #[test]
    fn malformed_reading_keeps_previous_temperature() {
        let host = Arc::new(FakeHost::new(device(18.0, 17.0), 21.0));
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);
        supervisor.initialize();

        supervisor.handle_sensor_reading(Err(HostError::Malformed {
            entity_id: "hall".to_string(),
            raw: "warm".to_string(),
        }));
        assert_eq!(supervisor.state().measured_temperature, Some(21.0));

        supervisor.handle_sensor_reading(Ok(19.0));
        assert_eq!(supervisor.state().measured_temperature, Some(19.0));
        assert_eq!(supervisor.state().action, Action::Heating);
    }

    #[test]
    fn device_unavailable_aborts_update() {
        let host = Arc::new(FakeHost::new(device(18.0, 17.0), 21.0));
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);
        *host.device.lock().unwrap() = None;

        assert!(matches!(
            supervisor.update(),
            Err(SupervisorError::Device(HostError::Unavailable(_)))
        ));
    }

    #[test]
    fn watchdog_alerts_after_threshold_and_clears_on_recovery() {
        let host = Arc::new(FakeHost::new(device(18.0, 17.0), 21.0));
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);
        supervisor.initialize();
        notifier.dismissed.lock().unwrap().clear();

        host.set_device(|device| device.mode = DeviceMode::Off);
        for _ in 0..9 {
            supervisor.safety_check();
        }
        assert!(notifier.created.lock().unwrap().is_empty());

        supervisor.safety_check();
        supervisor.safety_check();
        assert_eq!(notifier.created.lock().unwrap().len(), 1);
        assert!(host.sent().is_empty());

        host.set_device(|device| device.mode = DeviceMode::Heat);
        supervisor.safety_check();
        assert_eq!(
            notifier.dismissed.lock().unwrap().clone(),
            vec!["living_room.safety_check_mode".to_string()]
        );
    }

    #[test]
    fn disabled_wrapper_neither_commands_nor_checks() {
        let host = Arc::new(FakeHost::new(device(18.0, 25.0), 21.0));
        *host.stuck.lock().unwrap() = true;
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);

        supervisor.set_enabled(false).unwrap();
        supervisor.handle_sensor_reading(Ok(15.0));
        assert!(host.sent().is_empty());
        assert_eq!(supervisor.state().action, Action::Heating);

        for _ in 0..20 {
            supervisor.safety_check();
        }
        assert!(notifier.created.lock().unwrap().is_empty());

        supervisor.set_enabled(true).unwrap();
        assert_eq!(host.sent().len(), 1);
        assert!(supervisor.view().switch.is_on);
    }

    #[test]
    fn failures_before_disable_do_not_count_after_enable() {
        let host = Arc::new(FakeHost::new(device(18.0, 17.0), 21.0));
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);
        supervisor.initialize();

        *host.stuck.lock().unwrap() = true;
        host.set_device(|device| device.mode = DeviceMode::Off);
        for _ in 0..9 {
            supervisor.safety_check();
        }

        supervisor.set_enabled(false).unwrap();
        supervisor.set_enabled(true).unwrap();
        supervisor.safety_check();
        assert!(notifier.created.lock().unwrap().is_empty());

        for _ in 0..9 {
            supervisor.safety_check();
        }
        assert_eq!(notifier.created.lock().unwrap().len(), 1);
    }

    #[test]
    fn target_is_clamped_and_must_be_finite() {
        let host = Arc::new(FakeHost::new(device(18.0, 17.0), 21.0));
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);
        supervisor.initialize();

        supervisor.set_target_temperature(80.0).unwrap();
        assert_eq!(supervisor.state().target_temperature, MAX_TARGET_C);
        assert!(matches!(
            supervisor.set_target_temperature(f32::NAN),
            Err(SupervisorError::InvalidTarget(_))
        ));
    }

    #[test]
    fn views_follow_updates() {
        let host = Arc::new(FakeHost::new(device(18.0, 17.0), 21.0));
        let notifier = Arc::new(FakeNotifier::default());
        let mut supervisor = supervisor(&host, &notifier);
        let views = supervisor.subscribe_views();
        supervisor.initialize();

        supervisor.set_mode(ThermostatMode::Off).unwrap();
        let view = views.borrow().clone();
        assert_eq!(view.thermostat.mode, "off");
        assert_eq!(view.thermostat.current_temp, Some(21.0));
        assert_eq!(view.thermostat.hvac_modes, vec!["off", "auto", "heat"]);
        assert_eq!(view.switch.unique_id, "enable_living_room");
        assert_eq!(view.status.last_changed, "never");
    }
}
