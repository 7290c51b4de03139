use std::{io::ErrorKind, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use rumqttc::{AsyncClient, Event, Incoming, MqttOptions, QoS};
use tokio::{
    net::TcpListener,
    sync::{broadcast, broadcast::error::RecvError, watch, Mutex},
};
use tracing::{debug, info, warn};

use climate_wrapper_common::{NetworkConfig, RuntimeConfig, Topics, ViewSnapshot};

use crate::{
    adapter::{HostEvent, MqttHost},
    api::{self, ApiState},
    handles::ResourceHandles,
    presentation::PresentationWrite,
    setup,
    supervisor::Supervisor,
};

const MQTT_REQUEST_CAPACITY: usize = 64;

type SharedSupervisor = Arc<Mutex<Supervisor>>;

struct ConfigStore {
    path: PathBuf,
}

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let store = ConfigStore::new();
    let mut runtime = store
        .load()
        .await
        .with_context(|| format!("failed to load {}", store.path.display()))?;
    apply_env_overrides(&mut runtime.network);
    runtime.validate().context("invalid runtime config")?;

    let instance = runtime.wrapper.unique_id();
    info!(
        "starting climate wrapper {instance} for {} using {}",
        runtime.wrapper.wrapped_device_id, runtime.wrapper.sensor_id
    );

    let mut mqtt_options = MqttOptions::new(
        format!("climate-wrapper-{instance}"),
        runtime.network.mqtt_host.clone(),
        runtime.network.mqtt_port,
    );
    mqtt_options.set_keep_alive(Duration::from_secs(30));
    if !runtime.network.mqtt_user.is_empty() {
        mqtt_options.set_credentials(
            runtime.network.mqtt_user.clone(),
            runtime.network.mqtt_pass.clone(),
        );
    }

    let (mqtt, eventloop) = AsyncClient::new(mqtt_options, MQTT_REQUEST_CAPACITY);
    let host = Arc::new(MqttHost::new(mqtt, Topics::new(&runtime.network.base_topic)));
    let handles = ResourceHandles::new();

    spawn_mqtt_loop(&handles, host.clone(), eventloop, &runtime, &instance);

    let result = supervise(&runtime, host, &handles).await;
    handles.release();
    info!("climate wrapper {instance} stopped");
    result
}

async fn supervise(
    runtime: &RuntimeConfig,
    host: Arc<MqttHost>,
    handles: &ResourceHandles,
) -> anyhow::Result<()> {
    let control = &runtime.control;
    setup::wait_for_dependencies(
        host.as_ref(),
        &runtime.wrapper.wrapped_device_id,
        &runtime.wrapper.sensor_id,
        Duration::from_millis(control.availability_poll_interval_ms),
        control.availability_max_attempts,
    )
    .await
    .context("wrapped entities never became available")?;

    let supervisor = Supervisor::new(runtime, host.clone(), host.clone());
    let views = supervisor.subscribe_views();
    let supervisor: SharedSupervisor = Arc::new(Mutex::new(supervisor));

    let device_events = host.subscribe();
    let sensor_events = host.subscribe();
    let presentation_events = host.subscribe();
    supervisor.lock().await.initialize();

    handles.spawn(
        "device_listener",
        run_device_listener(
            supervisor.clone(),
            handles.clone(),
            device_events,
            runtime.wrapper.wrapped_device_id.clone(),
            Duration::from_millis(control.external_change_display_ms),
        ),
    );
    handles.spawn(
        "sensor_listener",
        run_sensor_listener(
            supervisor.clone(),
            sensor_events,
            runtime.wrapper.sensor_id.clone(),
        ),
    );
    handles.spawn(
        "presentation_listener",
        run_presentation_listener(supervisor.clone(), presentation_events),
    );
    handles.spawn(
        "safety_check",
        run_safety_loop(
            supervisor.clone(),
            Duration::from_millis(control.safety_check_interval_ms),
        ),
    );

    let instance = supervisor.lock().await.instance().to_string();
    handles.spawn(
        "view_publisher",
        run_view_publisher(
            host.client().clone(),
            host.topics().instance_state(&instance),
            views,
        ),
    );

    let app = api::router(ApiState { supervisor });
    let port = std::env::var("CONTROLLER_HTTP_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(runtime.network.http_port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind controller server at {addr}"))?;

    info!("controller listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("ctrl-c handler failed: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

fn spawn_mqtt_loop(
    handles: &ResourceHandles,
    host: Arc<MqttHost>,
    mut eventloop: rumqttc::EventLoop,
    runtime: &RuntimeConfig,
    instance: &str,
) {
    let device_id = runtime.wrapper.wrapped_device_id.clone();
    let sensor_id = runtime.wrapper.sensor_id.clone();
    let instance = instance.to_string();
    let subscriber = handles.clone();

    handles.spawn("mqtt_loop", async move {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Incoming::Publish(message))) => {
                    host.ingest(&message.topic, &message.payload);
                }
                Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                    info!("mqtt connected");
                    // Subscribing awaits the request queue this loop drains, so
                    // it runs in its own task. Repeats on every reconnect.
                    let host = host.clone();
                    let (device_id, sensor_id, instance) =
                        (device_id.clone(), sensor_id.clone(), instance.clone());
                    subscriber.spawn("mqtt_subscribe", async move {
                        if let Err(err) = host
                            .subscribe_entities(&device_id, &sensor_id, &instance)
                            .await
                        {
                            warn!("mqtt subscribe failed: {err}");
                        }
                    });
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("mqtt poll error: {err}");
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
    });
}

async fn run_device_listener(
    supervisor: SharedSupervisor,
    handles: ResourceHandles,
    mut events: broadcast::Receiver<HostEvent>,
    device_id: String,
    display: Duration,
) {
    loop {
        let change = match events.recv().await {
            Ok(HostEvent::DeviceChanged { entity_id, change }) if entity_id == device_id => change,
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                warn!("device listener lagged, {skipped} events skipped");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        let change = match change {
            Ok(change) => change,
            Err(err) => {
                debug!("ignoring device change: {err}");
                continue;
            }
        };

        let outcome = supervisor.lock().await.handle_device_change(&change);
        if let Some(generation) = outcome.flag {
            let supervisor = supervisor.clone();
            handles.spawn("status_revert", async move {
                tokio::time::sleep(display).await;
                supervisor.lock().await.revert_status(generation);
            });
        }
    }
}

async fn run_sensor_listener(
    supervisor: SharedSupervisor,
    mut events: broadcast::Receiver<HostEvent>,
    sensor_id: String,
) {
    loop {
        match events.recv().await {
            Ok(HostEvent::SensorChanged { entity_id, reading }) if entity_id == sensor_id => {
                supervisor.lock().await.handle_sensor_reading(reading);
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("sensor listener lagged, {skipped} events skipped");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn run_presentation_listener(
    supervisor: SharedSupervisor,
    mut events: broadcast::Receiver<HostEvent>,
) {
    loop {
        match events.recv().await {
            Ok(HostEvent::Presentation { command, payload }) => {
                let applied = match PresentationWrite::parse(command, &payload) {
                    Ok(write) => write.apply(&mut *supervisor.lock().await),
                    Err(err) => Err(err),
                };
                if let Err(err) = applied {
                    warn!("presentation write {command:?} `{payload}`: {err}");
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("presentation listener lagged, {skipped} events skipped");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn run_safety_loop(supervisor: SharedSupervisor, period: Duration) {
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        supervisor.lock().await.safety_check();
    }
}

async fn run_view_publisher(
    mqtt: AsyncClient,
    topic: String,
    mut views: watch::Receiver<ViewSnapshot>,
) {
    loop {
        let payload = serde_json::to_vec(&*views.borrow_and_update());
        match payload {
            Ok(body) => {
                if let Err(err) = mqtt.publish(topic.as_str(), QoS::AtLeastOnce, true, body).await {
                    warn!("view publish failed: {err}");
                }
            }
            Err(err) => warn!("view serialization failed: {err}"),
        }

        if views.changed().await.is_err() {
            break;
        }
    }
}

fn apply_env_overrides(network: &mut NetworkConfig) {
    if let Ok(host) = std::env::var("MQTT_HOST") {
        network.mqtt_host = host;
    }
    if let Some(port) = std::env::var("MQTT_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
    {
        network.mqtt_port = port;
    }
    if let Ok(user) = std::env::var("MQTT_USER") {
        network.mqtt_user = user;
    }
    if let Ok(pass) = std::env::var("MQTT_PASS") {
        network.mqtt_pass = pass;
    }
}

impl ConfigStore {
    fn new() -> Self {
        let data_dir = std::env::var("CLIMATE_WRAPPER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./.climate-wrapper"));
        Self {
            path: data_dir.join("config.json"),
        }
    }

    async fn load(&self) -> anyhow::Result<RuntimeConfig> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => Ok(serde_json::from_slice::<RuntimeConfig>(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("{} not found, using defaults", self.path.display());
                Ok(RuntimeConfig::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}
