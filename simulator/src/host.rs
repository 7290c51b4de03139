use std::{sync::Arc, time::Duration};

use anyhow::Context;
use rumqttc::{AsyncClient, Event, Incoming, MqttOptions, QoS};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use climate_wrapper_common::{
    wire::{CommandPayload, MAX_PAYLOAD_BYTES},
    EventOrigin, OriginId, Topics,
};

use crate::room::SimulatedRoom;

const TICK: Duration = Duration::from_secs(5);

struct SimConfig {
    device_id: String,
    sensor_id: String,
    topics: Topics,
}

#[derive(Clone)]
struct Publisher {
    mqtt: AsyncClient,
    device_topic: String,
    sensor_topic: String,
}

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = SimConfig::from_env();

    let mqtt_host = std::env::var("MQTT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let mqtt_port = std::env::var("MQTT_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(1883);

    let mut mqtt_options = MqttOptions::new("climate-wrapper-sim", mqtt_host, mqtt_port);
    if let Ok(user) = std::env::var("MQTT_USER") {
        let pass = std::env::var("MQTT_PASS").unwrap_or_default();
        mqtt_options.set_credentials(user, pass);
    }

    let (mqtt, mut eventloop) = AsyncClient::new(mqtt_options, 32);
    let set_topic = config.topics.device_set(&config.device_id);
    mqtt.subscribe(set_topic.as_str(), QoS::AtLeastOnce)
        .await
        .context("failed to subscribe to device commands")?;

    let room = Arc::new(Mutex::new(SimulatedRoom::default()));
    let publisher = Publisher {
        mqtt: mqtt.clone(),
        device_topic: config.topics.device_state(&config.device_id),
        sensor_topic: config.topics.sensor_state(&config.sensor_id),
    };

    // Commands are applied outside the poll loop so publishing never waits on
    // the queue the loop drains.
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<Vec<u8>>();
    let poller = tokio::spawn(async move {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Incoming::Publish(message))) if message.topic == set_topic => {
                    if command_tx.send(message.payload.to_vec()).is_err() {
                        break;
                    }
                }
                Ok(Event::Incoming(Incoming::ConnAck(_))) => info!("simulator connected"),
                Ok(_) => {}
                Err(err) => {
                    warn!("simulator mqtt poll error: {err}");
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
    });

    let commands = {
        let room = room.clone();
        let publisher = publisher.clone();
        tokio::spawn(async move {
            while let Some(payload) = command_rx.recv().await {
                handle_command(&room, &publisher, &payload).await;
            }
        })
    };

    info!(
        "simulating {} with sensor {}",
        config.device_id, config.sensor_id
    );

    let mut interval = tokio::time::interval(TICK);
    let result = loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => break Ok(()),
        }

        let snapshot = {
            let mut room = room.lock().await;
            room.step(TICK.as_secs_f32());
            room.clone()
        };
        if let Err(err) = publisher.publish(&snapshot, None).await {
            break Err(err);
        }
    };

    commands.abort();
    poller.abort();
    info!("simulator stopped");
    result
}

async fn handle_command(room: &Mutex<SimulatedRoom>, publisher: &Publisher, payload: &[u8]) {
    if payload.len() > MAX_PAYLOAD_BYTES {
        warn!("dropping oversized command ({} bytes)", payload.len());
        return;
    }
    let command = match serde_json::from_slice::<CommandPayload>(payload) {
        Ok(command) => command,
        Err(err) => {
            warn!("ignoring malformed command: {err}");
            return;
        }
    };
    debug!("received {:?}", command.command());

    let snapshot = {
        let mut room = room.lock().await;
        room.apply(command.command());
        room.clone()
    };
    let context = EventOrigin {
        id: OriginId::new(),
        parent_id: Some(command.origin()),
    };
    if let Err(err) = publisher.publish(&snapshot, Some(context)).await {
        warn!("{err:#}");
    }
}

impl Publisher {
    async fn publish(
        &self,
        room: &SimulatedRoom,
        context: Option<EventOrigin>,
    ) -> anyhow::Result<()> {
        let state = serde_json::to_vec(&room.device_state(context))?;
        self.mqtt
            .publish(self.device_topic.as_str(), QoS::AtLeastOnce, true, state)
            .await
            .context("failed to publish device state")?;
        self.mqtt
            .publish(
                self.sensor_topic.as_str(),
                QoS::AtLeastOnce,
                true,
                room.sensor_reading(),
            )
            .await
            .context("failed to publish sensor reading")?;
        Ok(())
    }
}

impl SimConfig {
    fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };
        Self {
            device_id: var("SIM_DEVICE_ID", "radiator"),
            sensor_id: var("SIM_SENSOR_ID", "room_temperature"),
            topics: Topics::new(&var("SIM_BASE_TOPIC", "home")),
        }
    }
}
