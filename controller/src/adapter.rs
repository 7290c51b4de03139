use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use rumqttc::{AsyncClient, QoS};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use climate_wrapper_common::{
    wire::{self, CommandPayload, NotificationPayload, MAX_PAYLOAD_BYTES},
    ClimateHost, DeviceChange, DeviceCommand, DeviceSnapshot, HostError, Notification,
    NotificationSink, OriginId, PresentationCommand, TopicKind, Topics,
};

const EVENT_CHANNEL_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    DeviceChanged {
        entity_id: String,
        change: Result<DeviceChange, HostError>,
    },
    SensorChanged {
        entity_id: String,
        reading: Result<f32, HostError>,
    },
    Presentation {
        command: PresentationCommand,
        payload: String,
    },
}

#[derive(Default)]
struct EntityStore {
    devices: HashMap<String, Result<DeviceSnapshot, HostError>>,
    sensors: HashMap<String, Result<f32, HostError>>,
}

pub struct MqttHost {
    client: AsyncClient,
    topics: Topics,
    store: Mutex<EntityStore>,
    events: broadcast::Sender<HostEvent>,
}

impl MqttHost {
    pub fn new(client: AsyncClient, topics: Topics) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            client,
            topics,
            store: Mutex::new(EntityStore::default()),
            events,
        }
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    pub fn client(&self) -> &AsyncClient {
        &self.client
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.events.subscribe()
    }

    pub async fn subscribe_entities(
        &self,
        device_id: &str,
        sensor_id: &str,
        instance: &str,
    ) -> Result<(), rumqttc::ClientError> {
        for topic in [
            self.topics.device_state(device_id),
            self.topics.sensor_state(sensor_id),
            self.topics.instance_command_filter(instance),
        ] {
            self.client.subscribe(topic, QoS::AtLeastOnce).await?;
        }
        Ok(())
    }

    pub fn ingest(&self, topic: &str, payload: &[u8]) {
        if let Some(event) = self.decode(topic, payload) {
            // No receivers simply means nothing is listening yet.
            let _ = self.events.send(event);
        }
    }

    fn decode(&self, topic: &str, payload: &[u8]) -> Option<HostEvent> {
        if payload.len() > MAX_PAYLOAD_BYTES {
            warn!(
                "dropping oversized MQTT payload on topic {} ({} bytes)",
                topic,
                payload.len()
            );
            return None;
        }
        let Ok(message) = std::str::from_utf8(payload) else {
            warn!("dropping non utf8 payload on topic {topic}");
            return None;
        };

        match self.topics.classify(topic)? {
            TopicKind::DeviceState(entity_id) => {
                let change = wire::parse_device_state(&entity_id, message);
                if let Err(err) = &change {
                    debug!("device state not usable: {err}");
                }
                self.lock_store().devices.insert(
                    entity_id.clone(),
                    change.clone().map(|change| change.snapshot),
                );
                Some(HostEvent::DeviceChanged { entity_id, change })
            }
            TopicKind::SensorState(entity_id) => {
                let reading = wire::parse_sensor_reading(&entity_id, message);
                self.lock_store()
                    .sensors
                    .insert(entity_id.clone(), reading.clone());
                Some(HostEvent::SensorChanged { entity_id, reading })
            }
            TopicKind::Command(command) => Some(HostEvent::Presentation {
                command,
                payload: message.trim().to_string(),
            }),
            TopicKind::DeviceSet(_) => None,
        }
    }

    fn lock_store(&self) -> std::sync::MutexGuard<'_, EntityStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ClimateHost for MqttHost {
    fn read_device(&self, entity_id: &str) -> Result<DeviceSnapshot, HostError> {
        self.lock_store()
            .devices
            .get(entity_id)
            .cloned()
            .unwrap_or_else(|| Err(HostError::Unavailable(entity_id.to_string())))
    }

    fn read_sensor(&self, entity_id: &str) -> Result<f32, HostError> {
        self.lock_store()
            .sensors
            .get(entity_id)
            .cloned()
            .unwrap_or_else(|| Err(HostError::Unavailable(entity_id.to_string())))
    }

    fn send_command(
        &self,
        entity_id: &str,
        command: DeviceCommand,
        origin: OriginId,
    ) -> Result<(), HostError> {
        let payload = serde_json::to_vec(&CommandPayload::new(command, origin)).map_err(|err| {
            HostError::CommandFailed {
                entity_id: entity_id.to_string(),
                reason: err.to_string(),
            }
        })?;
        self.client
            .try_publish(
                self.topics.device_set(entity_id),
                QoS::AtLeastOnce,
                false,
                payload,
            )
            .map_err(|err| HostError::CommandFailed {
                entity_id: entity_id.to_string(),
                reason: err.to_string(),
            })
    }

    fn is_present(&self, entity_id: &str) -> bool {
        let store = self.lock_store();
        store.devices.contains_key(entity_id) || store.sensors.contains_key(entity_id)
    }
}

impl NotificationSink for MqttHost {
    fn create(&self, notification: &Notification) {
        let body = match serde_json::to_vec(&NotificationPayload::from(notification)) {
            Ok(body) => body,
            Err(err) => {
                warn!("notification serialization failed: {err}");
                return;
            }
        };
        if let Err(err) = self.client.try_publish(
            self.topics.notification(&notification.id),
            QoS::AtLeastOnce,
            true,
            body,
        ) {
            warn!("notification {} publish failed: {err}", notification.id);
        }
    }

    fn dismiss(&self, notification_id: &str) {
        // Empty retained payload clears the notification.
        if let Err(err) = self.client.try_publish(
            self.topics.notification(notification_id),
            QoS::AtLeastOnce,
            true,
            Vec::<u8>::new(),
        ) {
            warn!("notification {notification_id} dismiss failed: {err}");
        }
    }
}
