use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use climate_wrapper_common::ClimateHost;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("entity `{entity_id}` did not become available after {attempts} attempts")]
    NeverAvailable { entity_id: String, attempts: u32 },
}

pub async fn wait_for_entity(
    host: &dyn ClimateHost,
    entity_id: &str,
    poll_interval: Duration,
    max_attempts: u32,
) -> Result<(), SetupError> {
    let mut attempts = 0;
    while !host.is_present(entity_id) {
        attempts += 1;
        if attempts >= max_attempts {
            return Err(SetupError::NeverAvailable {
                entity_id: entity_id.to_string(),
                attempts,
            });
        }
        debug!("waiting for {entity_id} ({attempts}/{max_attempts})");
        tokio::time::sleep(poll_interval).await;
    }
    info!("{entity_id} available");
    Ok(())
}

pub async fn wait_for_dependencies(
    host: &dyn ClimateHost,
    device_id: &str,
    sensor_id: &str,
    poll_interval: Duration,
    max_attempts: u32,
) -> Result<(), SetupError> {
    tokio::try_join!(
        wait_for_entity(host, device_id, poll_interval, max_attempts),
        wait_for_entity(host, sensor_id, poll_interval, max_attempts),
    )?;
    Ok(())
}
