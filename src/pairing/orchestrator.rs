//! Sequencer for unpair, pair, and open operations

use crate::directory::{resolve, DeviceInfo};
use crate::interp::Interrupt;
use crate::wfd::{InformationElement, PairingParams, WfdConnection, WfdProvider};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How long to let a projection request settle before opening the connection
const PROJECTION_SETTLE: Duration = Duration::from_millis(1000);

/// Drives the pairing/connection backend, one operation at a time.
///
/// At most one connection handle is held; every `connect` starts by
/// unpairing everything so the new pairing is the only one.
pub struct PairingOrchestrator {
    provider: Arc<dyn WfdProvider>,
    group_owner_intent: Option<u8>,
    connection: Option<Box<dyn WfdConnection>>,
    elements: HashMap<String, Vec<InformationElement>>,
}

impl PairingOrchestrator {
    pub fn new(provider: Arc<dyn WfdProvider>) -> Self {
        Self {
            provider,
            group_owner_intent: None,
            connection: None,
            elements: HashMap::new(),
        }
    }

    /// Configured group owner intent; `None` means the backend default
    pub fn group_owner_intent(&self) -> Option<u8> {
        self.group_owner_intent
    }

    pub fn set_group_owner_intent(&mut self, value: Option<u8>) {
        self.group_owner_intent = value;
    }

    /// Id of the device the held connection handle belongs to
    pub fn connected_device(&self) -> Option<&str> {
        self.connection.as_deref().map(|c| c.device_id())
    }

    /// Resolve a token and run the full unpair-pair-open sequence.
    /// Returns 0 on success, 1 on any failure.
    pub async fn connect(
        &mut self,
        snapshot: &[DeviceInfo],
        token: &str,
        interrupt: &Interrupt,
    ) -> i32 {
        let device = match resolve(snapshot, token) {
            Ok(d) => d.clone(),
            Err(e) => {
                println!("{e}");
                return 1;
            }
        };

        self.unpair_all(snapshot).await;
        println!("Connecting to {}...", device.name);

        let paired = self.provider.is_paired(&device).await.unwrap_or(false);
        if !paired {
            let params = PairingParams {
                group_owner_intent: self.group_owner_intent,
                ..Default::default()
            };
            match interrupt.cancellable(self.provider.pair(&device, &params)).await {
                None => {
                    println!("Pairing was canceled by user");
                    return 1;
                }
                Some(Err(e)) => {
                    println!("Pairing failed, Status: {e}");
                    return 1;
                }
                Some(Ok(())) => {}
            }
        }

        self.open_connection(&device, interrupt).await
    }

    /// Connect to a PC peer with projection enabled: kick off projection,
    /// let it settle, then open the connection.
    pub async fn connect_pc(
        &mut self,
        snapshot: &[DeviceInfo],
        token: &str,
        interrupt: &Interrupt,
    ) -> i32 {
        let device = match resolve(snapshot, token) {
            Ok(d) => d.clone(),
            Err(e) => {
                println!("{e}");
                return 1;
            }
        };

        self.unpair_all(snapshot).await;
        println!("Connecting to {} via projection...", device.name);

        // Fire and forget; the projection target reports its own failures.
        if let Err(e) = self.provider.start_projection(&device).await {
            debug!("projection request failed: {e}");
        }
        tokio::time::sleep(PROJECTION_SETTLE).await;

        self.open_connection(&device, interrupt).await
    }

    /// Resolve a token and unpair that device, releasing the held connection
    /// handle if it belongs to it.
    pub async fn disconnect(&mut self, snapshot: &[DeviceInfo], token: &str) -> i32 {
        let device = match resolve(snapshot, token) {
            Ok(d) => d.clone(),
            Err(e) => {
                println!("{e}");
                return 1;
            }
        };

        println!("Unpairing from {}...", device.name);
        match self.provider.unpair(&device).await {
            Ok(status) => {
                println!("{status}");
                if self.connected_device() == Some(device.id.as_str()) {
                    self.connection = None;
                }
                i32::from(status.is_failure())
            }
            Err(e) => {
                println!("{e}");
                1
            }
        }
    }

    /// Vendor information elements for a device, fetched once and cached
    pub async fn information_elements(
        &mut self,
        device: &DeviceInfo,
    ) -> Result<Vec<InformationElement>> {
        if let Some(cached) = self.elements.get(&device.id) {
            return Ok(cached.clone());
        }
        let elements = self.provider.information_elements(device).await?;
        self.elements.insert(device.id.clone(), elements.clone());
        Ok(elements)
    }

    /// Best-effort unpair of every known device, so that at most one pairing
    /// exists afterwards. Errors are ignored, output suppressed. Also drops
    /// the held connection handle.
    async fn unpair_all(&mut self, snapshot: &[DeviceInfo]) {
        self.connection = None;
        for device in snapshot {
            if let Err(e) = self.provider.unpair(device).await {
                debug!("unpair of {} failed: {e}", device.name);
            }
        }
    }

    async fn open_connection(&mut self, device: &DeviceInfo, interrupt: &Interrupt) -> i32 {
        match interrupt.cancellable(self.provider.open(device)).await {
            None => {
                println!("Connect was canceled by user");
                1
            }
            Some(Err(e)) => {
                println!("Connect operation failed: {e}");
                1
            }
            Some(Ok(handle)) => {
                self.connection = Some(handle);
                println!("Connected to {}", device.name);
                0
            }
        }
    }
}
