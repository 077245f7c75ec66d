//! Simulated pairing/connection backend
//!
//! Stands in for a real wireless stack during development and in tests, the
//! same way the engine's Bluetooth transport has a TCP simulation mode. It
//! tracks pairing state per device, records every operation for inspection,
//! and can be told to fail pairing for specific devices.

use super::traits::{
    InformationElement, PairingParams, UnpairStatus, WfdConnection, WfdProvider, MSFT_OUI, WFA_OUI,
};
use crate::directory::{DeviceEvent, DeviceInfo};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// One backend operation, as recorded by the simulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimOp {
    Pair {
        device: String,
        group_owner_intent: Option<u8>,
    },
    Unpair(String),
    Open(String),
    Projection(String),
}

/// Simulated Wi-Fi Direct backend
#[derive(Default)]
pub struct SimWfd {
    paired: Mutex<HashSet<String>>,
    open: Arc<Mutex<HashSet<String>>>,
    failing: Mutex<HashSet<String>>,
    log: Mutex<Vec<SimOp>>,
    latency: Duration,
}

impl SimWfd {
    /// Backend with no artificial latency (tests)
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose pair/open operations take `latency` to complete
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Make pairing attempts against this device id fail
    pub fn fail_pairing(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }

    /// Mark a device as already paired
    pub fn preset_paired(&self, id: &str) {
        self.paired.lock().unwrap().insert(id.to_string());
    }

    /// Everything the backend has been asked to do, in order
    pub fn operations(&self) -> Vec<SimOp> {
        self.log.lock().unwrap().clone()
    }

    /// Whether a connection handle to this device is currently open
    pub fn is_open(&self, id: &str) -> bool {
        self.open.lock().unwrap().contains(id)
    }

    fn record(&self, op: SimOp) {
        self.log.lock().unwrap().push(op);
    }

    async fn settle(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl WfdProvider for SimWfd {
    async fn is_paired(&self, device: &DeviceInfo) -> Result<bool> {
        Ok(self.paired.lock().unwrap().contains(&device.id))
    }

    async fn pair(&self, device: &DeviceInfo, params: &PairingParams) -> Result<()> {
        self.record(SimOp::Pair {
            device: device.id.clone(),
            group_owner_intent: params.group_owner_intent,
        });
        self.settle().await;
        if self.failing.lock().unwrap().contains(&device.id) {
            return Err(anyhow!("Failed"));
        }
        self.paired.lock().unwrap().insert(device.id.clone());
        debug!("[SIM] paired with {}", device.name);
        Ok(())
    }

    async fn unpair(&self, device: &DeviceInfo) -> Result<UnpairStatus> {
        self.record(SimOp::Unpair(device.id.clone()));
        let was_paired = self.paired.lock().unwrap().remove(&device.id);
        Ok(if was_paired {
            UnpairStatus::Unpaired
        } else {
            UnpairStatus::AlreadyUnpaired
        })
    }

    async fn open(&self, device: &DeviceInfo) -> Result<Box<dyn WfdConnection>> {
        self.record(SimOp::Open(device.id.clone()));
        self.settle().await;
        self.open.lock().unwrap().insert(device.id.clone());
        Ok(Box::new(SimConnection {
            device_id: device.id.clone(),
            open: self.open.clone(),
        }))
    }

    async fn start_projection(&self, device: &DeviceInfo) -> Result<()> {
        self.record(SimOp::Projection(device.id.clone()));
        Ok(())
    }

    async fn information_elements(&self, _device: &DeviceInfo) -> Result<Vec<InformationElement>> {
        // A typical sink advertises one Microsoft and two WFA elements.
        Ok(vec![
            InformationElement::new(MSFT_OUI, 2),
            InformationElement::new(WFA_OUI, 10),
            InformationElement::new(WFA_OUI, 9),
        ])
    }
}

/// Connection handle produced by the simulator; dropping it releases the
/// simulated connection.
struct SimConnection {
    device_id: String,
    open: Arc<Mutex<HashSet<String>>>,
}

impl WfdConnection for SimConnection {
    fn device_id(&self) -> &str {
        &self.device_id
    }
}

impl Drop for SimConnection {
    fn drop(&mut self) {
        self.open.lock().unwrap().remove(&self.device_id);
    }
}

/// Feed a fixed set of devices into a discovery channel, as if a device
/// watcher had enumerated them
pub fn discovery_feed(devices: Vec<DeviceInfo>) -> mpsc::Receiver<DeviceEvent> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        for device in devices {
            if tx.send(DeviceEvent::Added(device)).await.is_err() {
                break;
            }
        }
    });
    rx
}
