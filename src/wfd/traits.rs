//! Trait abstraction for the pairing/connection backend

use crate::directory::DeviceInfo;
use anyhow::Result;
use async_trait::async_trait;

/// OUI assigned to Microsoft Corporation
pub const MSFT_OUI: [u8; 3] = [0x00, 0x50, 0xF2];

/// OUI assigned to the Wi-Fi Alliance
pub const WFA_OUI: [u8; 3] = [0x50, 0x6F, 0x9A];

/// Group owner intent the backend applies when none is configured
pub const DEFAULT_GROUP_OWNER_INTENT: u8 = 14;

/// Pairing procedure preference passed to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingProcedure {
    /// Negotiate the group owner role with the peer. Always preferred.
    #[default]
    GroupOwnerNegotiation,
    /// Join an existing group by invitation
    Invitation,
}

/// Parameters for a pairing attempt
#[derive(Debug, Clone, Default)]
pub struct PairingParams {
    pub procedure: PairingProcedure,
    /// Group owner intent in `[0,15]`; `None` means the backend default.
    /// 14 works with most Miracast sinks, some TVs need 0 or 1.
    pub group_owner_intent: Option<u8>,
}

/// Backend-reported outcome of an unpair request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpairStatus {
    Unpaired,
    AlreadyUnpaired,
    AccessDenied,
    Failed,
}

impl UnpairStatus {
    pub fn is_failure(self) -> bool {
        self == UnpairStatus::Failed
    }
}

impl std::fmt::Display for UnpairStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnpairStatus::Unpaired => write!(f, "Unpaired"),
            UnpairStatus::AlreadyUnpaired => write!(f, "AlreadyUnpaired"),
            UnpairStatus::AccessDenied => write!(f, "AccessDenied"),
            UnpairStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// A vendor information element advertised by a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InformationElement {
    pub oui: [u8; 3],
    pub oui_type: u8,
}

impl InformationElement {
    pub fn new(oui: [u8; 3], oui_type: u8) -> Self {
        Self { oui, oui_type }
    }

    /// OUI bytes as an uppercase hex string, e.g. `0050F2`
    pub fn oui_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.oui[0], self.oui[1], self.oui[2])
    }
}

/// An open connection to a device. Dropping the handle releases the
/// underlying resources.
pub trait WfdConnection: Send {
    /// Id of the device this handle is connected to
    fn device_id(&self) -> &str;
}

/// The pairing/connection backend the orchestrator drives.
///
/// PIN exchange and the negotiation protocol itself are the backend's
/// business; errors come back as status text only.
#[async_trait]
pub trait WfdProvider: Send + Sync {
    /// Whether the device is currently paired
    async fn is_paired(&self, device: &DeviceInfo) -> Result<bool>;

    /// Pair with the device using the given parameters
    async fn pair(&self, device: &DeviceInfo, params: &PairingParams) -> Result<()>;

    /// Remove an existing pairing
    async fn unpair(&self, device: &DeviceInfo) -> Result<UnpairStatus>;

    /// Open a connection handle to a paired device
    async fn open(&self, device: &DeviceInfo) -> Result<Box<dyn WfdConnection>>;

    /// Kick off screen projection towards a PC peer
    async fn start_projection(&self, device: &DeviceInfo) -> Result<()>;

    /// Fetch the vendor information elements the device advertises
    async fn information_elements(&self, device: &DeviceInfo) -> Result<Vec<InformationElement>>;
}
