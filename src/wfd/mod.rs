//! Wi-Fi Direct collaborator seam
//!
//! The interpreter core never talks to a wireless stack directly; it goes
//! through the [`WfdProvider`] trait. The binary and the tests use the
//! simulated backend, a real platform backend plugs in behind the same trait.

pub mod sim;
pub mod traits;

pub use sim::{discovery_feed, SimOp, SimWfd};
pub use traits::{
    InformationElement, PairingParams, PairingProcedure, UnpairStatus, WfdConnection,
    WfdProvider, DEFAULT_GROUP_OWNER_INTENT, MSFT_OUI, WFA_OUI,
};
