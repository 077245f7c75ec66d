//! Pairing and connection orchestration
//!
//! This module handles:
//! - Sequencing unpair, pair, and open against the backend
//! - Holding the single active connection handle
//! - The configured group owner intent and the information-element cache

mod orchestrator;

pub use orchestrator::PairingOrchestrator;
