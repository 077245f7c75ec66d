//! Handlers for the registry commands
//!
//! Every handler returns an integer status: 0 for success, 1 for failure.
//! Statuses are accumulated into the session exit code, which is what the
//! conditional engine evaluates.

mod device_list;
mod misc;
mod pairing;
mod settings;

pub use device_list::{format_device_list, handle_info, handle_list};
pub use misc::{handle_clear, handle_delay, handle_help};
pub use pairing::{handle_connect, handle_connect_pc, handle_disconnect};
pub use settings::handle_set;

use crate::directory::DeviceDirectory;
use crate::interp::Interrupt;
use crate::pairing::PairingOrchestrator;

/// Context passed to command handlers
pub struct HandlerContext<'a> {
    pub directory: &'a DeviceDirectory,
    pub pairing: &'a mut PairingOrchestrator,
    pub interrupt: &'a Interrupt,
}
