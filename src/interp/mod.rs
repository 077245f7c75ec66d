//! The interpreter core
//!
//! This module handles:
//! - The serial session loop reading one command line at a time
//! - Conditional blocks (`if`/`elif`/`else`/`endif`) gating dispatch
//! - Loop recording and replay (`foreach`/`endfor`)
//! - Interrupt routing and exit-code accumulation

mod conditional;
mod foreach;
mod interrupt;
mod session;

pub use conditional::ConditionalStack;
pub use foreach::{LoopState, PLACEHOLDER};
pub use interrupt::Interrupt;
pub use session::Session;
