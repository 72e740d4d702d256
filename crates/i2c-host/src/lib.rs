//! Host-side access to chip I2C buses exposed through Linux `i2c-dev`.
//!
//! Buses are named by a `(chip, engine, port)` identity. A [`Registry`] maps
//! each identity to its device node, opens the node on first use and keeps
//! the handle for the rest of its lifetime. Reads and writes may carry a
//! big-endian register offset of up to four bytes in front of the payload.

mod bus;
mod error;
mod offset;
mod opener;
mod registry;
mod transaction;
mod transport;

pub mod discovery;
pub mod linux;

pub use bus::{Bus, BusId};
pub use discovery::{DiscoveredBus, DiscoveryConfig};
pub use error::{Error, Result};
pub use offset::{EncodedOffset, Offset, MAX_OFFSET_WIDTH};
pub use opener::Opener;
pub use registry::{Registry, DEFAULT_DEV_ROOT};
pub use transport::{Operation, Transport};
