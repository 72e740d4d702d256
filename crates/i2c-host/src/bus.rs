use std::path::{Path, PathBuf};

use derive_more::Display;

/// Identity of a physical I2C bus: the chip it hangs off, the I2C engine on
/// that chip and the engine's port.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display("{chip:08x}/{engine}/{port}")]
pub struct BusId {
    pub chip: u32,
    pub engine: u8,
    pub port: u8,
}

impl BusId {
    pub const fn new(chip: u32, engine: u8, port: u8) -> Self {
        Self { chip, engine, port }
    }
}

/// Handle state of a registered bus.
pub(crate) enum HandleState<H> {
    /// Device node not opened yet, or the last open attempt failed.
    Unopened,
    /// Device node is open. Never leaves this state.
    Open(H),
}

/// A registered bus and its lazily opened handle.
pub struct Bus<H> {
    id: BusId,
    device_path: PathBuf,
    pub(crate) state: HandleState<H>,
}

impl<H> Bus<H> {
    pub(crate) fn new(id: BusId, device_path: PathBuf) -> Self {
        Self { id, device_path, state: HandleState::Unopened }
    }

    pub fn id(&self) -> BusId {
        self.id
    }

    /// Device node captured at registration.
    pub fn device_path(&self) -> &Path {
        &self.device_path
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, HandleState::Open(_))
    }
}

impl<H> core::fmt::Debug for Bus<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bus")
            .field("id", &self.id)
            .field("device_path", &self.device_path)
            .field("open", &self.is_open())
            .finish()
    }
}
