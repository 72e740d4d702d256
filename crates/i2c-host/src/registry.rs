use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::bus::{Bus, BusId, HandleState};
use crate::discovery::DiscoveredBus;
use crate::error::{Error, Result};
use crate::opener::Opener;

/// Directory holding the `i2c-dev` character devices.
pub const DEFAULT_DEV_ROOT: &str = "/dev";

/// Registry of known buses.
///
/// Buses are kept in registration order. Registration does not check for
/// duplicate identities; lookups return the first bus registered under an
/// identity. Each bus is opened on its first [`resolve`](Self::resolve) and
/// the handle is kept until the registry is dropped.
///
/// Resolving and transacting take `&mut self`. Share a registry between
/// threads by wrapping it in a mutex.
pub struct Registry<O: Opener> {
    buses: Vec<Bus<O::Handle>>,
    dev_root: PathBuf,
    opener: O,
}

impl<O: Opener> Registry<O> {
    /// Create an empty registry resolving device names under `/dev`.
    pub fn new(opener: O) -> Self {
        Self::with_dev_root(opener, DEFAULT_DEV_ROOT)
    }

    /// Create an empty registry resolving device names under `dev_root`.
    pub fn with_dev_root(opener: O, dev_root: impl Into<PathBuf>) -> Self {
        Self { buses: Vec::new(), dev_root: dev_root.into(), opener }
    }

    /// Register a bus whose device node is `<dev_root>/<device_name>`.
    ///
    /// The node is not opened here.
    pub fn register(
        &mut self,
        chip: u32,
        engine: u8,
        port: u8,
        device_name: &str,
    ) {
        let id = BusId::new(chip, engine, port);
        let device_path = self.dev_root.join(device_name);
        debug!(bus = %id, path = %device_path.display(), "registered I2C bus");
        self.buses.push(Bus::new(id, device_path));
    }

    /// Register every bus yielded by a discovery pass, in order.
    pub fn register_discovered<I>(&mut self, buses: I)
    where
        I: IntoIterator<Item = DiscoveredBus>,
    {
        for bus in buses {
            let BusId { chip, engine, port } = bus.id;
            self.register(chip, engine, port, &bus.device_name);
        }
    }

    /// Return the open handle for bus `id`, opening it on first use.
    ///
    /// A failed open leaves the bus unopened so a later call can retry.
    pub fn resolve(&mut self, id: BusId) -> Result<&mut O::Handle> {
        let Some(bus) = self.buses.iter_mut().find(|bus| bus.id() == id)
        else {
            warn!(bus = %id, "I2C bus not found");
            return Err(Error::NotFound(id));
        };

        if let HandleState::Unopened = bus.state {
            let handle =
                open_device(&self.opener, bus.device_path()).map_err(
                    |source| Error::OpenFailed {
                        path: bus.device_path().to_path_buf(),
                        source,
                    },
                )?;
            bus.state = HandleState::Open(handle);
        }

        match &mut bus.state {
            HandleState::Open(handle) => Ok(handle),
            HandleState::Unopened => unreachable!(),
        }
    }

    /// First bus registered under `id`.
    pub fn find(&self, id: BusId) -> Option<&Bus<O::Handle>> {
        self.buses.iter().find(|bus| bus.id() == id)
    }

    /// Returns `Some(true)` if bus `id` is open, `Some(false)` if it is
    /// registered but unopened, `None` if it is unknown.
    pub fn is_open(&self, id: BusId) -> Option<bool> {
        self.find(id).map(Bus::is_open)
    }

    /// Registered buses in registration order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &Bus<O::Handle>> {
        self.buses.iter()
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }
}

fn open_device<O: Opener>(
    opener: &O,
    path: &Path,
) -> std::io::Result<O::Handle> {
    match opener.open(path) {
        Ok(handle) => {
            debug!(path = %path.display(), "opened I2C device");
            Ok(handle)
        }
        Err(err) => {
            error!(path = %path.display(), %err, "failed to open I2C device");
            Err(err)
        }
    }
}
