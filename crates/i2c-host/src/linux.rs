//! `i2c-dev` backed buses.

use std::io;
use std::path::Path;

use i2cdev::core::{I2CMessage, I2CTransfer};
use i2cdev::linux::{LinuxI2CBus, LinuxI2CError, LinuxI2CMessage};

use crate::discovery::{self, DiscoveryConfig};
use crate::error::Result;
use crate::opener::Opener;
use crate::registry::Registry;
use crate::transport::{Operation, Transport};

/// Opens `/dev/i2c-*` nodes as [`LinuxI2CBus`] handles.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxOpener;

impl Opener for LinuxOpener {
    type Handle = LinuxI2CBus;

    fn open(&self, path: &Path) -> io::Result<LinuxI2CBus> {
        LinuxI2CBus::new(path).map_err(io::Error::from)
    }
}

impl Transport for LinuxI2CBus {
    type Error = LinuxI2CError;

    /// Issues all operations in a single `I2C_RDWR` ioctl.
    fn transaction(
        &mut self,
        address: u16,
        operations: &mut [Operation<'_>],
    ) -> core::result::Result<(), LinuxI2CError> {
        let mut messages: Vec<LinuxI2CMessage<'_>> = operations
            .iter_mut()
            .map(|operation| {
                let message = match operation {
                    Operation::Read(buf) => LinuxI2CMessage::read(&mut buf[..]),
                    Operation::Write(buf) => LinuxI2CMessage::write(*buf),
                };
                message.with_address(address)
            })
            .collect();

        self.transfer(&mut messages).map(drop)
    }
}

/// Discover the buses under `config.sysfs_root` and register them in a new
/// registry rooted at `config.dev_root`.
pub fn open_system(config: &DiscoveryConfig) -> Result<Registry<LinuxOpener>> {
    let mut registry =
        Registry::with_dev_root(LinuxOpener, config.dev_root.clone());
    registry.register_discovered(discovery::discover(config)?);
    Ok(registry)
}
