//! Offset-prefixed reads and writes on a registered bus.
//!
//! Reads go out as one combined transaction: an optional write of the
//! encoded offset followed by the read, so the target sees a repeated start
//! rather than a stop between the two. Writes are coalesced into a single
//! message holding the offset followed by the payload, since not every
//! kernel driver can split a write into two messages without an idle gap
//! between them.

use tracing::{debug, error};

use crate::bus::BusId;
use crate::error::{Error, Result};
use crate::offset::Offset;
use crate::opener::Opener;
use crate::registry::Registry;
use crate::transport::{Operation, Transport};

impl<O> Registry<O>
where
    O: Opener,
    O::Handle: Transport,
{
    /// Read `length` bytes from `address` on bus `id`, starting at the given
    /// offset.
    ///
    /// `offset_width` is the number of offset bytes to send (0 to 4).
    pub fn read(
        &mut self,
        id: BusId,
        address: u16,
        offset_width: u32,
        offset: u32,
        length: usize,
    ) -> Result<Vec<u8>> {
        let offset = Offset::new(offset_width, offset)?;
        let mut data = vec![0u8; length];
        self.transfer_read(id, address, offset, &mut data)?;
        Ok(data)
    }

    /// Like [`read`](Self::read), filling a caller-owned buffer.
    ///
    /// The buffer contents are unspecified if the call fails.
    pub fn read_into(
        &mut self,
        id: BusId,
        address: u16,
        offset_width: u32,
        offset: u32,
        data: &mut [u8],
    ) -> Result<()> {
        let offset = Offset::new(offset_width, offset)?;
        self.transfer_read(id, address, offset, data)
    }

    /// Write `data` to `address` on bus `id`, starting at the given offset.
    pub fn write(
        &mut self,
        id: BusId,
        address: u16,
        offset_width: u32,
        offset: u32,
        data: &[u8],
    ) -> Result<()> {
        let offset = Offset::new(offset_width, offset)?;
        let handle = self.resolve(id)?;

        let mut message = Vec::with_capacity(offset.width() + data.len());
        message.extend_from_slice(offset.encode().as_slice());
        message.extend_from_slice(data);

        handle
            .transaction(address, &mut [Operation::Write(message.as_slice())])
            .map_err(|err| {
                error!(bus = %id, "I2C write error: {err}");
                Error::TransactionFailed(err.to_string())
            })?;

        debug!(
            "I2C: wrote to {id}@{address:02x}+{:#x} {} bytes ok",
            offset.value(),
            data.len()
        );
        Ok(())
    }

    fn transfer_read(
        &mut self,
        id: BusId,
        address: u16,
        offset: Offset,
        data: &mut [u8],
    ) -> Result<()> {
        let handle = self.resolve(id)?;
        let length = data.len();
        let encoded = offset.encode();

        let result = if encoded.is_empty() {
            handle.transaction(address, &mut [Operation::Read(data)])
        } else {
            handle.transaction(
                address,
                &mut [
                    Operation::Write(encoded.as_slice()),
                    Operation::Read(data),
                ],
            )
        };
        result.map_err(|err| {
            error!(bus = %id, "I2C read error: {err}");
            Error::TransactionFailed(err.to_string())
        })?;

        debug!(
            "I2C: read from {id}@{address:02x}+{:#x} {length} bytes ok",
            offset.value()
        );
        Ok(())
    }
}
