use core::fmt::Display;

pub use embedded_hal::i2c::Operation;

/// An open bus that can execute combined I2C transactions.
pub trait Transport {
    /// Error reported by the underlying transport.
    type Error: Display;

    /// Run `operations` against the device at `address` as one combined
    /// transaction, with repeated starts between the messages.
    ///
    /// Either every message was executed or the call fails. On failure the
    /// contents of any read buffer are unspecified.
    fn transaction(
        &mut self,
        address: u16,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error>;
}
