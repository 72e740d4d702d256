use std::io;
use std::path::Path;

/// Abstracts how a bus device node becomes an open handle.
///
/// The registry calls [`open`](Opener::open) at most once per successfully
/// opened bus. A failed open is reported to the caller and may be retried by
/// a later resolve.
pub trait Opener {
    /// The open communication handle kept for the bus.
    type Handle;

    /// Open the device node at `path` for reading and writing.
    fn open(&self, path: &Path) -> io::Result<Self::Handle>;
}

impl<H, F> Opener for F
where
    F: Fn(&Path) -> io::Result<H>,
{
    type Handle = H;

    fn open(&self, path: &Path) -> io::Result<H> {
        self(path)
    }
}
