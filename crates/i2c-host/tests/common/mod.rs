#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use i2c_host::{DiscoveryConfig, Opener, Operation, Registry, Transport};

// ---------------------------------------------------------------------------
// Mock opener
// ---------------------------------------------------------------------------

/// One message as seen by the mock transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Write(Vec<u8>),
    Read(usize),
}

/// One transaction as seen by the mock transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub path: PathBuf,
    pub address: u16,
    pub messages: Vec<Message>,
}

/// State shared by the opener and every handle it hands out.
#[derive(Default)]
pub struct Wire {
    pub transactions: Vec<Recorded>,
    /// Bytes returned by read messages, repeated as needed.
    pub response: Vec<u8>,
    /// If set, the next transaction fails.
    pub fail_next: bool,
}

#[derive(Clone, Default)]
pub struct MockOpener {
    pub opens: Arc<AtomicUsize>,
    pub opened_paths: Arc<Mutex<Vec<PathBuf>>>,
    /// If set to true, the next `open` call fails with permission denied.
    pub fail_next: Arc<AtomicBool>,
    pub wire: Arc<Mutex<Wire>>,
}

impl MockOpener {
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn transactions(&self) -> Vec<Recorded> {
        self.wire.lock().unwrap().transactions.clone()
    }

    pub fn set_response(&self, response: &[u8]) {
        self.wire.lock().unwrap().response = response.to_vec();
    }

    pub fn fail_next_transaction(&self) {
        self.wire.lock().unwrap().fail_next = true;
    }
}

impl Opener for MockOpener {
    type Handle = MockHandle;

    fn open(&self, path: &Path) -> io::Result<MockHandle> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        self.opened_paths.lock().unwrap().push(path.to_path_buf());
        Ok(MockHandle { path: path.to_path_buf(), wire: self.wire.clone() })
    }
}

// ---------------------------------------------------------------------------
// Mock transport
// ---------------------------------------------------------------------------

pub struct MockHandle {
    pub path: PathBuf,
    wire: Arc<Mutex<Wire>>,
}

impl Transport for MockHandle {
    type Error = &'static str;

    fn transaction(
        &mut self,
        address: u16,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut wire = self.wire.lock().unwrap();

        let messages = operations
            .iter()
            .map(|operation| match operation {
                Operation::Write(data) => Message::Write(data.to_vec()),
                Operation::Read(buf) => Message::Read(buf.len()),
            })
            .collect();
        wire.transactions.push(Recorded {
            path: self.path.clone(),
            address,
            messages,
        });

        if std::mem::take(&mut wire.fail_next) {
            return Err("remote I/O error");
        }

        for operation in operations.iter_mut() {
            if let Operation::Read(buf) = operation {
                let response = wire.response.iter().copied().cycle();
                for (byte, value) in buf.iter_mut().zip(response) {
                    *byte = value;
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scratch sysfs tree
// ---------------------------------------------------------------------------

/// Scratch sysfs tree, removed on drop.
pub struct FakeSysfs {
    root: PathBuf,
}

impl FakeSysfs {
    pub fn new(test: &str) -> Self {
        let root = std::env::temp_dir()
            .join(format!("i2c-host-{}-{test}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("class/i2c-dev")).unwrap();
        Self { root }
    }

    /// Add an `i2c-dev` entry, optionally with a `name` file.
    pub fn add(&self, device: &str, name: Option<&str>) {
        let dir = self.root.join("class/i2c-dev").join(device);
        fs::create_dir_all(&dir).unwrap();
        if let Some(name) = name {
            fs::write(dir.join("name"), name).unwrap();
        }
    }

    pub fn config(&self) -> DiscoveryConfig {
        self.config_with_dev_root("/dev")
    }

    pub fn config_with_dev_root(&self, dev_root: &str) -> DiscoveryConfig {
        DiscoveryConfig {
            sysfs_root: self.root.clone(),
            dev_root: dev_root.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}

impl Drop for FakeSysfs {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

pub fn make_registry() -> (Registry<MockOpener>, MockOpener) {
    let opener = MockOpener::default();
    (Registry::with_dev_root(opener.clone(), "/dev"), opener)
}
