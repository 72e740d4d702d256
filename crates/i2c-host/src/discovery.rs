//! Bus discovery through sysfs.
//!
//! Every `i2c-dev` node appears as `<sysfs>/class/i2c-dev/<device>` with a
//! `name` file holding the adapter name. Chip buses are named
//! `p8_<chip>_e<engine>p<port>` or `cen_<chip>_e<engine>p<port>`, with the
//! chip id in hex and engine and port in decimal. Anything else is not a
//! chip bus and is ignored.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::bus::BusId;
use crate::error::Result;
use crate::registry::DEFAULT_DEV_ROOT;

const DEFAULT_SYSFS_ROOT: &str = "/sys";
const BUS_NAME_PREFIXES: [&str; 2] = ["p8_", "cen_"];

/// Where to look for buses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// sysfs mount point.
    pub sysfs_root: PathBuf,
    /// Directory holding the device nodes.
    pub dev_root: PathBuf,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            dev_root: PathBuf::from(DEFAULT_DEV_ROOT),
        }
    }
}

/// A chip bus found by [`discover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredBus {
    pub id: BusId,
    /// Device node name, e.g. `i2c-3`.
    pub device_name: String,
}

/// Parse an adapter name into a bus identity.
///
/// Returns `None` for adapters that are not chip buses or whose name is
/// malformed.
pub fn parse_bus_name(name: &str) -> Option<BusId> {
    let name = name.trim_end();
    let rest = BUS_NAME_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))?;

    let (chip, rest) = rest.split_once("_e")?;
    let (engine, port) = rest.split_once('p')?;

    let all_hex = |s: &str| s.bytes().all(|b| b.is_ascii_hexdigit());
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_hex(chip) || !all_digits(engine) || !all_digits(port) {
        return None;
    }

    Some(BusId::new(
        u32::from_str_radix(chip, 16).ok()?,
        engine.parse().ok()?,
        port.parse().ok()?,
    ))
}

/// Sort key putting `i2c-2` before `i2c-10`. Names without a numeric
/// suffix go last.
fn device_order(name: &OsStr) -> (u32, OsString) {
    let number = name
        .to_str()
        .and_then(|name| name.rsplit_once('-'))
        .and_then(|(_, number)| number.parse().ok())
        .unwrap_or(u32::MAX);
    (number, name.to_os_string())
}

/// List the chip buses exposed under `config.sysfs_root`, ordered by the
/// adapter number in the device name (`i2c-2` before `i2c-10`).
///
/// Fails only if the `i2c-dev` class directory cannot be read. Entries whose
/// name cannot be read are skipped with a warning.
pub fn discover(config: &DiscoveryConfig) -> Result<Vec<DiscoveredBus>> {
    let class_dir = config.sysfs_root.join("class").join("i2c-dev");
    let mut entries = fs::read_dir(&class_dir)
        .and_then(|dir| dir.collect::<io::Result<Vec<_>>>())
        .inspect_err(|err| {
            warn!(path = %class_dir.display(), %err, "can't list I2C devices");
        })?;
    entries.sort_by_key(|entry| device_order(&entry.file_name()));

    let mut found = Vec::new();
    for entry in entries {
        let name_path = entry.path().join("name");
        let adapter_name = match fs::read_to_string(&name_path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(
                    path = %name_path.display(),
                    %err,
                    "can't read bus name, skipping"
                );
                continue;
            }
        };
        let adapter_name = adapter_name.lines().next().unwrap_or_default();

        let Some(id) = parse_bus_name(adapter_name) else {
            debug!(adapter = adapter_name, "not a chip I2C bus, skipping");
            continue;
        };

        info!(
            "I2C: found chip {:08x} engine {} port {}",
            id.chip, id.engine, id.port
        );
        found.push(DiscoveredBus {
            id,
            device_name: entry.file_name().to_string_lossy().into_owned(),
        });
    }

    Ok(found)
}
