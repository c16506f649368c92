//! CPU temperature reader.
//!
//! The Linux thermal zone reports millidegrees Celsius as a decimal
//! integer.  The display report shows it rounded to one decimal place.

use std::fs;
use std::path::Path;

use log::debug;

/// Read a thermal zone file and return degrees Celsius, or `None` if the
/// file is missing or unparseable.
pub fn read_cpu_temperature(path: &Path) -> Option<f32> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!("thermal: cannot read {}: {}", path.display(), e);
            return None;
        }
    };
    parse_millidegrees(&raw)
}

fn parse_millidegrees(raw: &str) -> Option<f32> {
    let milli: i32 = raw.trim().parse().ok()?;
    Some((milli as f32 / 100.0).round() / 10.0)
}
