//! Program image loading.
//!
//! This module reads the program the simulated chiplet will execute out of RAM. It handles:
//! 1. **Raw binaries:** Output of `objcopy -O binary`, returned verbatim.
//! 2. **ELF files:** Flattened like `objcopy -O binary` does: every loadable segment's
//!    file bytes are placed at `address - lowest_address` and gaps are zero-filled.

use std::fs;
use std::path::Path;

use object::{Object, ObjectSegment};

use crate::common::{MonitorError, MonitorResult};

const ELF_MAGIC: &[u8; 4] = b"\x7fELF";

/// Loads a program image from disk.
///
/// # Arguments
///
/// * `path` - Path to a raw binary or an ELF file.
///
/// # Returns
///
/// The bytes to place in RAM starting at offset 0.
pub fn load_image(path: impl AsRef<Path>) -> MonitorResult<Vec<u8>> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| image_error(path, e))?;
    if is_elf(&data) {
        flatten_elf(&data).map_err(|reason| image_error(path, reason))
    } else {
        Ok(data)
    }
}

/// Returns `true` if `data` starts with the ELF magic number.
pub fn is_elf(data: &[u8]) -> bool {
    data.starts_with(ELF_MAGIC)
}

/// Flattens the loadable segments of an in-memory ELF file into a contiguous image.
///
/// An ELF with no non-empty loadable segment flattens to an empty image.
pub fn flatten_elf(data: &[u8]) -> Result<Vec<u8>, String> {
    let file = object::File::parse(data).map_err(|e| e.to_string())?;

    let mut segments = Vec::new();
    for segment in file.segments() {
        let bytes = segment.data().map_err(|e| e.to_string())?;
        if !bytes.is_empty() {
            segments.push((segment.address(), bytes));
        }
    }

    let Some(lowest) = segments.iter().map(|(addr, _)| *addr).min() else {
        return Ok(Vec::new());
    };

    let mut end = 0usize;
    for (addr, bytes) in &segments {
        let start = usize::try_from(addr - lowest).map_err(|e| e.to_string())?;
        let seg_end = start
            .checked_add(bytes.len())
            .ok_or_else(|| format!("segment at {addr:#x} overflows the address space"))?;
        end = end.max(seg_end);
    }

    let mut image = vec![0u8; end];
    for (addr, bytes) in segments {
        let start = usize::try_from(addr - lowest).map_err(|e| e.to_string())?;
        image[start..start + bytes.len()].copy_from_slice(bytes);
    }
    Ok(image)
}

fn image_error(path: &Path, reason: impl ToString) -> MonitorError {
    MonitorError::Image {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
