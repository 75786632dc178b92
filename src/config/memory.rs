//! Total system memory probe.

/// Source of the machine's total physical memory, in bytes.
pub trait MemoryProbe: Send + Sync {
    fn total_memory(&self) -> u64;
}

/// Reads physical memory from the operating system.
///
/// Reports 0 where the amount cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMemory;

impl MemoryProbe for SystemMemory {
    #[cfg(unix)]
    fn total_memory(&self) -> u64 {
        // SAFETY: sysconf has no preconditions.
        let (pages, page_size) =
            unsafe { (libc::sysconf(libc::_SC_PHYS_PAGES), libc::sysconf(libc::_SC_PAGESIZE)) };
        if pages <= 0 || page_size <= 0 {
            return 0;
        }
        (pages as u64).saturating_mul(page_size as u64)
    }

    #[cfg(not(unix))]
    fn total_memory(&self) -> u64 {
        0
    }
}

/// A fixed reading, for deterministic sizing.
#[derive(Debug, Clone, Copy)]
pub struct FixedMemory(pub u64);

impl MemoryProbe for FixedMemory {
    fn total_memory(&self) -> u64 {
        self.0
    }
}

/// Formats a byte count with binary units ("200 MiB").
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_system_memory_is_reported() {
        assert!(SystemMemory.total_memory() > 0);
    }

    #[test]
    fn test_human_bytes() {
        assert_eq!(human_bytes(512), "512 B");
        assert_eq!(human_bytes(40 * 1024 * 1024), "40.0 MiB");
        assert_eq!(human_bytes(3 * 1024 * 1024 * 1024 / 2), "1.5 GiB");
    }
}
