//! Sequential, allocate-only port cursor.

use olt_types::{MAX_PORTS, MAX_SLOTS};

/// Cursor over the 16 × 16 slot/port grid of the abstract chassis.
///
/// Ports are handed out row-major: slot 0 ports 0..15, then slot 1, and so
/// on through slot 15. After the last port the cursor wraps to (0, 0) and
/// latches `out_of_ports`; nothing is ever handed out again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortAllocationInfo {
    slot: usize,
    port: usize,
    out_of_ports: bool,
}

impl PortAllocationInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot index the next allocation will use.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Port index the next allocation will use.
    pub fn port(&self) -> usize {
        self.port
    }

    pub fn is_out_of_ports(&self) -> bool {
        self.out_of_ports
    }

    /// Number of ports handed out so far.
    pub fn allocated(&self) -> usize {
        if self.out_of_ports {
            MAX_SLOTS * MAX_PORTS
        } else {
            self.slot * MAX_PORTS + self.port
        }
    }

    /// Returns the current (slot, port) and advances, or `None` once exhausted.
    pub(crate) fn take_next(&mut self) -> Option<(usize, usize)> {
        if self.out_of_ports {
            return None;
        }

        let current = (self.slot, self.port);

        self.port += 1;
        if self.port == MAX_PORTS {
            self.port = 0;
            self.slot += 1;
            if self.slot == MAX_SLOTS {
                self.slot = 0;
                self.out_of_ports = true;
            }
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_allocations() {
        let mut info = PortAllocationInfo::new();
        assert_eq!(info.take_next(), Some((0, 0)));
        assert_eq!(info.take_next(), Some((0, 1)));
        assert_eq!(info.allocated(), 2);
    }

    #[test]
    fn test_wraps_to_next_slot() {
        let mut info = PortAllocationInfo::new();
        for _ in 0..MAX_PORTS {
            info.take_next();
        }
        assert_eq!((info.slot(), info.port()), (1, 0));
        assert_eq!(info.take_next(), Some((1, 0)));
    }

    #[test]
    fn test_latch_resets_cursor() {
        let mut info = PortAllocationInfo::new();
        let mut last = None;
        for _ in 0..MAX_SLOTS * MAX_PORTS {
            last = info.take_next();
        }

        assert_eq!(last, Some((15, 15)));
        assert!(info.is_out_of_ports());
        assert_eq!((info.slot(), info.port()), (0, 0));
        assert_eq!(info.allocated(), 256);

        assert_eq!(info.take_next(), None);
        assert_eq!(info.take_next(), None);
    }
}
