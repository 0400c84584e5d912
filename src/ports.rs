/// Hands out consecutive host ports for one batch. Ports are never reused or
/// released, even when the tenant they went to fails later.
#[derive(Debug, Clone)]
pub struct PortAllocator {
    next: Option<u16>,
}

impl PortAllocator {
    pub fn new(start: u16) -> Self {
        Self { next: Some(start) }
    }

    /// `None` once the counter has run past `u16::MAX`.
    pub fn allocate(&mut self) -> Option<u16> {
        let port = self.next?;
        self.next = port.checked_add(1);
        Some(port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_from_start() {
        let mut ports = PortAllocator::new(8000);
        let got: Vec<_> = (0..4).filter_map(|_| ports.allocate()).collect();
        assert_eq!(got, vec![8000, 8001, 8002, 8003]);
    }

    #[test]
    fn exhausts_at_top_of_range() {
        let mut ports = PortAllocator::new(u16::MAX - 1);
        assert_eq!(ports.allocate(), Some(u16::MAX - 1));
        assert_eq!(ports.allocate(), Some(u16::MAX));
        assert_eq!(ports.allocate(), None);
        assert_eq!(ports.allocate(), None);
    }
}
