use parking_lot::Mutex;
use std::collections::HashSet;

/// Per node reservation, so the throttle check and the insert of one node
/// never interleave with a second fetch of the same node
#[derive(Default)]
pub struct FetchGuard {
    running: Mutex<HashSet<i32>>,
}

impl FetchGuard {
    pub fn new() -> Self {
        FetchGuard::default()
    }

    /// None if a fetch for this node is already running
    pub fn reserve(&self, node_id: i32) -> Option<FetchReservation<'_>> {
        if !self.running.lock().insert(node_id) {
            return None;
        }
        Some(FetchReservation {
            guard: self,
            node_id,
        })
    }

    #[cfg(test)]
    pub fn is_running(&self, node_id: i32) -> bool {
        self.running.lock().contains(&node_id)
    }
}

pub struct FetchReservation<'a> {
    guard: &'a FetchGuard,
    node_id: i32,
}

impl Drop for FetchReservation<'_> {
    fn drop(&mut self) {
        self.guard.running.lock().remove(&self.node_id);
    }
}
