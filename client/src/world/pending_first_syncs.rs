use std::collections::{HashMap, VecDeque};

use log::debug;

use tinynet_shared::NetworkId;

/// Full-state messages that arrived before their object was spawned
/// locally. Only the latest message per object is kept.
pub struct PendingFirstSyncs {
    capacity: usize,
    messages: HashMap<NetworkId, Box<[u8]>>,
    // arrival order, oldest first
    order: VecDeque<NetworkId>,
}

impl PendingFirstSyncs {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, network_id: &NetworkId) -> bool {
        self.messages.contains_key(network_id)
    }

    /// Stores `message`, replacing any older one for the same object
    pub fn insert(&mut self, network_id: NetworkId, message: &[u8]) {
        if self.capacity == 0 {
            return;
        }
        if self.messages.insert(network_id, message.into()).is_some() {
            self.order.retain(|id| *id != network_id);
        } else if self.messages.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.messages.remove(&oldest);
                debug!("PendingFirstSyncs: dropped buffered state of {}", oldest);
            }
        }
        self.order.push_back(network_id);
    }

    pub fn take(&mut self, network_id: &NetworkId) -> Option<Box<[u8]>> {
        let message = self.messages.remove(network_id)?;
        self.order.retain(|id| id != network_id);
        Some(message)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.order.clear();
    }
}
