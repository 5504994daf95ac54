use std::default::Default;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Whether a full state received for an object that has not been
    /// spawned locally yet is kept, and applied once it is
    pub buffer_early_first_sync: bool,
    /// Maximum number of objects with a buffered full state. The oldest
    /// entry is dropped to make room.
    pub max_buffered_first_syncs: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            buffer_early_first_sync: true,
            max_buffered_first_syncs: 64,
        }
    }
}
