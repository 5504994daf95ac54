mod pending_first_syncs;

pub use pending_first_syncs::PendingFirstSyncs;
