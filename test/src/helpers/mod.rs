mod test_harness;

pub use packet_exchange::exchange_packets;
pub use test_harness::TestHarness;
