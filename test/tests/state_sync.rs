use std::time::{Duration, Instant};

use tinynet_server::{Server, ServerConfig};
use tinynet_shared::{DeliveryMode, OutgoingQueue, ReplicatedObject, SchemaRegistry};
use tinynet_test::{protocol, AllKinds, ArmoredPawn, Pawn, TestHarness, Wide, WIDE_FIELD_COUNT};

fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// Builds `first` on the first call, then defaults
fn first_then_default<R: tinynet_shared::Replicate + Default>(
    first: R,
) -> impl FnMut() -> ReplicatedObject<R> {
    let mut first = Some(first);
    move || ReplicatedObject::new(first.take().unwrap_or_default())
}

#[test]
fn single_field_change_produces_minimal_delta() {
    init_logging();

    let config = ServerConfig {
        first_network_id: 7,
        ..ServerConfig::default()
    };
    let mut server = Server::new(config, protocol());
    let mut queue = OutgoingQueue::new();
    let id = server
        .spawn(ReplicatedObject::new(Pawn::default()), None, &mut queue)
        .unwrap();
    queue.drain();

    server.object_mut::<Pawn>(id).unwrap().inner_mut().y = 5;
    assert_eq!(server.update(Instant::now(), &mut queue), 1);

    let packet = queue.pop().unwrap();
    assert_eq!(&packet.payload[1..], &[7, 0, 0, 0, 0, 0b010, 5, 0, 0, 0]);
}

#[test]
fn clients_mirror_the_server() {
    init_logging();

    let mut harness = TestHarness::new(protocol);
    let alice = harness.add_client();
    let bob = harness.add_client();
    let id = harness.spawn(None, first_then_default(Pawn::new(1, 2, 3)));
    harness.exchange();

    for connection in [alice, bob] {
        let pawn = harness.client(connection).object::<Pawn>(id).unwrap();
        assert_eq!(pawn.inner(), &Pawn::new(1, 2, 3));
    }

    let start = Instant::now();
    harness.tick(start);
    {
        let pawn = harness.server.object_mut::<Pawn>(id).unwrap().inner_mut();
        pawn.x = -4;
        pawn.z = 9;
    }
    assert_eq!(harness.tick(start + Duration::from_millis(50)), 1);

    for connection in [alice, bob] {
        let pawn = harness.client(connection).object::<Pawn>(id).unwrap();
        assert_eq!(pawn.inner(), &Pawn::new(-4, 2, 9));
    }
    assert!(harness.take_errors().is_empty());
}

#[test]
fn unchanged_objects_send_nothing() {
    init_logging();

    let mut harness = TestHarness::new(protocol);
    harness.add_client();
    let id = harness.spawn(None, || ReplicatedObject::new(Pawn::default()));
    harness.exchange();

    let start = Instant::now();
    assert_eq!(harness.tick(start), 0);

    harness.server.object_mut::<Pawn>(id).unwrap().inner_mut().x = 1;
    assert_eq!(harness.tick(start + Duration::from_millis(50)), 1);
    assert_eq!(harness.tick(start + Duration::from_millis(100)), 0);

    // set back and forth between two ticks
    {
        let pawn = harness.server.object_mut::<Pawn>(id).unwrap().inner_mut();
        pawn.y = 3;
        pawn.y = 0;
    }
    assert_eq!(harness.tick(start + Duration::from_millis(150)), 0);
}

#[test]
fn first_syncs_are_reliable_and_deltas_sequenced() {
    init_logging();

    let mut harness = TestHarness::new(protocol);
    let client = harness.add_client();
    let id = harness.spawn(None, || ReplicatedObject::new(Pawn::default()));
    assert_eq!(harness.network.pending_modes(client), [DeliveryMode::ReliableOrdered]);
    harness.exchange();

    let start = Instant::now();
    let mut sender = harness.network.server_sender();
    assert_eq!(harness.server.update(start, &mut sender), 0);
    harness.server.object_mut::<Pawn>(id).unwrap().inner_mut().z = 1;
    assert_eq!(harness.server.update(start + Duration::from_millis(50), &mut sender), 1);
    assert_eq!(harness.network.pending_modes(client), [DeliveryMode::Sequenced]);

    harness.exchange();
    assert!(harness.network.pending_modes(client).is_empty());
    assert_eq!(harness.client(client).object::<Pawn>(id).unwrap().inner().z, 1);
}

#[test]
fn late_joiner_is_caught_up() {
    init_logging();

    let mut harness = TestHarness::new(protocol);
    let id = harness.spawn(None, || ReplicatedObject::new(Pawn::new(10, 20, 30)));
    harness.server.object_mut::<Pawn>(id).unwrap().inner_mut().x = 11;

    let late = harness.add_client();
    harness.exchange();
    assert_eq!(harness.client(late).buffered_first_syncs(), 1);

    harness
        .client_mut(late)
        .spawn_remote(id, ReplicatedObject::new(Pawn::default()), false)
        .unwrap();
    let pawn = harness.client(late).object::<Pawn>(id).unwrap();
    assert_eq!(pawn.inner(), &Pawn::new(11, 20, 30));
    assert!(harness.take_errors().is_empty());
}

#[test]
fn every_primitive_kind_replicates() {
    init_logging();

    let values = AllKinds {
        byte: 200,
        sbyte: -100,
        int16: -30_000,
        uint16: 60_000,
        int32: -2_000_000,
        uint32: 4_000_000_000,
        int64: i64::MIN,
        uint64: u64::MAX,
        float32: 1.5,
        float64: -0.25,
        flag: true,
        text: "héllo".to_string(),
    };

    let mut harness = TestHarness::new(protocol);
    let client = harness.add_client();
    let id = harness.spawn(None, first_then_default(values.clone()));
    harness.exchange();
    assert_eq!(harness.client(client).object::<AllKinds>(id).unwrap().inner(), &values);

    let start = Instant::now();
    harness.tick(start);
    {
        let all = harness.server.object_mut::<AllKinds>(id).unwrap().inner_mut();
        all.text = "bye".to_string();
        all.float32 = -0.0;
    }
    assert_eq!(harness.tick(start + Duration::from_millis(50)), 1);

    let mirrored = harness.client(client).object::<AllKinds>(id).unwrap().inner();
    assert_eq!(mirrored.text, "bye");
    assert_eq!(mirrored.float32.to_bits(), (-0.0f32).to_bits());
    assert_eq!(mirrored.uint64, u64::MAX);
}

#[test]
fn float_changes_compare_bit_patterns() {
    init_logging();

    let mut harness = TestHarness::new(protocol);
    let id = harness.spawn(None, || {
        ReplicatedObject::new(AllKinds {
            float64: f64::NAN,
            ..AllKinds::default()
        })
    });

    let start = Instant::now();
    assert_eq!(harness.tick(start), 0);

    harness.server.object_mut::<AllKinds>(id).unwrap().inner_mut().float32 = -0.0;
    assert_eq!(harness.tick(start + Duration::from_millis(50)), 1);
}

#[test]
fn wide_types_use_a_64_bit_flag_word() {
    init_logging();

    assert_eq!(SchemaRegistry::field_count::<Wide>(), WIDE_FIELD_COUNT);
    let width = SchemaRegistry::resolve::<Wide>().dirty_width().unwrap();
    assert_eq!(width.bits(), 64);

    let mut server = Server::new(ServerConfig::default(), protocol());
    let mut queue = OutgoingQueue::new();
    let id = server
        .spawn(ReplicatedObject::new(Wide::default()), None, &mut queue)
        .unwrap();
    queue.drain();

    server.object_mut::<Wide>(id).unwrap().inner_mut().lanes[32] = 0xAABB_CCDD;
    assert_eq!(server.update(Instant::now(), &mut queue), 1);

    let payload = queue.pop().unwrap().payload;
    // packet type, id, kind, 8 flag bytes, one u32
    assert_eq!(payload.len(), 1 + 4 + 1 + 8 + 4);
    assert_eq!(&payload[6..14], &(1u64 << 32).to_le_bytes());
    assert_eq!(&payload[14..], &0xAABB_CCDDu32.to_le_bytes());
}

#[test]
fn inherited_fields_come_first() {
    init_logging();

    let mut harness = TestHarness::new(protocol);
    let client = harness.add_client();
    let id = harness.spawn(None, || ReplicatedObject::new(ArmoredPawn::default()));
    harness.exchange();

    let start = Instant::now();
    harness.tick(start);
    {
        let armored = harness.server.object_mut::<ArmoredPawn>(id).unwrap().inner_mut();
        armored.pawn.y = 2;
        armored.armor = 75;
    }
    assert_eq!(harness.tick(start + Duration::from_millis(50)), 1);

    let mirrored = harness.client(client).object::<ArmoredPawn>(id).unwrap().inner();
    assert_eq!(mirrored.pawn, Pawn::new(0, 2, 0));
    assert_eq!(mirrored.armor, 75);

    let schema = SchemaRegistry::resolve::<ArmoredPawn>();
    let names: Vec<_> = schema.fields().iter().map(|field| field.name).collect();
    assert_eq!(names, vec!["x", "y", "z", "armor"]);
}

#[test]
fn deltas_for_unknown_objects_are_dropped() {
    init_logging();

    let mut harness = TestHarness::new(protocol);
    let client = harness.add_client();
    let id = harness.spawn(None, || ReplicatedObject::new(Pawn::default()));
    harness.client_mut(client).despawn_remote(id).unwrap();
    harness.exchange();
    // the spawn's full state is buffered again
    assert_eq!(harness.client(client).buffered_first_syncs(), 1);

    let start = Instant::now();
    harness.tick(start);
    harness.server.object_mut::<Pawn>(id).unwrap().inner_mut().x = 5;
    assert_eq!(harness.tick(start + Duration::from_millis(50)), 1);

    assert!(!harness.client(client).has_object(id));
    assert!(harness.take_errors().is_empty());
}

#[test]
fn long_strings_replicate_in_full() {
    init_logging();

    let mut harness = TestHarness::new(protocol);
    let client = harness.add_client();
    let id = harness.spawn(None, || ReplicatedObject::new(AllKinds::default()));
    harness.exchange();

    let start = Instant::now();
    harness.tick(start);
    let long = "a".repeat(70_000);
    harness.server.object_mut::<AllKinds>(id).unwrap().inner_mut().text = long.clone();
    assert_eq!(harness.tick(start + Duration::from_millis(50)), 1);

    let mirrored = harness.client(client).object::<AllKinds>(id).unwrap().inner();
    assert_eq!(mirrored.text.len(), 70_000);
    assert_eq!(mirrored.text, long);

    assert_eq!(harness.tick(start + Duration::from_millis(100)), 0);
    assert!(harness.take_errors().is_empty());
}
