use std::time::Instant;

use proptest::prelude::*;

use tinynet_shared::{
    DirtyWidth, NetContext, NetObject, NetworkId, ReplicatedObject, StateSynchronizer, SyncKind,
};
use tinynet_test::{AllKinds, Pawn};

fn bound<R: tinynet_shared::Replicate>(inner: R) -> ReplicatedObject<R> {
    let mut object = ReplicatedObject::new(inner);
    object.on_network_create().unwrap();
    object.receive_network_id(NetworkId::new(1));
    object
}

fn all_kinds() -> impl Strategy<Value = AllKinds> {
    (
        (any::<u8>(), any::<i8>(), any::<i16>(), any::<u16>()),
        (any::<i32>(), any::<u32>(), any::<i64>(), any::<u64>()),
        (any::<f32>(), any::<f64>(), any::<bool>(), ".{0,24}"),
    )
        .prop_map(
            |((byte, sbyte, int16, uint16), (int32, uint32, int64, uint64), (float32, float64, flag, text))| {
                AllKinds {
                    byte,
                    sbyte,
                    int16,
                    uint16,
                    int32,
                    uint32,
                    int64,
                    uint64,
                    float32,
                    float64,
                    flag,
                    text,
                }
            },
        )
}

fn same_bits(a: &AllKinds, b: &AllKinds) -> bool {
    a.float32.to_bits() == b.float32.to_bits()
        && a.float64.to_bits() == b.float64.to_bits()
        && AllKinds {
            float32: 0.0,
            float64: 0.0,
            ..a.clone()
        } == AllKinds {
            float32: 0.0,
            float64: 0.0,
            ..b.clone()
        }
}

proptest! {
    #[test]
    fn delta_carries_exactly_the_changed_fields(
        before in any::<(i32, i32, i32)>(),
        after in any::<(i32, i32, i32)>(),
    ) {
        let server = StateSynchronizer::new(NetContext::server());
        let client = StateSynchronizer::new(NetContext::client());
        let mut source = bound(Pawn::new(before.0, before.1, before.2));
        let mut mirror = bound(Pawn::new(before.0, before.1, before.2));

        *source.inner_mut() = Pawn::new(after.0, after.1, after.2);
        let dirty = server.tick(&mut source, Instant::now());

        let expected: Vec<usize> = [before.0 != after.0, before.1 != after.1, before.2 != after.2]
            .iter()
            .enumerate()
            .filter_map(|(index, changed)| changed.then_some(index))
            .collect();
        let flagged: Vec<usize> = source.dirty_flags().unwrap().ones().collect();
        prop_assert_eq!(&flagged, &expected);
        prop_assert_eq!(dirty, !expected.is_empty());

        if dirty {
            let message = server.encode(&source, SyncKind::Delta).unwrap();
            client.decode(&mut mirror, &message).unwrap();
        }
        prop_assert_eq!(mirror.inner(), source.inner());
    }

    #[test]
    fn first_sync_restores_every_kind(values in all_kinds()) {
        let server = StateSynchronizer::new(NetContext::server());
        let client = StateSynchronizer::new(NetContext::client());
        let source = bound(values);
        let mut mirror = bound(AllKinds::default());

        let message = server.encode(&source, SyncKind::FirstSync).unwrap();
        client.decode(&mut mirror, &message).unwrap();
        prop_assert!(same_bits(mirror.inner(), source.inner()));
    }

    #[test]
    fn any_prefix_of_a_delta_is_rejected_untouched(
        values in all_kinds(),
        cut in 0usize..64,
    ) {
        let server = StateSynchronizer::new(NetContext::server());
        let client = StateSynchronizer::new(NetContext::client());
        let mut source = bound(AllKinds::default());
        let mut mirror = bound(AllKinds::default());

        *source.inner_mut() = values;
        server.tick(&mut source, Instant::now());
        let Some(message) = server.encode(&source, SyncKind::Delta) else {
            return Ok(());
        };
        let cut = cut.min(message.len().saturating_sub(1));

        prop_assert!(client.decode(&mut mirror, &message[..cut]).is_err());
        prop_assert!(same_bits(mirror.inner(), &AllKinds::default()));
    }

    #[test]
    fn dirty_width_is_the_smallest_that_fits(field_count in 0usize..=64) {
        let width = DirtyWidth::for_field_count("Generated", field_count).unwrap();
        let expected = match field_count {
            0 => 0,
            1..=8 => 8,
            9..=16 => 16,
            17..=32 => 32,
            _ => 64,
        };
        prop_assert_eq!(width.bits(), expected);
        prop_assert_eq!(width.byte_length(), expected as usize / 8);
    }
}

#[test]
fn more_than_64_fields_is_rejected() {
    assert!(DirtyWidth::for_field_count("Generated", 65).is_err());
}
