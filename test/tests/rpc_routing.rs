use std::{cell::Cell, rc::Rc};

use tinynet_shared::{
    Destination, NetContext, OutgoingQueue, ReplicatedObject, RpcRouter, RpcSendOutcome,
    RpcTarget, Serde,
};
use tinynet_server::ServerConfig;
use tinynet_test::{protocol, Pawn, TestHarness};

fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

#[test]
fn suppression_table() {
    let server = RpcRouter::new(NetContext::server());
    let client = RpcRouter::new(NetContext::client());

    // (target, router, has_authority, suppressed)
    let cases = [
        (RpcTarget::ClientOwner, &server, true, true),
        (RpcTarget::ClientOwner, &server, false, false),
        (RpcTarget::ClientOwner, &client, true, true),
        (RpcTarget::Server, &server, true, true),
        (RpcTarget::Server, &server, false, true),
        (RpcTarget::Server, &client, false, false),
        (RpcTarget::Everyone, &server, true, false),
        (RpcTarget::Everyone, &server, false, false),
        (RpcTarget::Everyone, &client, true, true),
    ];

    for (target, router, has_authority, suppressed) in cases {
        assert_eq!(
            router.is_suppressed(target, has_authority),
            suppressed,
            "{:?} from {:?} with authority={}",
            target,
            router.context(),
            has_authority
        );
    }
}

/// A pawn whose `Shoot` handler adds the argument to `x`
fn shooting_pawn(shots: Rc<Cell<u32>>) -> impl FnMut() -> ReplicatedObject<Pawn> {
    move || {
        let shots = shots.clone();
        let mut pawn = ReplicatedObject::new(Pawn::default());
        pawn.register_rpc_handler("Shoot", move |pawn, reader| {
            pawn.x += i32::de(reader)?;
            shots.set(shots.get() + 1);
            Ok(())
        });
        pawn.register_rpc_handler("Hit", |pawn, reader| {
            pawn.y = i32::de(reader)?;
            Ok(())
        });
        pawn.register_rpc_handler("Respawn", |pawn, _reader| {
            pawn.z = 100;
            Ok(())
        });
        pawn
    }
}

#[test]
fn owner_shoots_on_the_server() {
    init_logging();

    let shots = Rc::new(Cell::new(0));
    let mut harness = TestHarness::new(protocol);
    let owner = harness.add_client();
    let other = harness.add_client();
    let id = harness.spawn(Some(owner), shooting_pawn(shots.clone()));
    harness.exchange();
    assert!(harness.client(owner).net_object(id).unwrap().has_authority());

    let mut sender = harness.network.client_sender(owner);
    let outcome = harness
        .client(owner)
        .send_rpc(id, "Shoot", &3i32.to_le_bytes(), &mut sender)
        .unwrap();
    assert_eq!(outcome, RpcSendOutcome::Sent(Destination::Server));
    assert_eq!(harness.network.pending_for_server(), 1);
    harness.exchange();

    // only the server's instance ran the handler
    assert_eq!(shots.get(), 1);
    assert_eq!(harness.server.object::<Pawn>(id).unwrap().inner().x, 3);
    assert_eq!(harness.client(owner).object::<Pawn>(id).unwrap().inner().x, 0);

    let mut sender = harness.network.client_sender(other);
    harness
        .client(other)
        .send_rpc(id, "Shoot", &3i32.to_le_bytes(), &mut sender)
        .unwrap();
    harness.exchange();

    // the declared caller is not checked unless the server asks for it
    assert_eq!(shots.get(), 2);
    assert_eq!(harness.server.object::<Pawn>(id).unwrap().inner().x, 6);
    assert!(harness.take_errors().is_empty());
}

#[test]
fn enforced_caller_keeps_strangers_out() {
    init_logging();

    let config = ServerConfig {
        enforce_rpc_caller: true,
        ..ServerConfig::default()
    };
    let shots = Rc::new(Cell::new(0));
    let mut harness = TestHarness::with_config(config, protocol);
    let owner = harness.add_client();
    let other = harness.add_client();
    let id = harness.spawn(Some(owner), shooting_pawn(shots.clone()));
    harness.exchange();

    for client in [owner, other] {
        let mut sender = harness.network.client_sender(client);
        harness
            .client(client)
            .send_rpc(id, "Shoot", &3i32.to_le_bytes(), &mut sender)
            .unwrap();
    }
    harness.exchange();

    assert_eq!(shots.get(), 1);
    let errors = harness.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("may not call RPC `Shoot`"), "{}", errors[0]);
}

#[test]
fn server_rpcs_reach_the_right_clients() {
    init_logging();

    let mut harness = TestHarness::new(protocol);
    let owner = harness.add_client();
    let other = harness.add_client();
    let id = harness.spawn(Some(owner), shooting_pawn(Rc::new(Cell::new(0))));
    harness.exchange();

    let mut sender = harness.network.server_sender();
    assert_eq!(
        harness.server.send_rpc(id, "Hit", &8i32.to_le_bytes(), &mut sender),
        Ok(RpcSendOutcome::Sent(Destination::Observers))
    );
    assert_eq!(
        harness.server.send_rpc(id, "Respawn", &[], &mut sender),
        Ok(RpcSendOutcome::Sent(Destination::Connection(owner)))
    );
    assert_eq!(
        harness.server.send_rpc(id, "Shoot", &[0; 4], &mut sender),
        Ok(RpcSendOutcome::Suppressed)
    );
    harness.exchange();

    let owned = harness.client(owner).object::<Pawn>(id).unwrap().inner();
    assert_eq!((owned.y, owned.z), (8, 100));
    let observed = harness.client(other).object::<Pawn>(id).unwrap().inner();
    assert_eq!((observed.y, observed.z), (8, 0));
    assert!(harness.take_errors().is_empty());
}

#[test]
fn authority_returns_to_the_server_on_disconnect() {
    init_logging();

    let mut harness = TestHarness::new(protocol);
    let owner = harness.add_client();
    let id = harness.spawn(Some(owner), shooting_pawn(Rc::new(Cell::new(0))));
    harness.exchange();
    assert!(!harness.server.net_object(id).unwrap().has_authority());

    harness.remove_client(owner);
    assert!(harness.server.net_object(id).unwrap().has_authority());

    let mut queue = OutgoingQueue::new();
    assert_eq!(
        harness.server.send_rpc(id, "Respawn", &[], &mut queue),
        Ok(RpcSendOutcome::Suppressed)
    );
    assert!(queue.is_empty());
}

#[test]
fn rpcs_on_missing_objects_are_reported() {
    init_logging();

    let mut harness = TestHarness::new(protocol);
    let client = harness.add_client();
    let id = harness.spawn(None, shooting_pawn(Rc::new(Cell::new(0))));
    harness.exchange();
    harness.server.despawn(id).unwrap();

    let mut sender = harness.network.client_sender(client);
    harness
        .client(client)
        .send_rpc(id, "Shoot", &1i32.to_le_bytes(), &mut sender)
        .unwrap();
    harness.exchange();

    let errors = harness.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("No replicated object"), "{}", errors[0]);
}
