//! Scenario tests for the election state machine.
//!
//! Verifies:
//! - Seniority wins: older clusters absorb younger ones regardless of id
//! - Equal-standing leader collisions diverge via the tie-break
//! - Dedup memory bounds flood amplification
//! - Arbitrary payload sequences never leave a node in an invalid state

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use radiomesh_election::{ElectionConfig, Node, Stationary};
use radiomesh_protocol::{
    ClusterPayload, ClusterStanding, NodeId, Position, MAX_CLUSTER_ID, TIE_BREAK_JITTER,
};

fn make_node(id: u32, cluster: u64, rng: &mut ChaCha8Rng) -> Node {
    let config = ElectionConfig {
        initial_cluster_id: cluster,
        ..Default::default()
    };
    Node::new(
        NodeId::new(id),
        Position::origin(),
        60.0,
        Box::new(Stationary),
        config,
        rng,
    )
}

fn payload(lifetime: u64, cluster: u64, nonce: u32) -> ClusterPayload {
    ClusterPayload::new(ClusterStanding::new(lifetime, cluster), nonce)
}

// ═══════════════════════════════════════════════════════════════
// Seniority ordering
// ═══════════════════════════════════════════════════════════════

#[test]
fn older_cluster_beats_higher_id() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut node = make_node(0, 900, &mut rng);

    // Lifetime 4 beats our lifetime 0 despite the much smaller id.
    node.on_payload(payload(4, 2, 1), &mut rng);
    assert!(!node.is_leader());
    assert_eq!(node.cluster(), 2);
    assert_eq!(node.lifetime(), 4);
}

#[test]
fn follower_adopts_ever_higher_standings() {
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let mut node = make_node(0, 10, &mut rng);

    node.on_payload(payload(1, 50, 1), &mut rng);
    node.on_payload(payload(1, 60, 2), &mut rng);
    node.on_payload(payload(3, 20, 3), &mut rng);
    assert!(!node.is_leader());
    assert_eq!(node.standing(), ClusterStanding::new(3, 20));
}

#[test]
fn uncontested_leader_ages_monotonically() {
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let mut node = make_node(0, 10, &mut rng);

    let mut last_lifetime = 0;
    let mut cycles = 0;
    for _ in 0..200 {
        if let Some(tx) = node.timestep(&mut rng) {
            assert!(tx.payload.standing.lifetime > last_lifetime);
            last_lifetime = tx.payload.standing.lifetime;
            cycles += 1;
        }
    }
    assert!(cycles >= 15, "expected steady announcement cadence");
    assert!(node.is_leader());
}

// ═══════════════════════════════════════════════════════════════
// Tie-breaking
// ═══════════════════════════════════════════════════════════════

#[test]
fn equal_standing_leaders_diverge_under_exchange() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let mut a = make_node(0, 10, &mut rng);
    let mut b = make_node(1, 10, &mut rng);

    // Each round both leaders hear the other's identical-standing
    // announcement and both perturbation paths fire. A round only fails
    // to separate them when both draw the same offset, so the ids
    // diverge after a handful of rounds at most.
    let mut nonce = 1000;
    for round in 0..50 {
        if a.cluster() != b.cluster() {
            break;
        }
        let shared = a.cluster();
        a.on_payload(payload(0, shared, nonce), &mut rng);
        b.on_payload(payload(0, shared, nonce + 1), &mut rng);
        nonce += 2;
        assert!(a.is_leader() && b.is_leader(), "round {round} demoted a leader");
    }

    assert_ne!(a.cluster(), b.cluster());
    assert!(a.cluster() >= 10 && b.cluster() >= 10);
    assert!(a.cluster() < 10 + 50 * TIE_BREAK_JITTER);
}

#[test]
fn tie_break_growth_is_unbounded_but_slow() {
    let mut rng = ChaCha8Rng::seed_from_u64(18);
    let mut node = make_node(0, 10, &mut rng);

    // Hammer the collision path; the id only ever moves upward.
    let mut last = node.cluster();
    for nonce in 0..500u32 {
        node.on_payload(payload(0, node.cluster(), nonce), &mut rng);
        assert!(node.cluster() >= last);
        last = node.cluster();
    }
    assert!(node.is_leader());
    assert!(last < 10 + 500 * TIE_BREAK_JITTER);
}

// ═══════════════════════════════════════════════════════════════
// Flood suppression
// ═══════════════════════════════════════════════════════════════

#[test]
fn memory_bound_holds_under_payload_storm() {
    let mut rng = ChaCha8Rng::seed_from_u64(19);
    let mut node = make_node(0, 10, &mut rng);

    // 150 distinct inferior payloads: all remembered, none relayed.
    for nonce in 0..150u32 {
        assert!(node.on_payload(payload(0, 1, nonce), &mut rng).is_none());
    }
    assert_eq!(node.seen_payloads(), 100, "memory capped at capacity");

    // The 50 oldest were evicted, so they process as fresh again.
    assert!(node.on_payload(payload(0, 1, 0), &mut rng).is_none());
    assert_eq!(node.seen_payloads(), 100);
}

// ═══════════════════════════════════════════════════════════════
// Totality
// ═══════════════════════════════════════════════════════════════

proptest! {
    /// Any sequence of payloads leaves the node in a defined state:
    /// one role, a standing at least as high as every accepted payload,
    /// and a memory within capacity.
    #[test]
    fn arbitrary_payload_sequences_keep_state_valid(
        seed in 0u64..1000,
        payloads in proptest::collection::vec((0u64..6, 0u64..50, 0u32..10_000), 1..120),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut node = make_node(0, 10, &mut rng);

        for (lifetime, cluster, nonce) in payloads {
            let incoming = payload(lifetime, cluster, nonce);
            node.on_payload(incoming, &mut rng);

            prop_assert!(node.seen_payloads() <= 100);
            if !node.is_leader() {
                // A follower's standing always came from some accepted
                // payload, so it can never rank below the incoming one
                // it just adopted.
                prop_assert!(!incoming.standing.outranks(&node.standing()));
            }
            prop_assert!(node.cluster() < MAX_CLUSTER_ID + 120 * TIE_BREAK_JITTER);
        }
    }
}
