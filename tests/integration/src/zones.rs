//! End-to-end tests for zone-aware voter balancing.

use crate::helpers::{ids, zoned_config, Cluster, Server};

#[test]
fn failed_voter_zone_regains_a_voter() {
    let cluster = Cluster::new(zoned_config())
        .add(Server::voter("a").zone("1"))
        .add(Server::voter("b").zone("2").failed())
        .add(Server::voter("c").zone("3"))
        .add(Server::nonvoter("d").zone("2"))
        .leader("a");

    let changes = cluster.tick();
    assert_eq!(ids(&changes.promotions), ["d"]);
    assert!(changes.demotions.is_empty());
}

#[test]
fn fully_covered_cluster_stays_put() {
    let cluster = Cluster::new(zoned_config())
        .add(Server::voter("a").zone("1"))
        .add(Server::voter("b").zone("2"))
        .add(Server::voter("c").zone("3"))
        .add(Server::nonvoter("d").zone("1"))
        .add(Server::nonvoter("e").zone("2"))
        .add(Server::nonvoter("f").zone("3"))
        .leader("a");

    let changes = cluster.tick();
    assert!(changes.is_empty());
}

#[test]
fn untagged_standby_always_promotes() {
    let cluster = Cluster::new(zoned_config())
        .add(Server::voter("a").zone("1"))
        .add(Server::voter("b").zone("2"))
        .add(Server::nonvoter("c"))
        .leader("a");

    let changes = cluster.tick();
    assert_eq!(ids(&changes.promotions), ["c"]);
}

#[test]
fn departed_member_frees_its_zone() {
    let cluster = Cluster::new(zoned_config())
        .add(Server::voter("a").zone("1").left())
        .add(Server::voter("b").zone("2"))
        .add(Server::nonvoter("c").zone("1"))
        .leader("b");

    let changes = cluster.tick();
    assert_eq!(ids(&changes.promotions), ["c"]);
}

#[test]
fn one_candidate_per_zone_per_tick() {
    let cluster = Cluster::new(zoned_config())
        .add(Server::voter("a").zone("1").failed())
        .add(Server::voter("b").zone("2"))
        .add(Server::nonvoter("c").zone("1"))
        .add(Server::nonvoter("d").zone("1"))
        .leader("b");

    let changes = cluster.tick();
    assert_eq!(ids(&changes.promotions), ["c"]);
}

#[test]
fn replacement_converges_after_apply() {
    let mut cluster = Cluster::new(zoned_config())
        .add(Server::voter("a").zone("1"))
        .add(Server::voter("b").zone("2").failed())
        .add(Server::voter("c").zone("3"))
        .add(Server::nonvoter("d").zone("2"))
        .leader("a");

    let changes = cluster.tick();
    cluster.apply(&changes);

    // zone 2 is now covered by the replacement; nothing more to do
    assert!(cluster.tick().is_empty());
}
