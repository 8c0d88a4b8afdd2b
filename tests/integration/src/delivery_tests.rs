//! Live delivery session scenarios

use crate::test_utils::*;
use sosnet_coordinator::{Incident, Principal, SessionEnd};
use std::collections::HashSet;

fn acknowledged_report(node: &TestNode, citizen: &Principal, location: &str) -> Incident {
    let incident = node
        .coordinator
        .report(Some(citizen), citizen_report(citizen, "Medical", location))
        .unwrap();
    node.coordinator.acknowledge(&node.admin, incident.id).unwrap();
    incident
}

#[tokio::test]
async fn test_backlog_presented_in_creation_order() {
    let node = TestNode::new();
    let alice = node.citizen("alice");
    let locations = ["Zone A", "Zone B", "Zone C"];
    for location in locations {
        acknowledged_report(&node, &alice, location);
    }

    let (mut rx, handle) = node.coordinator.spawn_delivery(&alice);
    let mut seen = Vec::new();
    for location in locations {
        let presentation = next_presentation(&mut rx).await;
        assert!(presentation.notification.message.contains(location));
        seen.push(presentation.notification.id);
        presentation.acknowledge();
    }
    assert_quiet(&mut rx).await;
    drop(rx);

    let report = handle.await.unwrap().unwrap();
    assert_eq!(report.acknowledged, seen);
    assert_eq!(report.end, SessionEnd::Cancelled);
    assert_eq!(node.coordinator.mailbox().unread_count("alice"), 0);
}

#[tokio::test]
async fn test_live_acknowledgment_reaches_open_session() {
    let node = TestNode::new();
    let alice = node.citizen("alice");
    let (mut rx, handle) = node.coordinator.spawn_delivery(&alice);
    assert_quiet(&mut rx).await;

    let incident = acknowledged_report(&node, &alice, "Zone A");
    let presentation = next_presentation(&mut rx).await;
    assert_eq!(presentation.notification.incident_id, incident.id);
    presentation.acknowledge();

    // Another arrives while the session is idle again
    let second = acknowledged_report(&node, &alice, "Zone B");
    let presentation = next_presentation(&mut rx).await;
    assert_eq!(presentation.notification.incident_id, second.id);
    presentation.acknowledge();

    assert_quiet(&mut rx).await;
    drop(rx);
    let report = handle.await.unwrap().unwrap();
    assert_eq!(report.acknowledged.len(), 2);
}

#[tokio::test]
async fn test_arrival_mid_presentation_waits_its_turn() {
    let node = TestNode::new();
    let alice = node.citizen("alice");
    acknowledged_report(&node, &alice, "Zone A");

    let (mut rx, handle) = node.coordinator.spawn_delivery(&alice);
    let first = next_presentation(&mut rx).await;

    acknowledged_report(&node, &alice, "Zone B");
    // Still busy with the first one
    assert_quiet(&mut rx).await;
    first.acknowledge();

    let second = next_presentation(&mut rx).await;
    assert!(second.notification.message.contains("Zone B"));
    second.acknowledge();

    assert_quiet(&mut rx).await;
    drop(rx);
    let report = handle.await.unwrap().unwrap();
    let unique: HashSet<_> = report.acknowledged.iter().collect();
    assert_eq!(unique.len(), report.acknowledged.len());
    assert_eq!(report.acknowledged.len(), 2);
}

#[tokio::test]
async fn test_navigating_away_resumes_next_session() {
    let node = TestNode::new();
    let alice = node.citizen("alice");
    acknowledged_report(&node, &alice, "Zone A");
    acknowledged_report(&node, &alice, "Zone B");

    let (mut rx, handle) = node.coordinator.spawn_delivery(&alice);
    let first = next_presentation(&mut rx).await;
    let first_id = first.notification.id;
    first.acknowledge();
    let second = next_presentation(&mut rx).await;
    let second_id = second.notification.id;
    // Leave without acknowledging the second one
    drop(second);
    drop(rx);

    let report = handle.await.unwrap().unwrap();
    assert_eq!(report.acknowledged, vec![first_id]);
    assert_eq!(report.end, SessionEnd::Unacknowledged);
    assert_eq!(node.coordinator.mailbox().unread_count("alice"), 1);

    let (mut rx, handle) = node.coordinator.spawn_delivery(&alice);
    let again = next_presentation(&mut rx).await;
    assert_eq!(again.notification.id, second_id);
    again.acknowledge();
    assert_quiet(&mut rx).await;
    drop(rx);

    let report = handle.await.unwrap().unwrap();
    assert_eq!(report.acknowledged, vec![second_id]);
    assert_eq!(node.coordinator.mailbox().unread_count("alice"), 0);
}

#[tokio::test]
async fn test_cleared_mailbox_presents_nothing_more() {
    let node = TestNode::new();
    let alice = node.citizen("alice");
    acknowledged_report(&node, &alice, "Zone A");
    acknowledged_report(&node, &alice, "Zone B");

    let (mut rx, handle) = node.coordinator.spawn_delivery(&alice);
    let first = next_presentation(&mut rx).await;
    node.coordinator
        .clear_notifications_for(&alice, "alice")
        .unwrap();
    first.acknowledge();

    assert_quiet(&mut rx).await;
    drop(rx);
    let report = handle.await.unwrap().unwrap();
    assert_eq!(report.acknowledged.len(), 1);
    assert!(node.coordinator.mailbox().list_for("alice").is_empty());
}

#[tokio::test]
async fn test_sessions_are_per_recipient() {
    let node = TestNode::new();
    let alice = node.citizen("alice");
    let bob = node.citizen("bob");

    let (mut bob_rx, bob_handle) = node.coordinator.spawn_delivery(&bob);
    let (mut alice_rx, alice_handle) = node.coordinator.spawn_delivery(&alice);

    acknowledged_report(&node, &alice, "Zone A");

    let presentation = next_presentation(&mut alice_rx).await;
    presentation.acknowledge();
    assert_quiet(&mut bob_rx).await;

    drop(alice_rx);
    drop(bob_rx);
    assert_eq!(alice_handle.await.unwrap().unwrap().acknowledged.len(), 1);
    assert!(bob_handle.await.unwrap().unwrap().acknowledged.is_empty());
}
