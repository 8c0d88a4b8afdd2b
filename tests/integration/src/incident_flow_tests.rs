//! Report, triage and response scenarios

use crate::test_utils::*;
use sosnet_coordinator::{CoordinatorError, IncidentStatus, NewReport, Reporter};
use sosnet_core::IncidentId;
use sosnet_incident::IncidentError;
use std::collections::HashSet;
use std::sync::Arc;

#[test]
fn test_medical_report_full_flow() {
    let node = TestNode::new();
    let alice = node.citizen("alice");
    let accounts_before = node.coordinator.directory().len();

    let incident = node
        .coordinator
        .report(Some(&alice), citizen_report(&alice, "Medical", "Zone A"))
        .unwrap();
    assert_eq!(incident.status, IncidentStatus::Incoming);
    assert_eq!(node.coordinator.list_incoming().len(), 1);

    let (validated, order) = node.coordinator.validate(&node.admin, incident.id).unwrap();
    assert_eq!(validated.status, IncidentStatus::Validated);
    assert!(node.coordinator.list_incoming().is_empty());

    let (acked, notification) = node.coordinator.acknowledge(&node.admin, incident.id).unwrap();
    assert_eq!(acked.status, IncidentStatus::Acknowledged);

    // Directory untouched
    assert_eq!(node.coordinator.directory().len(), accounts_before);

    // One order targeting the incident
    let orders = node.coordinator.list_orders(&node.admin).unwrap();
    assert_eq!(orders, vec![order]);
    assert_eq!(orders[0].target, "Medical @ Zone A");
    assert_eq!(orders[0].incident_id, incident.id);
    assert_eq!(orders[0].instruction, "Proceed with caution. Validate on arrival.");

    // One unread notification for alice
    let inbox = node.coordinator.list_notifications_for(&alice, "alice").unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(Some(&inbox[0]), notification.as_ref());
    assert!(!inbox[0].read);
    assert_eq!(inbox[0].incident_id, incident.id);
    assert!(inbox[0].message.contains("Medical"));
    assert!(inbox[0].message.contains("Zone A"));
}

#[test]
fn test_acknowledge_without_validation() {
    let node = TestNode::new();
    let alice = node.citizen("alice");
    let incident = node
        .coordinator
        .report(Some(&alice), citizen_report(&alice, "Flood", "Riverside"))
        .unwrap();

    let (acked, notification) = node.coordinator.acknowledge(&node.admin, incident.id).unwrap();
    assert_eq!(acked.status, IncidentStatus::Acknowledged);
    assert!(notification.is_some());
    // Acknowledging never issues an order
    assert!(node.coordinator.list_orders(&node.admin).unwrap().is_empty());
}

#[test]
fn test_anonymous_acknowledge_sends_nothing() {
    let node = TestNode::new();
    let alice = node.citizen("alice");
    let incident = node
        .coordinator
        .report(None, device_report("Fire", "Public Market"))
        .unwrap();

    let (acked, notification) = node.coordinator.acknowledge(&node.admin, incident.id).unwrap();
    assert_eq!(acked.status, IncidentStatus::Acknowledged);
    assert!(notification.is_none());
    assert!(node
        .coordinator
        .list_notifications_for(&alice, "alice")
        .unwrap()
        .is_empty());
    assert!(node
        .coordinator
        .mailbox()
        .list_for("Citizen (Device)")
        .is_empty());
}

#[test]
fn test_dismiss_unknown_incident() {
    let node = TestNode::new();
    node.coordinator
        .report(None, device_report("Medical", "Zone B"))
        .unwrap();
    let before = node.coordinator.list_incidents();

    let missing = IncidentId::generate();
    let result = node.coordinator.dismiss(&node.admin, missing);

    assert!(matches!(
        result,
        Err(CoordinatorError::Incident(IncidentError::IncidentNotFound { id })) if id == missing
    ));
    assert_eq!(node.coordinator.list_incidents(), before);
}

#[test]
fn test_terminal_incidents_reject_every_transition() {
    let node = TestNode::new();
    let dismissed = node
        .coordinator
        .report(None, device_report("Medical", "Zone C"))
        .unwrap();
    node.coordinator.dismiss(&node.admin, dismissed.id).unwrap();

    assert!(matches!(
        node.coordinator.validate(&node.admin, dismissed.id),
        Err(CoordinatorError::Incident(IncidentError::InvalidTransition { .. }))
    ));
    assert!(matches!(
        node.coordinator.acknowledge(&node.admin, dismissed.id),
        Err(CoordinatorError::Incident(IncidentError::InvalidTransition { .. }))
    ));

    let validated = node
        .coordinator
        .report(None, device_report("Medical", "Zone D"))
        .unwrap();
    node.coordinator.validate(&node.admin, validated.id).unwrap();
    // Validated incidents can be acknowledged but not dismissed
    assert!(matches!(
        node.coordinator.dismiss(&node.admin, validated.id),
        Err(CoordinatorError::Incident(IncidentError::InvalidTransition { .. }))
    ));

    assert_eq!(node.coordinator.list_orders(&node.admin).unwrap().len(), 1);
}

#[test]
fn test_incomplete_report_rejected() {
    let node = TestNode::new();
    let blank_location = NewReport {
        location: "   ".to_string(),
        ..device_report("Medical", "ignored")
    };

    assert!(matches!(
        node.coordinator.report(None, blank_location),
        Err(CoordinatorError::Incident(IncidentError::ValidationFailed(_)))
    ));
    assert!(node.coordinator.list_incidents().is_empty());
}

#[test]
fn test_report_ids_unique_and_listed_newest_first() {
    let node = TestNode::new();
    let ids: Vec<IncidentId> = (0..20)
        .map(|i| {
            node.coordinator
                .report(None, device_report("Medical", &format!("Zone {}", i)))
                .unwrap()
                .id
        })
        .collect();

    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());

    let listed: Vec<IncidentId> = node.coordinator.list_incidents().iter().map(|i| i.id).collect();
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(listed, expected);
}

#[test]
fn test_concurrent_validate_issues_one_order() {
    let node = Arc::new(TestNode::new());
    let incident = node
        .coordinator
        .report(None, NewReport {
            reporter: Reporter::AnonymousDevice("dev-7".to_string()),
            ..device_report("Medical", "Zone A")
        })
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let node = Arc::clone(&node);
            std::thread::spawn(move || node.coordinator.validate(&node.admin, incident.id).is_ok())
        })
        .collect();
    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 1);
    assert_eq!(node.coordinator.list_orders(&node.admin).unwrap().len(), 1);
}

#[test]
fn test_incident_and_order_export_shape() {
    let node = TestNode::new();
    let alice = node.citizen("alice");
    let incident = node
        .coordinator
        .report(Some(&alice), citizen_report(&alice, "Medical", "Zone A"))
        .unwrap();
    let (validated, order) = node.coordinator.validate(&node.admin, incident.id).unwrap();

    let json = serde_json::to_value(&validated).unwrap();
    assert_eq!(json["status"], "validated");
    assert_eq!(json["reporter"], serde_json::json!({"kind": "registered", "value": "alice"}));
    assert_eq!(json["id"], serde_json::to_value(incident.id).unwrap());

    let json = serde_json::to_value(&order).unwrap();
    assert_eq!(json["target"], "Medical @ Zone A");
    assert_eq!(json["incident_id"], serde_json::to_value(incident.id).unwrap());
}
