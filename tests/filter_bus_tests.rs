use std::cell::RefCell;
use std::rc::Rc;

use bullet_rs::events::{
    EVENT_FILTER, EVENT_REMOVE_FILTER, FilterBus, FilterEvent, HostFilterAck, normalized_uid,
};

fn record_events(bus: &mut FilterBus, event: &'static str) -> Rc<RefCell<Vec<FilterEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    bus.add_event_listener(event, move |payload: &FilterEvent| {
        sink.borrow_mut().push(payload.clone());
    });
    log
}

#[test]
fn normalized_uid_lowercases_strips_and_suffixes_length() {
    assert_eq!(normalized_uid("East"), "east4");
    assert_eq!(normalized_uid("North-West 2"), "northwest210");
    assert_eq!(normalized_uid(""), "0");
}

#[test]
fn add_filter_is_idempotent_on_state_but_emits_every_call() {
    let mut bus = FilterBus::default();
    let events = record_events(&mut bus, EVENT_FILTER);

    bus.add_filter("East");
    bus.add_filter("East");

    assert_eq!(bus.len(), 1);
    assert_eq!(events.borrow().len(), 2);
    for event in events.borrow().iter() {
        let FilterEvent::Filter(entries) = event else {
            panic!("expected filter event");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "East");
    }
}

#[test]
fn filter_event_carries_full_selection_snapshot_in_order() {
    let mut bus = FilterBus::default();
    let events = record_events(&mut bus, EVENT_FILTER);

    bus.add_filter("East");
    bus.add_filter("West");

    let log = events.borrow();
    let FilterEvent::Filter(entries) = &log[1] else {
        panic!("expected filter event");
    };
    let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, ["East", "West"]);
}

#[test]
fn remove_after_add_round_trips_to_empty() {
    let mut bus = FilterBus::default();
    bus.add_filter("East");
    assert!(bus.remove_filter("East"));
    assert!(bus.is_empty());
}

#[test]
fn remove_of_absent_key_is_a_silent_no_op() {
    let mut bus = FilterBus::default();
    let events = record_events(&mut bus, EVENT_REMOVE_FILTER);
    assert!(!bus.remove_filter("Nope"));
    assert!(events.borrow().is_empty());
}

#[test]
fn partial_deselect_removes_only_that_entry() {
    // Select East then West, deselect East: one entry (West) remains and the
    // remove-filter event carries only the East entry.
    let mut bus = FilterBus::default();
    let events = record_events(&mut bus, EVENT_REMOVE_FILTER);

    bus.add_filter("East");
    bus.add_filter("West");
    bus.remove_filter("East");

    assert_eq!(bus.len(), 1);
    assert_eq!(bus.filters()[0].name, "West");

    let log = events.borrow();
    assert_eq!(log.len(), 1);
    let FilterEvent::RemoveFilter(removed) = &log[0] else {
        panic!("expected remove-filter event");
    };
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].name, "East");
}

#[test]
fn clear_emits_one_event_with_every_removed_entry() {
    let mut bus = FilterBus::default();
    let events = record_events(&mut bus, EVENT_REMOVE_FILTER);

    bus.add_filter("East");
    bus.add_filter("West");
    bus.clear_filters();

    assert!(bus.is_empty());
    let log = events.borrow();
    assert_eq!(log.len(), 1);
    let FilterEvent::RemoveFilter(removed) = &log[0] else {
        panic!("expected remove-filter event");
    };
    assert_eq!(removed.len(), 2);
}

#[test]
fn update_filter_info_attaches_host_ids_to_matching_entries() {
    let mut bus = FilterBus::default();
    bus.add_filter("East");
    bus.add_filter("West");

    bus.update_filter_info(&[
        HostFilterAck {
            value: "East".to_owned(),
            id: Some("hf-1".to_owned()),
        },
        HostFilterAck {
            value: "Unknown".to_owned(),
            id: Some("hf-2".to_owned()),
        },
        HostFilterAck {
            value: "West".to_owned(),
            id: None,
        },
    ]);

    let filters = bus.filters();
    assert_eq!(filters[0].id.as_deref(), Some("hf-1"));
    assert_eq!(filters[1].id, None);
    assert_eq!(bus.key_for_host_id("hf-1"), Some("East"));
    assert_eq!(bus.key_for_host_id("hf-2"), None);
}

#[test]
fn listeners_run_in_registration_order_with_same_payload() {
    let mut bus = FilterBus::default();
    let order = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&order);
    bus.add_event_listener(EVENT_FILTER, move |_: &FilterEvent| {
        first.borrow_mut().push("first");
    });
    let second = Rc::clone(&order);
    bus.add_event_listener(EVENT_FILTER, move |_: &FilterEvent| {
        second.borrow_mut().push("second");
    });

    bus.add_filter("East");
    assert_eq!(*order.borrow(), ["first", "second"]);
}

#[test]
fn registering_on_an_unknown_event_name_is_allowed_and_inert() {
    let mut bus = FilterBus::default();
    let events = record_events(&mut bus, "made-up-event");
    bus.add_filter("East");
    bus.remove_filter("East");
    assert!(events.borrow().is_empty());
}

#[test]
fn detach_listeners_stops_all_dispatch() {
    let mut bus = FilterBus::default();
    let events = record_events(&mut bus, EVENT_FILTER);
    bus.detach_listeners();
    bus.add_filter("East");
    assert!(events.borrow().is_empty());
}
