//! Selection/filter event bus.
//!
//! An in-memory, insertion-ordered set of active selections keyed by a
//! normalized row identifier, with synchronous listener dispatch. This is
//! the only channel through which chart selection reaches the host.

use indexmap::IndexMap;
use tracing::{debug, trace};

pub const EVENT_FILTER: &str = "filter";
pub const EVENT_REMOVE_FILTER: &str = "remove-filter";

/// One active selection. `id` arrives asynchronously once the host
/// acknowledges the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEntry {
    pub name: String,
    pub id: Option<String>,
}

/// Host-side filter record fed back through `update_filter_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFilterAck {
    pub value: String,
    pub id: Option<String>,
}

/// Payload handed to every listener of an emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// Snapshot of the full selection map, insertion order preserved.
    Filter(Vec<FilterEntry>),
    /// The entries removed by this operation.
    RemoveFilter(Vec<FilterEntry>),
}

type Listener = Box<dyn FnMut(&FilterEvent)>;

/// Derives the normalized, collision-tolerant identifier for a row key:
/// lower-cased, ASCII non-alphanumerics stripped, suffixed with the
/// stripped string's length.
#[must_use]
pub fn normalized_uid(key: &str) -> String {
    let stripped: String = key
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    format!("{stripped}{}", stripped.len())
}

#[derive(Default)]
pub struct FilterBus {
    filters: IndexMap<String, FilterEntry>,
    listeners: IndexMap<String, Vec<Listener>>,
}

impl std::fmt::Debug for FilterBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterBus")
            .field("filters", &self.filters)
            .field("listener_events", &self.listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FilterBus {
    /// Registers `handler` for `event`. Unknown event names implicitly
    /// create their handler list.
    pub fn add_event_listener(
        &mut self,
        event: impl Into<String>,
        handler: impl FnMut(&FilterEvent) + 'static,
    ) {
        self.listeners
            .entry(event.into())
            .or_default()
            .push(Box::new(handler));
    }

    /// Active selection entries in insertion order.
    #[must_use]
    pub fn filters(&self) -> Vec<FilterEntry> {
        self.filters.values().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    #[must_use]
    pub fn contains(&self, row_key: &str) -> bool {
        self.filters.contains_key(&normalized_uid(row_key))
    }

    /// Looks up the row key whose selection carries the given host filter id.
    #[must_use]
    pub fn key_for_host_id(&self, host_id: &str) -> Option<&str> {
        self.filters
            .values()
            .find(|entry| entry.id.as_deref() == Some(host_id))
            .map(|entry| entry.name.as_str())
    }

    /// Records a selection for `row_key` and emits `filter` with the full
    /// selection snapshot. State is idempotent by normalized key; the event
    /// fires on every call, including re-selection.
    pub fn add_filter(&mut self, row_key: &str) {
        let uid = normalized_uid(row_key);
        self.filters.entry(uid).or_insert_with(|| FilterEntry {
            name: row_key.to_owned(),
            id: None,
        });
        debug!(row_key, total = self.filters.len(), "filter added");
        let event = FilterEvent::Filter(self.filters());
        self.trigger(EVENT_FILTER, &event);
    }

    /// Removes the selection for `row_key` and emits `remove-filter` with
    /// the removed entry. Absent keys are a silent no-op.
    pub fn remove_filter(&mut self, row_key: &str) -> bool {
        let uid = normalized_uid(row_key);
        let Some(entry) = self.filters.shift_remove(&uid) else {
            trace!(row_key, "remove-filter ignored: no matching entry");
            return false;
        };
        debug!(row_key, remaining = self.filters.len(), "filter removed");
        let event = FilterEvent::RemoveFilter(vec![entry]);
        self.trigger(EVENT_REMOVE_FILTER, &event);
        true
    }

    /// Empties the selection map and emits `remove-filter` carrying every
    /// removed entry.
    pub fn clear_filters(&mut self) {
        let removed: Vec<FilterEntry> = self.filters.drain(..).map(|(_, entry)| entry).collect();
        debug!(removed = removed.len(), "filters cleared");
        let event = FilterEvent::RemoveFilter(removed);
        self.trigger(EVENT_REMOVE_FILTER, &event);
    }

    /// Attaches host-assigned filter ids to matching local entries so a
    /// host-side removal can later be correlated back. Unknown values are
    /// ignored.
    pub fn update_filter_info(&mut self, acks: &[HostFilterAck]) {
        for ack in acks {
            let Some(id) = ack.id.as_ref().filter(|id| !id.is_empty()) else {
                continue;
            };
            if let Some(entry) = self.filters.get_mut(&normalized_uid(&ack.value)) {
                entry.id = Some(id.clone());
            }
        }
    }

    /// Removes every registered listener. Part of component teardown so no
    /// handler outlives the chart.
    pub fn detach_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Invokes listeners registered for `event` in registration order, each
    /// with the same payload.
    fn trigger(&mut self, event: &str, payload: &FilterEvent) {
        let Some(handlers) = self.listeners.get_mut(event) else {
            return;
        };
        for handler in handlers {
            handler(payload);
        }
    }
}
