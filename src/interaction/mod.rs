//! Popup and selection state for chart rows.
//!
//! Per-row states are {unselected, selected} x {popup-closed, popup-open}.
//! At most one popup is open chart-wide; selection is independent per row,
//! and every selected row keeps its own marker line.

use indexmap::{IndexMap, IndexSet};

/// Vertical dashed indicator drawn for a selected row, in chart-local
/// coordinates (the marker layer applies label/margin offsets at draw).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerLine {
    pub x: f64,
    pub y1: f64,
    pub y2: f64,
}

/// Detail popup content for one row, ready for host display at the pointer's
/// page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupState {
    pub row_key: String,
    pub page_x: f64,
    pub page_y: f64,
    pub target_label: String,
    pub target_value: String,
    pub current_label: String,
    pub current_value: String,
    /// Integer `current * 100 / baseline`, truncated toward zero.
    pub percent: i64,
}

#[derive(Debug, Default)]
pub struct InteractionState {
    popup: Option<PopupState>,
    selected: IndexSet<String>,
    markers: IndexMap<String, MarkerLine>,
}

impl InteractionState {
    #[must_use]
    pub fn popup(&self) -> Option<&PopupState> {
        self.popup.as_ref()
    }

    #[must_use]
    pub fn is_selected(&self, row_key: &str) -> bool {
        self.selected.contains(row_key)
    }

    #[must_use]
    pub fn selected_keys(&self) -> Vec<&str> {
        self.selected.iter().map(String::as_str).collect()
    }

    /// Marker lines in selection order, one per selected row.
    pub fn markers(&self) -> impl Iterator<Item = (&str, MarkerLine)> {
        self.markers
            .iter()
            .map(|(key, marker)| (key.as_str(), *marker))
    }

    /// Toggles the popup for `row_key`. Opening closes any other popup
    /// first; returns `true` when the popup is now open.
    pub fn toggle_popup(&mut self, popup: PopupState) -> bool {
        let was_open_here = self
            .popup
            .as_ref()
            .is_some_and(|open| open.row_key == popup.row_key);
        if was_open_here {
            self.popup = None;
            false
        } else {
            self.popup = Some(popup);
            true
        }
    }

    /// Closes any open popup, e.g. on a pointer-down outside the chart.
    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    pub fn select(&mut self, row_key: &str, marker: MarkerLine) {
        self.selected.insert(row_key.to_owned());
        self.markers.insert(row_key.to_owned(), marker);
    }

    pub fn deselect(&mut self, row_key: &str) -> bool {
        self.markers.shift_remove(row_key);
        self.selected.shift_remove(row_key)
    }

    /// Drops all interaction state. Part of component teardown.
    pub fn clear(&mut self) {
        self.popup = None;
        self.selected.clear();
        self.markers.clear();
    }
}
