use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::api::BulletChart;
use crate::error::{ChartError, ChartResult};
use crate::events::{EVENT_FILTER, EVENT_REMOVE_FILTER, FilterEvent, HostFilterAck};
use crate::render::Renderer;

use super::data_model::{FieldMeta, FieldRole, column_for_role, shape_rows};
use super::props::build_config;

/// One field/value predicate of an outbound filter descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

/// Host-specific filter payload: the chart's context id plus one predicate
/// per selected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDescriptor {
    pub id: String,
    pub filter: Vec<FieldFilter>,
}

/// Capability interface over the host's global filter registry. The engine
/// and adapter never touch host globals directly.
pub trait FilterSink {
    /// Submits the full current selection as a filter descriptor.
    fn apply_filters(&mut self, descriptor: &FilterDescriptor);

    /// Removes one previously acknowledged filter. Unknown ids must be
    /// ignored best-effort.
    fn remove_filter(&mut self, context_id: &str, filter_id: &str);
}

/// Plugin-side adapter implementing the host lifecycle contract:
/// `render` mounts a fresh engine from data/fields/props, `refresh` applies
/// subsequent data updates, and filter traffic flows in both directions.
pub struct HostAdapter<R: Renderer, S: FilterSink + 'static> {
    context_id: String,
    sink: Rc<RefCell<S>>,
    /// One-shot gate armed whenever a remove-filter is emitted, so the
    /// host's follow-up refresh does not reprocess data the engine already
    /// knows about. Self-clears after being consumed once.
    avoid_refresh: Rc<Cell<bool>>,
    chart: Option<BulletChart<R>>,
    fields: Vec<FieldMeta>,
}

impl<R: Renderer, S: FilterSink + 'static> HostAdapter<R, S> {
    #[must_use]
    pub fn new(context_id: impl Into<String>, sink: S) -> Self {
        Self {
            context_id: context_id.into(),
            sink: Rc::new(RefCell::new(sink)),
            avoid_refresh: Rc::new(Cell::new(false)),
            chart: None,
            fields: Vec::new(),
        }
    }

    /// Shared handle to the sink, e.g. for host-side inspection.
    #[must_use]
    pub fn sink(&self) -> Rc<RefCell<S>> {
        Rc::clone(&self.sink)
    }

    #[must_use]
    pub fn chart(&self) -> Option<&BulletChart<R>> {
        self.chart.as_ref()
    }

    #[must_use]
    pub fn chart_mut(&mut self) -> Option<&mut BulletChart<R>> {
        self.chart.as_mut()
    }

    /// First-time mount: shapes the tabular payload, builds configuration
    /// from props, wires filter traffic to the sink, and draws.
    pub fn render(
        &mut self,
        renderer: R,
        data: &[Vec<Value>],
        fields: Vec<FieldMeta>,
        props: &Map<String, Value>,
    ) -> ChartResult<()> {
        let rows = shape_rows(data, &fields)?;
        let current_label = fields[column_for_role(&fields, FieldRole::Current)?]
            .caption
            .clone();
        let target_label = fields[column_for_role(&fields, FieldRole::Baseline)?]
            .caption
            .clone();
        let group_field = fields[column_for_role(&fields, FieldRole::Group)?]
            .name
            .clone();
        let config = build_config(props, current_label, target_label);

        let mut chart = BulletChart::new(renderer, rows, config)?;

        let context_id = self.context_id.clone();
        let sink = Rc::clone(&self.sink);
        chart.add_event_listener(EVENT_FILTER, move |event| {
            let FilterEvent::Filter(entries) = event else {
                return;
            };
            let descriptor = FilterDescriptor {
                id: context_id.clone(),
                filter: entries
                    .iter()
                    .map(|entry| FieldFilter {
                        field: group_field.clone(),
                        value: entry.name.clone(),
                    })
                    .collect(),
            };
            sink.borrow_mut().apply_filters(&descriptor);
        });

        let context_id = self.context_id.clone();
        let sink = Rc::clone(&self.sink);
        let avoid_refresh = Rc::clone(&self.avoid_refresh);
        chart.add_event_listener(EVENT_REMOVE_FILTER, move |event| {
            let FilterEvent::RemoveFilter(entries) = event else {
                return;
            };
            avoid_refresh.set(true);
            for entry in entries {
                if let Some(id) = &entry.id {
                    sink.borrow_mut().remove_filter(&context_id, id);
                }
            }
        });

        chart.render()?;
        self.chart = Some(chart);
        self.fields = fields;
        Ok(())
    }

    /// Subsequent data update. Cheap and idempotent relative to unchanged
    /// data; suppressed exactly once after a remove-filter emission.
    pub fn refresh(&mut self, data: &[Vec<Value>]) -> ChartResult<()> {
        if self.avoid_refresh.replace(false) {
            debug!("refresh suppressed once after filter removal");
            return Ok(());
        }
        let Some(chart) = self.chart.as_mut() else {
            return Err(ChartError::InvalidData(
                "refresh called before render".to_owned(),
            ));
        };

        let rows = shape_rows(data, &self.fields)?;
        chart.animate(true);
        chart.set_data(rows);
        chart.render()?;
        Ok(())
    }

    /// Feeds host-acknowledged filter ids back into the engine so later
    /// host-side removals can be correlated.
    pub fn update_filter_info(&mut self, acks: &[HostFilterAck]) {
        if let Some(chart) = self.chart.as_mut() {
            chart.update_filter_info(acks);
        }
    }

    /// Inbound removal: the host dropped a filter on its side (e.g. from a
    /// filter panel). Deselects the matching row; the resulting
    /// remove-filter emission arms the refresh gate. Unknown ids are
    /// ignored.
    pub fn host_removed_filter(&mut self, filter_id: &str) -> bool {
        self.chart
            .as_mut()
            .is_some_and(|chart| chart.deselect_by_host_filter_id(filter_id))
    }

    /// Tears down the mounted chart, detaching all listeners.
    pub fn dispose(&mut self) {
        if let Some(chart) = self.chart.as_mut() {
            chart.dispose();
        }
        self.chart = None;
    }
}
