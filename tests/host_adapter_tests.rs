use serde_json::{Map, Value, json};

use bullet_rs::api::{AxisPosition, FormatMode, LabelPosition};
use bullet_rs::events::HostFilterAck;
use bullet_rs::host::{FieldMeta, FieldRole, FilterDescriptor, FilterSink, HostAdapter};
use bullet_rs::render::NullRenderer;

#[derive(Debug, Default)]
struct RecordingSink {
    applied: Vec<FilterDescriptor>,
    removed: Vec<(String, String)>,
}

impl FilterSink for RecordingSink {
    fn apply_filters(&mut self, descriptor: &FilterDescriptor) {
        self.applied.push(descriptor.clone());
    }

    fn remove_filter(&mut self, context_id: &str, filter_id: &str) {
        self.removed
            .push((context_id.to_owned(), filter_id.to_owned()));
    }
}

fn fields() -> Vec<FieldMeta> {
    vec![
        FieldMeta::new("region", "region", FieldRole::Group),
        FieldMeta::new("sales", "revenue", FieldRole::Current),
        FieldMeta::new("quota", "budget", FieldRole::Baseline),
    ]
}

fn sample_data() -> Vec<Vec<Value>> {
    vec![
        vec![json!("East"), json!(40.0), json!(50.0)],
        vec![json!("West"), json!(120.0), json!(110.0)],
        vec![json!("East"), json!(40.0), json!(50.0)],
    ]
}

fn adapter() -> HostAdapter<NullRenderer, RecordingSink> {
    HostAdapter::new("viz-1", RecordingSink::default())
}

#[test]
fn render_shapes_groups_summed_and_sorted_by_baseline() {
    let mut adapter = adapter();
    adapter
        .render(
            NullRenderer::default(),
            &sample_data(),
            fields(),
            &Map::new(),
        )
        .expect("render");

    let chart = adapter.chart().expect("chart mounted");
    assert_eq!(chart.scene_keys(), ["West", "East"]);
    let east = chart
        .rows()
        .iter()
        .find(|row| row.key == "East")
        .expect("east row");
    assert_eq!(east.current, 80.0);
    assert_eq!(east.baseline, 100.0);
}

#[test]
fn render_fails_when_a_role_is_missing() {
    let mut adapter = adapter();
    let incomplete = vec![FieldMeta::new("region", "region", FieldRole::Group)];
    let result = adapter.render(
        NullRenderer::default(),
        &sample_data(),
        incomplete,
        &Map::new(),
    );
    assert!(result.is_err());
}

#[test]
fn selection_sends_a_descriptor_with_the_group_field() {
    let mut adapter = adapter();
    adapter
        .render(
            NullRenderer::default(),
            &sample_data(),
            fields(),
            &Map::new(),
        )
        .expect("render");

    adapter.chart_mut().expect("chart").toggle_select("West");

    let sink = adapter.sink();
    let sink = sink.borrow();
    assert_eq!(sink.applied.len(), 1);
    let descriptor = &sink.applied[0];
    assert_eq!(descriptor.id, "viz-1");
    assert_eq!(descriptor.filter.len(), 1);
    assert_eq!(descriptor.filter[0].field, "region");
    assert_eq!(descriptor.filter[0].value, "West");
}

#[test]
fn deselection_forwards_only_acknowledged_filter_ids() {
    let mut adapter = adapter();
    adapter
        .render(
            NullRenderer::default(),
            &sample_data(),
            fields(),
            &Map::new(),
        )
        .expect("render");

    {
        let chart = adapter.chart_mut().expect("chart");
        chart.toggle_select("West");
        chart.toggle_select("West");
    }
    assert!(adapter.sink().borrow().removed.is_empty());

    {
        let chart = adapter.chart_mut().expect("chart");
        chart.toggle_select("West");
    }
    adapter.update_filter_info(&[HostFilterAck {
        value: "West".to_owned(),
        id: Some("flt-3".to_owned()),
    }]);
    adapter.chart_mut().expect("chart").toggle_select("West");

    let sink = adapter.sink();
    assert_eq!(
        sink.borrow().removed,
        [("viz-1".to_owned(), "flt-3".to_owned())]
    );
}

#[test]
fn host_removed_filter_deselects_and_skips_the_next_refresh() {
    let mut adapter = adapter();
    adapter
        .render(
            NullRenderer::default(),
            &sample_data(),
            fields(),
            &Map::new(),
        )
        .expect("render");

    adapter.chart_mut().expect("chart").toggle_select("West");
    adapter.update_filter_info(&[HostFilterAck {
        value: "West".to_owned(),
        id: Some("flt-7".to_owned()),
    }]);
    assert!(adapter.host_removed_filter("flt-7"));
    assert!(
        adapter
            .chart()
            .expect("chart")
            .selected_keys()
            .is_empty()
    );

    // The host's follow-up refresh is swallowed exactly once: a suppressed
    // refresh never arms animations, a processed one does.
    adapter.refresh(&sample_data()).expect("suppressed refresh");
    assert!(!adapter.chart().expect("chart").animations());
    adapter.refresh(&sample_data()).expect("second refresh");
    assert!(adapter.chart().expect("chart").animations());
}

#[test]
fn unknown_host_filter_ids_are_ignored() {
    let mut adapter = adapter();
    adapter
        .render(
            NullRenderer::default(),
            &sample_data(),
            fields(),
            &Map::new(),
        )
        .expect("render");
    assert!(!adapter.host_removed_filter("missing"));
    adapter.refresh(&sample_data()).expect("refresh proceeds");
    assert!(adapter.chart().expect("chart").animations());
}

#[test]
fn refresh_before_render_is_an_error() {
    let mut adapter = adapter();
    assert!(adapter.refresh(&sample_data()).is_err());
}

#[test]
fn refresh_reconciles_new_data_with_animation() {
    let mut adapter = adapter();
    adapter
        .render(
            NullRenderer::default(),
            &sample_data(),
            fields(),
            &Map::new(),
        )
        .expect("render");

    let update = vec![
        vec![json!("West"), json!(130.0), json!(100.0)],
        vec![json!("North"), json!(20.0), json!(60.0)],
    ];
    adapter.refresh(&update).expect("refresh");

    let chart = adapter.chart().expect("chart");
    assert_eq!(chart.scene_keys(), ["West", "North"]);
    assert!(chart.animations());
}

#[test]
fn props_map_onto_engine_configuration() {
    let mut props = Map::new();
    props.insert("width".to_owned(), json!("320px"));
    props.insert("height".to_owned(), json!(240));
    props.insert("showlabel".to_owned(), json!("false"));
    props.insert("showlegends".to_owned(), json!(false));
    props.insert("axis".to_owned(), json!("top"));
    props.insert("opacity".to_owned(), json!(".5"));
    props.insert("lowest".to_owned(), json!("20"));
    props.insert("middle".to_owned(), json!(50));
    props.insert("higher".to_owned(), json!(90));
    props.insert("numberformat".to_owned(), json!("currency"));
    props.insert("currencysymbol".to_owned(), json!("$"));

    let mut adapter = adapter();
    adapter
        .render(NullRenderer::default(), &sample_data(), fields(), &props)
        .expect("render");

    let config = adapter.chart().expect("chart").config();
    assert_eq!(config.width, 320);
    assert_eq!(config.height, 240);
    assert!(!config.show_label);
    assert!(!config.show_legend);
    assert_eq!(config.axis_position, AxisPosition::Top);
    assert_eq!(config.label_position, LabelPosition::Top);
    assert!(config.axis_on_chart);
    assert_eq!(config.opacity, 0.5);
    assert_eq!(config.thresholds.lowest, 20.0);
    assert_eq!(config.thresholds.middle, 50.0);
    assert_eq!(config.thresholds.higher, 90.0);
    assert_eq!(config.number_format.mode, FormatMode::Currency);
    assert_eq!(config.number_format.symbol, "$");
    assert_eq!(config.current_label, "revenue");
    assert_eq!(config.target_label, "budget");
}

#[test]
fn dispose_unmounts_the_chart() {
    let mut adapter = adapter();
    adapter
        .render(
            NullRenderer::default(),
            &sample_data(),
            fields(),
            &Map::new(),
        )
        .expect("render");
    adapter.dispose();
    assert!(adapter.chart().is_none());
}

#[test]
fn nest_rows_wraps_shaped_rows_under_the_measure_caption() {
    use bullet_rs::host::{nest_rows, shape_rows};

    let rows = shape_rows(&sample_data(), &fields()).expect("shape");
    let nested = nest_rows(rows, &fields()).expect("nest");
    assert_eq!(nested.key, "Revenue");
    assert_eq!(nested.values.len(), 2);
    assert_eq!(nested.values[0].key, "West");
}

#[test]
fn malformed_measure_cells_become_nan_rows() {
    let data = vec![vec![json!("East"), json!("not-a-number"), Value::Null]];
    let rows = bullet_rs::host::shape_rows(&data, &fields()).expect("shape");
    assert_eq!(rows.len(), 1);
    assert!(rows[0].current.is_nan());
    assert!(rows[0].baseline.is_nan());
}
