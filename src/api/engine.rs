use tracing::{debug, trace};

use crate::core::{
    ChartGeometry, LinearScale, Row, RowLayout, Viewport, compute_layout,
};
use crate::error::{ChartError, ChartResult};
use crate::events::{FilterBus, FilterEntry, FilterEvent, HostFilterAck};
use crate::interaction::{InteractionState, MarkerLine, PopupState};
use crate::render::{
    Color, LinePrimitive, LineStrokeStyle, RectPrimitive, RenderFrame, Renderer, SceneDiff,
    SceneGraph, TextHAlign, TextPrimitive, TransitionSpec,
};

use super::axis::{AXIS_TICK_COUNT, axis_ticks};
use super::config::{AxisPosition, BulletChartConfig, ColorPalette, LabelPosition, ResolvedColors};
use super::format::{NumberFormat, ValueFormatter, capitalize};
use super::legend::{Legend, build_legend};

/// Widens the scale domain so the widest bar never clips. Applied only when
/// more than one row is present.
const DOMAIN_BUFFER: f64 = 1.15;
const MARKER_X_OFFSET: f64 = 2.0;
const AXIS_TICK_LENGTH: f64 = 6.0;
const AXIS_FONT_SIZE: f64 = 10.0;
const LABEL_COLOR: Color = Color::rgb(0.13, 0.13, 0.13);
const AXIS_COLOR: Color = Color::rgb(0.35, 0.35, 0.35);
const MARKER_COLOR: Color = Color::rgb(0.35, 0.35, 0.35);
const MARKER_STROKE: LineStrokeStyle = LineStrokeStyle::Dashed {
    dash_px: 5.0,
    gap_px: 5.0,
};

/// Grouped bullet chart engine.
///
/// Owns the retained row scene, selection and popup state, and the filter
/// event bus. Every `render()` reconciles the scene against the current
/// dataset by row key and hands a materialized `RenderFrame` to the backend.
pub struct BulletChart<R: Renderer> {
    renderer: R,
    config: BulletChartConfig,
    geometry: ChartGeometry,
    colors: ResolvedColors,
    label_formatter: Box<dyn ValueFormatter>,
    axis_formatter: Box<dyn ValueFormatter>,
    scale: LinearScale,
    rows: Vec<RowLayout>,
    scene: SceneGraph,
    interaction: InteractionState,
    bus: FilterBus,
    animations: bool,
    legend: Option<Legend>,
}

impl<R: Renderer> BulletChart<R> {
    pub fn new(renderer: R, rows: Vec<Row>, config: BulletChartConfig) -> ChartResult<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(ChartError::InvalidViewport {
                width: config.width,
                height: config.height,
            });
        }

        let colors = config.colors.resolve()?;
        let geometry = Self::resolve_geometry(&config);
        let label_formatter: Box<dyn ValueFormatter> =
            Box::new(NumberFormat::new(config.number_format.clone(), false));
        let axis_formatter: Box<dyn ValueFormatter> =
            Box::new(NumberFormat::new(config.number_format.clone(), true));
        let legend = config
            .show_legend
            .then(|| build_legend(&config, geometry, &colors));

        let mut chart = Self {
            renderer,
            scale: LinearScale::new(f64::NAN, geometry.chart_width),
            geometry,
            colors,
            label_formatter,
            axis_formatter,
            rows: Vec::new(),
            scene: SceneGraph::default(),
            interaction: InteractionState::default(),
            bus: FilterBus::default(),
            animations: false,
            legend,
            config,
        };
        chart.set_data(rows);
        Ok(chart)
    }

    /// Replaces injected formatters; mainly for hosts with their own
    /// formatting stack.
    pub fn set_formatters(
        &mut self,
        label_formatter: Box<dyn ValueFormatter>,
        axis_formatter: Box<dyn ValueFormatter>,
    ) {
        self.label_formatter = label_formatter;
        self.axis_formatter = axis_formatter;
    }

    fn resolve_geometry(config: &BulletChartConfig) -> ChartGeometry {
        let label_beside = matches!(
            config.label_position,
            LabelPosition::Left | LabelPosition::Right
        );
        ChartGeometry::resolve(
            f64::from(config.width),
            config.row_height,
            config.row_margin_top,
            config.margin_left,
            config.axis_height,
            label_beside,
            config.label_position == LabelPosition::Top,
        )
    }

    /// Recomputes the shared scale and every row's pixel layout. No row
    /// survives this call by identity; only keys carry over into the next
    /// reconciliation.
    pub fn set_data(&mut self, rows: Vec<Row>) {
        let buffer = if rows.len() > 1 { DOMAIN_BUFFER } else { 1.0 };
        let (scale, layouts) = compute_layout(
            &rows,
            self.config.thresholds,
            self.config.target_percent,
            buffer,
            self.geometry,
        );
        debug!(
            rows = layouts.len(),
            domain_max = scale.domain_max(),
            buffer,
            "set bullet data"
        );
        self.scale = scale;
        self.rows = layouts;
    }

    /// Enables or disables animated attribute updates. Creations never
    /// animate regardless of this flag.
    pub fn animate(&mut self, enable: bool) {
        self.animations = enable;
    }

    #[must_use]
    pub fn animations(&self) -> bool {
        self.animations
    }

    /// Replaces the display palette and rebuilds the legend model.
    pub fn set_colors(&mut self, colors: ColorPalette) -> ChartResult<()> {
        self.colors = colors.resolve()?;
        self.config.colors = colors;
        if self.config.show_legend {
            self.legend = Some(build_legend(&self.config, self.geometry, &self.colors));
        }
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &BulletChartConfig {
        &self.config
    }

    #[must_use]
    pub fn scale(&self) -> LinearScale {
        self.scale
    }

    #[must_use]
    pub fn rows(&self) -> &[RowLayout] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.scene.row_count()
    }

    #[must_use]
    pub fn scene_keys(&self) -> Vec<&str> {
        self.scene.keys()
    }

    #[must_use]
    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// Height of the row area alone: row pitch (doubled when labels stack on
    /// top) plus the per-row axis when the axis renders on chart, times the
    /// row count.
    #[must_use]
    pub fn svg_height(&self) -> f64 {
        let mut row_pitch = self.geometry.row_pitch();
        if self.config.axis_on_chart {
            row_pitch += self.geometry.axis_height;
        }
        row_pitch * self.rows.len() as f64
    }

    /// Full rendered height: row area plus the standalone axis strip and the
    /// legend block when configured.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        let mut height = self.svg_height();
        if !self.config.axis_on_chart {
            height += self.geometry.axis_height;
        }
        if let Some(legend) = &self.legend {
            height += legend.height;
        }
        height
    }

    /// Reconciles the scene against the current dataset and draws a frame.
    pub fn render(&mut self) -> ChartResult<SceneDiff> {
        let diff = self.scene.reconcile(&self.rows, self.animations);
        let frame = self.compose_frame(diff.transitions.clone())?;
        self.renderer.render(&frame)?;
        Ok(diff)
    }

    /// Materializes the current scene without reconciling or drawing.
    pub fn build_render_frame(&self) -> ChartResult<RenderFrame> {
        self.compose_frame(Vec::new())
    }

    // --- interaction -----------------------------------------------------

    /// Tap on a row's graphic area: toggles that row's detail popup, closing
    /// any other open popup first. Returns `true` when a popup is now open.
    pub fn toggle_popup(&mut self, row_key: &str, page_x: f64, page_y: f64) -> bool {
        let Some(layout) = self.rows.iter().find(|row| row.key == row_key) else {
            trace!(row_key, "popup toggle ignored: unknown row");
            return false;
        };
        let popup = PopupState {
            row_key: layout.key.clone(),
            page_x,
            page_y,
            target_label: capitalize(&self.config.target_label),
            target_value: self.label_formatter.format(layout.baseline),
            current_label: capitalize(&self.config.current_label),
            current_value: self.label_formatter.format(layout.current),
            percent: (layout.current * 100.0 / layout.baseline) as i64,
        };
        self.interaction.toggle_popup(popup)
    }

    /// Tap on a row's label area: toggles selection. Select draws the row's
    /// marker line and emits an add-filter; deselect removes both. Returns
    /// `true` when the row is now selected.
    pub fn toggle_select(&mut self, row_key: &str) -> bool {
        if self.interaction.is_selected(row_key) {
            self.interaction.deselect(row_key);
            self.bus.remove_filter(row_key);
            return false;
        }

        let Some(layout) = self.rows.iter().find(|row| row.key == row_key) else {
            trace!(row_key, "select toggle ignored: unknown row");
            return false;
        };
        let marker = self.marker_for(layout);
        self.interaction.select(row_key, marker);
        self.bus.add_filter(row_key);
        true
    }

    /// Pointer-down anywhere outside chart rows and popup: closes any open
    /// popup.
    pub fn pointer_down_outside(&mut self) {
        self.interaction.close_popup();
    }

    #[must_use]
    pub fn popup(&self) -> Option<&PopupState> {
        self.interaction.popup()
    }

    #[must_use]
    pub fn selected_keys(&self) -> Vec<&str> {
        self.interaction.selected_keys()
    }

    #[must_use]
    pub fn marker_lines(&self) -> Vec<MarkerLine> {
        self.interaction
            .markers()
            .map(|(_, marker)| marker)
            .collect()
    }

    fn marker_for(&self, layout: &RowLayout) -> MarkerLine {
        let x = layout.target_x + MARKER_X_OFFSET;
        if self.config.axis_position == AxisPosition::Top {
            MarkerLine {
                x,
                y1: -self.geometry.row_margin_top,
                y2: layout.y + self.geometry.row_height,
            }
        } else {
            MarkerLine {
                x,
                y1: layout.y,
                y2: self.svg_height() + self.geometry.row_margin_top,
            }
        }
    }

    // --- filter bus ------------------------------------------------------

    pub fn add_event_listener(
        &mut self,
        event: impl Into<String>,
        handler: impl FnMut(&FilterEvent) + 'static,
    ) {
        self.bus.add_event_listener(event, handler);
    }

    #[must_use]
    pub fn filters(&self) -> Vec<FilterEntry> {
        self.bus.filters()
    }

    pub fn clear_filters(&mut self) {
        self.bus.clear_filters();
    }

    pub fn update_filter_info(&mut self, acks: &[HostFilterAck]) {
        self.bus.update_filter_info(acks);
    }

    /// Host-driven removal: deselects the row whose selection carries the
    /// given host filter id. Unknown ids are ignored best-effort.
    pub fn deselect_by_host_filter_id(&mut self, host_id: &str) -> bool {
        let Some(row_key) = self.bus.key_for_host_id(host_id).map(str::to_owned) else {
            trace!(host_id, "host filter removal ignored: unknown id");
            return false;
        };
        self.interaction.deselect(&row_key);
        self.bus.remove_filter(&row_key)
    }

    /// Component teardown: detaches every bus listener and drops popup,
    /// selection and marker state.
    pub fn dispose(&mut self) {
        self.bus.detach_listeners();
        self.interaction.clear();
    }

    // --- frame composition -----------------------------------------------

    fn compose_frame(&self, transitions: Vec<TransitionSpec>) -> ChartResult<RenderFrame> {
        let mut frame = RenderFrame::new(Viewport::new(self.config.width, self.config.height));
        frame.transitions = transitions;

        let legend_height = self.legend.as_ref().map_or(0.0, |legend| legend.height);
        let standalone_axis = !self.config.axis_on_chart;
        let chart_top = legend_height
            + if standalone_axis && self.config.axis_position == AxisPosition::Top {
                self.geometry.axis_height
            } else {
                0.0
            };

        if standalone_axis {
            let baseline = if self.config.axis_position == AxisPosition::Top {
                legend_height + self.geometry.axis_height
            } else {
                chart_top + self.svg_height() + 1.0
            };
            let origin_x = self.geometry.margin_left
                + if self.config.label_position == LabelPosition::Right {
                    self.geometry.label_width
                } else {
                    0.0
                };
            self.push_axis(&mut frame, origin_x, baseline, self.config.axis_position);
        }

        for node in self.scene.nodes() {
            self.push_row(&mut frame, &node.layout, chart_top);
        }

        self.push_markers(&mut frame, chart_top);
        Ok(frame)
    }

    fn graphic_origin(&self, layout: &RowLayout, chart_top: f64) -> (f64, f64) {
        let x = self.geometry.margin_left
            + if self.config.label_position == LabelPosition::Right {
                self.geometry.label_width
            } else {
                0.0
            };
        let y = chart_top
            + layout.y
            + if self.geometry.labels_on_top && self.config.show_label {
                self.geometry.row_height
            } else {
                0.0
            };
        (x, y)
    }

    /// Draws one row in fixed child order: threshold bands (back), current
    /// bar, target marker, label (front). The order matters for stacking and
    /// for pointer hit-testing.
    fn push_row(&self, frame: &mut RenderFrame, layout: &RowLayout, chart_top: f64) {
        let geometry = self.geometry;
        let (gx, gy) = self.graphic_origin(layout, chart_top);

        for segment in &layout.segments {
            frame.rects.push(RectPrimitive::new(
                gx + segment.x,
                gy,
                segment.width,
                geometry.row_height,
                self.colors.band(segment.band).with_alpha(self.config.opacity),
            ));
        }

        // Negative or NaN bar widths clamp to zero at draw time only.
        let bar_width = if layout.bar_width > 0.0 {
            layout.bar_width
        } else {
            0.0
        };
        frame.rects.push(RectPrimitive::new(
            gx,
            gy + geometry.inner_padding,
            bar_width,
            geometry.inner_height,
            self.colors.current,
        ));

        frame.rects.push(RectPrimitive::new(
            gx + layout.target_x,
            gy + geometry.row_height / 2.0 - geometry.target_height / 2.0,
            geometry.target_width,
            geometry.target_height,
            self.colors.target,
        ));

        if self.config.show_label {
            let label = self.label_text(&layout.key);
            // Empty group cells are legal host data; they get no label span.
            if !label.is_empty() {
                frame.texts.push(TextPrimitive::new(
                    label,
                    geometry.margin_left,
                    chart_top + layout.y + self.config.label_font_size,
                    self.config.label_font_size,
                    LABEL_COLOR,
                    TextHAlign::Left,
                ));
            }
        }

        if self.config.axis_on_chart {
            let multiplier = if self.config.show_label { 2.0 } else { 1.0 };
            let baseline = chart_top + layout.y + geometry.row_height * multiplier;
            self.push_axis(frame, gx, baseline, AxisPosition::Bottom);
        }
    }

    /// Label text runs through the configured formatter only when it parses
    /// as a number; anything else passes through raw.
    fn label_text(&self, key: &str) -> String {
        match key.trim().parse::<f64>() {
            Ok(value) => self.label_formatter.format(value),
            Err(_) => key.to_owned(),
        }
    }

    fn push_axis(
        &self,
        frame: &mut RenderFrame,
        origin_x: f64,
        baseline: f64,
        orientation: AxisPosition,
    ) {
        let ticks = axis_ticks(self.scale, AXIS_TICK_COUNT);
        if ticks.is_empty() {
            return;
        }

        frame.lines.push(LinePrimitive::new(
            origin_x,
            baseline,
            origin_x + self.geometry.chart_width,
            baseline,
            1.0,
            AXIS_COLOR,
        ));

        let (tick_end, text_y) = match orientation {
            AxisPosition::Top => (baseline - AXIS_TICK_LENGTH, baseline - AXIS_TICK_LENGTH - 2.0),
            AxisPosition::Bottom => (
                baseline + AXIS_TICK_LENGTH,
                baseline + AXIS_TICK_LENGTH + AXIS_FONT_SIZE,
            ),
        };
        for tick in ticks {
            let x = origin_x + tick.x;
            frame
                .lines
                .push(LinePrimitive::new(x, baseline, x, tick_end, 1.0, AXIS_COLOR));
            frame.texts.push(TextPrimitive::new(
                self.axis_formatter.format(tick.value),
                x,
                text_y,
                AXIS_FONT_SIZE,
                AXIS_COLOR,
                TextHAlign::Center,
            ));
        }
    }

    fn push_markers(&self, frame: &mut RenderFrame, chart_top: f64) {
        let offset_x = self.geometry.margin_left
            + if self.geometry.labels_on_top {
                0.0
            } else {
                self.geometry.label_width
            };
        for (_, marker) in self.interaction.markers() {
            frame.lines.push(
                LinePrimitive::new(
                    offset_x + marker.x,
                    chart_top + marker.y1,
                    offset_x + marker.x,
                    chart_top + marker.y2,
                    1.0,
                    MARKER_COLOR,
                )
                .with_stroke_style(MARKER_STROKE),
            );
        }
    }
}
