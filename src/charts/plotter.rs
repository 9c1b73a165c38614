//! Chart Plotter Module
//! Draws histogram, bar and pie charts with egui_plot and the egui painter.

use crate::charts::{Chart, Histogram};
use crate::data::ValueCount;
use egui::epaint::TextShape;
use egui::{Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Plot, PlotPoint};
use std::f32::consts::{FRAC_PI_4, TAU};

/// Fill of histogram and bar plot bars.
pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

/// Slice colors, cycled when a column has more values than colors.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// Largest arc drawn as one triangle of a pie slice.
const PIE_ARC_STEP: f32 = 0.05;
/// Upper bound of the band holding rotated bar labels.
const MAX_LABEL_BAND: f32 = 140.0;

pub struct ChartPlotter;

impl ChartPlotter {
    pub fn slice_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Start and end angle (radians, counter-clockwise from 3 o'clock) of each slice.
    pub fn slice_angles(counts: &[ValueCount]) -> Vec<(f32, f32)> {
        let total: usize = counts.iter().map(|vc| vc.count).sum();
        if total == 0 {
            return Vec::new();
        }

        let mut start = 0.0f32;
        counts
            .iter()
            .map(|vc| {
                let end = start + TAU * vc.count as f32 / total as f32;
                let slice = (start, end);
                start = end;
                slice
            })
            .collect()
    }

    pub fn draw_chart(ui: &mut egui::Ui, chart: &Chart, height: f32) {
        match chart {
            Chart::Histogram { column, histogram } => {
                Self::draw_histogram(ui, column, histogram, height)
            }
            Chart::Bar { column, counts } => Self::draw_bar_chart(ui, column, counts, height),
            Chart::Pie { column, counts } => Self::draw_pie_chart(ui, column, counts, height),
        }
    }

    /// Histogram: one black-edged bar per bin.
    fn draw_histogram(ui: &mut egui::Ui, column: &str, histogram: &Histogram, height: f32) {
        let width = histogram.bin_width();
        let bars: Vec<Bar> = histogram
            .centers()
            .into_iter()
            .zip(histogram.counts.iter())
            .map(|(x, &count)| {
                Bar::new(x, count as f64)
                    .width(width)
                    .fill(BAR_COLOR)
                    .stroke(Stroke::new(1.0, Color32::BLACK))
            })
            .collect();

        Plot::new(format!("histogram_{column}"))
            .height(height)
            .x_axis_label(column)
            .y_axis_label("Frequency")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(column));
            });
    }

    /// Bar plot of value frequencies, tick labels rotated 45° under the plot.
    fn draw_bar_chart(ui: &mut egui::Ui, column: &str, counts: &[ValueCount], height: f32) {
        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .map(|(i, vc)| {
                Bar::new(i as f64, vc.count as f64)
                    .width(0.8)
                    .name(&vc.value)
                    .fill(BAR_COLOR)
                    .stroke(Stroke::new(1.0, Color32::BLACK))
            })
            .collect();

        let response = Plot::new(format!("bar_{column}"))
            .height(height)
            .y_axis_label("Count")
            .x_axis_formatter(|_mark, _range| String::new())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(column));
            });

        let transform = response.transform;
        let frame = *transform.frame();
        let text_color = ui.visuals().text_color();
        let font = FontId::proportional(11.0);

        let galleys: Vec<_> = counts
            .iter()
            .map(|vc| {
                ui.painter()
                    .layout_no_wrap(vc.value.clone(), font.clone(), text_color)
            })
            .collect();
        let diagonal = FRAC_PI_4.cos();
        let longest = galleys.iter().map(|g| g.size().x).fold(0.0f32, f32::max);
        let band = (longest * diagonal + 16.0).min(MAX_LABEL_BAND);

        let (band_rect, _) =
            ui.allocate_exact_size(Vec2::new(ui.available_width(), band), Sense::hover());
        let painter = ui.painter_at(band_rect);

        for (i, galley) in galleys.into_iter().enumerate() {
            let tick = transform.position_from_point(&PlotPoint::new(i as f64, 0.0));
            if tick.x < frame.left() || tick.x > frame.right() {
                continue;
            }
            // Text runs up-right and ends just under its tick.
            let run = galley.size().x * diagonal;
            let pos = Pos2::new(tick.x - run, band_rect.top() + run + 2.0);
            painter.add(TextShape::new(pos, galley, text_color).with_angle(-FRAC_PI_4));
        }

        ui.vertical_centered(|ui| {
            ui.label(column);
        });
    }

    /// Pie chart: one slice per distinct value, labelled with the value.
    fn draw_pie_chart(ui: &mut egui::Ui, column: &str, counts: &[ValueCount], height: f32) {
        let (rect, _) =
            ui.allocate_exact_size(Vec2::new(ui.available_width(), height), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.36;
        let text_color = ui.visuals().text_color();

        let point = |angle: f32, r: f32| Pos2::new(center.x + r * angle.cos(), center.y - r * angle.sin());

        for (i, ((from, to), vc)) in Self::slice_angles(counts)
            .into_iter()
            .zip(counts.iter())
            .enumerate()
        {
            let color = Self::slice_color(i);
            let steps = ((to - from) / PIE_ARC_STEP).ceil().max(1.0) as usize;
            for s in 0..steps {
                let a0 = from + (to - from) * s as f32 / steps as f32;
                let a1 = from + (to - from) * (s + 1) as f32 / steps as f32;
                painter.add(Shape::convex_polygon(
                    vec![center, point(a0, radius), point(a1, radius)],
                    color,
                    Stroke::NONE,
                ));
            }
            painter.line_segment([center, point(from, radius)], Stroke::new(1.0, Color32::WHITE));

            let mid = (from + to) / 2.0;
            let anchor = if mid.cos() >= 0.0 {
                Align2::LEFT_CENTER
            } else {
                Align2::RIGHT_CENTER
            };
            painter.text(
                point(mid, radius * 1.1),
                anchor,
                &vc.value,
                FontId::proportional(12.0),
                text_color,
            );
        }

        ui.vertical_centered(|ui| {
            ui.label(column);
        });
    }
}
