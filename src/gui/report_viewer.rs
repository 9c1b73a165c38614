//! Report Viewer Widget
//! Central scrollable panel rendering every section of a pipeline run.

use crate::charts::ChartPlotter;
use crate::data::{cell_label, DuplicateCount};
use crate::pipeline::{DuplicateSection, MissingSection, RunReport, VisualSection};
use crate::stats::{ColumnType, StatsTable};
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::*;

const SECTION_SPACING: f32 = 15.0;
const TABLE_MAX_HEIGHT: f32 = 260.0;
const CHART_HEIGHT: f32 = 360.0;
const SUCCESS_COLOR: Color32 = Color32::from_rgb(40, 167, 69);
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Scrollable report display area.
pub struct ReportViewer {
    /// Maximum rows rendered per table
    pub preview_rows: usize,
}

impl ReportViewer {
    pub fn new(preview_rows: usize) -> Self {
        Self { preview_rows }
    }

    pub fn show(&self, ui: &mut egui::Ui, report: Option<&RunReport>) {
        let Some(report) = report else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Upload a CSV or Excel file for Exploratory Data Analysis.")
                        .size(20.0),
                );
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("{} rows × {} columns", report.rows, report.columns))
                        .size(12.0)
                        .color(Color32::GRAY),
                );

                Self::heading(ui, "Basic Statistics");
                Self::draw_stats_table(ui, &report.stats);

                Self::heading(ui, "Data Types");
                Self::draw_data_types(ui, "data_types", &report.data_types);

                if let Some(missing) = &report.missing {
                    Self::heading(ui, "Missing Values Operations");
                    self.draw_missing_section(ui, missing);
                }

                if let Some(duplicates) = &report.duplicates {
                    Self::heading(ui, "Duplicated Data Operations");
                    self.draw_duplicate_section(ui, duplicates);
                }

                Self::heading(ui, "Data Visualizations");
                Self::draw_visual_section(ui, &report.visual);
            });
    }

    fn heading(ui: &mut egui::Ui, title: &str) {
        ui.add_space(SECTION_SPACING);
        ui.label(RichText::new(title).size(18.0).strong());
        ui.separator();
    }

    fn caption(ui: &mut egui::Ui, text: &str) {
        ui.add_space(6.0);
        ui.label(RichText::new(text).monospace());
    }

    /// Statistics as rows, one column per described column.
    fn draw_stats_table(ui: &mut egui::Ui, stats: &StatsTable) {
        ScrollArea::horizontal().id_salt("stats_scroll").show(ui, |ui| {
            egui::Grid::new("stats_table")
                .striped(true)
                .min_col_width(70.0)
                .spacing([12.0, 4.0])
                .show(ui, |ui| match stats {
                    StatsTable::Numeric(columns) => {
                        ui.label("");
                        for col in columns {
                            ui.label(RichText::new(&col.column).strong());
                        }
                        ui.end_row();

                        for (row, label) in crate::stats::ColumnStats::LABELS.iter().enumerate() {
                            ui.label(RichText::new(*label).strong());
                            for col in columns {
                                let value = col.values()[row];
                                ui.label(Self::format_number(value));
                            }
                            ui.end_row();
                        }
                    }
                    StatsTable::Categorical(columns) => {
                        ui.label("");
                        for col in columns {
                            ui.label(RichText::new(&col.column).strong());
                        }
                        ui.end_row();

                        ui.label(RichText::new("count").strong());
                        for col in columns {
                            ui.label(col.count.to_string());
                        }
                        ui.end_row();

                        ui.label(RichText::new("unique").strong());
                        for col in columns {
                            ui.label(col.unique.to_string());
                        }
                        ui.end_row();

                        ui.label(RichText::new("top").strong());
                        for col in columns {
                            ui.label(col.top.as_deref().unwrap_or("NaN"));
                        }
                        ui.end_row();

                        ui.label(RichText::new("freq").strong());
                        for col in columns {
                            ui.label(col.freq.to_string());
                        }
                        ui.end_row();
                    }
                });
        });
    }

    fn format_number(value: f64) -> String {
        if value.is_nan() {
            "NaN".to_string()
        } else {
            format!("{value:.6}")
        }
    }

    fn draw_data_types(ui: &mut egui::Ui, id: &str, types: &[ColumnType]) {
        egui::Grid::new(id).striped(true).show(ui, |ui| {
            for t in types {
                ui.label(&t.column);
                ui.label(RichText::new(&t.dtype).monospace());
                ui.end_row();
            }
        });
    }

    fn draw_missing_section(&self, ui: &mut egui::Ui, section: &MissingSection) {
        if let Some(message) = section.message() {
            ui.label(
                RichText::new(format!("{message} ({} affected)", section.affected))
                    .color(SUCCESS_COLOR),
            );
        }

        Self::caption(
            ui,
            &format!("Count of Missing Values: {}", section.report.total_missing()),
        );
        egui::Grid::new("missing_counts").striped(true).show(ui, |ui| {
            for count in &section.report.counts {
                ui.label(&count.column);
                ui.label(count.missing.to_string());
                ui.end_row();
            }
        });

        Self::caption(ui, "DataFrame of Missing Values");
        self.draw_dataframe(
            ui,
            "missing_rows",
            &section.report.rows,
            Some(section.report.positions.as_slice()),
        );

        if let Some(types) = &section.data_types {
            Self::caption(ui, "Data Types");
            Self::draw_data_types(ui, "data_types_after_drop", types);
        }
    }

    fn draw_duplicate_section(&self, ui: &mut egui::Ui, section: &DuplicateSection) {
        match section {
            DuplicateSection::Flags(flags) => {
                Self::caption(ui, "Duplicates in the data frame are:");
                self.draw_dataframe(ui, "duplicate_flags", flags, None);
            }
            DuplicateSection::Counts(counts) => {
                Self::caption(ui, "Sum of Duplicates in the data frame are:");
                Self::draw_duplicate_counts(ui, counts);
            }
            DuplicateSection::Dropped { removed, counts } => {
                ui.label(
                    RichText::new(format!(
                        "Duplicates are dropped successfully ({removed} rows removed)"
                    ))
                    .color(SUCCESS_COLOR),
                );
                Self::caption(ui, "Sum of Duplicates in the data frame are:");
                Self::draw_duplicate_counts(ui, counts);
            }
        }
    }

    fn draw_duplicate_counts(ui: &mut egui::Ui, counts: &[DuplicateCount]) {
        for count in counts {
            ui.label(format!("{}  =  {}", count.column, count.duplicates));
        }
    }

    fn draw_visual_section(ui: &mut egui::Ui, visual: &VisualSection) {
        Self::caption(ui, "Numerical columns are:");
        ui.label(Self::name_list(&visual.classes.numeric));
        Self::caption(ui, "Categorical columns are:");
        ui.label(Self::name_list(&visual.classes.categorical));
        if let Some(column) = &visual.column {
            Self::caption(ui, &format!("Selected column: {column}"));
        }
        ui.add_space(10.0);

        match &visual.chart {
            Some(Ok(chart)) => ChartPlotter::draw_chart(ui, chart, CHART_HEIGHT),
            Some(Err(e)) => {
                ui.label(RichText::new(e.to_string()).color(ERROR_COLOR));
            }
            None => {
                ui.label("No column to visualize");
            }
        }
    }

    fn name_list(names: &[String]) -> String {
        if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(", ")
        }
    }

    /// Render the first `preview_rows` rows of a DataFrame as a grid, each row
    /// labelled with its entry of `positions` or else its own index.
    fn draw_dataframe(
        &self,
        ui: &mut egui::Ui,
        id: &str,
        df: &DataFrame,
        positions: Option<&[usize]>,
    ) {
        if df.height() == 0 {
            ui.label(RichText::new("(empty)").color(Color32::GRAY));
            return;
        }

        let shown = df.height().min(self.preview_rows);
        ScrollArea::both()
            .id_salt(id)
            .max_height(TABLE_MAX_HEIGHT)
            .show(ui, |ui| {
                egui::Grid::new(id).striped(true).show(ui, |ui| {
                    ui.label("");
                    for name in df.get_column_names() {
                        ui.label(RichText::new(name.as_str()).strong());
                    }
                    ui.end_row();

                    for row in 0..shown {
                        let label = positions.and_then(|p| p.get(row)).copied().unwrap_or(row);
                        ui.label(RichText::new(label.to_string()).color(Color32::GRAY));
                        for col in df.get_columns() {
                            let text = col
                                .get(row)
                                .ok()
                                .and_then(|v| cell_label(&v))
                                .unwrap_or_else(|| "None".to_string());
                            ui.label(text);
                        }
                        ui.end_row();
                    }
                });
            });

        if shown < df.height() {
            ui.label(
                RichText::new(format!("… {} more rows", df.height() - shown))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }
    }
}
