//! Control Panel Widget
//! Left side panel with the file picker and every menu of the analysis.

use crate::charts::ChartKind;
use crate::pipeline::{DuplicateAction, MissingValueAction, Selection};
use egui::{Color32, ComboBox, RichText};

/// Left side control panel with file selection and analysis menus.
pub struct ControlPanel {
    pub selection: Selection,
    pub file_name: Option<String>,
    pub columns: Vec<String>,
    pub status: String,
    pub status_is_error: bool,
}

impl ControlPanel {
    pub fn new(fill_value: &str) -> Self {
        Self {
            selection: Selection {
                fill_value: fill_value.to_string(),
                ..Selection::default()
            },
            file_name: None,
            columns: Vec::new(),
            status: "Ready".to_string(),
            status_is_error: false,
        }
    }

    /// Update available columns after a file load
    pub fn update_columns(&mut self, file_name: &str, columns: Vec<String>) {
        self.file_name = Some(file_name.to_string());
        self.selection.column = columns.first().cloned();
        self.columns = columns;
    }

    pub fn clear_columns(&mut self) {
        self.columns.clear();
        self.selection.column = None;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, error: &str) {
        self.status = format!("Error: {error}");
        self.status_is_error = true;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let before = self.selection.clone();

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Automated EDA")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Upload a CSV or Excel file for Exploratory Data Analysis.")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = self.file_name.as_deref().unwrap_or("No file selected");
                    let color = if self.file_name.is_some() {
                        ui.visuals().text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(name).size(12.0).color(color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseFile;
                        }
                    });
                });
            });
        ui.label(
            RichText::new("CSV, XLS or XLSX; files can also be dropped on the window")
                .size(10.0)
                .color(Color32::GRAY),
        );

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let label_width = 110.0;
        let combo_width = 170.0;
        let has_data = !self.columns.is_empty();

        ui.add_enabled_ui(has_data, |ui| {
            // ===== Missing Values =====
            ui.label(RichText::new("🧩 Missing Values Operations").size(14.0).strong());
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Function:"));
                ComboBox::from_id_salt("missing_action")
                    .width(combo_width)
                    .selected_text(self.selection.missing.label())
                    .show_ui(ui, |ui| {
                        for option in MissingValueAction::ALL {
                            ui.selectable_value(&mut self.selection.missing, option, option.label());
                        }
                    });
            });

            if self.selection.missing == MissingValueAction::FillMissing {
                ui.add_space(5.0);
                ui.horizontal(|ui| {
                    ui.add_sized([label_width, 20.0], egui::Label::new("Fill value:"));
                    let edit = ui.add(
                        egui::TextEdit::singleline(&mut self.selection.fill_value)
                            .desired_width(combo_width),
                    );
                    // Re-run once editing is done, not on every keystroke.
                    if edit.lost_focus() {
                        action = ControlPanelAction::SelectionChanged;
                    }
                });
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            // ===== Duplicates =====
            ui.label(RichText::new("🔁 Duplicated Data Operations").size(14.0).strong());
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Function:"));
                ComboBox::from_id_salt("duplicate_action")
                    .width(combo_width)
                    .selected_text(self.selection.duplicate.label())
                    .show_ui(ui, |ui| {
                        for option in DuplicateAction::ALL {
                            ui.selectable_value(
                                &mut self.selection.duplicate,
                                option,
                                option.label(),
                            );
                        }
                    });
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            // ===== Visualization =====
            ui.label(RichText::new("📈 Data Visualizations").size(14.0).strong());
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Column:"));
                let selected = self.selection.column.clone().unwrap_or_default();
                ComboBox::from_id_salt("chart_column")
                    .width(combo_width)
                    .selected_text(&selected)
                    .show_ui(ui, |ui| {
                        for col in &self.columns {
                            if ui.selectable_label(selected == *col, col).clicked() {
                                self.selection.column = Some(col.clone());
                            }
                        }
                    });
            });

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Plot type:"));
                ComboBox::from_id_salt("chart_kind")
                    .width(combo_width)
                    .selected_text(self.selection.chart.label())
                    .show_ui(ui, |ui| {
                        for kind in ChartKind::ALL {
                            ui.selectable_value(&mut self.selection.chart, kind, kind.label());
                        }
                    });
            });
        });

        // Menu changes re-run the analysis; fill value edits are handled above.
        let menus_changed = self.selection.missing != before.missing
            || self.selection.duplicate != before.duplicate
            || self.selection.column != before.column
            || self.selection.chart != before.chart;
        if menus_changed {
            action = ControlPanelAction::SelectionChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        ui.label(RichText::new("ℹ Status").size(14.0).strong());
        ui.add_space(5.0);

        let status_color = if self.status_is_error {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseFile,
    SelectionChanged,
}
