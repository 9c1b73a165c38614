//! EDA Explorer Main Application
//! Main window with control panel and report viewer.

use crate::config::AppConfig;
use crate::data::{DataLoader, FileFormat, LoadOptions, LoaderError, UploadedFile};
use crate::gui::{ControlPanel, ControlPanelAction, ReportViewer};
use crate::pipeline::{self, RunReport};
use egui::SidePanel;
use std::path::Path;

/// Main application window.
pub struct EdaApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    report_viewer: ReportViewer,
    report: Option<RunReport>,
}

impl EdaApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let options = LoadOptions {
            infer_schema_length: config.infer_schema_length,
        };
        Self {
            loader: DataLoader::new(options),
            control_panel: ControlPanel::new(&config.fill_value),
            report_viewer: ReportViewer::new(config.preview_rows),
            report: None,
        }
    }

    /// Handle file selection through the native dialog
    fn handle_browse_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV or Excel", &FileFormat::EXTENSIONS[..])
            .pick_file()
        {
            self.open_path(&path);
        }
    }

    fn open_path(&mut self, path: &Path) {
        let result = self.loader.load_path(path).map(|_| ());
        self.finish_load(result);
    }

    fn open_upload(&mut self, file: UploadedFile) {
        let result = self.loader.load(&file).map(|_| ());
        self.finish_load(result);
    }

    fn finish_load(&mut self, result: Result<(), LoaderError>) {
        let file_name = self.loader.get_file_name().unwrap_or_default().to_string();
        match result {
            Ok(()) => {
                let columns = self.loader.get_columns();
                self.control_panel.set_status(&format!(
                    "Loaded {} rows, {} columns",
                    self.loader.get_row_count(),
                    columns.len()
                ));
                self.control_panel.update_columns(&file_name, columns);
                self.rerun();
            }
            Err(e) => {
                log::warn!("Could not load {file_name}: {e}");
                self.control_panel.file_name = Some(file_name);
                self.control_panel.clear_columns();
                self.control_panel.set_error(&e.to_string());
                self.report = None;
            }
        }
    }

    /// Files dropped onto the window; only the first one is opened.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        if let Some(bytes) = file.bytes {
            self.open_upload(UploadedFile::new(file.name, bytes.to_vec()));
        } else if let Some(path) = file.path {
            self.open_path(&path);
        }
    }

    /// Recompute every report from the loaded dataset.
    fn rerun(&mut self) {
        let Some(df) = self.loader.get_dataframe() else {
            self.report = None;
            return;
        };

        match pipeline::run(df, &self.control_panel.selection) {
            Ok(report) => self.report = Some(report),
            Err(e) => {
                log::error!("Analysis failed: {e}");
                self.control_panel.set_error(&e.to_string());
                self.report = None;
            }
        }
    }
}

impl eframe::App for EdaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseFile => self.handle_browse_file(),
                        ControlPanelAction::SelectionChanged => self.rerun(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Report Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.report_viewer.show(ui, self.report.as_ref());
        });
    }
}
