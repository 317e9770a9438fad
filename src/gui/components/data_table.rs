// src/gui/components/data_table.rs
//
// Preview of the last produced dataset. Purely a view; the full data is in
// the spreadsheet on disk.

use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};

use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    if app.rows.is_empty() {
        ui.label("No data yet. Run step 1 above.");
        return;
    }

    let preview = app.state.gui.preview_rows.min(app.rows.len());
    let cols = app.headers.len();

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().resizable(true).clip(true).at_least(60.0), cols)
        .header(24.0, |mut header| {
            for h in &app.headers {
                header.col(|ui| {
                    ui.label(RichText::new(h).strong());
                });
            }
        })
        .body(|body| {
            body.rows(20.0, preview, |mut row| {
                let i = row.index();
                for ci in 0..cols {
                    let cell = app.rows[i].get(ci).cloned().unwrap_or_default();
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });

    if app.rows.len() > preview {
        ui.add_space(4.0);
        ui.label(format!(
            "Showing first {preview} of {} rows; full data is in the output file.",
            app.rows.len()
        ));
    }
}
