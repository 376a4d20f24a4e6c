use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Field, Record};
use crate::state::AppState;
use crate::ui::format::format_usd;

const TABLE_HEIGHT: f32 = 420.0;

/// Scrollable grid of the records that pass the current filters.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let rows = &state.summary.visible_indices;
    if rows.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(TABLE_HEIGHT)
        .columns(Column::auto().at_least(70.0), Field::ALL.len())
        .header(22.0, |mut header| {
            for field in Field::ALL {
                header.col(|ui| {
                    ui.strong(field.label());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let Some(record) = state.dataset.get(rows[row.index()]) else {
                    return;
                };
                for field in Field::ALL {
                    row.col(|ui| {
                        ui.label(cell_text(record, field));
                    });
                }
            });
        });
}

fn cell_text(record: &Record, field: Field) -> String {
    match field {
        Field::SalaryUsd => format_usd(record.salary_usd),
        other => record.value(other).to_string(),
    }
}
