use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Dimension;
use crate::data::selection::Selection;
use crate::state::{AppState, SelectionEvent};
use crate::ui::format::format_count;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Control Panel");
    ui.separator();

    // Collected while drawing, dispatched once the panel no longer borrows the selection.
    let mut events = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // Two checkbox groups per row: years | seniority, contract | company size.
            for pair in Dimension::ALL.chunks(2) {
                ui.columns(2, |cols| {
                    for (col_ui, &dim) in cols.iter_mut().zip(pair) {
                        checkbox_group(col_ui, &state.selection, dim, &mut events);
                    }
                });
                ui.separator();
            }
        });

    state.apply_events(events);
}

fn checkbox_group(
    ui: &mut Ui,
    selection: &Selection,
    dim: Dimension,
    events: &mut Vec<SelectionEvent>,
) {
    let options = selection.options().get(dim);
    let n_selected = selection.active_subset(dim).len();
    ui.label(RichText::new(format!("{dim}  ({n_selected}/{})", options.len())).strong());

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            events.push(SelectionEvent::SelectAll(dim));
        }
        if ui.small_button("None").clicked() {
            events.push(SelectionEvent::SelectNone(dim));
        }
    });

    for value in options {
        let mut checked = selection.is_active(dim, value);
        if ui.checkbox(&mut checked, value.to_string()).changed() {
            events.push(SelectionEvent::Toggle {
                dimension: dim,
                value: value.clone(),
                active: checked,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export filtered view…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.menu_button("View", |ui: &mut Ui| {
            if ui.button("Reset filters").clicked() {
                state.apply_events(vec![SelectionEvent::Reset]);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} of {} records",
            format_count(state.summary.visible_indices.len()),
            format_count(state.dataset.len())
        ));
        if !state.selection.is_unfiltered() {
            ui.label(RichText::new("(filtered)").italics());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered records")
        .set_file_name("filtered_salaries.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_filtered(&path) {
            Ok(n) => {
                log::info!("Exported {n} records to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
