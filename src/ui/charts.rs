use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{Color32, Pos2, RichText, ScrollArea, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
};

use crate::color::{red_yellow_green, ColorMap};
use crate::data::aggregate::{BoxSummary, HistogramBin, Kpis};
use crate::data::model::FieldValue;
use crate::state::AppState;
use crate::ui::format::{format_count, format_usd, percentages};
use crate::ui::table;

const CHART_HEIGHT: f32 = 280.0;
const BAR_BLUE: Color32 = Color32::from_rgb(100, 150, 255);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the dashboard body: KPIs, charts and the detailed table.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let summary = &state.summary;
    let colors = &state.colors;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Data Careers Salary Dashboard");
            ui.label(
                "Explore salaries in the data field over recent years. \
                 Use the filters on the left to refine the analysis.",
            );
            ui.separator();

            kpi_tiles(ui, &summary.kpis);
            ui.separator();

            ui.heading("Charts");
            ui.columns(2, |cols| {
                let has_data = !summary.top_job_titles.is_empty();
                tile(&mut cols[0], "Top job titles by mean salary", has_data, |ui| {
                    top_titles_chart(ui, &summary.top_job_titles)
                });
                let has_data = !summary.salary_histogram.is_empty();
                tile(&mut cols[1], "Salary distribution", has_data, |ui| {
                    histogram_chart(ui, &summary.salary_histogram)
                });
            });
            ui.columns(2, |cols| {
                let has_data = !summary.remote_counts.is_empty();
                tile(&mut cols[0], "Work type proportions", has_data, |ui| {
                    donut_chart(ui, &summary.remote_counts, &colors.remote)
                });
                let focus = &state.config.focus_job_title;
                let title = format!("Mean {focus} salary by country");
                if !summary.is_empty() && summary.focus_by_country.is_empty() {
                    // The selection has rows, just none for the focus title.
                    tile(&mut cols[1], &title, true, |ui| {
                        ui.label(format!("No {focus} records in the current selection."));
                    });
                } else {
                    let has_data = !summary.focus_by_country.is_empty();
                    tile(&mut cols[1], &title, has_data, |ui| {
                        country_chart(ui, &summary.focus_by_country)
                    });
                }
            });
            ui.columns(2, |cols| {
                let has_data = !summary.seniority_trend.is_empty();
                tile(&mut cols[0], "Salary trend by seniority", has_data, |ui| {
                    trend_chart(ui, &summary.seniority_trend, &colors.seniority)
                });
                let has_data = !summary.contract_distribution.is_empty();
                tile(&mut cols[1], "Salary by contract type", has_data, |ui| {
                    contract_box_chart(ui, &summary.contract_distribution, &colors.contract)
                });
            });

            ui.separator();
            ui.heading("Detailed data");
            table::records_table(ui, state);
        });
}

/// Bordered container showing `add_contents`, or a "no data" notice.
fn tile(ui: &mut Ui, title: &str, has_data: bool, add_contents: impl FnOnce(&mut Ui)) {
    ui.group(|ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.strong(title);
        if has_data {
            add_contents(ui);
        } else {
            ui.colored_label(Color32::from_rgb(220, 160, 0), "⚠ No data available.");
        }
    });
}

// ---------------------------------------------------------------------------
// KPI tiles
// ---------------------------------------------------------------------------

fn kpi_tiles(ui: &mut Ui, kpis: &Kpis) {
    ui.strong("Overall metrics (annual salary in USD)");
    ui.columns(5, |cols| {
        metric(&mut cols[0], "Mean salary", &format_usd(kpis.mean));
        metric(&mut cols[1], "Median salary", &format_usd(kpis.median));
        metric(&mut cols[2], "Maximum salary", &format_usd(kpis.max));
        metric(&mut cols[3], "Total records", &format_count(kpis.count));
        metric(&mut cols[4], "Most frequent job title", &kpis.top_job_title);
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.group(|ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value).size(22.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn top_titles_chart(ui: &mut Ui, rows: &[(FieldValue, f64)]) {
    let labels: Vec<String> = rows.iter().map(|(k, _)| k.to_string()).collect();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, (k, mean))| Bar::new(i as f64, *mean).name(k).width(0.7))
        .collect();

    Plot::new("top_titles")
        .height(CHART_HEIGHT)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_label("Mean salary (USD)")
        .y_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().color(BAR_BLUE));
        });
}

fn histogram_chart(ui: &mut Ui, bins: &[HistogramBin]) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width() * 0.95)
                .fill(BAR_BLUE)
        })
        .collect();

    Plot::new("salary_histogram")
        .height(CHART_HEIGHT)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .include_y(0.0)
        .x_axis_label("Salary (USD)")
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Ring chart drawn directly with the painter; egui_plot has no pie type.
fn donut_chart(ui: &mut Ui, counts: &[(FieldValue, usize)], colors: &ColorMap) {
    let shares = percentages(&counts.iter().map(|(_, c)| *c).collect::<Vec<_>>());

    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(CHART_HEIGHT * 0.8), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let outer = rect.width() / 2.0 - 4.0;
        let inner = outer * 0.5;

        let mut start = -FRAC_PI_2;
        for ((value, _), share) in counts.iter().zip(&shares) {
            let sweep = TAU * (*share as f32 / 100.0);
            let color = colors.color_for(value);
            // Convex quads, so the hole survives polygon filling.
            let steps = ((sweep / TAU) * 96.0).ceil().max(1.0) as usize;
            for s in 0..steps {
                let a0 = start + sweep * s as f32 / steps as f32;
                let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                let quad = vec![
                    polar(center, inner, a0),
                    polar(center, outer, a0),
                    polar(center, outer, a1),
                    polar(center, inner, a1),
                ];
                painter.add(Shape::convex_polygon(quad, color, Stroke::NONE));
            }
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for ((value, _), share) in counts.iter().zip(&shares) {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(colors.color_for(value)));
                    ui.label(format!("{value}  {share:.1}%"));
                });
            }
        });
    });
}

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + Vec2::angled(angle) * radius
}

/// Stand-in for a choropleth: one bar per country, coloured low → high.
fn country_chart(ui: &mut Ui, rows: &[(FieldValue, f64)]) {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

    let lo = sorted.first().map_or(0.0, |r| r.1);
    let hi = sorted.last().map_or(0.0, |r| r.1);
    let span = hi - lo;

    let labels: Vec<String> = sorted.iter().map(|(k, _)| k.to_string()).collect();
    let bars: Vec<Bar> = sorted
        .iter()
        .enumerate()
        .map(|(i, (country, mean))| {
            let t = if span > 0.0 { (mean - lo) / span } else { 1.0 };
            Bar::new(i as f64, *mean)
                .name(format!("{country}: {}", format_usd(*mean)))
                .width(0.7)
                .fill(red_yellow_green(t))
        })
        .collect();

    Plot::new("focus_by_country")
        .height(CHART_HEIGHT)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_label("Mean salary (USD)")
        .y_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

fn trend_chart(ui: &mut Ui, rows: &[(FieldValue, FieldValue, f64)], colors: &ColorMap) {
    // (year, seniority, mean) → one series per seniority
    let mut series: BTreeMap<&FieldValue, Vec<[f64; 2]>> = BTreeMap::new();
    for (year, seniority, mean) in rows {
        if let Some(x) = year.as_f64() {
            series.entry(seniority).or_default().push([x, *mean]);
        }
    }

    Plot::new("seniority_trend")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_label("Year")
        .y_axis_label("Salary (USD)")
        .x_axis_formatter(|mark, _range| {
            if mark.value.fract() == 0.0 {
                format!("{:.0}", mark.value)
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            for (seniority, points) in series {
                let color = colors.color_for(seniority);
                let name = seniority.to_string();
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(&name)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(Points::new(points).name(&name).color(color).radius(3.5));
            }
        });
}

fn contract_box_chart(ui: &mut Ui, rows: &[(FieldValue, BoxSummary)], colors: &ColorMap) {
    let labels: Vec<String> = rows.iter().map(|(k, _)| k.to_string()).collect();
    let boxes: Vec<BoxElem> = rows
        .iter()
        .enumerate()
        .map(|(i, (contract, s))| {
            let color = colors.color_for(contract);
            BoxElem::new(i as f64, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
                .name(contract)
                .box_width(0.6)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color))
        })
        .collect();

    Plot::new("contract_distribution")
        .height(CHART_HEIGHT)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .y_axis_label("Salary (USD)")
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes));
        });
}

/// Axis labels for charts whose categories sit at 0, 1, 2, ...
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| category_label(&labels, mark.value)
}

fn category_label(labels: &[String], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_whole_positions() {
        let labels = vec!["Contract".to_string(), "Full-time".to_string()];
        assert_eq!(category_label(&labels, 0.0), "Contract");
        assert_eq!(category_label(&labels, 1.0), "Full-time");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 2.0), "");
    }

    #[test]
    fn polar_points_lie_on_the_circle() {
        let c = Pos2::new(10.0, 10.0);
        let p = polar(c, 5.0, 0.0);
        assert!((p.x - 15.0).abs() < 1e-4 && (p.y - 10.0).abs() < 1e-4);
        let top = polar(c, 5.0, -FRAC_PI_2);
        assert!((top.y - 5.0).abs() < 1e-4);
    }
}
