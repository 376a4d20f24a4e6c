//! Chart-ready aggregations over a [`FilteredView`].
//!
//! Every function here is total: an empty view yields zeroed KPIs or an empty
//! table, never a panic. Value fields must be numeric (`salary_usd`, `year`);
//! records contribute nothing when asked for a text column's value.

use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::model::{Field, FieldValue, Record};

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Headline salary figures. `Default` is the empty-view sentinel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Kpis {
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub count: usize,
    /// Most frequent job title; ties go to the lowest-sorting title.
    pub top_job_title: String,
}

pub fn kpis(view: &FilteredView<'_>) -> Kpis {
    let salaries = values(view.iter(), Field::SalaryUsd);
    if salaries.is_empty() {
        return Kpis::default();
    }
    let mut sorted = salaries;
    sorted.sort_by(f64::total_cmp);

    Kpis {
        mean: mean(&sorted),
        median: quantile(&sorted, 0.5),
        max: sorted[sorted.len() - 1],
        count: view.len(),
        top_job_title: mode(view.iter().map(|r| r.job_title.as_str()))
            .unwrap_or_default()
            .to_string(),
    }
}

/// Most frequent item. Candidates are scanned in sorted order and only a
/// strictly higher count replaces the current best.
fn mode<'a>(items: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(item).or_default() += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for (item, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((item, count));
        }
    }
    best.map(|(item, _)| item)
}

// ---------------------------------------------------------------------------
// Grouped aggregations
// ---------------------------------------------------------------------------

/// Mean of `value_field` per `group_field`, keeping the `n` highest means.
///
/// The result is ordered ascending by mean when `ascending` is set (suits a
/// horizontal bar chart that grows upwards), descending otherwise.
pub fn top_n_by_mean(
    view: &FilteredView<'_>,
    group_field: Field,
    value_field: Field,
    n: usize,
    ascending: bool,
) -> Vec<(FieldValue, f64)> {
    let mut means: Vec<(FieldValue, f64)> =
        grouped(view.iter(), |r| r.value(group_field), value_field)
            .into_iter()
            .map(|(key, vals)| (key, mean(&vals)))
            .collect();
    // Stable sort: equal means stay in key order.
    means.sort_by(|a, b| b.1.total_cmp(&a.1));
    means.truncate(n);
    if ascending {
        means.reverse();
    }
    means
}

/// One equal-width histogram bucket. `upper` is exclusive except for the last bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Split the value range of `field` into `bucket_count` equal-width buckets.
///
/// A degenerate range (all values equal) is widened to `v ± 0.5`.
pub fn histogram(view: &FilteredView<'_>, field: Field, bucket_count: usize) -> Vec<HistogramBin> {
    let vals = values(view.iter(), field);
    if vals.is_empty() || bucket_count == 0 {
        return Vec::new();
    }

    let mut lo = vals.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bucket_count as f64;

    let mut counts = vec![0usize; bucket_count];
    for v in vals {
        let idx = (((v - lo) / width) as usize).min(bucket_count - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + i as f64 * width,
            upper: if i + 1 == bucket_count {
                hi
            } else {
                lo + (i + 1) as f64 * width
            },
            count,
        })
        .collect()
}

/// Records per distinct value of `field`, most frequent first (ties by key).
pub fn category_counts(view: &FilteredView<'_>, field: Field) -> Vec<(FieldValue, usize)> {
    let mut counts: BTreeMap<FieldValue, usize> = BTreeMap::new();
    for r in view.iter() {
        *counts.entry(r.value(field)).or_default() += 1;
    }
    let mut out: Vec<(FieldValue, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Secondary `field == value` filter layered on top of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualityFilter {
    pub field: Field,
    pub value: FieldValue,
}

impl EqualityFilter {
    pub fn new(field: Field, value: impl Into<FieldValue>) -> Self {
        EqualityFilter {
            field,
            value: value.into(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.has_value(self.field, &self.value)
    }
}

/// Mean of `value_field` per `group_field` (typically the residence country)
/// over the records that also pass `filter`, ordered by key.
pub fn mean_by_group_geo(
    view: &FilteredView<'_>,
    filter: &EqualityFilter,
    group_field: Field,
    value_field: Field,
) -> Vec<(FieldValue, f64)> {
    grouped(
        view.iter().filter(|r| filter.matches(r)),
        |r| r.value(group_field),
        value_field,
    )
    .into_iter()
    .map(|(key, vals)| (key, mean(&vals)))
    .collect()
}

/// Mean of `value_field` for every `(a, b)` combination present, ordered by `(a, b)`.
pub fn mean_by_two_groups(
    view: &FilteredView<'_>,
    group_field_a: Field,
    group_field_b: Field,
    value_field: Field,
) -> Vec<(FieldValue, FieldValue, f64)> {
    grouped(
        view.iter(),
        |r| (r.value(group_field_a), r.value(group_field_b)),
        value_field,
    )
    .into_iter()
    .map(|((a, b), vals)| (a, b, mean(&vals)))
    .collect()
}

/// Five-number summary for box plots.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub count: usize,
}

impl BoxSummary {
    /// `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(BoxSummary {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
            count: sorted.len(),
        })
    }
}

/// Distribution of `value_field` per `group_field`, ordered by key.
pub fn distribution_by_group(
    view: &FilteredView<'_>,
    group_field: Field,
    value_field: Field,
) -> Vec<(FieldValue, BoxSummary)> {
    grouped(view.iter(), |r| r.value(group_field), value_field)
        .into_iter()
        .filter_map(|(key, vals)| BoxSummary::from_values(&vals).map(|s| (key, s)))
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn values<'a>(records: impl Iterator<Item = &'a Record>, field: Field) -> Vec<f64> {
    records.filter_map(|r| r.number(field)).collect()
}

fn grouped<'a, K: Ord>(
    records: impl Iterator<Item = &'a Record>,
    key: impl Fn(&Record) -> K,
    value_field: Field,
) -> BTreeMap<K, Vec<f64>> {
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for r in records {
        if let Some(v) = r.number(value_field) {
            groups.entry(key(r)).or_default().push(v);
        }
    }
    groups
}

fn mean(v: &[f64]) -> f64 {
    if v.is_empty() {
        0.0
    } else {
        v.iter().sum::<f64>() / v.len() as f64
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter;
    use crate::data::model::tests::{record, two_rows};
    use crate::data::model::{Dataset, Dimension};
    use crate::data::selection::Selection;

    fn salaries() -> Dataset {
        Dataset::from_records(vec![
            record(2021, "Senior", "Full-time", "M", "Data Scientist", "Remote", "USA", 150000.0),
            record(2021, "Junior", "Full-time", "S", "Analyst", "On-site", "BRA", 30000.0),
            record(2022, "Senior", "Contract", "L", "Data Engineer", "Remote", "USA", 140000.0),
            record(2022, "Senior", "Full-time", "M", "Data Scientist", "Hybrid", "GBR", 100000.0),
            record(2022, "Junior", "Full-time", "M", "Analyst", "Remote", "BRA", 34000.0),
            record(2023, "Senior", "Full-time", "L", "Data Scientist", "Remote", "USA", 170000.0),
            record(2023, "Mid", "Contract", "S", "Data Engineer", "On-site", "DEU", 80000.0),
            record(2023, "Junior", "Freelance", "S", "ML Engineer", "Remote", "IND", 20000.0),
        ])
    }

    #[test]
    fn kpis_single_year_example() {
        let ds = two_rows();
        let mut sel = Selection::all(ds.options());
        sel.toggle(Dimension::Year, &FieldValue::Integer(2022), false).unwrap();
        let view = filter(&ds, &sel);

        let k = kpis(&view);
        assert_eq!(k.mean, 120000.0);
        assert_eq!(k.median, 120000.0);
        assert_eq!(k.max, 120000.0);
        assert_eq!(k.count, 1);
        assert_eq!(k.top_job_title, "Data Scientist");
    }

    #[test]
    fn kpis_empty_view_uses_sentinels() {
        let ds = two_rows();
        let mut sel = Selection::all(ds.options());
        sel.select_none(Dimension::Seniority);
        let view = filter(&ds, &sel);

        let k = kpis(&view);
        assert_eq!(k, Kpis::default());
        assert_eq!(k.mean, 0.0);
        assert_eq!(k.count, 0);
        assert_eq!(k.top_job_title, "");
    }

    #[test]
    fn kpis_over_full_view() {
        let ds = salaries();
        let k = kpis(&FilteredView::all(&ds));
        assert_eq!(k.count, 8);
        assert_eq!(k.max, 170000.0);
        assert_eq!(k.mean, 724000.0 / 8.0);
        // sorted: 20k 30k 34k 80k 100k 140k 150k 170k
        assert_eq!(k.median, 90000.0);
        assert_eq!(k.top_job_title, "Data Scientist");
    }

    #[test]
    fn mode_ties_pick_lowest_title() {
        let ds = two_rows();
        let k = kpis(&FilteredView::all(&ds));
        // "Analyst" and "Data Scientist" appear once each.
        assert_eq!(k.top_job_title, "Analyst");
        assert_eq!(mode(["b", "c", "a", "c", "a"].into_iter()), Some("a"));
        assert_eq!(mode(std::iter::empty()), None);
    }

    #[test]
    fn top_n_is_bounded_and_monotonic() {
        let ds = salaries();
        let view = FilteredView::all(&ds);

        let asc = top_n_by_mean(&view, Field::JobTitle, Field::SalaryUsd, 3, true);
        assert_eq!(asc.len(), 3);
        assert!(asc.windows(2).all(|w| w[0].1 <= w[1].1));
        assert_eq!(asc.last().unwrap().0, FieldValue::from("Data Scientist"));
        // ML Engineer (20k) drops out.
        assert_eq!(asc[0], (FieldValue::from("Analyst"), 32000.0));
        assert_eq!(asc[1], (FieldValue::from("Data Engineer"), 110000.0));

        let desc = top_n_by_mean(&view, Field::JobTitle, Field::SalaryUsd, 10, false);
        assert_eq!(desc.len(), 4);
        assert!(desc.windows(2).all(|w| w[0].1 >= w[1].1));

        assert!(top_n_by_mean(&view, Field::JobTitle, Field::SalaryUsd, 0, true).is_empty());
    }

    #[test]
    fn top_n_on_empty_view() {
        let ds = Dataset::default();
        let view = FilteredView::all(&ds);
        assert!(top_n_by_mean(&view, Field::JobTitle, Field::SalaryUsd, 10, true).is_empty());
    }

    #[test]
    fn histogram_counts_sum_to_rows() {
        let ds = salaries();
        let view = FilteredView::all(&ds);
        let bins = histogram(&view, Field::SalaryUsd, 5);

        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), view.len());
        assert_eq!(bins[0].lower, 20000.0);
        assert_eq!(bins[4].upper, 170000.0);
        assert_eq!(bins[0].width(), 30000.0);
        // 20k, 30k, 34k in the first bucket; the max lands in the last.
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[3].count, 0);
        assert_eq!(bins[4].count, 3);
    }

    #[test]
    fn histogram_degenerate_and_empty() {
        let ds = two_rows();
        let view = FilteredView::all(&ds);
        let years = histogram(&view, Field::Year, 0);
        assert!(years.is_empty());

        let single = Dataset::from_records(vec![record(
            2020, "Mid", "Full-time", "M", "Analyst", "Remote", "USA", 50000.0,
        )]);
        let bins = histogram(&FilteredView::all(&single), Field::SalaryUsd, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].lower, 49999.5);
        assert_eq!(bins[3].upper, 50000.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 1);
        assert_eq!(bins[2].count, 1);

        let empty = Dataset::default();
        assert!(histogram(&FilteredView::all(&empty), Field::SalaryUsd, 30).is_empty());
    }

    #[test]
    fn category_counts_cover_the_view() {
        let ds = salaries();
        let view = FilteredView::all(&ds);
        let counts = category_counts(&view, Field::RemoteType);

        assert_eq!(counts.iter().map(|(_, c)| c).sum::<usize>(), view.len());
        assert_eq!(counts[0], (FieldValue::from("Remote"), 5));
        assert_eq!(counts[1], (FieldValue::from("On-site"), 2));
        assert_eq!(counts[2], (FieldValue::from("Hybrid"), 1));
    }

    #[test]
    fn geo_mean_applies_secondary_filter() {
        let ds = salaries();
        let view = FilteredView::all(&ds);
        let ds_only = EqualityFilter::new(Field::JobTitle, "Data Scientist");

        let by_country = mean_by_group_geo(&view, &ds_only, Field::ResidenceCountry, Field::SalaryUsd);
        assert_eq!(
            by_country,
            vec![
                (FieldValue::from("GBR"), 100000.0),
                (FieldValue::from("USA"), 160000.0),
            ]
        );

        let nobody = EqualityFilter::new(Field::JobTitle, "Astronaut");
        assert!(mean_by_group_geo(&view, &nobody, Field::ResidenceCountry, Field::SalaryUsd).is_empty());
    }

    #[test]
    fn two_level_means() {
        let ds = salaries();
        let view = FilteredView::all(&ds);
        let trend = mean_by_two_groups(&view, Field::Year, Field::Seniority, Field::SalaryUsd);

        assert_eq!(trend.len(), 7);
        assert_eq!(
            trend[0],
            (FieldValue::Integer(2021), FieldValue::from("Junior"), 30000.0)
        );
        assert!(trend.contains(&(FieldValue::Integer(2022), FieldValue::from("Senior"), 120000.0)));
        assert!(trend.windows(2).all(|w| (&w[0].0, &w[0].1) < (&w[1].0, &w[1].1)));
    }

    #[test]
    fn distribution_quartiles() {
        let s = BoxSummary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.min, 1.0);
        assert_eq!(s.q1, 1.75);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q3, 3.25);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.count, 4);
        assert!(BoxSummary::from_values(&[]).is_none());

        let ds = salaries();
        let dist = distribution_by_group(&FilteredView::all(&ds), Field::ContractType, Field::SalaryUsd);
        let keys: Vec<String> = dist.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["Contract", "Freelance", "Full-time"]);
        assert_eq!(dist[0].1.median, 110000.0);
        assert_eq!(dist[2].1.count, 5);
    }

    #[test]
    fn text_value_field_contributes_nothing() {
        let ds = salaries();
        let view = FilteredView::all(&ds);
        assert!(top_n_by_mean(&view, Field::JobTitle, Field::Seniority, 5, true).is_empty());
        assert!(distribution_by_group(&view, Field::JobTitle, Field::RemoteType).is_empty());
    }
}
