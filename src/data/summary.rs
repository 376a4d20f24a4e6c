use super::aggregate::{
    category_counts, distribution_by_group, histogram, kpis, mean_by_group_geo,
    mean_by_two_groups, top_n_by_mean, BoxSummary, EqualityFilter, HistogramBin, Kpis,
};
use super::filter::FilteredView;
use super::model::{Field, FieldValue};
use crate::config::DashboardConfig;

/// Everything the dashboard draws for one selection: KPIs, six chart tables
/// and the rows for the data grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub kpis: Kpis,
    /// Mean salary of the best-paid job titles, ascending.
    pub top_job_titles: Vec<(FieldValue, f64)>,
    pub salary_histogram: Vec<HistogramBin>,
    /// Records per remote-work type, most common first.
    pub remote_counts: Vec<(FieldValue, usize)>,
    /// Mean salary per residence country for the focus job title.
    pub focus_by_country: Vec<(FieldValue, f64)>,
    /// Mean salary per (year, seniority).
    pub seniority_trend: Vec<(FieldValue, FieldValue, f64)>,
    pub contract_distribution: Vec<(FieldValue, BoxSummary)>,
    /// Dataset indices of the visible records.
    pub visible_indices: Vec<usize>,
}

impl Summary {
    pub fn compute(view: &FilteredView<'_>, config: &DashboardConfig) -> Self {
        let focus = EqualityFilter::new(Field::JobTitle, config.focus_job_title.as_str());
        Summary {
            kpis: kpis(view),
            top_job_titles: top_n_by_mean(view, Field::JobTitle, Field::SalaryUsd, config.top_n, true),
            salary_histogram: histogram(view, Field::SalaryUsd, config.histogram_bins),
            remote_counts: category_counts(view, Field::RemoteType),
            focus_by_country: mean_by_group_geo(view, &focus, Field::ResidenceCountry, Field::SalaryUsd),
            seniority_trend: mean_by_two_groups(view, Field::Year, Field::Seniority, Field::SalaryUsd),
            contract_distribution: distribution_by_group(view, Field::ContractType, Field::SalaryUsd),
            visible_indices: view.indices().to_vec(),
        }
    }

    /// The filtered view had no rows.
    pub fn is_empty(&self) -> bool {
        self.visible_indices.is_empty()
    }
}
