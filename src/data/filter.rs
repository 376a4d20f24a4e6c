use super::model::{Dataset, Dimension, Record};
use super::selection::Selection;

// ---------------------------------------------------------------------------
// FilteredView – the records passing the current selection
// ---------------------------------------------------------------------------

/// Borrowed view over the dataset rows that pass a selection, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record.
    pub fn all(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Dataset row indices of the kept records.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.indices.iter().filter_map(move |&i| dataset.get(i))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Whether `record` passes every dimension of `selection`.
///
/// A record passes a dimension when its value is in that dimension's active
/// subset; an empty subset therefore rejects everything.
pub fn matches(record: &Record, selection: &Selection) -> bool {
    Dimension::ALL.iter().all(|&dim| {
        selection
            .active_subset(dim)
            .contains(&record.value(dim.field()))
    })
}

/// Apply `selection` to `dataset`.
pub fn filter<'a>(dataset: &'a Dataset, selection: &Selection) -> FilteredView<'a> {
    let indices = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| matches(record, selection))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{record, two_rows};
    use crate::data::model::FieldValue;

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record(2020, "Junior", "Full-time", "S", "Analyst", "Remote", "BRA", 40000.0),
            record(2021, "Senior", "Full-time", "M", "Data Scientist", "Hybrid", "USA", 150000.0),
            record(2022, "Mid", "Contract", "L", "Data Engineer", "On-site", "GBR", 90000.0),
            record(2022, "Senior", "Part-time", "M", "Data Scientist", "Remote", "DEU", 80000.0),
            record(2023, "Executive", "Full-time", "L", "Director", "Remote", "USA", 250000.0),
            record(2023, "Junior", "Freelance", "S", "Analyst", "Hybrid", "IND", 15000.0),
        ])
    }

    #[test]
    fn full_selection_is_identity() {
        let ds = sample();
        let sel = Selection::all(ds.options());
        let view = filter(&ds, &sel);
        assert_eq!(view.len(), ds.len());
        assert!(view.iter().eq(ds.records().iter()));
    }

    #[test]
    fn single_year_example() {
        let ds = two_rows();
        let mut sel = Selection::all(ds.options());
        sel.toggle(Dimension::Year, &FieldValue::Integer(2022), false).unwrap();

        let view = filter(&ds, &sel);
        assert_eq!(view.len(), 1);
        assert_eq!(view.iter().next().unwrap().job_title, "Data Scientist");
        assert_eq!(view.indices(), &[0]);
    }

    #[test]
    fn kept_rows_pass_and_dropped_rows_fail() {
        let ds = sample();
        let mut sel = Selection::all(ds.options());
        sel.toggle(Dimension::Seniority, &"Junior".into(), false).unwrap();
        sel.toggle(Dimension::CompanySize, &"L".into(), false).unwrap();
        sel.toggle(Dimension::Year, &FieldValue::Integer(2020), false).unwrap();

        let view = filter(&ds, &sel);
        let kept: Vec<usize> = view.indices().to_vec();
        assert_eq!(kept, vec![1, 3]);

        for (i, r) in ds.records().iter().enumerate() {
            let in_all = Dimension::ALL
                .iter()
                .all(|&d| sel.is_active(d, &r.value(d.field())));
            assert_eq!(in_all, kept.contains(&i), "row {i}");
        }
    }

    #[test]
    fn empty_dimension_empties_view() {
        let ds = sample();
        let mut sel = Selection::all(ds.options());
        sel.select_none(Dimension::ContractType);
        let view = filter(&ds, &sel);
        assert!(view.is_empty());
        assert_eq!(view.iter().count(), 0);
    }

    #[test]
    fn filtering_is_deterministic_and_ordered() {
        let ds = sample();
        let mut sel = Selection::all(ds.options());
        sel.toggle(Dimension::ContractType, &"Full-time".into(), false).unwrap();

        let first = filter(&ds, &sel);
        let second = filter(&ds, &sel);
        assert_eq!(first.indices(), second.indices());
        assert!(first.indices().windows(2).all(|w| w[0] < w[1]));
    }
}
