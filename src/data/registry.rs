use std::collections::BTreeSet;

use super::model::{Dimension, Field, FieldValue, Record};

/// Sorted distinct values of `field` over `records`.
///
/// Years sort numerically, text columns lexically (see [`FieldValue`]'s `Ord`).
pub fn distinct_values<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    field: Field,
) -> BTreeSet<FieldValue> {
    records.into_iter().map(|r| r.value(field)).collect()
}

// ---------------------------------------------------------------------------
// OptionSets – selectable values per filter dimension
// ---------------------------------------------------------------------------

/// For each filter dimension, the sorted set of values present in the dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSets {
    sets: [BTreeSet<FieldValue>; 4],
}

impl OptionSets {
    pub fn from_records(records: &[Record]) -> Self {
        let sets = Dimension::ALL.map(|dim| distinct_values(records, dim.field()));
        OptionSets { sets }
    }

    pub fn get(&self, dimension: Dimension) -> &BTreeSet<FieldValue> {
        &self.sets[dimension.index()]
    }

    pub fn contains(&self, dimension: Dimension, value: &FieldValue) -> bool {
        self.get(dimension).contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &BTreeSet<FieldValue>)> {
        Dimension::ALL.into_iter().zip(self.sets.iter())
    }
}
