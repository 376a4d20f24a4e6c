use std::collections::BTreeSet;

use thiserror::Error;

use super::model::{Dimension, FieldValue};
use super::registry::OptionSets;

/// A selection referenced a value the dimension does not offer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error("'{value}' is not an option of {dimension}")]
    UnknownValue {
        dimension: Dimension,
        value: FieldValue,
    },
}

// ---------------------------------------------------------------------------
// Selection – which options are checked per dimension
// ---------------------------------------------------------------------------

/// Per-dimension set of active values. Always a subset of the option sets it
/// was built from; an empty subset is valid and filters out every record.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    options: OptionSets,
    active: [BTreeSet<FieldValue>; 4],
}

impl Selection {
    /// Everything selected (show every record).
    pub fn all(options: &OptionSets) -> Self {
        Selection {
            options: options.clone(),
            active: Dimension::ALL.map(|dim| options.get(dim).clone()),
        }
    }

    /// Check or uncheck a single value.
    pub fn toggle(
        &mut self,
        dimension: Dimension,
        value: &FieldValue,
        active: bool,
    ) -> Result<(), SelectionError> {
        if !self.options.contains(dimension, value) {
            return Err(SelectionError::UnknownValue {
                dimension,
                value: value.clone(),
            });
        }
        let subset = &mut self.active[dimension.index()];
        if active {
            subset.insert(value.clone());
        } else {
            subset.remove(value);
        }
        Ok(())
    }

    pub fn select_all(&mut self, dimension: Dimension) {
        self.active[dimension.index()] = self.options.get(dimension).clone();
    }

    pub fn select_none(&mut self, dimension: Dimension) {
        self.active[dimension.index()].clear();
    }

    /// Back to the startup default.
    pub fn reset(&mut self) {
        for dim in Dimension::ALL {
            self.select_all(dim);
        }
    }

    pub fn active_subset(&self, dimension: Dimension) -> &BTreeSet<FieldValue> {
        &self.active[dimension.index()]
    }

    pub fn is_active(&self, dimension: Dimension, value: &FieldValue) -> bool {
        self.active_subset(dimension).contains(value)
    }

    pub fn options(&self) -> &OptionSets {
        &self.options
    }

    /// True when every dimension has all of its options checked.
    pub fn is_unfiltered(&self) -> bool {
        Dimension::ALL
            .iter()
            .all(|&dim| self.active_subset(dim).len() == self.options.get(dim).len())
    }
}
