use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::registry::OptionSets;

// ---------------------------------------------------------------------------
// FieldValue – a single cell used as option value or group key
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Option sets and group keys live in `BTreeMap` / `BTreeSet`, so `FieldValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

// -- Manual Eq/Ord so we can put FieldValue in BTreeSet --

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use FieldValue::*;
        fn discriminant(v: &FieldValue) -> u8 {
            match v {
                Integer(_) => 0,
                Float(_) => 1,
                Text(_) => 2,
            }
        }
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for FieldValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::Integer(i) => i.hash(state),
            FieldValue::Float(f) => f.to_bits().hash(state),
            FieldValue::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v:.2}"),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl FieldValue {
    /// Numeric view of the value, used for chart axes.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Field / Dimension – column addressing
// ---------------------------------------------------------------------------

/// One column of the salary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Year,
    Seniority,
    ContractType,
    CompanySize,
    JobTitle,
    RemoteType,
    ResidenceCountry,
    SalaryUsd,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Year,
        Field::Seniority,
        Field::ContractType,
        Field::CompanySize,
        Field::JobTitle,
        Field::RemoteType,
        Field::ResidenceCountry,
        Field::SalaryUsd,
    ];

    /// Canonical column header, also used when exporting.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Seniority => "seniority",
            Field::ContractType => "contract_type",
            Field::CompanySize => "company_size",
            Field::JobTitle => "job_title",
            Field::RemoteType => "remote_type",
            Field::ResidenceCountry => "residence_country_code",
            Field::SalaryUsd => "salary_usd",
        }
    }

    /// Header used by the Portuguese source dataset. Must agree with the
    /// `serde(alias)` attributes on [`Record`].
    pub fn alias(self) -> &'static str {
        match self {
            Field::Year => "ano",
            Field::Seniority => "senioridade",
            Field::ContractType => "contrato",
            Field::CompanySize => "tamanho_empresa",
            Field::JobTitle => "cargo",
            Field::RemoteType => "remoto",
            Field::ResidenceCountry => "residencia_iso3",
            Field::SalaryUsd => "usd",
        }
    }

    pub fn matches_header(self, header: &str) -> bool {
        let header = header.trim();
        header == self.column_name() || header == self.alias()
    }

    /// Human-readable label for table headers and axes.
    pub fn label(self) -> &'static str {
        match self {
            Field::Year => "Year",
            Field::Seniority => "Seniority",
            Field::ContractType => "Contract",
            Field::CompanySize => "Company size",
            Field::JobTitle => "Job title",
            Field::RemoteType => "Work type",
            Field::ResidenceCountry => "Country",
            Field::SalaryUsd => "Salary (USD)",
        }
    }
}

/// The four categorical fields that can be filtered with checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Year,
    Seniority,
    ContractType,
    CompanySize,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Year,
        Dimension::Seniority,
        Dimension::ContractType,
        Dimension::CompanySize,
    ];

    pub fn field(self) -> Field {
        match self {
            Dimension::Year => Field::Year,
            Dimension::Seniority => Field::Seniority,
            Dimension::ContractType => Field::ContractType,
            Dimension::CompanySize => Field::CompanySize,
        }
    }

    /// Position in [`Dimension::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Year => "Years",
            Dimension::Seniority => "Seniority",
            Dimension::ContractType => "Contract",
            Dimension::CompanySize => "Company size",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the salary table
// ---------------------------------------------------------------------------

/// A single salary record. Column names accept both the canonical English
/// headers and the Portuguese ones of the source dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(alias = "ano")]
    pub year: i64,
    #[serde(alias = "senioridade")]
    pub seniority: String,
    #[serde(alias = "contrato")]
    pub contract_type: String,
    #[serde(alias = "tamanho_empresa")]
    pub company_size: String,
    #[serde(alias = "cargo")]
    pub job_title: String,
    #[serde(alias = "remoto")]
    pub remote_type: String,
    #[serde(alias = "residencia_iso3")]
    pub residence_country_code: String,
    #[serde(alias = "usd")]
    pub salary_usd: f64,
}

impl Record {
    /// The record's value for `field` as a group / option key.
    pub fn value(&self, field: Field) -> FieldValue {
        match field {
            Field::Year => FieldValue::Integer(self.year),
            Field::SalaryUsd => FieldValue::Float(self.salary_usd),
            text => FieldValue::Text(self.text(text).unwrap_or_default().to_string()),
        }
    }

    /// Borrowed text for string columns; `None` for numeric ones.
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Seniority => Some(&self.seniority),
            Field::ContractType => Some(&self.contract_type),
            Field::CompanySize => Some(&self.company_size),
            Field::JobTitle => Some(&self.job_title),
            Field::RemoteType => Some(&self.remote_type),
            Field::ResidenceCountry => Some(&self.residence_country_code),
            Field::Year | Field::SalaryUsd => None,
        }
    }

    /// Numeric value for numeric columns; `None` for text ones.
    pub fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::Year => Some(self.year as f64),
            Field::SalaryUsd => Some(self.salary_usd),
            _ => None,
        }
    }

    /// Whether the record's value on `field` equals `value`, without allocating.
    pub fn has_value(&self, field: Field, value: &FieldValue) -> bool {
        match (field, value) {
            (Field::Year, FieldValue::Integer(y)) => self.year == *y,
            (Field::SalaryUsd, FieldValue::Float(v)) => self.salary_usd.total_cmp(v).is_eq(),
            (_, FieldValue::Text(s)) => self.text(field) == Some(s.as_str()),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed option sets. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    options: OptionSets,
}

impl Dataset {
    /// Build the option sets from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let options = OptionSets::from_records(&records);
        Dataset { records, options }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct values of every filterable dimension.
    pub fn options(&self) -> &OptionSets {
        &self.options
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn record(
        year: i64,
        seniority: &str,
        contract_type: &str,
        company_size: &str,
        job_title: &str,
        remote_type: &str,
        country: &str,
        salary_usd: f64,
    ) -> Record {
        Record {
            year,
            seniority: seniority.to_string(),
            contract_type: contract_type.to_string(),
            company_size: company_size.to_string(),
            job_title: job_title.to_string(),
            remote_type: remote_type.to_string(),
            residence_country_code: country.to_string(),
            salary_usd,
        }
    }

    /// The two-row dataset used throughout the test suite.
    pub(crate) fn two_rows() -> Dataset {
        Dataset::from_records(vec![
            record(2023, "Senior", "Full-time", "M", "Data Scientist", "Remote", "USA", 120000.0),
            record(2022, "Junior", "Full-time", "S", "Analyst", "On-site", "BRA", 60000.0),
        ])
    }

    #[test]
    fn years_sort_numerically_and_text_lexically() {
        let mut values = vec![
            FieldValue::Integer(2024),
            FieldValue::Integer(999),
            FieldValue::Integer(2020),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                FieldValue::Integer(999),
                FieldValue::Integer(2020),
                FieldValue::Integer(2024)
            ]
        );

        let mut text: Vec<FieldValue> = vec!["Senior".into(), "Executive".into(), "Junior".into()];
        text.sort();
        assert_eq!(text[0], FieldValue::from("Executive"));
        assert_eq!(text[2], FieldValue::from("Senior"));
    }

    #[test]
    fn record_value_lookup() {
        let ds = two_rows();
        let r = &ds.records()[0];
        assert_eq!(r.value(Field::Year), FieldValue::Integer(2023));
        assert_eq!(r.value(Field::JobTitle), FieldValue::from("Data Scientist"));
        assert_eq!(r.number(Field::SalaryUsd), Some(120000.0));
        assert_eq!(r.number(Field::Seniority), None);
        assert!(r.has_value(Field::CompanySize, &"M".into()));
        assert!(!r.has_value(Field::CompanySize, &"S".into()));
        assert!(!r.has_value(Field::Year, &"2023".into()));
    }

    #[test]
    fn headers_match_canonical_and_alias() {
        assert!(Field::SalaryUsd.matches_header("salary_usd"));
        assert!(Field::SalaryUsd.matches_header(" usd "));
        assert!(!Field::SalaryUsd.matches_header("salario"));
        assert_eq!(Dimension::ALL[Dimension::CompanySize.index()], Dimension::CompanySize);
    }
}
