use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::format;

// ---------------------------------------------------------------------------
// Amount – a numeric cell that may arrive pre-formatted as text
// ---------------------------------------------------------------------------

/// A cost or count value as delivered by the data source.
///
/// Mock data and some exports carry display strings such as `"$1,200"` or
/// `"1,800"`; the backend and Parquet files carry plain numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Interpret the value as a currency amount.
    ///
    /// Text has whitespace and grouping commas removed, then any currency
    /// symbol or code before or after the number (`$`, `€`, `USD`) trimmed.
    pub fn as_cost(&self) -> Option<f64> {
        match self {
            Amount::Number(v) => Some(*v).filter(|v| v.is_finite()),
            Amount::Text(s) => {
                let cleaned: String = s
                    .chars()
                    .filter(|c| *c != ',' && !c.is_whitespace())
                    .collect();
                cleaned
                    .trim_matches(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
            }
        }
    }

    /// Interpret the value as a whole count. Fractions truncate toward zero;
    /// values outside the `i64` range are not a count.
    pub fn as_count(&self) -> Option<i64> {
        match self {
            Amount::Number(v) => whole(*v),
            Amount::Text(s) => {
                let cleaned: String = s
                    .chars()
                    .filter(|c| *c != ',' && !c.is_whitespace())
                    .collect();
                cleaned
                    .parse::<i64>()
                    .ok()
                    .or_else(|| cleaned.parse::<f64>().ok().and_then(whole))
            }
        }
    }

    /// Display as a dollar figure. Text is shown as delivered.
    pub fn display_currency(&self) -> String {
        match self {
            Amount::Number(v) => format::format_dollars(*v),
            Amount::Text(s) => s.clone(),
        }
    }

    /// Display as a grouped count. Text is shown as delivered.
    pub fn display_count(&self) -> String {
        match self {
            Amount::Number(v) => format::format_number(*v),
            Amount::Text(s) => s.clone(),
        }
    }
}

fn whole(v: f64) -> Option<i64> {
    // 2^63 itself is out of range, hence the strict upper bound.
    let t = v.trunc();
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

impl From<f64> for Amount {
    fn from(v: f64) -> Self {
        Amount::Number(v)
    }
}

impl From<&str> for Amount {
    fn from(s: &str) -> Self {
        Amount::Text(s.to_string())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(v) => write!(f, "{v}"),
            Amount::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// DrugRecord – one row of the drug dataset
// ---------------------------------------------------------------------------

/// A single drug product with its utilisation and cost figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrugRecord {
    /// National Drug Code; unique within a dataset.
    #[serde(deserialize_with = "string_or_number")]
    pub ndc: String,
    pub drug_name: String,
    pub generic_name: String,
    pub therapeutic_class: String,
    /// Anatomical Therapeutic Chemical code, empty when unknown.
    pub atc_code: String,
    pub therapeutic_equivalence_code: Option<String>,
    pub total_drug_cost: Option<Amount>,
    pub member_count: Option<Amount>,
    pub avg_age: Option<f64>,
    pub state: String,
    pub pmpm_cost: Option<Amount>,
}

/// Accept identifiers that a dataframe export turned into numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
        Null(()),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Integer(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
        Raw::Null(()) => String::new(),
    })
}

impl DrugRecord {
    /// TE code, treating an empty string as absent.
    pub fn te_code(&self) -> Option<&str> {
        self.therapeutic_equivalence_code
            .as_deref()
            .filter(|code| !code.is_empty())
    }

    pub fn pmpm(&self) -> Option<f64> {
        self.pmpm_cost.as_ref().and_then(Amount::as_cost)
    }
}

// ---------------------------------------------------------------------------
// DrugDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded records with option sets pre-computed for the filter widgets.
#[derive(Debug, Clone, Default)]
pub struct DrugDataset {
    records: Vec<DrugRecord>,
    therapeutic_classes: Vec<String>,
    states: Vec<String>,
}

impl DrugDataset {
    /// Build the dataset and its option sets.
    ///
    /// The first record wins when an NDC appears more than once.
    pub fn from_records(records: Vec<DrugRecord>) -> Self {
        let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.ndc.clone()) {
                kept.push(record);
            } else {
                log::warn!(
                    "Dropping duplicate NDC {} ({})",
                    record.ndc,
                    record.drug_name
                );
            }
        }

        let therapeutic_classes: BTreeSet<String> = kept
            .iter()
            .map(|r| r.therapeutic_class.clone())
            .collect();
        let states: BTreeSet<String> = kept
            .iter()
            .filter(|r| !r.state.is_empty())
            .map(|r| r.state.clone())
            .collect();

        DrugDataset {
            records: kept,
            therapeutic_classes: therapeutic_classes.into_iter().collect(),
            states: states.into_iter().collect(),
        }
    }

    pub fn records(&self) -> &[DrugRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&DrugRecord> {
        self.records.get(index)
    }

    /// Distinct therapeutic classes, sorted lexicographically.
    pub fn therapeutic_classes(&self) -> &[String] {
        &self.therapeutic_classes
    }

    /// Distinct non-empty states, sorted lexicographically.
    pub fn states(&self) -> &[String] {
        &self.states
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
mod tests {
    use super::*;

    fn record(ndc: &str, class: &str) -> DrugRecord {
        DrugRecord {
            ndc: ndc.to_string(),
            drug_name: format!("DRUG {ndc}"),
            therapeutic_class: class.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn cost_text_is_normalised() {
        assert_eq!(Amount::from("$1,200").as_cost(), Some(1200.0));
        assert_eq!(Amount::from(" $12,345.67 ").as_cost(), Some(12345.67));
        assert_eq!(Amount::from(1800.0).as_cost(), Some(1800.0));
        assert_eq!(Amount::from("n/a").as_cost(), None);
        assert_eq!(Amount::from("").as_cost(), None);
    }

    #[test]
    fn cost_text_drops_any_currency_marker() {
        assert_eq!(Amount::from("€1,200").as_cost(), Some(1200.0));
        assert_eq!(Amount::from("USD 1,200.50").as_cost(), Some(1200.5));
        assert_eq!(Amount::from("1,200 EUR").as_cost(), Some(1200.0));
        assert_eq!(Amount::from("12abc34").as_cost(), None);
    }

    #[test]
    fn count_text_is_normalised() {
        assert_eq!(Amount::from("1,800").as_count(), Some(1800));
        assert_eq!(Amount::from("12.7").as_count(), Some(12));
        assert_eq!(Amount::from(42.9).as_count(), Some(42));
        assert_eq!(Amount::from("many").as_count(), None);
    }

    #[test]
    fn counts_beyond_i64_are_rejected() {
        assert_eq!(Amount::from("1e20").as_count(), None);
        assert_eq!(Amount::from(-1e20).as_count(), None);
        assert_eq!(Amount::from("9e18").as_count(), Some(9_000_000_000_000_000_000));
    }

    #[test]
    fn text_amounts_display_verbatim() {
        assert_eq!(Amount::from("$1,200").display_currency(), "$1,200");
        assert_eq!(Amount::from(1200.0).display_currency(), "$1,200");
        assert_eq!(Amount::from(52340.0).display_count(), "52,340");
    }

    #[test]
    fn amount_deserialises_from_number_or_string() {
        let n: Amount = serde_json::from_str("1800").unwrap();
        let t: Amount = serde_json::from_str("\"$1,200\"").unwrap();
        assert_eq!(n, Amount::Number(1800.0));
        assert_eq!(t, Amount::Text("$1,200".into()));
    }

    #[test]
    fn numeric_ndc_deserialises_as_text() {
        let r: DrugRecord = serde_json::from_str(r#"{"ndc": 5058022650, "drug_name": "X"}"#).unwrap();
        assert_eq!(r.ndc, "5058022650");
        assert_eq!(r.pmpm_cost, None);
    }

    #[test]
    fn option_sets_are_sorted_and_distinct() {
        let ds = DrugDataset::from_records(vec![
            record("3", "Statins"),
            record("1", "Anticoagulants"),
            record("2", "Statins"),
        ]);
        assert_eq!(ds.therapeutic_classes(), ["Anticoagulants", "Statins"]);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn duplicate_ndc_keeps_first() {
        let mut second = record("1", "Statins");
        second.drug_name = "SECOND".into();
        let ds = DrugDataset::from_records(vec![record("1", "Statins"), second]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].drug_name, "DRUG 1");
    }

    #[test]
    fn empty_te_code_reads_as_absent() {
        let mut r = record("1", "Statins");
        r.therapeutic_equivalence_code = Some(String::new());
        assert_eq!(r.te_code(), None);
    }
}
