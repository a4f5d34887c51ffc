use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::{Amount, DrugDataset};

/// Age bands used by the age-distribution chart: label, exclusive lower
/// bound, inclusive upper bound.
pub const AGE_BINS: [(&str, f64, f64); 4] = [
    ("<30", 0.0, 30.0),
    ("30-50", 30.0, 50.0),
    ("50-65", 50.0, 65.0),
    ("65+", 65.0, 100.0),
];

// ---------------------------------------------------------------------------
// Dataset-wide statistics
// ---------------------------------------------------------------------------

/// Overview numbers for a whole dataset. Same shape as the backend's
/// `/api/drug-stats` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrugStats {
    pub total_drugs: u64,
    pub total_cost: f64,
    pub total_members: i64,
    pub avg_pmpm: f64,
    /// Number of distinct therapeutic classes.
    pub therapeutic_classes: u64,
    pub states_covered: u64,
    pub avg_age: f64,
    pub te_codes_distribution: BTreeMap<String, u64>,
}

impl DrugStats {
    pub fn from_dataset(dataset: &DrugDataset) -> Self {
        let records = dataset.records();

        let total_cost = records
            .iter()
            .filter_map(|r| r.total_drug_cost.as_ref().and_then(Amount::as_cost))
            .sum();
        let total_members = records
            .iter()
            .filter_map(|r| r.member_count.as_ref().and_then(Amount::as_count))
            .fold(0i64, i64::saturating_add);

        let avg_pmpm = mean(records.iter().filter_map(|r| r.pmpm()));
        let avg_age = mean(records.iter().filter_map(|r| r.avg_age));

        let mut te_codes_distribution = BTreeMap::new();
        for r in records {
            let code = r.te_code().unwrap_or("NA").to_string();
            *te_codes_distribution.entry(code).or_insert(0) += 1;
        }

        DrugStats {
            total_drugs: records.len() as u64,
            total_cost,
            total_members,
            avg_pmpm,
            therapeutic_classes: dataset.therapeutic_classes().len() as u64,
            states_covered: dataset.states().len() as u64,
            avg_age,
            te_codes_distribution,
        }
    }
}

// ---------------------------------------------------------------------------
// Cost breakdowns
// ---------------------------------------------------------------------------

/// Chart series for the cost-analysis panels. Same shape as the backend's
/// `/api/cost-analysis` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostAnalysis {
    pub cost_by_therapeutic_class: BTreeMap<String, f64>,
    pub pmpm_by_state: BTreeMap<String, f64>,
    pub age_distribution: BTreeMap<String, u64>,
}

impl CostAnalysis {
    pub fn from_dataset(dataset: &DrugDataset) -> Self {
        let mut cost_by_therapeutic_class: BTreeMap<String, f64> = BTreeMap::new();
        let mut pmpm_sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        let mut age_distribution: BTreeMap<String, u64> = AGE_BINS
            .iter()
            .map(|(label, _, _)| (label.to_string(), 0))
            .collect();

        for r in dataset.records() {
            let cost = r
                .total_drug_cost
                .as_ref()
                .and_then(Amount::as_cost)
                .unwrap_or(0.0);
            *cost_by_therapeutic_class
                .entry(r.therapeutic_class.clone())
                .or_insert(0.0) += cost;

            if let (false, Some(pmpm)) = (r.state.is_empty(), r.pmpm()) {
                let entry = pmpm_sums.entry(r.state.clone()).or_insert((0.0, 0));
                entry.0 += pmpm;
                entry.1 += 1;
            }

            if let Some(label) = r.avg_age.and_then(age_bin) {
                *age_distribution.entry(label.to_string()).or_insert(0) += 1;
            }
        }

        let pmpm_by_state = pmpm_sums
            .into_iter()
            .map(|(state, (sum, n))| (state, sum / n as f64))
            .collect();

        CostAnalysis {
            cost_by_therapeutic_class,
            pmpm_by_state,
            age_distribution,
        }
    }

    /// Age buckets in chart order rather than key order. Buckets the source
    /// did not report are returned as zero.
    pub fn age_bins_ordered(&self) -> Vec<(&'static str, u64)> {
        AGE_BINS
            .iter()
            .map(|(label, _, _)| (*label, self.age_distribution.get(*label).copied().unwrap_or(0)))
            .collect()
    }
}

/// Bucket label for an age; `None` outside (0, 100].
pub fn age_bin(age: f64) -> Option<&'static str> {
    AGE_BINS
        .iter()
        .find(|(_, lo, hi)| age > *lo && age <= *hi)
        .map(|(label, _, _)| *label)
}

// ---------------------------------------------------------------------------
// Class counts
// ---------------------------------------------------------------------------

/// Number of records in one therapeutic class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCount {
    pub name: String,
    pub count: u64,
}

/// Per-class record counts, largest first, ties by name.
pub fn class_counts(dataset: &DrugDataset) -> Vec<ClassCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for r in dataset.records() {
        *counts.entry(r.therapeutic_class.as_str()).or_insert(0) += 1;
    }
    let mut out: Vec<ClassCount> = counts
        .into_iter()
        .map(|(name, count)| ClassCount {
            name: name.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    out
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}
