use super::model::{DrugDataset, DrugRecord};

// ---------------------------------------------------------------------------
// Categorical selectors
// ---------------------------------------------------------------------------

/// Therapeutic class selector: everything, or one exact class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClassFilter {
    #[default]
    All,
    Only(String),
}

impl ClassFilter {
    pub fn matches(&self, class: &str) -> bool {
        match self {
            ClassFilter::All => true,
            ClassFilter::Only(selected) => selected == class,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ClassFilter::All => "All Classes",
            ClassFilter::Only(class) => class,
        }
    }
}

/// Therapeutic-equivalence rating bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeBucket {
    #[default]
    All,
    /// Code is `AB` or `AB1`.
    AbRated,
    /// Code is missing or `NA`.
    NoRating,
}

impl TeBucket {
    pub const CHOICES: [TeBucket; 3] = [TeBucket::All, TeBucket::AbRated, TeBucket::NoRating];

    pub fn label(self) -> &'static str {
        match self {
            TeBucket::All => "All TE Codes",
            TeBucket::AbRated => "AB Rated",
            TeBucket::NoRating => "No TE Rating",
        }
    }

    pub fn matches(self, code: Option<&str>) -> bool {
        match self {
            TeBucket::All => true,
            TeBucket::AbRated => matches!(code, Some("AB") | Some("AB1")),
            TeBucket::NoRating => matches!(code, None | Some("NA")),
        }
    }
}

// ---------------------------------------------------------------------------
// Combined criteria
// ---------------------------------------------------------------------------

/// Search term plus the two selectors. The default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub class: ClassFilter,
    pub te: TeBucket,
}

impl FilterCriteria {
    pub fn is_identity(&self) -> bool {
        self.search.is_empty() && self.class == ClassFilter::All && self.te == TeBucket::All
    }

    fn matches_with_needle(&self, drug: &DrugRecord, needle: &str) -> bool {
        matches_search(drug, needle)
            && self.class.matches(&drug.therapeutic_class)
            && self.te.matches(drug.te_code())
    }
}

/// Case-insensitive containment in any of the searchable fields.
/// `needle` must already be lower-cased.
fn matches_search(drug: &DrugRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        drug.drug_name.as_str(),
        drug.generic_name.as_str(),
        drug.ndc.as_str(),
        drug.atc_code.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Return indices of records that pass all criteria, in dataset order.
pub fn filtered_indices(dataset: &DrugDataset, criteria: &FilterCriteria) -> Vec<usize> {
    if criteria.is_identity() {
        return (0..dataset.len()).collect();
    }
    let needle = criteria.search.to_lowercase();
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, drug)| criteria.matches_with_needle(drug, &needle))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mock;

    fn dataset() -> DrugDataset {
        DrugDataset::from_records(mock::drug_details())
    }

    fn select(ds: &DrugDataset, criteria: &FilterCriteria) -> Vec<DrugRecord> {
        filtered_indices(ds, criteria)
            .into_iter()
            .map(|i| ds.records()[i].clone())
            .collect()
    }

    #[test]
    fn identity_criteria_keep_everything_in_order() {
        let ds = dataset();
        let out = select(&ds, &FilterCriteria::default());
        assert_eq!(out, ds.records());
    }

    #[test]
    fn empty_dataset_yields_nothing() {
        let ds = DrugDataset::default();
        let criteria = FilterCriteria {
            search: "lipitor".into(),
            ..Default::default()
        };
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_all_fields() {
        let ds = dataset();
        let criteria = FilterCriteria {
            search: "LIPITOR".into(),
            ..Default::default()
        };
        let hits = filtered_indices(&ds, &criteria);
        assert!(!hits.is_empty());
        for (i, drug) in ds.records().iter().enumerate() {
            let expected = [&drug.drug_name, &drug.generic_name, &drug.ndc, &drug.atc_code]
                .iter()
                .any(|f| f.to_lowercase().contains("lipitor"));
            assert_eq!(hits.contains(&i), expected, "record {}", drug.ndc);
        }
    }

    #[test]
    fn search_matches_ndc_and_atc_code() {
        let ds = dataset();
        let by_ndc = FilterCriteria {
            search: "0071-0155".into(),
            ..Default::default()
        };
        assert_eq!(select(&ds, &by_ndc).len(), 1);

        let by_atc = FilterCriteria {
            search: "c10aa".into(),
            ..Default::default()
        };
        let statins = select(&ds, &by_atc);
        assert!(statins.len() >= 2);
        assert!(statins.iter().all(|d| d.atc_code.starts_with("C10AA")));
    }

    #[test]
    fn class_filter_is_exact() {
        let ds = dataset();
        let criteria = FilterCriteria {
            class: ClassFilter::Only("Statins".into()),
            ..Default::default()
        };
        let out = select(&ds, &criteria);
        assert!(!out.is_empty());
        assert!(out.iter().all(|d| d.therapeutic_class == "Statins"));

        let partial = FilterCriteria {
            class: ClassFilter::Only("Statin".into()),
            ..Default::default()
        };
        assert!(select(&ds, &partial).is_empty());
    }

    #[test]
    fn te_buckets() {
        let ds = dataset();
        let ab = FilterCriteria {
            te: TeBucket::AbRated,
            ..Default::default()
        };
        let rated = select(&ds, &ab);
        assert!(!rated.is_empty());
        assert!(rated.iter().all(|d| matches!(d.te_code(), Some("AB") | Some("AB1"))));

        let none = FilterCriteria {
            te: TeBucket::NoRating,
            ..Default::default()
        };
        let unrated = select(&ds, &none);
        assert!(!unrated.is_empty());
        assert!(unrated.iter().all(|d| matches!(d.te_code(), None | Some("NA"))));
    }

    #[test]
    fn conditions_combine_with_and() {
        let ds = dataset();
        let criteria = FilterCriteria {
            search: "atorvastatin".into(),
            class: ClassFilter::Only("Statins".into()),
            te: TeBucket::NoRating,
        };
        for drug in select(&ds, &criteria) {
            assert_eq!(drug.therapeutic_class, "Statins");
            assert!(matches!(drug.te_code(), None | Some("NA")));
            assert!(
                drug.drug_name.to_lowercase().contains("atorvastatin")
                    || drug.generic_name.to_lowercase().contains("atorvastatin")
            );
        }
    }

    #[test]
    fn other_te_codes_only_pass_all() {
        assert!(TeBucket::All.matches(Some("BX")));
        assert!(!TeBucket::AbRated.matches(Some("BX")));
        assert!(!TeBucket::NoRating.matches(Some("BX")));
        assert!(!TeBucket::AbRated.matches(Some("AB2")));
    }
}
