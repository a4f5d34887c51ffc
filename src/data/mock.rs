//! Static figures used when no backend or dataset file is available.
//!
//! All values are fictional.

use super::model::{Amount, DrugRecord};

/// Headline plan metrics for the KPI cards.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiMetrics {
    pub pmpm: f64,
    pub pmpm_trend: f64,
    pub cost_reduction_percent: f64,
    pub member_access_percent: f64,
    pub generic_fill_rate: f64,
    pub total_spend: f64,
    pub members_enrolled: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PmpmPoint {
    pub month: &'static str,
    pub pmpm: f64,
    pub target: f64,
    pub baseline: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UtilizationTrend {
    pub category: &'static str,
    pub current: f64,
    pub projected: f64,
    /// Percent change from current to projected.
    pub trend: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierShare {
    pub name: &'static str,
    /// Share of formulary in percent.
    pub value: f64,
}

/// A precomputed therapeutic-equivalence switch opportunity.
#[derive(Debug, Clone, PartialEq)]
pub struct TeRecommendation {
    pub current_ndc: &'static str,
    pub current_drug: &'static str,
    pub recommended_ndc: &'static str,
    pub recommended_drug: &'static str,
    pub potential_savings: f64,
    pub savings_per_member: f64,
    pub te_code: &'static str,
    pub confidence_score: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    pub scenario_name: &'static str,
    pub projected_savings: f64,
    pub new_pmpm: f64,
    pub access_score: f64,
    pub disruption_score: f64,
    pub affected_members: u64,
    pub roi_percentage: f64,
}

pub fn kpis() -> KpiMetrics {
    KpiMetrics {
        pmpm: 485.23,
        pmpm_trend: -2.8,
        cost_reduction_percent: 8.4,
        member_access_percent: 96.2,
        generic_fill_rate: 87.3,
        total_spend: 24_580_000.0,
        members_enrolled: 50_650,
    }
}

pub fn pmpm_trend() -> Vec<PmpmPoint> {
    [
        ("Jan", 498.23),
        ("Feb", 495.45),
        ("Mar", 492.67),
        ("Apr", 489.12),
        ("May", 487.34),
        ("Jun", 485.23),
    ]
    .into_iter()
    .map(|(month, pmpm)| PmpmPoint {
        month,
        pmpm,
        target: 485.0,
        baseline: 512.0,
    })
    .collect()
}

pub fn utilization_trends() -> Vec<UtilizationTrend> {
    vec![
        UtilizationTrend { category: "Diabetes", current: 15_680.0, projected: 16_250.0, trend: 3.6 },
        UtilizationTrend { category: "Cardiology", current: 12_450.0, projected: 12_180.0, trend: -2.2 },
        UtilizationTrend { category: "Oncology", current: 8_920.0, projected: 9_580.0, trend: 7.4 },
        UtilizationTrend { category: "Mental Health", current: 7_650.0, projected: 8_100.0, trend: 5.9 },
    ]
}

pub fn tier_distribution() -> Vec<TierShare> {
    vec![
        TierShare { name: "Preferred", value: 45.0 },
        TierShare { name: "Non-Preferred", value: 30.0 },
        TierShare { name: "Specialty", value: 20.0 },
        TierShare { name: "Excluded", value: 5.0 },
    ]
}

pub fn te_recommendations() -> Vec<TeRecommendation> {
    vec![
        TeRecommendation {
            current_ndc: "50580-226-50",
            current_drug: "Lipitor 40mg Tablets",
            recommended_ndc: "00093-1712-01",
            recommended_drug: "Atorvastatin 40mg Tablets",
            potential_savings: 125_000.0,
            savings_per_member: 28.50,
            te_code: "AB",
            confidence_score: 95,
        },
        TeRecommendation {
            current_ndc: "00002-3004-75",
            current_drug: "Humalog 100 Units/mL",
            recommended_ndc: "00169-7501-11",
            recommended_drug: "Novolog 100 Units/mL",
            potential_savings: 89_500.0,
            savings_per_member: 45.25,
            te_code: "AB",
            confidence_score: 88,
        },
    ]
}

pub fn scenario_results() -> Vec<ScenarioResult> {
    vec![
        ScenarioResult {
            scenario_name: "Brand to Generic Initiative Q1",
            projected_savings: 2_450_000.0,
            new_pmpm: 436.78,
            access_score: 96.8,
            disruption_score: 8.2,
            affected_members: 4_150,
            roi_percentage: 18.5,
        },
        ScenarioResult {
            scenario_name: "Tier Optimization - Diabetes",
            projected_savings: 1_875_000.0,
            new_pmpm: 458.90,
            access_score: 95.4,
            disruption_score: 12.1,
            affected_members: 6_230,
            roi_percentage: 14.2,
        },
    ]
}

/// Drug detail rows for the database page. Some cost and member figures are
/// pre-formatted strings, as they arrive from spreadsheet exports.
pub fn drug_details() -> Vec<DrugRecord> {
    #[allow(clippy::type_complexity)]
    let rows: [(&str, &str, &str, &str, &str, Option<&str>, Amount, Amount, f64, &str, Amount); 11] = [
        ("0071-0155-23", "Lipitor 40mg Tablets", "Atorvastatin Calcium", "Statins", "C10AA05", Some("AB"),
            "$1,245,600".into(), "2,340".into(), 62.4, "CA", "$45.20".into()),
        ("00093-1712-01", "Atorvastatin 40mg Tablets", "Atorvastatin Calcium", "Statins", "C10AA05", Some("AB"),
            385_000.0.into(), 4_120.0.into(), 58.9, "TX", 7.85.into()),
        ("00310-0755-90", "Crestor 10mg Tablets", "Rosuvastatin Calcium", "Statins", "C10AA07", Some("AB1"),
            "$892,300".into(), 1_875.0.into(), 64.1, "NY", "$39.60".into()),
        ("00006-0749-54", "Zocor 20mg Tablets", "Simvastatin", "Statins", "C10AA01", Some("NA"),
            96_400.0.into(), "980".into(), 67.3, "FL", 8.20.into()),
        ("31722-665-30", "Metformin 500mg Tablets", "Metformin Hydrochloride", "Antidiabetics", "A10BA02", None,
            156_000.0.into(), 5_230.0.into(), 55.8, "CA", 2.50.into()),
        ("00006-0277-31", "Januvia 100mg Tablets", "Sitagliptin", "Antidiabetics", "A10BH01", Some("NA"),
            "$2,108,400".into(), "3,150".into(), 59.6, "TX", "$498.75".into()),
        ("00002-3004-75", "Humalog 100 Units/mL", "Insulin Lispro", "Insulin", "A10AB04", Some("BX"),
            3_456_000.0.into(), 2_890.0.into(), 47.2, "NY", 612.40.into()),
        ("00169-7501-11", "Novolog 100 Units/mL", "Insulin Aspart", "Insulin", "A10AB05", Some("AB"),
            2_985_000.0.into(), 2_645.0.into(), 48.9, "FL", 545.30.into()),
        ("00003-0894-21", "Eliquis 5mg Tablets", "Apixaban", "Anticoagulants", "B01AF02", Some("NA"),
            "$1,678,900".into(), "2,015".into(), 71.5, "CA", "$512.10".into()),
        ("00056-0172-70", "Coumadin 5mg Tablets", "Warfarin Sodium", "Anticoagulants", "B01AA03", Some("AB"),
            45_600.0.into(), 1_210.0.into(), 73.8, "NY", 4.10.into()),
        ("68180-0513-01", "Lisinopril 10mg Tablets", "Lisinopril", "ACE Inhibitors", "C09AA03", Some("AB"),
            38_900.0.into(), 6_120.0.into(), 61.2, "TX", 1.85.into()),
    ];

    rows.into_iter()
        .map(
            |(ndc, name, generic, class, atc, te, cost, members, age, state, pmpm)| DrugRecord {
                ndc: ndc.to_string(),
                drug_name: name.to_string(),
                generic_name: generic.to_string(),
                therapeutic_class: class.to_string(),
                atc_code: atc.to_string(),
                therapeutic_equivalence_code: te.map(str::to_string),
                total_drug_cost: Some(cost),
                member_count: Some(members),
                avg_age: Some(age),
                state: state.to_string(),
                pmpm_cost: Some(pmpm),
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DrugDataset;
    use crate::data::summary::SummaryAggregate;

    #[test]
    fn drug_details_have_unique_ndcs() {
        let records = drug_details();
        let ds = DrugDataset::from_records(records.clone());
        assert_eq!(ds.len(), records.len());
    }

    #[test]
    fn every_mock_amount_parses() {
        for drug in drug_details() {
            assert!(drug.total_drug_cost.as_ref().and_then(Amount::as_cost).is_some(), "{}", drug.ndc);
            assert!(drug.member_count.as_ref().and_then(Amount::as_count).is_some(), "{}", drug.ndc);
            assert!(drug.pmpm().is_some(), "{}", drug.ndc);
        }
    }

    #[test]
    fn summary_over_mock_dataset() {
        let records = drug_details();
        let s = SummaryAggregate::from_records(&records);
        assert_eq!(s.count, 11);
        assert_eq!(s.total_members, 32_575);
        assert_eq!(s.total_cost, 13_088_100.0);
    }
}
