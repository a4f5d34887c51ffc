use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::data::analysis::ClassCount;
use crate::data::model::DrugRecord;

/// Response body from `/api/health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub data_loaded: bool,
    pub nlp_available: bool,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Response body from `/api/drugs`. Records are cleaned by the loader.
#[derive(Debug, Deserialize)]
pub(crate) struct DrugsResponse {
    pub drugs: Vec<JsonValue>,
    #[serde(default)]
    pub total_count: u64,
}

/// Response body from `/api/therapeutic-classes`.
#[derive(Debug, Deserialize)]
pub(crate) struct ClassCountsResponse {
    pub therapeutic_classes: Vec<ClassCount>,
}

/// Request body for `/api/recommend`.
#[derive(Debug, Serialize)]
pub(crate) struct RecommendRequest<'a> {
    pub drug_names: &'a [String],
}

/// Response body from `/api/recommend`, including the "no result" shape that
/// arrives with a 200 status and an `error` field.
#[derive(Debug, Deserialize)]
pub(crate) struct RecommendResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub original_drugs: Vec<DrugRecord>,
    #[serde(default)]
    pub recommended_drugs: Vec<DrugRecord>,
    #[serde(default)]
    pub analysis: Option<RecommendationAnalysis>,
}

/// Saving analysis for a one-for-one switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleDrugAnalysis {
    pub cost_saving_per_member: f64,
    pub percentage_saving: f64,
    pub therapeutic_class_match: bool,
    pub generic_match: bool,
}

/// Saving and safety analysis for a two-drug combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationAnalysis {
    pub total_cost_saving: f64,
    pub percentage_saving: f64,
    /// 0 none, 1 low, 2 high.
    pub interaction_risk: u8,
    pub interaction_description: String,
    /// `High`, `Medium` or `Low`.
    pub safety_score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationAnalysis {
    Combination(CombinationAnalysis),
    SingleDrug(SingleDrugAnalysis),
    /// The backend sends `{}` when drug and recommendation counts differ.
    Unavailable(serde_json::Map<String, JsonValue>),
}

/// A successful recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub original_drugs: Vec<DrugRecord>,
    pub recommended_drugs: Vec<DrugRecord>,
    pub analysis: RecommendationAnalysis,
}

impl Recommendation {
    /// Percentage saving regardless of analysis shape.
    pub fn percentage_saving(&self) -> Option<f64> {
        match &self.analysis {
            RecommendationAnalysis::Combination(c) => Some(c.percentage_saving),
            RecommendationAnalysis::SingleDrug(s) => Some(s.percentage_saving),
            RecommendationAnalysis::Unavailable(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_drug_analysis() {
        let body = r#"{
            "original_drugs": [{"ndc": "1", "drug_name": "LIPITOR", "pmpm_cost": 45.2,
                                "therapeutic_equivalence_code": "AB", "avg_age": null}],
            "recommended_drugs": [{"ndc": "2", "drug_name": "ATORVASTATIN", "pmpm_cost": 7.85}],
            "analysis": {"type": "single_drug", "cost_saving_per_member": 37.35,
                         "percentage_saving": 82.6, "therapeutic_class_match": true,
                         "generic_match": true}
        }"#;
        let resp: RecommendResponse = serde_json::from_str(body).unwrap();
        assert!(resp.error.is_none());
        assert_eq!(resp.original_drugs[0].drug_name, "LIPITOR");
        assert_eq!(resp.recommended_drugs[0].pmpm(), Some(7.85));
        match resp.analysis {
            Some(RecommendationAnalysis::SingleDrug(a)) => {
                assert_eq!(a.cost_saving_per_member, 37.35);
                assert!(a.generic_match);
            }
            other => panic!("unexpected analysis {other:?}"),
        }
    }

    #[test]
    fn combination_analysis() {
        let body = r#"{
            "original_drugs": [], "recommended_drugs": [],
            "analysis": {"type": "combination", "total_cost_saving": 120.0,
                         "percentage_saving": 40.0, "interaction_risk": 1,
                         "interaction_description": "May increase bleeding risk",
                         "safety_score": "Medium"}
        }"#;
        let resp: RecommendResponse = serde_json::from_str(body).unwrap();
        match resp.analysis {
            Some(RecommendationAnalysis::Combination(c)) => {
                assert_eq!(c.interaction_risk, 1);
                assert_eq!(c.safety_score, "Medium");
            }
            other => panic!("unexpected analysis {other:?}"),
        }
    }

    #[test]
    fn empty_analysis_and_error_body() {
        let resp: RecommendResponse =
            serde_json::from_str(r#"{"original_drugs": [], "recommended_drugs": [], "analysis": {}}"#)
                .unwrap();
        assert!(matches!(resp.analysis, Some(RecommendationAnalysis::Unavailable(_))));

        let resp: RecommendResponse = serde_json::from_str(
            r#"{"error": "No recommendations could be generated", "original_drugs": []}"#,
        )
        .unwrap();
        assert_eq!(resp.error.as_deref(), Some("No recommendations could be generated"));
        assert!(resp.analysis.is_none());
    }

    #[test]
    fn health_status() {
        let h: HealthStatus = serde_json::from_str(
            r#"{"status": "healthy", "model_loaded": true, "data_loaded": true, "nlp_available": false}"#,
        )
        .unwrap();
        assert!(h.is_healthy());
        assert!(!h.nlp_available);
    }
}
