use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{
    ClassCountsResponse, DrugsResponse, HealthStatus, RecommendRequest, RecommendResponse,
    Recommendation, RecommendationAnalysis,
};
use crate::data::analysis::{ClassCount, CostAnalysis, DrugStats};
use crate::data::loader;
use crate::data::model::DrugRecord;

/// Blocking HTTP client for the recommendation backend.
///
/// Calls block the current thread; the UI runs them through
/// [`crate::worker::Backend`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    timeout_secs: u64,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get("health")
    }

    /// Full drug list, cleaned the same way as a dataset file.
    pub fn drugs(&self) -> Result<Vec<DrugRecord>, ApiError> {
        let body: DrugsResponse = self.get("drugs")?;
        log::info!("Backend reported {} drugs", body.total_count);
        loader::records_from_json(&body.drugs).map_err(|e| ApiError::Decode(format!("{e:#}")))
    }

    pub fn drug_stats(&self) -> Result<DrugStats, ApiError> {
        self.get("drug-stats")
    }

    pub fn cost_analysis(&self) -> Result<CostAnalysis, ApiError> {
        self.get("cost-analysis")
    }

    pub fn therapeutic_classes(&self) -> Result<Vec<ClassCount>, ApiError> {
        let body: ClassCountsResponse = self.get("therapeutic-classes")?;
        Ok(body.therapeutic_classes)
    }

    /// Ask for alternatives to one or two drugs.
    pub fn recommend(&self, drug_names: &[String]) -> Result<Recommendation, ApiError> {
        if drug_names.is_empty() {
            return Err(ApiError::EmptyInput);
        }
        let request = self
            .client
            .post(self.endpoint("recommend"))
            .json(&RecommendRequest { drug_names });
        let body: RecommendResponse = self.send(request)?;
        into_recommendation(body)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.client.get(self.endpoint(path)))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().map_err(|e| self.map_send_error(e))?;
        read_json(response)
    }

    fn map_send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() {
            ApiError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::Http(e.to_string())
        }
    }
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| ApiError::Http(e.to_string()))?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// The backend reports failures as `{"error": "..."}`; fall back to the raw
/// body when it does not.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn into_recommendation(body: RecommendResponse) -> Result<Recommendation, ApiError> {
    if let Some(error) = body.error {
        return Err(ApiError::NoRecommendation(error));
    }
    Ok(Recommendation {
        original_drugs: body.original_drugs,
        recommended_drugs: body.recommended_drugs,
        analysis: body
            .analysis
            .unwrap_or_else(|| RecommendationAnalysis::Unavailable(Default::default())),
    })
}

/// Split comma-separated user input into drug names.
///
/// Blank input is rejected before any request is made.
pub fn parse_drug_names(input: &str) -> Result<Vec<String>, ApiError> {
    let names: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        Err(ApiError::EmptyInput)
    } else {
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_cleanly() {
        let client = ApiClient::new("http://localhost:5000/", 5).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.endpoint("health"), "http://localhost:5000/api/health");
        assert_eq!(client.endpoint("/drug-stats"), "http://localhost:5000/api/drug-stats");
    }

    #[test]
    fn drug_names_are_split_and_trimmed() {
        assert_eq!(
            parse_drug_names(" Lipitor , ,Humalog ").unwrap(),
            vec!["Lipitor".to_string(), "Humalog".to_string()]
        );
        assert_eq!(parse_drug_names("   "), Err(ApiError::EmptyInput));
        assert_eq!(parse_drug_names(",,"), Err(ApiError::EmptyInput));
    }

    #[test]
    fn empty_name_list_never_hits_the_network() {
        let client = ApiClient::new("http://127.0.0.1:1", 1).unwrap();
        assert_eq!(client.recommend(&[]), Err(ApiError::EmptyInput));
    }

    #[test]
    fn error_message_prefers_json_field() {
        assert_eq!(error_message(r#"{"error": "Dataset not loaded"}"#), "Dataset not loaded");
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn error_body_becomes_no_recommendation() {
        let body: RecommendResponse =
            serde_json::from_str(r#"{"error": "No recommendations could be generated"}"#).unwrap();
        assert_eq!(
            into_recommendation(body),
            Err(ApiError::NoRecommendation("No recommendations could be generated".into()))
        );
    }

    #[test]
    fn missing_analysis_is_unavailable() {
        let body: RecommendResponse =
            serde_json::from_str(r#"{"original_drugs": [], "recommended_drugs": []}"#).unwrap();
        let rec = into_recommendation(body).unwrap();
        assert_eq!(rec.percentage_saving(), None);
    }
}
