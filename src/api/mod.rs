//! Client for the PBM machine-learning backend (JSON over HTTP).

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, parse_drug_names};
pub use error::ApiError;
pub use types::{HealthStatus, Recommendation, RecommendationAnalysis};
