//! MLflow model registry, experiments and runs.

use serde::{Deserialize, Serialize};

/// A key/value pair used for tags and run params across the MLflow API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: Option<String>,
    pub value: Option<String>,
}

/// Response from `GET /api/2.0/mlflow/registered-models/list`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredModelList {
    pub registered_models: Option<Vec<RegisteredModel>>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredModel {
    pub name: Option<String>,
    pub creation_timestamp: Option<i64>,
    pub last_updated_timestamp: Option<i64>,
    pub user_id: Option<String>,
    pub description: Option<String>,
    pub latest_versions: Option<Vec<ModelVersion>>,
    pub tags: Option<Vec<KeyValue>>,
}

/// Wrapper for endpoints returning a single registered model.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredModelResponse {
    pub registered_model: Option<RegisteredModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelVersion {
    pub name: Option<String>,
    pub version: Option<String>,
    pub creation_timestamp: Option<i64>,
    pub last_updated_timestamp: Option<i64>,
    pub user_id: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub run_id: Option<String>,
    pub status: Option<String>,
    pub status_message: Option<String>,
    pub current_stage: Option<String>,
    pub tags: Option<Vec<KeyValue>>,
}

/// Response from `GET /api/2.0/mlflow/model-versions/search`
#[derive(Debug, Clone, Deserialize)]
pub struct ModelVersionSearchResponse {
    pub model_versions: Option<Vec<ModelVersion>>,
    pub next_page_token: Option<String>,
}

/// Wrapper for endpoints returning a single model version.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelVersionResponse {
    pub model_version: Option<ModelVersion>,
}

/// Response from `GET /api/2.0/mlflow/experiments/list`
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentList {
    pub experiments: Option<Vec<Experiment>>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    pub experiment_id: Option<String>,
    pub name: Option<String>,
    pub artifact_location: Option<String>,
    pub lifecycle_stage: Option<String>,
    pub last_update_time: Option<i64>,
    pub creation_time: Option<i64>,
    pub tags: Option<Vec<KeyValue>>,
}

/// Wrapper for `GET /api/2.0/mlflow/experiments/get`
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentResponse {
    pub experiment: Option<Experiment>,
}

/// Response from `POST /api/2.0/mlflow/experiments/create`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExperimentResponse {
    pub experiment_id: Option<String>,
}

/// Request body for `POST /api/2.0/mlflow/runs/search`
#[derive(Debug, Clone, Serialize)]
pub struct SearchRunsRequest {
    pub experiment_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_view_type: Option<String>,
    pub max_results: u32,
}

/// Response from `POST /api/2.0/mlflow/runs/search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRunsResponse {
    pub runs: Option<Vec<Run>>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub info: Option<RunInfo>,
    pub data: Option<RunData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: Option<String>,
    pub run_uuid: Option<String>,
    pub experiment_id: Option<String>,
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub artifact_uri: Option<String>,
    pub lifecycle_stage: Option<String>,
    pub run_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunData {
    pub tags: Option<Vec<KeyValue>>,
    pub params: Option<Vec<KeyValue>>,
    pub metrics: Option<Vec<Metric>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub key: Option<String>,
    pub value: Option<f64>,
    pub timestamp: Option<i64>,
    pub step: Option<i64>,
}

/// Wrapper for `GET /api/2.0/mlflow/runs/get`
#[derive(Debug, Clone, Deserialize)]
pub struct RunResponse {
    pub run: Option<Run>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_runs_request_omits_unset_filter() {
        let req = SearchRunsRequest {
            experiment_ids: vec!["1".into()],
            filter: None,
            run_view_type: Some("ACTIVE_ONLY".into()),
            max_results: 100,
        };
        let v = serde_json::to_value(&req).unwrap();
        let obj = v.as_object().unwrap();
        assert!(!obj.contains_key("filter"));
        assert_eq!(obj["run_view_type"], "ACTIVE_ONLY");
    }

    #[test]
    fn run_with_partial_info_deserializes() {
        let run: Run = serde_json::from_value(json!({
            "info": { "run_id": "r1", "status": "FINISHED" }
        }))
        .unwrap();
        assert_eq!(run.info.unwrap().run_id.as_deref(), Some("r1"));
        assert!(run.data.is_none());
    }
}
