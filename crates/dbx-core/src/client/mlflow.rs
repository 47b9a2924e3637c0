//! MLflow model registry, experiments and runs.

use super::WorkspaceClient;
use crate::error::Result;
use crate::models::mlflow::*;
use serde_json::{json, Value};

impl WorkspaceClient {
    // ─────────────────────────────────────────────────────────────────────────
    // Registered Models
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_registered_models(&self) -> Result<RegisteredModelList> {
        self.get("/api/2.0/mlflow/registered-models/list").await
    }

    pub async fn get_registered_model(&self, name: &str) -> Result<RegisteredModelResponse> {
        self.get_query(
            "/api/2.0/mlflow/registered-models/get",
            &[("name", name.into())],
        )
        .await
    }

    pub async fn create_registered_model(&self, body: &Value) -> Result<RegisteredModelResponse> {
        self.post("/api/2.0/mlflow/registered-models/create", body)
            .await
    }

    pub async fn update_registered_model(&self, body: &Value) -> Result<RegisteredModelResponse> {
        self.patch("/api/2.0/mlflow/registered-models/update", body)
            .await
    }

    pub async fn delete_registered_model(&self, name: &str) -> Result<Value> {
        self.delete_query(
            "/api/2.0/mlflow/registered-models/delete",
            &[("name", name.into())],
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Model Versions
    // ─────────────────────────────────────────────────────────────────────────

    /// Search model versions with an MLflow filter expression such as
    /// `name='my_model'`.
    pub async fn search_model_versions(&self, filter: &str) -> Result<ModelVersionSearchResponse> {
        self.get_query(
            "/api/2.0/mlflow/model-versions/search",
            &[("filter", filter.into())],
        )
        .await
    }

    pub async fn get_model_version(&self, name: &str, version: &str) -> Result<ModelVersionResponse> {
        self.get_query(
            "/api/2.0/mlflow/model-versions/get",
            &[("name", name.into()), ("version", version.into())],
        )
        .await
    }

    pub async fn create_model_version(&self, body: &Value) -> Result<ModelVersionResponse> {
        self.post("/api/2.0/mlflow/model-versions/create", body)
            .await
    }

    pub async fn update_model_version(&self, body: &Value) -> Result<ModelVersionResponse> {
        self.patch("/api/2.0/mlflow/model-versions/update", body)
            .await
    }

    pub async fn delete_model_version(&self, name: &str, version: &str) -> Result<Value> {
        self.delete_query(
            "/api/2.0/mlflow/model-versions/delete",
            &[("name", name.into()), ("version", version.into())],
        )
        .await
    }

    pub async fn transition_model_version_stage(
        &self,
        name: &str,
        version: &str,
        stage: &str,
        archive_existing_versions: bool,
    ) -> Result<ModelVersionResponse> {
        self.post(
            "/api/2.0/mlflow/model-versions/transition-stage",
            &json!({
                "name": name,
                "version": version,
                "stage": stage,
                "archive_existing_versions": archive_existing_versions,
            }),
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Experiments
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_experiments(&self) -> Result<ExperimentList> {
        self.get("/api/2.0/mlflow/experiments/list").await
    }

    pub async fn get_experiment(&self, experiment_id: &str) -> Result<ExperimentResponse> {
        self.get_query(
            "/api/2.0/mlflow/experiments/get",
            &[("experiment_id", experiment_id.into())],
        )
        .await
    }

    pub async fn create_experiment(&self, body: &Value) -> Result<CreateExperimentResponse> {
        self.post("/api/2.0/mlflow/experiments/create", body).await
    }

    pub async fn update_experiment(&self, experiment_id: &str, new_name: Option<&str>) -> Result<Value> {
        let mut body = json!({ "experiment_id": experiment_id });
        if let Some(name) = new_name {
            body["new_name"] = json!(name);
        }
        self.post("/api/2.0/mlflow/experiments/update", &body).await
    }

    pub async fn delete_experiment(&self, experiment_id: &str) -> Result<Value> {
        self.post(
            "/api/2.0/mlflow/experiments/delete",
            &json!({ "experiment_id": experiment_id }),
        )
        .await
    }

    pub async fn restore_experiment(&self, experiment_id: &str) -> Result<Value> {
        self.post(
            "/api/2.0/mlflow/experiments/restore",
            &json!({ "experiment_id": experiment_id }),
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Runs
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn search_runs(&self, req: &SearchRunsRequest) -> Result<SearchRunsResponse> {
        self.post("/api/2.0/mlflow/runs/search", req).await
    }

    pub async fn get_run(&self, run_id: &str) -> Result<RunResponse> {
        self.get_query("/api/2.0/mlflow/runs/get", &[("run_id", run_id.into())])
            .await
    }

    pub async fn delete_run(&self, run_id: &str) -> Result<Value> {
        self.post("/api/2.0/mlflow/runs/delete", &json!({ "run_id": run_id }))
            .await
    }

    pub async fn restore_run(&self, run_id: &str) -> Result<Value> {
        self.post("/api/2.0/mlflow/runs/restore", &json!({ "run_id": run_id }))
            .await
    }
}
