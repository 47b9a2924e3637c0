//! MLflow tools: model registry, experiments and runs.

use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::server::McpServer;
use crate::tools::respond;
use dbx_core::models::mlflow::SearchRunsRequest;
use dbx_core::Result;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ModelNameParams {
    /// Registered model name
    pub model_name: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CreateModelParams {
    /// Registered model name
    pub model_name: String,
    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional tags, list of {key, value} objects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Value>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct UpdateModelParams {
    /// Registered model name
    pub model_name: String,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ModelVersionParams {
    /// Registered model name
    pub model_name: String,
    /// Version number
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CreateModelVersionParams {
    /// Registered model name
    pub model_name: String,
    /// Source path of the model artifacts
    pub source: String,
    /// Optional run ID the version was produced by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional tags, list of {key, value} objects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Value>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct UpdateModelVersionParams {
    /// Registered model name
    pub model_name: String,
    /// Version number
    pub version: String,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct TransitionStageParams {
    /// Registered model name
    pub model_name: String,
    /// Version number
    pub version: String,
    /// Target stage (Staging, Production, Archived, None)
    pub stage: String,
    /// Archive existing versions in the target stage (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_existing_versions: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ExperimentIdParams {
    /// Experiment ID
    pub experiment_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CreateExperimentParams {
    /// Experiment name (workspace path, e.g. /Users/me/my-experiment)
    pub name: String,
    /// Optional artifact storage location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_location: Option<String>,
    /// Optional tags, list of {key, value} objects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Value>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct UpdateExperimentParams {
    /// Experiment ID
    pub experiment_id: String,
    /// New experiment name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct SearchRunsParams {
    /// Experiment IDs to search in
    pub experiment_ids: Vec<String>,
    /// Optional MLflow filter expression, e.g. "metrics.rmse < 1.0"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_string: Option<String>,
    /// Which runs to include: ACTIVE_ONLY, DELETED_ONLY or ALL (default: ACTIVE_ONLY)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_view_type: Option<String>,
    /// Maximum number of runs to return (default: 100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct RunIdParams {
    /// Run ID
    pub run_id: String,
}

/// Escape a value for an MLflow search filter literal. The search endpoints
/// take a filter string, not bound parameters, so quotes are doubled.
fn filter_literal(value: &str) -> String {
    value.replace('\'', "''")
}

#[tool_router(router = mlflow_router, vis = "pub(crate)")]
impl McpServer {
    // ─────────────────────────────────────────────────────────────────────────
    // Registered Models
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List registered models in the MLflow model registry.")]
    async fn list_models(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_registered_models().await?;
            let models = list.registered_models.unwrap_or_default();
            let count = models.len();
            Ok(json!({
                "models": models,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a registered model by name, including its latest versions.")]
    async fn get_model(&self, Parameters(params): Parameters<ModelNameParams>) -> String {
        let result: Result<Value> = async {
            let response = self.client.get_registered_model(&params.model_name).await?;
            Ok(json!({ "model": response.registered_model }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a registered model with optional description and tags.")]
    async fn create_model(&self, Parameters(params): Parameters<CreateModelParams>) -> String {
        let result: Result<Value> = async {
            let mut body = json!({ "name": params.model_name });
            if let Some(description) = &params.description {
                body["description"] = json!(description);
            }
            if let Some(tags) = &params.tags {
                body["tags"] = json!(tags);
            }
            let response = self.client.create_registered_model(&body).await?;
            Ok(json!({
                "model": response.registered_model,
                "message": format!("Model \"{}\" created", params.model_name),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Update a registered model's description.")]
    async fn update_model(&self, Parameters(params): Parameters<UpdateModelParams>) -> String {
        let result: Result<Value> = async {
            let mut body = json!({ "name": params.model_name });
            if let Some(description) = &params.description {
                body["description"] = json!(description);
            }
            let response = self.client.update_registered_model(&body).await?;
            Ok(json!({
                "model": response.registered_model,
                "message": format!("Model \"{}\" updated", params.model_name),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a registered model and all its versions.")]
    async fn delete_model(&self, Parameters(params): Parameters<ModelNameParams>) -> String {
        let result: Result<Value> = async {
            self.client.delete_registered_model(&params.model_name).await?;
            Ok(json!({
                "model_name": params.model_name,
                "message": format!("Model \"{}\" deleted", params.model_name),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Model Versions
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List all versions of a registered model.")]
    async fn list_model_versions(&self, Parameters(params): Parameters<ModelNameParams>) -> String {
        let result: Result<Value> = async {
            let filter = format!("name='{}'", filter_literal(&params.model_name));
            let response = self.client.search_model_versions(&filter).await?;
            let versions = response.model_versions.unwrap_or_default();
            let count = versions.len();
            Ok(json!({
                "model_name": params.model_name,
                "versions": versions,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a specific version of a registered model.")]
    async fn get_model_version(&self, Parameters(params): Parameters<ModelVersionParams>) -> String {
        let result: Result<Value> = async {
            let response = self
                .client
                .get_model_version(&params.model_name, &params.version)
                .await?;
            Ok(json!({ "model_version": response.model_version }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a new model version from a source artifact path.")]
    async fn create_model_version(
        &self,
        Parameters(params): Parameters<CreateModelVersionParams>,
    ) -> String {
        let result: Result<Value> = async {
            let mut body = json!({
                "name": params.model_name,
                "source": params.source,
            });
            if let Some(run_id) = &params.run_id {
                body["run_id"] = json!(run_id);
            }
            if let Some(description) = &params.description {
                body["description"] = json!(description);
            }
            if let Some(tags) = &params.tags {
                body["tags"] = json!(tags);
            }
            let response = self.client.create_model_version(&body).await?;
            Ok(json!({
                "model_version": response.model_version,
                "message": format!("Version created for model \"{}\"", params.model_name),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Update a model version's description.")]
    async fn update_model_version(
        &self,
        Parameters(params): Parameters<UpdateModelVersionParams>,
    ) -> String {
        let result: Result<Value> = async {
            let mut body = json!({
                "name": params.model_name,
                "version": params.version,
            });
            if let Some(description) = &params.description {
                body["description"] = json!(description);
            }
            let response = self.client.update_model_version(&body).await?;
            Ok(json!({
                "model_version": response.model_version,
                "message": format!(
                    "Version {} of model \"{}\" updated",
                    params.version, params.model_name
                ),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a specific model version.")]
    async fn delete_model_version(
        &self,
        Parameters(params): Parameters<ModelVersionParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client
                .delete_model_version(&params.model_name, &params.version)
                .await?;
            Ok(json!({
                "model_name": params.model_name,
                "version": params.version,
                "message": format!(
                    "Version {} of model \"{}\" deleted",
                    params.version, params.model_name
                ),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Transition a model version to a new stage (Staging, Production, Archived, None).")]
    async fn transition_model_version_stage(
        &self,
        Parameters(params): Parameters<TransitionStageParams>,
    ) -> String {
        let result: Result<Value> = async {
            let response = self
                .client
                .transition_model_version_stage(
                    &params.model_name,
                    &params.version,
                    &params.stage,
                    params.archive_existing_versions.unwrap_or(false),
                )
                .await?;
            Ok(json!({
                "model_version": response.model_version,
                "message": format!(
                    "Version {} of model \"{}\" moved to stage {}",
                    params.version, params.model_name, params.stage
                ),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Experiments
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List MLflow experiments in the workspace.")]
    async fn list_experiments(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_experiments().await?;
            let experiments = list.experiments.unwrap_or_default();
            let count = experiments.len();
            Ok(json!({
                "experiments": experiments,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get an MLflow experiment by ID.")]
    async fn get_experiment(&self, Parameters(params): Parameters<ExperimentIdParams>) -> String {
        let result: Result<Value> = async {
            let response = self.client.get_experiment(&params.experiment_id).await?;
            Ok(json!({ "experiment": response.experiment }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create an MLflow experiment. Returns the new experiment ID.")]
    async fn create_experiment(
        &self,
        Parameters(params): Parameters<CreateExperimentParams>,
    ) -> String {
        let result: Result<Value> = async {
            let mut body = json!({ "name": params.name });
            if let Some(location) = &params.artifact_location {
                body["artifact_location"] = json!(location);
            }
            if let Some(tags) = &params.tags {
                body["tags"] = json!(tags);
            }
            let response = self.client.create_experiment(&body).await?;
            Ok(json!({
                "experiment_id": response.experiment_id,
                "message": format!("Experiment \"{}\" created", params.name),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Rename an MLflow experiment.")]
    async fn update_experiment(
        &self,
        Parameters(params): Parameters<UpdateExperimentParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client
                .update_experiment(&params.experiment_id, params.new_name.as_deref())
                .await?;
            Ok(json!({
                "experiment_id": params.experiment_id,
                "new_name": params.new_name,
                "message": format!("Experiment {} updated", params.experiment_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete an MLflow experiment (moves it to the deleted lifecycle stage).")]
    async fn delete_experiment(&self, Parameters(params): Parameters<ExperimentIdParams>) -> String {
        let result: Result<Value> = async {
            self.client.delete_experiment(&params.experiment_id).await?;
            Ok(json!({
                "experiment_id": params.experiment_id,
                "message": format!("Experiment {} deleted", params.experiment_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Restore a deleted MLflow experiment.")]
    async fn restore_experiment(
        &self,
        Parameters(params): Parameters<ExperimentIdParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client.restore_experiment(&params.experiment_id).await?;
            Ok(json!({
                "experiment_id": params.experiment_id,
                "message": format!("Experiment {} restored", params.experiment_id),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Runs
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "Search MLflow runs across experiments with an optional filter expression.")]
    async fn search_runs(&self, Parameters(params): Parameters<SearchRunsParams>) -> String {
        let result: Result<Value> = async {
            let request = SearchRunsRequest {
                experiment_ids: params.experiment_ids.clone(),
                filter: params.filter_string.clone(),
                run_view_type: Some(
                    params
                        .run_view_type
                        .clone()
                        .unwrap_or_else(|| "ACTIVE_ONLY".to_string()),
                ),
                max_results: params.max_results.unwrap_or(100),
            };
            let response = self.client.search_runs(&request).await?;
            let runs = response.runs.unwrap_or_default();
            let count = runs.len();
            Ok(json!({
                "runs": runs,
                "count": count,
                "next_page_token": response.next_page_token,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get an MLflow run by ID, including its metrics, params and tags.")]
    async fn get_run(&self, Parameters(params): Parameters<RunIdParams>) -> String {
        let result: Result<Value> = async {
            let response = self.client.get_run(&params.run_id).await?;
            Ok(json!({ "run": response.run }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete an MLflow run.")]
    async fn delete_run(&self, Parameters(params): Parameters<RunIdParams>) -> String {
        let result: Result<Value> = async {
            self.client.delete_run(&params.run_id).await?;
            Ok(json!({
                "run_id": params.run_id,
                "message": format!("Run {} deleted", params.run_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Restore a deleted MLflow run.")]
    async fn restore_run(&self, Parameters(params): Parameters<RunIdParams>) -> String {
        let result: Result<Value> = async {
            self.client.restore_run(&params.run_id).await?;
            Ok(json!({
                "run_id": params.run_id,
                "message": format!("Run {} restored", params.run_id),
            }))
        }
        .await;
        respond(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_literal_doubles_quotes() {
        assert_eq!(filter_literal("plain"), "plain");
        assert_eq!(filter_literal("o'brien"), "o''brien");
        let filter = format!("name='{}'", filter_literal("x' OR '1'='1"));
        assert_eq!(filter, "name='x'' OR ''1''=''1'");
    }

    #[test]
    fn search_runs_params_defaults() {
        let p: SearchRunsParams = serde_json::from_value(json!({
            "experiment_ids": ["1", "2"]
        }))
        .unwrap();
        assert_eq!(p.experiment_ids.len(), 2);
        assert!(p.filter_string.is_none());
        assert!(p.max_results.is_none());
    }
}
