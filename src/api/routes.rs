//! Route table and handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::types::{HealthResponse, InvokeRequest, ResumeRequest};
use crate::agent::{AgentError, AgentState, RunConfig};
use crate::config::Config;
use crate::workflows::{WorkflowKind, Workflows};

/// Shared state for all handlers.
pub struct AppState {
    pub workflows: Workflows,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/:agent/invoke", post(invoke))
        .route("/api/:agent/resume", post(resume))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Build the workflows from `config` and serve until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let workflows = Workflows::from_config(&config)?;
    let state = Arc::new(AppState { workflows });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, routes(state)).await?;
    Ok(())
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        persistent_checkpoints: state.workflows.store().is_persistent(),
    })
}

/// POST /api/:agent/invoke - forward call.
async fn invoke(
    State(state): State<Arc<AppState>>,
    Path(agent): Path<String>,
    Json(req): Json<InvokeRequest>,
) -> ApiResult<AgentState> {
    let kind = parse_kind(&agent)?;
    if req.message.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "message is required".to_string()));
    }

    let run = match req.thread_id.filter(|t| !t.trim().is_empty()) {
        Some(thread_id) => RunConfig::with_thread_id(thread_id),
        None => RunConfig::new(),
    };
    tracing::info!(agent = %agent, thread_id = %run.thread_id, "Received agent message");

    state
        .workflows
        .call_agent(kind, &req.message, &run)
        .await
        .map(Json)
        .map_err(agent_error)
}

/// POST /api/:agent/resume - resume after a human decision.
async fn resume(
    State(state): State<Arc<AppState>>,
    Path(agent): Path<String>,
    Json(req): Json<ResumeRequest>,
) -> ApiResult<AgentState> {
    let kind = parse_kind(&agent)?;
    if req.thread_id.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "thread_id is required".to_string()));
    }

    let run = RunConfig::with_thread_id(req.thread_id);
    state
        .workflows
        .resume_agent(kind, req.decision, &run)
        .await
        .map(Json)
        .map_err(agent_error)
}

fn parse_kind(agent: &str) -> Result<WorkflowKind, (StatusCode, String)> {
    agent
        .parse::<WorkflowKind>()
        .map_err(|e| (StatusCode::NOT_FOUND, e))
}

fn agent_error(err: AgentError) -> (StatusCode, String) {
    let status = match &err {
        AgentError::ThreadNotFound(_) => StatusCode::NOT_FOUND,
        AgentError::NothingToResume(_)
        | AgentError::ThreadInterrupted(_)
        | AgentError::WrongAgent { .. } => StatusCode::CONFLICT,
        AgentError::Llm(_) | AgentError::EmptyResponse => StatusCode::BAD_GATEWAY,
        AgentError::MaxIterations(_) | AgentError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::InMemoryCheckpointStore;
    use crate::llm::{ChatMessage, ChatResponse, LlmClient, LlmError, ToolSchema};
    use async_trait::async_trait;
    use serde_json::json;

    struct Unreachable;

    #[async_trait]
    impl LlmClient for Unreachable {
        async fn chat_completion(
            &self,
            _model: &str,
            _messages: &[ChatMessage],
            _tools: Option<&[ToolSchema]>,
        ) -> Result<ChatResponse, LlmError> {
            Err(LlmError::Network("Connection failed: refused".to_string()))
        }
    }

    fn state() -> Arc<AppState> {
        let config = Config::new("k", "m");
        Arc::new(AppState {
            workflows: Workflows::new(
                &config,
                Arc::new(Unreachable),
                Arc::new(InMemoryCheckpointStore::new()),
            ),
        })
    }

    #[tokio::test]
    async fn health_reports_in_memory_store() {
        let Json(body) = health(State(state())).await;
        assert_eq!(body.status, "ok");
        assert!(!body.persistent_checkpoints);
    }

    #[tokio::test]
    async fn unknown_agent_is_not_found() {
        let err = invoke(
            State(state()),
            Path("underwriting".to_string()),
            Json(InvokeRequest {
                message: "hi".to_string(),
                thread_id: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_message_is_bad_request() {
        let err = invoke(
            State(state()),
            Path("fnol".to_string()),
            Json(InvokeRequest {
                message: "   ".to_string(),
                thread_id: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn llm_failure_maps_to_bad_gateway() {
        let err = invoke(
            State(state()),
            Path("claim".to_string()),
            Json(InvokeRequest {
                message: "FNOL-2025-001234 / HO3-77889900".to_string(),
                thread_id: Some("t-1".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_GATEWAY);
        assert!(err.1.contains("Connection failed"));
    }

    #[tokio::test]
    async fn resume_unknown_thread_is_not_found() {
        let err = resume(
            State(state()),
            Path("claim".to_string()),
            Json(ResumeRequest {
                decision: json!({"approved": true}),
                thread_id: "missing".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }
}
