use std::collections::HashMap;
use std::sync::Arc;
use axum::{routing::post, Router, Json};
use tower_http::cors::{CorsLayer, Any};
use serde::{Deserialize, Serialize};
use axum::http::StatusCode;
use tracing::{info, warn};
use crate::error::SqldashError;
use crate::execute::{self, SqliteExecutor};
use crate::form::FormControl;
use crate::param_set::ParameterSet;
use crate::settings::Settings;

#[derive(Deserialize)]
pub struct QueryRequest {
    pub sql: String,
    /// Submitted parameter values, as posted by the rendered controls.
    #[serde(default)]
    pub values: HashMap<String, String>,
}

#[derive(Serialize)]
pub struct ParameterView {
    pub name: String,
    pub type_code: &'static str,
    pub decimal_places: u32,
    pub default_value: String,
    pub value: Option<String>,
    pub control: FormControl,
    pub html: String,
}

#[derive(Serialize)]
pub struct FormResponse {
    pub status: String,
    pub parameters: Vec<ParameterView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct QueryResponse {
    pub status: String,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Rejected parameters and failing statements are the caller's fault; a
/// database that cannot be opened is not.
pub fn error_status(e: &SqldashError) -> StatusCode {
    match e {
        SqldashError::Parameter(_) | SqldashError::Execution(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Extracts the parameters of `req.sql`, binds any submitted values and
/// describes one input control per parameter.
pub fn describe_form(req: &QueryRequest) -> Result<Vec<ParameterView>, SqldashError> {
    let mut parameters = ParameterSet::from_sql(&req.sql)?;
    parameters.bind(&req.values)?;
    Ok(parameters
        .iter()
        .map(|p| {
            let control = FormControl::for_parameter(p);
            ParameterView {
                name: p.name().to_string(),
                type_code: p.kind().code(),
                decimal_places: p.decimal_places(),
                default_value: p.default_value().to_string(),
                value: p.value().map(str::to_string),
                html: control.render(),
                control,
            }
        })
        .collect())
}

pub fn router(settings: Arc<Settings>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/v1/form", post(|Json(req): Json<QueryRequest>| async move {
            match describe_form(&req) {
                Ok(parameters) => (StatusCode::OK, Json(FormResponse { status: "ok".into(), parameters, error: None })),
                Err(e) => {
                    let status = error_status(&e);
                    let msg = format!("{e}");
                    warn!(%msg, code=%status.as_u16(), "form error");
                    (status, Json(FormResponse { status: "error".into(), parameters: Vec::new(), error: Some(msg) }))
                }
            }
        }))
        .route("/v1/query", post(move |Json(req): Json<QueryRequest>| {
        let settings = Arc::clone(&settings);
        async move {
            // rusqlite is blocking, and the connection is opened per request
            let started = std::time::Instant::now();
            let result = tokio::task::spawn_blocking(move || {
                let executor = SqliteExecutor::open(&settings.database, settings.row_limit, settings.read_only)?;
                execute::resolve_and_execute(&executor, &req.sql, &req.values)
            }).await.map_err(|e| {
                warn!(error=%e, "Join error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Join error")
            })?;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            match result {
                Ok(result) => {
                    info!(ms=elapsed_ms, rows=result.row_count, truncated=result.truncated, "query served");
                    let body = QueryResponse { status: "ok".into(), elapsed_ms, columns: Some(result.columns), row_count: Some(result.row_count), truncated: Some(result.truncated), rows: Some(result.rows), error: None };
                    Ok::<_, (StatusCode, &'static str)>((StatusCode::OK, Json(body)))
                }
                Err(e) => {
                    let status = error_status(&e);
                    let msg = format!("{e}");
                    warn!(%msg, code=%status.as_u16(), "query error");
                    let body = QueryResponse { status: "error".into(), elapsed_ms, columns: None, row_count: None, truncated: None, rows: None, error: Some(msg) };
                    Ok::<_, (StatusCode, &'static str)>((status, Json(body)))
                }
            }
        }
    }))
    .layer(cors)
}
