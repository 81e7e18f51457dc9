use crate::model::verify::{CandidateToken, VerifyResponse};
use crate::service::auth_service::AuthService;
use crate::util::extractor::{OptionalJson, OptionalQuery};
use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::{debug, info};

pub fn create_routes() -> Router<AppState> {
    Router::new().route("/verify", post(verify))
}

// The body extractor has to come last since it consumes the request.
async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    OptionalQuery(query): OptionalQuery<Vec<(String, String)>>,
    OptionalJson(body): OptionalJson<Value>,
) -> (StatusCode, Json<VerifyResponse>) {
    info!("verify");

    let query = query.unwrap_or_default();
    let candidate = CandidateToken::resolve(body.as_ref(), &headers, &query);

    match &candidate {
        Some((source, _)) => debug!("candidate token taken from {}", source),
        None => debug!("no candidate token supplied"),
    }

    let ok = AuthService::is_valid_token(&state.config.secret, candidate.as_ref().map(|(_, token)| token));
    let status = if ok { StatusCode::OK } else { StatusCode::UNAUTHORIZED };

    (status, Json(VerifyResponse { ok }))
}
