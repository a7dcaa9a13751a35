use crate::server::AppState;
use axum::{extract::State, Json};
use log::info;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KickoffResponse {
    pub message: String,
    pub output_json: Option<String>,
    pub output_html: Option<String>,
}

/// POST /crew/kickoff
/// Schedules a report generation in the background and answers right away
/// with where the candidate report will land.
pub async fn kickoff_handler(State(state): State<AppState>) -> Json<KickoffResponse> {
    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        let outcome = pipeline.generate().await;
        info!("Background kickoff done: {:?}", outcome);
    });

    let paths = state.pipeline.paths();
    Json(KickoffResponse {
        message: "Crew kickoff started".to_string(),
        output_json: Some(paths.candidate_json.display().to_string()),
        output_html: Some(paths.candidate_html.display().to_string()),
    })
}
