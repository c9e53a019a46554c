//! HTTP route handlers for Axum.

use askama::Template;
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use tracing::{error, warn};

use crate::{
    api::{
        pages::IndexPage,
        types::{PredictResponse, SchemaDto, StatusDto},
    },
    clinical::RawInput,
    error::{ErrorKind, PipelineError},
    pipeline::Submission,
};

use super::AppState;

type PageResult = Result<(StatusCode, Html<String>), (StatusCode, String)>;

fn status_for(err: &PipelineError) -> StatusCode {
    match err.kind() {
        ErrorKind::ModelLoadFailure
        | ErrorKind::StatsLoadFailure
        | ErrorKind::ModelUnavailable
        | ErrorKind::StatsUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::MissingStatistic | ErrorKind::DegenerateStatistic | ErrorKind::Inference => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn submission_status(submission: &Submission) -> StatusCode {
    submission
        .outcome
        .as_ref()
        .err()
        .map(status_for)
        .unwrap_or(StatusCode::OK)
}

fn render(page: IndexPage, status: StatusCode) -> PageResult {
    match page.render() {
        Ok(html) => Ok((status, Html(html))),
        Err(err) => {
            error!(%err, "failed to render form");
            Err((StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
        }
    }
}

/// A body that did not decode into a `RawInput` fails like any other invalid input.
fn undecodable(body_text: String) -> Submission {
    warn!(reason = %body_text, "rejected request body");
    Submission::rejected(PipelineError::invalid("request body", body_text))
}

/// `GET /`: the form with its starting values.
pub async fn index(State(state): State<AppState>) -> PageResult {
    let input = RawInput::default();
    render(IndexPage::new(&state.runtime, &input, None), StatusCode::OK)
}

/// `POST /`: submit the form and render the result under it.
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<RawInput>, FormRejection>,
) -> PageResult {
    let (input, submission) = match form {
        Ok(Form(input)) => {
            let submission = state.runtime.submit(&input);
            (input, submission)
        }
        Err(rejection) => (RawInput::default(), undecodable(rejection.body_text())),
    };
    let status = submission_status(&submission);
    render(
        IndexPage::new(&state.runtime, &input, Some(&submission)),
        status,
    )
}

/// `POST /api/predict`
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<RawInput>, JsonRejection>,
) -> Response {
    let submission = match body {
        Ok(Json(input)) => state.runtime.submit(&input),
        Err(rejection) => undecodable(rejection.body_text()),
    };
    let status = submission_status(&submission);
    (status, Json(PredictResponse::from_submission(&submission))).into_response()
}

/// `GET /api/status`
pub async fn status(State(state): State<AppState>) -> Json<StatusDto> {
    Json(StatusDto::of(&state.runtime))
}

/// `GET /api/schema`
pub async fn schema() -> Json<SchemaDto> {
    Json(SchemaDto::current())
}

pub async fn healthz() -> &'static str {
    "ok"
}
