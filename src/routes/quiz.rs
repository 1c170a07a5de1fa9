use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::quiz_dto::{GetQuizQuery, QuizAuthorView, QuizDraft, QuizView},
    dto::submit_dto::{DeleteQuizResponse, SubmitQuizRequest},
    error::{Error, Result},
    services::import_service::ImportService,
    AppState,
};

/// Reveal operations (correct answers, attempt listings) require the
/// author key. This is a capability gate, not an account system.
fn require_author_key(headers: &HeaderMap) -> Result<()> {
    let expected = &crate::config::get_config().author_key;
    let provided = headers.get("x-author-key").and_then(|v| v.to_str().ok());
    if provided == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(Error::Unauthorized(
            "Author key required to reveal correct answers".to_string(),
        ))
    }
}

#[utoipa::path(
    get,
    path = "/api/quiz",
    responses(
        (status = 200, description = "All quizzes, correct answers excluded", body = Json<Vec<QuizView>>)
    )
)]
#[axum::debug_handler]
pub async fn list_quizzes(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let records = state.quiz_service.list().await?;
    let views: Vec<QuizView> = records.into_iter().map(QuizView::from).collect();
    Ok(Json(views))
}

#[utoipa::path(
    post,
    path = "/api/quiz",
    request_body = QuizDraft,
    responses(
        (status = 201, description = "Quiz created", body = Json<QuizAuthorView>),
        (status = 400, description = "Validation failed")
    )
)]
#[axum::debug_handler]
pub async fn create_quiz(
    State(state): State<AppState>,
    Json(draft): Json<QuizDraft>,
) -> Result<impl IntoResponse> {
    let record = state.quiz_service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(QuizAuthorView::from(record))))
}

#[utoipa::path(
    post,
    path = "/api/quiz/import",
    responses(
        (status = 201, description = "Quiz created from uploaded tabular file", body = Json<QuizAuthorView>),
        (status = 400, description = "Malformed file or validation failed")
    )
)]
#[axum::debug_handler]
pub async fn import_quiz(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(Error::Multipart)? {
        if field.name() == Some("file") {
            let data = field.bytes().await.map_err(Error::Multipart)?;
            file_bytes = Some(data.to_vec());
        }
    }

    let bytes = file_bytes
        .filter(|b| !b.is_empty())
        .ok_or_else(|| Error::BadRequest("Missing file upload".to_string()))?;

    let draft = ImportService::draft_from_csv(&bytes)?;
    let record = state.quiz_service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(QuizAuthorView::from(record))))
}

#[utoipa::path(
    get,
    path = "/api/quiz/{id}",
    params(
        ("id" = Uuid, Path, description = "Quiz ID"),
        ("include_answers" = Option<bool>, Query, description = "Reveal correct answers (requires author key)")
    ),
    responses(
        (status = 200, description = "Quiz found", body = Json<QuizView>),
        (status = 401, description = "Reveal requested without author key"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<GetQuizQuery>,
    headers: HeaderMap,
) -> Result<axum::response::Response> {
    let record = state.quiz_service.get(id).await?;

    if query.include_answers {
        require_author_key(&headers)?;
        return Ok(Json(QuizAuthorView::from(record)).into_response());
    }
    Ok(Json(QuizView::from(record)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/quiz/{id}",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    request_body = QuizDraft,
    responses(
        (status = 200, description = "Quiz updated, question set fully replaced", body = Json<QuizAuthorView>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn update_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<QuizDraft>,
) -> Result<impl IntoResponse> {
    let record = state.quiz_service.update(id, draft).await?;
    Ok(Json(QuizAuthorView::from(record)))
}

#[utoipa::path(
    delete,
    path = "/api/quiz/{id}",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "Quiz and its questions deleted"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.quiz_service.delete(id).await?;
    Ok(Json(DeleteQuizResponse {
        message: "Quiz deleted successfully".to_string(),
        id,
    }))
}

#[utoipa::path(
    post,
    path = "/api/quiz/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    request_body = SubmitQuizRequest,
    responses(
        (status = 200, description = "Graded result with revealed answers", body = Json<crate::dto::submit_dto::SubmitQuizResponse>),
        (status = 400, description = "Missing studentId or answers"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse> {
    req.validate()?;
    let response = state.attempt_service.submit(id, req).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/quiz/{id}/attempts",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "All attempts for the quiz", body = Json<Vec<crate::models::attempt::QuizAttempt>>),
        (status = 401, description = "Author key missing")
    )
)]
#[axum::debug_handler]
pub async fn list_quiz_attempts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    require_author_key(&headers)?;
    let attempts = state.attempt_service.list_for_quiz(id).await?;
    Ok(Json(attempts))
}
