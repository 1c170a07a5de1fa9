use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use chrono::Utc;
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

const AUTHOR_KEY: &str = "test_author_key";

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: &str, uri: String, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn quiz_flow_end_to_end() {
    dotenvy::dotenv().ok();
    if env::var("DATABASE_URL").is_err() {
        eprintln!("skipping quiz_flow_end_to_end: DATABASE_URL not set");
        return;
    }
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("AUTHOR_KEY", AUTHOR_KEY);
    env::set_var("PUBLIC_RPS", "1000");

    quiz_backend::config::init_config().expect("init config");
    let pool = quiz_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let app = quiz_backend::build_router(quiz_backend::AppState::new(pool), 1000);

    // Create: 2 questions, validation passes.
    let create_body = json!({
        "title": "Science Check",
        "instructions": "Answer every question.",
        "questions": [
            { "text": "Q1", "options": ["A", "B"], "correctAns": "A" },
            { "text": "Q2", "options": ["X", "Y", "Z"], "correctAns": "Y" }
        ]
    });
    let (status, created) = send(&app, json_request("POST", "/api/quiz".into(), create_body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let quiz_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["questions"][0]["order"], 1);
    assert_eq!(created["questions"][1]["order"], 2);

    // Validation failure aborts entirely.
    let invalid = json!({
        "title": "Broken",
        "instructions": "x",
        "questions": [ { "text": "Q", "options": ["only"], "correctAns": "only" } ]
    });
    let (status, body) = send(&app, json_request("POST", "/api/quiz".into(), invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Question 1 must have at least 2 options");

    // List: correct answers never leak on the student surface.
    let (status, listed) = send(
        &app,
        Request::builder()
            .uri("/api/quiz")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ours = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|q| q["id"] == quiz_id.as_str())
        .expect("created quiz listed");
    assert!(ours["questions"][0].get("correctAns").is_none());

    // Get: excluded by default, revealed only with the author key.
    let (status, fetched) = send(
        &app,
        Request::builder()
            .uri(format!("/api/quiz/{}", quiz_id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(fetched["questions"][0].get("correctAns").is_none());

    let (status, _) = send(
        &app,
        Request::builder()
            .uri(format!("/api/quiz/{}?include_answers=true", quiz_id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, revealed) = send(
        &app,
        Request::builder()
            .uri(format!("/api/quiz/{}?include_answers=true", quiz_id))
            .header("x-author-key", AUTHOR_KEY)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(revealed["questions"][0]["correctAns"], "A");

    // Submit: one right, one wrong -> 1/2, 50%.
    let q1 = fetched["questions"][0]["id"].as_str().unwrap();
    let q2 = fetched["questions"][1]["id"].as_str().unwrap();
    let student = format!("student_{}", Uuid::new_v4());
    let now = Utc::now().to_rfc3339();
    let submit_body = json!({
        "studentId": student,
        "answers": [
            { "questionId": q1, "answer": "A", "timeSpent": 10, "timestamp": now },
            { "questionId": q2, "answer": "Z", "timeSpent": 12, "timestamp": now }
        ]
    });
    let (status, result) = send(
        &app,
        json_request("POST", format!("/api/quiz/{}/submit", quiz_id), submit_body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["score"], 1);
    assert_eq!(result["totalQuestions"], 2);
    assert_eq!(result["percentage"], 50);
    assert_eq!(result["details"][0]["isCorrect"], true);
    assert_eq!(result["details"][1]["isCorrect"], false);
    assert_eq!(result["details"][1]["correctAnswer"], "Y");

    // Missing fields -> bad request.
    let (status, _) = send(
        &app,
        json_request("POST", format!("/api/quiz/{}/submit", quiz_id), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown quiz -> not found.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            format!("/api/quiz/{}/submit", Uuid::new_v4()),
            json!({ "studentId": "s", "answers": [] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Resubmission overwrites; exactly one attempt per (quiz, student).
    let now = Utc::now().to_rfc3339();
    let resubmit_body = json!({
        "studentId": student,
        "answers": [
            { "questionId": q1, "answer": "A", "timeSpent": 5, "timestamp": now },
            { "questionId": q2, "answer": "Y", "timeSpent": 6, "timestamp": now }
        ]
    });
    let (status, result) = send(
        &app,
        json_request("POST", format!("/api/quiz/{}/submit", quiz_id), resubmit_body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["score"], 2);
    assert_eq!(result["percentage"], 100);

    let (status, attempts) = send(
        &app,
        Request::builder()
            .uri(format!("/api/quiz/{}/attempts", quiz_id))
            .header("x-author-key", AUTHOR_KEY)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let mine: Vec<&JsonValue> = attempts
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| a["studentId"] == student.as_str())
        .collect();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["score"], 2);

    // Update is a full replace: 2 questions become exactly 2 new ones.
    let update_body = json!({
        "title": "Science Check v2",
        "instructions": "Answer every question.",
        "questions": [
            { "text": "New Q1", "options": ["1", "2"], "correctAns": "2" },
            { "text": "New Q2", "options": ["3", "4"], "correctAns": "3" }
        ]
    });
    let (status, updated) = send(
        &app,
        json_request("PUT", format!("/api/quiz/{}", quiz_id), update_body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let questions = updated["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["order"], 1);
    assert_eq!(questions[1]["order"], 2);
    assert_eq!(questions[0]["text"], "New Q1");

    // Tabular import goes through the same validation/persist path.
    let csv = "Quiz Title,Quiz Instructions,Question Text,Option A,Option B,Option C,Option D,Correct Answer\n\
               Imported,Do your best,Pick one,Yes,No,,,Yes\n";
    let boundary = "quizimportboundary";
    let multipart_body = format!(
        "--{b}\r\ncontent-disposition: form-data; name=\"file\"; filename=\"quiz.csv\"\r\ncontent-type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = boundary,
        csv = csv
    );
    let req = Request::builder()
        .method("POST")
        .uri("/api/quiz/import")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(multipart_body))
        .unwrap();
    let (status, imported) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(imported["title"], "Imported");
    assert_eq!(imported["questions"][0]["options"], json!(["Yes", "No"]));
    let imported_id = imported["id"].as_str().unwrap().to_string();

    // Delete cascades to questions and confirms.
    for id in [quiz_id, imported_id] {
        let (status, body) = send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/quiz/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Quiz deleted successfully");
    }
}
