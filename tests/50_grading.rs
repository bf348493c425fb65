mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{TestServer, World};

async fn enrollment_id(server: &TestServer, world: &World) -> Result<i64> {
    let (status, enrollment) = server
        .post(&format!("/student/courses/{}/enroll", world.course_id), &world.student.token, json!({}))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(enrollment["enrollment_id"].as_i64().expect("enrollment_id"))
}

#[tokio::test]
async fn assigned_instructor_grades_enrollment() -> Result<()> {
    let (server, world) = common::start_with_world().await?;
    let id = enrollment_id(&server, &world).await?;

    let (status, body) = server
        .put(&format!("/instructor/enrollments/{}/grade", id), &world.instructor.token, json!({ "evaluation_score": 85 }))
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["evaluation_score"], 85);
    assert!(body["message"].is_string());

    let stored = server.store_enrollment_score(id).await?;
    assert_eq!(stored, Some(85));
    Ok(())
}

#[tokio::test]
async fn numeric_string_scores_are_accepted() -> Result<()> {
    let (server, world) = common::start_with_world().await?;
    let id = enrollment_id(&server, &world).await?;

    let (status, body) = server
        .put(&format!("/instructor/enrollments/{}/grade", id), &world.instructor.token, json!({ "evaluation_score": "70" }))
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["evaluation_score"], 70);
    Ok(())
}

#[tokio::test]
async fn out_of_range_or_malformed_scores_are_rejected() -> Result<()> {
    let (server, world) = common::start_with_world().await?;
    let id = enrollment_id(&server, &world).await?;
    let path = format!("/instructor/enrollments/{}/grade", id);

    for score in [json!(101), json!(-5), json!("abc"), json!(88.5), json!(null)] {
        let (status, body) = server.put(&path, &world.instructor.token, json!({ "evaluation_score": score })).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} -> {}", score, body);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    assert_eq!(server.store_enrollment_score(id).await?, None);
    Ok(())
}

#[tokio::test]
async fn unassigned_instructor_cannot_grade() -> Result<()> {
    let (server, world) = common::start_with_world().await?;
    let id = enrollment_id(&server, &world).await?;

    let (status, body) = server
        .put(&format!("/instructor/enrollments/{}/grade", id), &world.other_instructor.token, json!({ "evaluation_score": 90 }))
        .await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    assert_eq!(server.store_enrollment_score(id).await?, None);
    Ok(())
}

#[tokio::test]
async fn unknown_enrollment_is_not_found() -> Result<()> {
    let (server, world) = common::start_with_world().await?;

    let (status, _) = server
        .put("/instructor/enrollments/4242/grade", &world.instructor.token, json!({ "evaluation_score": 50 }))
        .await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
