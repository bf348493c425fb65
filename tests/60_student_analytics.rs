mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn enrollment_is_unique_per_course() -> Result<()> {
    let (server, world) = common::start_with_world().await?;
    let path = format!("/student/courses/{}/enroll", world.course_id);

    let (first, enrollment) = server.post(&path, &world.student.token, json!({})).await?;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(enrollment["student_id"], world.student.id());
    assert_eq!(enrollment["evaluation_score"], serde_json::Value::Null);

    let (second, _) = server.post(&path, &world.student.token, json!({})).await?;
    assert_eq!(second, StatusCode::CONFLICT);

    let (missing, _) = server.post("/student/courses/777/enroll", &world.student.token, json!({})).await?;
    assert_eq!(missing, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn completion_requires_enrollment() -> Result<()> {
    let (server, world) = common::start_with_world().await?;
    let token = &world.instructor.token;
    let modules = format!("/instructor/courses/{}/modules", world.course_id);
    server
        .post(&modules, token, json!({ "module_number": 1, "name": "Intro", "duration_weeks": 1 }))
        .await?;
    server
        .post(&format!("{}/1/content", modules), token, json!({ "content_id": 1, "title": "Welcome", "content_type": "Video" }))
        .await?;

    let complete = format!("/student/courses/{}/modules/1/content/1/complete", world.course_id);
    let (status, _) = server.post(&complete, &world.student.token, json!({})).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    server
        .post(&format!("/student/courses/{}/enroll", world.course_id), &world.student.token, json!({}))
        .await?;
    let (status, _) = server.post(&complete, &world.student.token, json!({})).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (again, _) = server.post(&complete, &world.student.token, json!({})).await?;
    assert_eq!(again, StatusCode::CONFLICT);

    let (status, body) = server
        .get(&format!("/student/courses/{}/progress", world.course_id), &world.student.token)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"][0]["content_id"], 1);
    assert_eq!(body["progress"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn instructors_cannot_use_student_routes() -> Result<()> {
    let (server, world) = common::start_with_world().await?;

    let (status, _) = server
        .post(&format!("/student/courses/{}/enroll", world.course_id), &world.instructor.token, json!({}))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn summary_reports_grades_and_curriculum() -> Result<()> {
    let (server, world) = common::start_with_world().await?;
    server
        .post(
            &format!("/instructor/courses/{}/modules", world.course_id),
            &world.instructor.token,
            json!({ "module_number": 1, "name": "Intro", "duration_weeks": 1 }),
        )
        .await?;
    let (_, enrollment) = server
        .post(&format!("/student/courses/{}/enroll", world.course_id), &world.student.token, json!({}))
        .await?;
    server
        .put(
            &format!("/instructor/enrollments/{}/grade", enrollment["enrollment_id"]),
            &world.instructor.token,
            json!({ "evaluation_score": 90 }),
        )
        .await?;

    let path = format!("/analytics/courses/{}/summary", world.course_id);
    for token in [&world.analyst.token, &world.admin.token] {
        let (status, summary) = server.get(&path, token).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["enrollments"], 1);
        assert_eq!(summary["graded"], 1);
        assert_eq!(summary["average_score"], 90.0);
        assert_eq!(summary["modules"], 1);
        assert_eq!(summary["content_items"], 0);
    }

    let (instructor, _) = server.get(&path, &world.instructor.token).await?;
    assert_eq!(instructor, StatusCode::FORBIDDEN);

    let (missing, _) = server.get("/analytics/courses/555/summary", &world.analyst.token).await?;
    assert_eq!(missing, StatusCode::NOT_FOUND);
    Ok(())
}
