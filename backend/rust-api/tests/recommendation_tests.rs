use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_personalized_scores_and_reasons() {
    let app = common::create_test_app();
    let profile = common::onboard_profile(&app, "Asha", "beginner", &["web-development"]).await;
    let id = profile["id"].as_str().unwrap();

    let (status, recs) = common::request(
        &app,
        "GET",
        &format!("/api/v1/profiles/{id}/recommendations?limit=6"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let recs = recs.as_array().unwrap();
    assert_eq!(recs.len(), 6);

    assert_eq!(recs[0]["course"]["id"], "web-dev-fundamentals");
    assert_eq!(recs[0]["relevance_score"], 100);
    assert_eq!(
        recs[0]["reason"],
        "Consolidate your current level. Matches your interests. No prerequisites required. Popular course. Highly rated."
    );
    assert_eq!(recs[0]["type"], "similar");

    assert_eq!(recs[1]["course"]["id"], "python-basics");
    assert_eq!(recs[1]["relevance_score"], 85);

    // Equal scores keep catalog order
    assert_eq!(recs[2]["course"]["id"], "react-intermediate");
    assert_eq!(recs[2]["relevance_score"], 75);
    assert_eq!(recs[2]["type"], "next-step");
    assert_eq!(recs[3]["course"]["id"], "api-design");
    assert_eq!(recs[3]["relevance_score"], 75);

    assert_eq!(recs[4]["course"]["id"], "system-design");
    assert_eq!(recs[4]["type"], "trending");
    assert_eq!(recs[5]["course"]["id"], "ml-production");
}

#[tokio::test]
async fn test_recommendations_exclude_enrolled_courses() {
    let app = common::create_test_app();
    let profile = common::onboard_profile(&app, "Asha", "beginner", &[]).await;
    let id = profile["id"].as_str().unwrap();

    let (status, _) = common::request(
        &app,
        "POST",
        &format!("/api/v1/profiles/{id}/enrollments/web-dev-fundamentals"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, recs) = common::request(
        &app,
        "GET",
        &format!("/api/v1/profiles/{id}/recommendations"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let recs = recs.as_array().unwrap();
    assert_eq!(recs.len(), 5);
    assert!(recs
        .iter()
        .all(|rec| rec["course"]["id"] != "web-dev-fundamentals"));
}

#[tokio::test]
async fn test_next_steps_unlock_after_completion() {
    let app = common::create_test_app();
    let profile = common::onboard_profile(&app, "Ravi", "beginner", &[]).await;
    let id = profile["id"].as_str().unwrap();

    let (status, recs) = common::request(
        &app,
        "GET",
        &format!("/api/v1/profiles/{id}/recommendations/next-steps"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(recs.as_array().unwrap().is_empty());

    complete_course(&app, id, "web-dev-fundamentals").await;

    let (status, recs) = common::request(
        &app,
        "GET",
        &format!("/api/v1/profiles/{id}/recommendations/next-steps"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let recs = recs.as_array().unwrap();
    assert_eq!(recs.len(), 2);

    assert_eq!(recs[0]["course"]["id"], "react-intermediate");
    assert_eq!(recs[0]["relevance_score"], 100);
    assert_eq!(recs[0]["reason"], "You've completed all prerequisites");
    assert_eq!(recs[0]["type"], "next-step");

    assert_eq!(recs[1]["course"]["id"], "api-design");
    assert_eq!(recs[1]["relevance_score"], 99);
}

#[tokio::test]
async fn test_continue_learning_orders_by_recency() {
    let app = common::create_test_app();
    let profile = common::onboard_profile(&app, "Lena", "beginner", &[]).await;
    let id = profile["id"].as_str().unwrap();

    for course in ["web-dev-fundamentals", "python-basics"] {
        let (status, _) = common::request(
            &app,
            "POST",
            &format!("/api/v1/profiles/{id}/enrollments/{course}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // Touching a python lesson makes it the most recently accessed course
    let (status, _) = common::request(
        &app,
        "POST",
        &format!(
            "/api/v1/profiles/{id}/courses/python-basics/modules/python-intro/lessons/python-variables/complete"
        ),
        Some(json!({ "time_spent_minutes": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, courses) = common::request(
        &app,
        "GET",
        &format!("/api/v1/profiles/{id}/continue-learning"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = courses
        .as_array()
        .unwrap()
        .iter()
        .map(|course| course["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["python-basics", "web-dev-fundamentals"]);
}

#[tokio::test]
async fn test_continue_learning_drops_completed_courses() {
    let app = common::create_test_app();
    let profile = common::onboard_profile(&app, "Lena", "advanced", &[]).await;
    let id = profile["id"].as_str().unwrap();

    complete_course(&app, id, "ml-production").await;

    let (status, courses) = common::request(
        &app,
        "GET",
        &format!("/api/v1/profiles/{id}/continue-learning"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(courses.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_skill_suggestion_tracks_completions() {
    let app = common::create_test_app();
    let profile = common::onboard_profile(&app, "Omar", "beginner", &[]).await;
    let id = profile["id"].as_str().unwrap();
    let uri = format!("/api/v1/profiles/{id}/skill-suggestion");

    let (status, suggestion) = common::request(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(suggestion["suggested_level"], "beginner");

    complete_course(&app, id, "ml-production").await;

    let (status, suggestion) = common::request(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(suggestion["suggested_level"], "intermediate");
}

#[tokio::test]
async fn test_prerequisite_check_lists_missing_in_order() {
    let app = common::create_test_app();
    let profile = common::onboard_profile(&app, "Omar", "intermediate", &[]).await;
    let id = profile["id"].as_str().unwrap();
    let uri = format!("/api/v1/profiles/{id}/courses/system-design/prerequisites");

    let (status, check) = common::request(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(check["meets"], false);
    let missing: Vec<&str> = check["missing"]
        .as_array()
        .unwrap()
        .iter()
        .map(|course| course["id"].as_str().unwrap())
        .collect();
    assert_eq!(missing, vec!["react-intermediate", "api-design"]);

    complete_course(&app, id, "react-intermediate").await;

    let (status, check) = common::request(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(check["meets"], false);
    assert_eq!(check["missing"].as_array().unwrap().len(), 1);
    assert_eq!(check["missing"][0]["id"], "api-design");

    complete_course(&app, id, "api-design").await;

    let (status, check) = common::request(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(check["meets"], true);
    assert!(check["missing"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_prerequisite_check_passes_without_prereqs() {
    let app = common::create_test_app();
    let profile = common::onboard_profile(&app, "Omar", "beginner", &[]).await;
    let id = profile["id"].as_str().unwrap();

    let (status, check) = common::request(
        &app,
        "GET",
        &format!("/api/v1/profiles/{id}/courses/web-dev-fundamentals/prerequisites"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(check["meets"], true);
    assert!(check["missing"].as_array().unwrap().is_empty());
}

/// Enrolls and completes every lesson of the course through the API.
async fn complete_course(app: &axum::Router, profile_id: &str, course_id: &str) {
    let (status, course) =
        common::request(app, "GET", &format!("/api/v1/courses/{course_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::request(
        app,
        "POST",
        &format!("/api/v1/profiles/{profile_id}/enrollments/{course_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for module in course["modules"].as_array().unwrap() {
        let module_id = module["id"].as_str().unwrap();
        for lesson in module["lessons"].as_array().unwrap() {
            let lesson_id = lesson["id"].as_str().unwrap();
            let uri = format!(
                "/api/v1/profiles/{profile_id}/courses/{course_id}/modules/{module_id}/lessons/{lesson_id}/complete"
            );
            let (status, _) =
                common::request(app, "POST", &uri, Some(json!({ "time_spent_minutes": 10 })))
                    .await;
            assert_eq!(status, StatusCode::OK);
        }
    }
}
