//! Profiles and rating history, both own-account only.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::Value;

#[tokio::test]
async fn profile_includes_stats() {
    let ctx = TestContext::new();
    let anna = ctx.register_and_login("anna").await;
    let bob = ctx.register_and_login("bob").await;

    let m1 = ctx
        .create_media(
            &bob,
            &fixtures::full_media_payload("Dune", "Movie", "SciFi", 2021, 12),
        )
        .await;
    let m2 = ctx
        .create_media(
            &bob,
            &fixtures::full_media_payload("Arrival", "Movie", "SciFi", 2016, 12),
        )
        .await;

    for (id, stars) in [(m1, 5), (m2, 3)] {
        ctx.server
            .post(&format!("/api/media/{id}/ratings"))
            .add_header("Authorization", format!("Bearer {anna}"))
            .json(&fixtures::rating_payload(stars))
            .await
            .assert_status(StatusCode::CREATED);
    }
    ctx.server
        .post(&format!("/api/media/{m1}/favorite"))
        .add_header("Authorization", format!("Bearer {anna}"))
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .get("/api/users/anna/profile")
        .add_header("Authorization", format!("Bearer {anna}"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["username"], "anna");
    assert_eq!(body["stats"]["totalRatings"], 2);
    assert_eq!(body["stats"]["averageStars"], 4.0);
    assert_eq!(body["stats"]["favoriteGenre"], "SciFi");
    assert_eq!(body["stats"]["favoritesCount"], 1);
}

#[tokio::test]
async fn profile_of_another_user_is_403() {
    let ctx = TestContext::new();
    let anna = ctx.register_and_login("anna").await;
    ctx.register_and_login("bob").await;

    let response = ctx
        .server
        .get("/api/users/bob/profile")
        .add_header("Authorization", format!("Bearer {anna}"))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let body: Value = response.json();
    assert_eq!(body["error"], "You can only view your own profile.");
}

#[tokio::test]
async fn profile_of_unknown_user_is_404() {
    let ctx = TestContext::new();
    let anna = ctx.register_and_login("anna").await;

    let response = ctx
        .server
        .get("/api/users/ghost/profile")
        .add_header("Authorization", format!("Bearer {anna}"))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"], "User not found.");
}

#[tokio::test]
async fn profile_update_round_trip() {
    let ctx = TestContext::new();
    let anna = ctx.register_and_login("anna").await;

    let response = ctx
        .server
        .put("/api/users/anna/profile")
        .add_header("Authorization", format!("Bearer {anna}"))
        .json(&serde_json::json!({ "displayName": "Anna K.", "bio": "watches everything" }))
        .await;
    response.assert_status_ok();

    let response = ctx
        .server
        .get("/api/users/anna/profile")
        .add_header("Authorization", format!("Bearer {anna}"))
        .await;
    let body: Value = response.json();
    assert_eq!(body["displayName"], "Anna K.");
    assert_eq!(body["bio"], "watches everything");
}

#[tokio::test]
async fn editing_another_users_profile_is_403() {
    let ctx = TestContext::new();
    let anna = ctx.register_and_login("anna").await;
    ctx.register_and_login("bob").await;

    let response = ctx
        .server
        .put("/api/users/bob/profile")
        .add_header("Authorization", format!("Bearer {anna}"))
        .json(&serde_json::json!({ "displayName": "gotcha" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let body: Value = response.json();
    assert_eq!(body["error"], "You can only edit your own profile.");
}

#[tokio::test]
async fn rating_history_shows_own_unconfirmed_comments() {
    let ctx = TestContext::new();
    let anna = ctx.register_and_login("anna").await;
    let media_id = ctx
        .create_media(&anna, &fixtures::media_payload("Dune", "Movie"))
        .await;

    ctx.server
        .post(&format!("/api/media/{media_id}/ratings"))
        .add_header("Authorization", format!("Bearer {anna}"))
        .json(&fixtures::rating_with_comment(5, "private note"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .get("/api/users/anna/ratings")
        .add_header("Authorization", format!("Bearer {anna}"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["mediaTitle"], "Dune");
    assert_eq!(items[0]["stars"], 5);
    assert_eq!(items[0]["comment"], "private note");
    assert_eq!(items[0]["commentConfirmed"], false);
}

#[tokio::test]
async fn rating_history_of_another_user_is_403() {
    let ctx = TestContext::new();
    let anna = ctx.register_and_login("anna").await;
    ctx.register_and_login("bob").await;

    let response = ctx
        .server
        .get("/api/users/bob/ratings")
        .add_header("Authorization", format!("Bearer {anna}"))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let body: Value = response.json();
    assert_eq!(body["error"], "You can only view your own rating history.");
}
