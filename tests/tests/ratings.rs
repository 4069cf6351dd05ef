//! Rating lifecycle: create, moderate comments, like, update, delete.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::Value;

async fn media_with_rating(ctx: &TestContext, owner: &str, rater: &str) -> (String, String, i64, i64) {
    let owner_token = ctx.register_and_login(owner).await;
    let rater_token = ctx.register_and_login(rater).await;
    let media_id = ctx
        .create_media(&owner_token, &fixtures::media_payload("Dune", "Movie"))
        .await;

    let response = ctx
        .server
        .post(&format!("/api/media/{media_id}/ratings"))
        .add_header("Authorization", format!("Bearer {rater_token}"))
        .json(&fixtures::rating_with_comment(5, "masterpiece"))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let rating_id = body["id"].as_i64().unwrap();

    (owner_token, rater_token, media_id, rating_id)
}

#[tokio::test]
async fn rating_requires_valid_stars() {
    let ctx = TestContext::new();
    let token = ctx.register_and_login("anna").await;
    let media_id = ctx
        .create_media(&token, &fixtures::media_payload("Dune", "Movie"))
        .await;

    for stars in [0, 6, -1] {
        let response = ctx
            .server
            .post(&format!("/api/media/{media_id}/ratings"))
            .add_header("Authorization", format!("Bearer {token}"))
            .json(&fixtures::rating_payload(stars))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["error"], "Stars must be between 1 and 5.");
    }
}

#[tokio::test]
async fn second_rating_of_same_media_conflicts() {
    let ctx = TestContext::new();
    let (_, rater_token, media_id, _) = media_with_rating(&ctx, "owner", "rater").await;

    let response = ctx
        .server
        .post(&format!("/api/media/{media_id}/ratings"))
        .add_header("Authorization", format!("Bearer {rater_token}"))
        .json(&fixtures::rating_payload(3))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let body: Value = response.json();
    assert_eq!(body["error"], "You already rated this media.");
    assert_eq!(ctx.store.rating_count(), 1);
}

#[tokio::test]
async fn unconfirmed_comment_only_visible_to_author() {
    let ctx = TestContext::new();
    let (owner_token, rater_token, media_id, rating_id) =
        media_with_rating(&ctx, "owner", "rater").await;

    // Another user sees the rating but not the unconfirmed comment.
    let response = ctx
        .server
        .get(&format!("/api/media/{media_id}/ratings"))
        .add_header("Authorization", format!("Bearer {owner_token}"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let item = &body["items"][0];
    assert_eq!(item["stars"], 5);
    assert!(item.get("comment").is_none());

    // The author does.
    let response = ctx
        .server
        .get(&format!("/api/media/{media_id}/ratings"))
        .add_header("Authorization", format!("Bearer {rater_token}"))
        .await;
    let body: Value = response.json();
    assert_eq!(body["items"][0]["comment"], "masterpiece");

    // After confirmation every reader sees it.
    let response = ctx
        .server
        .post(&format!("/api/ratings/{rating_id}/confirm"))
        .add_header("Authorization", format!("Bearer {rater_token}"))
        .await;
    response.assert_status_ok();

    let response = ctx
        .server
        .get(&format!("/api/media/{media_id}/ratings"))
        .add_header("Authorization", format!("Bearer {owner_token}"))
        .await;
    let body: Value = response.json();
    assert_eq!(body["items"][0]["comment"], "masterpiece");
}

#[tokio::test]
async fn only_the_author_may_confirm() {
    let ctx = TestContext::new();
    let (owner_token, _, _, rating_id) = media_with_rating(&ctx, "owner", "rater").await;

    let response = ctx
        .server
        .post(&format!("/api/ratings/{rating_id}/confirm"))
        .add_header("Authorization", format!("Bearer {owner_token}"))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "You are not allowed to confirm this rating or it does not exist."
    );
}

#[tokio::test]
async fn editing_a_rating_unconfirms_its_comment() {
    let ctx = TestContext::new();
    let (owner_token, rater_token, media_id, rating_id) =
        media_with_rating(&ctx, "owner", "rater").await;

    ctx.server
        .post(&format!("/api/ratings/{rating_id}/confirm"))
        .add_header("Authorization", format!("Bearer {rater_token}"))
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .put(&format!("/api/ratings/{rating_id}"))
        .add_header("Authorization", format!("Bearer {rater_token}"))
        .json(&fixtures::rating_with_comment(2, "changed my mind"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["stars"], 2);
    assert_eq!(body["commentConfirmed"], false);

    // Other readers no longer see the edited comment.
    let response = ctx
        .server
        .get(&format!("/api/media/{media_id}/ratings"))
        .add_header("Authorization", format!("Bearer {owner_token}"))
        .await;
    let body: Value = response.json();
    assert!(body["items"][0].get("comment").is_none());
}

#[tokio::test]
async fn update_by_non_author_is_403() {
    let ctx = TestContext::new();
    let (owner_token, _, _, rating_id) = media_with_rating(&ctx, "owner", "rater").await;

    let response = ctx
        .server
        .put(&format!("/api/ratings/{rating_id}"))
        .add_header("Authorization", format!("Bearer {owner_token}"))
        .json(&fixtures::rating_payload(1))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let body: Value = response.json();
    assert_eq!(body["error"], "You are not allowed to update this rating.");
}

#[tokio::test]
async fn update_of_missing_rating_is_404() {
    let ctx = TestContext::new();
    let token = ctx.register_and_login("anna").await;

    let response = ctx
        .server
        .put("/api/ratings/999")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&fixtures::rating_payload(3))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"], "Rating not found.");
}

#[tokio::test]
async fn likes_are_unique_per_user() {
    let ctx = TestContext::new();
    let (owner_token, _, media_id, rating_id) = media_with_rating(&ctx, "owner", "rater").await;

    let response = ctx
        .server
        .post(&format!("/api/ratings/{rating_id}/like"))
        .add_header("Authorization", format!("Bearer {owner_token}"))
        .await;
    response.assert_status_ok();

    let response = ctx
        .server
        .post(&format!("/api/ratings/{rating_id}/like"))
        .add_header("Authorization", format!("Bearer {owner_token}"))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let body: Value = response.json();
    assert_eq!(body["error"], "You already liked this rating.");

    let response = ctx
        .server
        .get(&format!("/api/media/{media_id}/ratings"))
        .add_header("Authorization", format!("Bearer {owner_token}"))
        .await;
    let body: Value = response.json();
    assert_eq!(body["items"][0]["likeCount"], 1);
}

#[tokio::test]
async fn removing_an_absent_like_is_404() {
    let ctx = TestContext::new();
    let (owner_token, _, _, rating_id) = media_with_rating(&ctx, "owner", "rater").await;

    let response = ctx
        .server
        .delete(&format!("/api/ratings/{rating_id}/like"))
        .add_header("Authorization", format!("Bearer {owner_token}"))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"], "Like not found.");
}

#[tokio::test]
async fn delete_by_non_author_is_403() {
    let ctx = TestContext::new();
    let (owner_token, rater_token, _, rating_id) = media_with_rating(&ctx, "owner", "rater").await;

    let response = ctx
        .server
        .delete(&format!("/api/ratings/{rating_id}"))
        .add_header("Authorization", format!("Bearer {owner_token}"))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "You are not allowed to delete this rating or it does not exist."
    );

    let response = ctx
        .server
        .delete(&format!("/api/ratings/{rating_id}"))
        .add_header("Authorization", format!("Bearer {rater_token}"))
        .await;
    response.assert_status_ok();
    assert_eq!(ctx.store.rating_count(), 0);
}

#[tokio::test]
async fn stats_follow_the_ratings() {
    let ctx = TestContext::new();
    let (owner_token, _, media_id, _) = media_with_rating(&ctx, "owner", "rater").await;

    // Second rating from another user.
    let third = ctx.register_and_login("third").await;
    ctx.server
        .post(&format!("/api/media/{media_id}/ratings"))
        .add_header("Authorization", format!("Bearer {third}"))
        .json(&fixtures::rating_payload(3))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .get(&format!("/api/media/{media_id}"))
        .add_header("Authorization", format!("Bearer {owner_token}"))
        .await;
    let body: Value = response.json();
    assert_eq!(body["ratingsCount"], 2);
    assert_eq!(body["averageScore"], 4.0);
}
