//! Recommendations through the HTTP surface.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::Value;

/// Anna rates one Sci-Fi movie highly; the endpoint must score the unrated
/// catalog against that history.
async fn seed_profile(ctx: &TestContext) -> String {
    let curator = ctx.register_and_login("curator").await;
    let anna = ctx.register_and_login("anna").await;

    let rated = ctx
        .create_media(
            &curator,
            &fixtures::full_media_payload("Dune", "Movie", "Sci-Fi", 2021, 16),
        )
        .await;
    ctx.server
        .post(&format!("/api/media/{rated}/ratings"))
        .add_header("Authorization", format!("Bearer {anna}"))
        .json(&fixtures::rating_payload(5))
        .await
        .assert_status(StatusCode::CREATED);

    // Full match: genre, type, and age all fit.
    ctx.create_media(
        &curator,
        &fixtures::full_media_payload("Arrival", "Movie", "Sci-Fi", 2016, 12),
    )
    .await;
    // Genre and type match, but the age restriction is too high.
    ctx.create_media(
        &curator,
        &fixtures::full_media_payload("Alien", "Movie", "Sci-Fi", 1979, 18),
    )
    .await;
    // No overlap at all. No age restriction either, so no rule can match.
    ctx.create_media(
        &curator,
        &serde_json::json!({
            "title": "Notebook",
            "mediaType": "Book",
            "genre": "Romance",
            "releaseYear": 2004,
        }),
    )
    .await;

    anna
}

#[tokio::test]
async fn scoring_reasons_and_filtering() {
    let ctx = TestContext::new();
    let anna = seed_profile(&ctx).await;

    let response = ctx
        .server
        .get("/api/users/anna/recommendations")
        .add_header("Authorization", format!("Bearer {anna}"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let items = body["items"].as_array().unwrap();

    // The zero-score candidate and the already-rated item are absent.
    assert_eq!(items.len(), 2);

    assert_eq!(items[0]["title"], "Arrival");
    assert_eq!(items[0]["score"], 4);
    assert_eq!(
        items[0]["reason"],
        "Genre matches your highly rated media (+2); \
         MediaType matches your most frequent favorite (+1); \
         AgeRestriction fits your previous favorites (+1)"
    );

    assert_eq!(items[1]["title"], "Alien");
    assert_eq!(items[1]["score"], 3);
}

#[tokio::test]
async fn age_restriction_zero_satisfies_the_age_rule() {
    let ctx = TestContext::new();
    let anna = seed_profile(&ctx).await;
    let curator_token = ctx.register_and_login("curator2").await;

    // Nothing in common with Anna's history except an age restriction of 0,
    // which is within her preferred maximum of 16.
    ctx.create_media(
        &curator_token,
        &fixtures::full_media_payload("Bluey", "Series", "Kids", 2018, 0),
    )
    .await;

    let response = ctx
        .server
        .get("/api/users/anna/recommendations")
        .add_header("Authorization", format!("Bearer {anna}"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);

    assert_eq!(items[2]["title"], "Bluey");
    assert_eq!(items[2]["score"], 1);
    assert_eq!(
        items[2]["reason"],
        "AgeRestriction fits your previous favorites (+1)"
    );
}

#[tokio::test]
async fn empty_history_yields_no_recommendations() {
    let ctx = TestContext::new();
    let curator = ctx.register_and_login("curator").await;
    let anna = ctx.register_and_login("anna").await;

    ctx.create_media(
        &curator,
        &fixtures::full_media_payload("Dune", "Movie", "Sci-Fi", 2021, 16),
    )
    .await;

    let response = ctx
        .server
        .get("/api/users/anna/recommendations")
        .add_header("Authorization", format!("Bearer {anna}"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn limit_is_clamped() {
    let ctx = TestContext::new();
    let anna = seed_profile(&ctx).await;

    // Non-positive limits fall back to the default rather than erroring.
    let response = ctx
        .server
        .get("/api/users/anna/recommendations")
        .add_query_param("limit", "0")
        .add_header("Authorization", format!("Bearer {anna}"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let response = ctx
        .server
        .get("/api/users/anna/recommendations")
        .add_query_param("limit", "1")
        .add_header("Authorization", format!("Bearer {anna}"))
        .await;
    let body: Value = response.json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Arrival");
}

#[tokio::test]
async fn recommendations_are_own_account_only() {
    let ctx = TestContext::new();
    let anna = ctx.register_and_login("anna").await;
    ctx.register_and_login("bob").await;

    let response = ctx
        .server
        .get("/api/users/bob/recommendations")
        .add_header("Authorization", format!("Bearer {anna}"))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let body: Value = response.json();
    assert_eq!(body["error"], "You can only view your own recommendations.");
}

#[tokio::test]
async fn recommendations_require_a_session() {
    let ctx = TestContext::new();
    ctx.register_and_login("anna").await;

    let response = ctx.server.get("/api/users/anna/recommendations").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
