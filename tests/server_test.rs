use anyhow::Result;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use newcool_search::catalog::Catalog;
use newcool_search::server::{router, AppState};

fn test_state() -> AppState {
    AppState::new(Catalog::builtin().expect("builtin catalog"), "test")
}

async fn send(state: &AppState, method: Method, uri: &str) -> Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())?;

    let response = router(state.clone()).oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;

    Ok((status, body))
}

async fn get(state: &AppState, uri: &str) -> Result<(StatusCode, Value)> {
    send(state, Method::GET, uri).await
}

#[tokio::test]
async fn test_search_envelope() -> Result<()> {
    let state = test_state();
    let (status, body) = get(&state, "/api/search?q=tabla").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["query"], "tabla");
    assert_eq!(body["data"]["filters"]["type"], "all");
    assert!(body["data"]["filters"].get("subject").is_none());
    assert_eq!(body["meta"]["total"], 13);
    assert_eq!(body["meta"]["limit"], 20);
    assert_eq!(body["meta"]["offset"], 0);

    let first = &body["data"]["results"][0];
    assert_eq!(first["type"], "music");
    assert_eq!(first["id"], "t001");
    assert_eq!(first["score"], 18);

    Ok(())
}

#[tokio::test]
async fn test_search_filters_and_pagination() -> Result<()> {
    let state = test_state();
    let (status, body) = get(
        &state,
        "/api/search?q=newcool&type=modules&limit=4&offset=4",
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["filters"]["type"], "modules");
    assert_eq!(body["meta"]["total"], 6);
    assert_eq!(body["meta"]["limit"], 4);
    assert_eq!(body["meta"]["offset"], 4);

    let results = body["data"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r["type"] == "module"));

    let (_, body) = get(&state, "/api/search?q=tabla&subject=math&genre=reggaeton").await?;
    assert_eq!(body["meta"]["total"], 9);
    assert_eq!(body["data"]["filters"]["subject"], "math");
    assert_eq!(body["data"]["filters"]["genre"], "reggaeton");

    Ok(())
}

#[tokio::test]
async fn test_search_validation_errors() -> Result<()> {
    let state = test_state();

    for uri in [
        "/api/search",
        "/api/search?q=",
        "/api/search?q=tabla&limit=0",
        "/api/search?q=tabla&limit=101",
        "/api/search?q=tabla&limit=ten",
        "/api/search?q=tabla&offset=-3",
        "/api/search?q=tabla&type=podcasts",
    ] {
        let (status, body) = get(&state, uri).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["success"], false, "{uri}");
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()), "{uri}");
        assert!(body.get("data").is_none(), "{uri}");
    }

    Ok(())
}

#[tokio::test]
async fn test_repeated_and_blank_params() -> Result<()> {
    let state = test_state();

    // last value wins for a repeated key
    let (status, body) = get(&state, "/api/search?q=tabla&q=mind").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["query"], "mind");
    assert_eq!(body["data"]["results"][0]["id"], "mind-os");

    let (status, body) = get(&state, "/api/search?q=tabla&offset=").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["offset"], 0);
    assert_eq!(body["meta"]["total"], 13);

    let (status, body) = get(&state, "/api/search?q=tabla&limit=5&limit=500").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("limit"));

    Ok(())
}

#[tokio::test]
async fn test_search_without_matches() -> Result<()> {
    let state = test_state();
    let (status, body) = get(&state, "/api/search?q=zzzznonexistent").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);
    assert_eq!(body["data"]["results"].as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_stats_bypass_validation() -> Result<()> {
    let state = test_state();
    let (status, body) = get(&state, "/api/search?stats=true").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["music"]["total"], 25);
    assert_eq!(body["data"]["music"]["indexed"], 25);
    assert_eq!(body["data"]["courses"]["total"], 12);
    assert_eq!(body["data"]["modules"]["total"], 10);
    assert!(body["data"]["lastUpdated"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_play_is_visible_in_search() -> Result<()> {
    let state = test_state();

    let (status, body) = send(&state, Method::POST, "/api/music/t001/play").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["plays"], 45231);

    let (status, body) = send(&state, Method::POST, "/api/music/t001/like").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["likes"], 3201);

    let (_, body) = get(&state, "/api/search?q=tabla&type=music&limit=1").await?;
    let hit = &body["data"]["results"][0];
    assert_eq!(hit["id"], "t001");
    assert_eq!(hit["plays"], 45231);
    assert_eq!(hit["likes"], 3201);

    Ok(())
}

#[tokio::test]
async fn test_unknown_track_not_found() -> Result<()> {
    let state = test_state();
    let (status, body) = send(&state, Method::POST, "/api/music/t999/play").await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No encontrado");

    Ok(())
}

#[tokio::test]
async fn test_health() -> Result<()> {
    let state = test_state();
    let (status, body) = get(&state, "/api/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "newcool-search");
    assert_eq!(body["environment"], "test");
    assert!(body["uptime"].as_str().unwrap().ends_with('s'));

    Ok(())
}
