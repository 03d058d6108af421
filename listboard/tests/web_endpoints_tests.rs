use axum::http::{Method, StatusCode};

mod common;

use common::{form, get, setup};

#[tokio::test]
async fn can_check_health_endpoint() {
    let ctx = setup();

    let (status, body) = ctx.send(get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn can_render_index_page_with_both_boards() {
    let ctx = setup();
    ctx.send(form(Method::POST, "/todos", "title=Plan+trip")).await;
    ctx.send(form(Method::POST, "/messages", "username=eve&message=see+you"))
        .await;

    let (status, body) = ctx.send(get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("Plan trip"));
    assert!(body.contains("eve"));
    assert!(body.contains("see you"));
}

#[tokio::test]
async fn can_return_not_found_for_unknown_routes() {
    let ctx = setup();

    let (status, _) = ctx.send(get("/nowhere")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
