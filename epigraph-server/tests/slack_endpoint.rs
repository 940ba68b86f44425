mod common;

use std::collections::HashMap;

use epigraph_server::slack::HELP_TEXT;
use epigraph_server::slack::dispatcher::CallbackDispatcher;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use common::{
    FakeRenderer, FixtureCatalog, PUBLIC_BASE_URL, assert_no_callback,
    build_test_app, callback_receiver, next_callback,
};

fn chart_link(callback: &Value) -> Url {
    assert_eq!(callback["response_type"], "in_channel");
    assert_eq!(callback["replace_original"], true);
    let image_url = callback["attachments"][0]["image_url"].as_str().unwrap();
    Url::parse(image_url).unwrap()
}

fn query_params(link: &Url) -> HashMap<String, String> {
    link.query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

#[tokio::test]
async fn incomplete_commands_get_help() {
    let app = build_test_app(FixtureCatalog::default(), FakeRenderer { fail: false });

    let response = app.server.get("/slack").await;
    response.assert_status_ok();
    assert_eq!(response.text(), HELP_TEXT);

    let response = app
        .server
        .get("/slack")
        .add_query_param("text", "Dark")
        .add_query_param("response_url", "not a url")
        .await;
    response.assert_status_ok();
    assert_eq!(response.text(), HELP_TEXT);
    assert_eq!(app.catalog.searches(), 0);
}

#[tokio::test]
async fn command_is_acknowledged_then_called_back() {
    let app = build_test_app(FixtureCatalog::default(), FakeRenderer { fail: false });
    let (hook, mut callbacks) = callback_receiver().await;

    let response = app
        .server
        .get("/slack")
        .add_query_param("text", "Breaking Bad")
        .add_query_param("response_url", hook.as_str())
        .await;

    response.assert_status_ok();
    let ack: Value = response.json();
    assert_eq!(ack["response_type"], "in_channel");
    assert!(ack["text"].as_str().unwrap().contains("Breaking Bad"));

    let link = chart_link(&next_callback(&mut callbacks).await);
    assert!(link.as_str().starts_with(PUBLIC_BASE_URL));
    assert_eq!(link.path(), "/graph");
    let params = query_params(&link);
    assert_eq!(params["title"], "Breaking Bad");
    assert!(Uuid::parse_str(&params["uuid"]).is_ok());

    // The callback fires only after the chart is cached.
    let chart = app
        .server
        .get("/graph")
        .add_query_param("title", &params["title"])
        .add_query_param("uuid", &params["uuid"])
        .await;
    chart.assert_status_ok();
    assert_eq!(app.catalog.searches(), 1);
}

#[tokio::test]
async fn form_posts_are_accepted() {
    let app = build_test_app(FixtureCatalog::default(), FakeRenderer { fail: false });
    let (hook, mut callbacks) = callback_receiver().await;

    let response = app
        .server
        .post("/slack")
        .form(&[
            ("command", "/epigraph"),
            ("text", "Dark"),
            ("response_url", hook.as_str()),
        ])
        .await;

    response.assert_status_ok();
    let link = chart_link(&next_callback(&mut callbacks).await);
    assert_eq!(query_params(&link)["title"], "Dark");
}

#[tokio::test]
async fn each_callback_carries_a_fresh_token() {
    let app = build_test_app(FixtureCatalog::default(), FakeRenderer { fail: false });
    let (hook, mut callbacks) = callback_receiver().await;

    for _ in 0..2 {
        app.server
            .get("/slack")
            .add_query_param("text", "Dark")
            .add_query_param("response_url", hook.as_str())
            .await
            .assert_status_ok();
    }

    let first = query_params(&chart_link(&next_callback(&mut callbacks).await));
    let second = query_params(&chart_link(&next_callback(&mut callbacks).await));
    assert_ne!(first["uuid"], second["uuid"]);
}

#[tokio::test]
async fn top_rated_command_links_a_concrete_title() {
    let top = ["Planet Earth II", "Breaking Bad", "Chernobyl"];
    let app = build_test_app(
        FixtureCatalog::with_top_titles(&top),
        FakeRenderer { fail: false },
    );
    let (hook, mut callbacks) = callback_receiver().await;

    let response = app
        .server
        .get("/slack")
        .add_query_param("text", "top250")
        .add_query_param("response_url", hook.as_str())
        .await;
    response.assert_status_ok();

    let link = chart_link(&next_callback(&mut callbacks).await);
    let title = query_params(&link)["title"].clone();
    assert_ne!(title, "top250");
    assert!(top.contains(&title.as_str()));
}

#[tokio::test]
async fn empty_top_rated_chart_is_reported_in_the_acknowledgment() {
    let app = build_test_app(FixtureCatalog::default(), FakeRenderer { fail: false });
    let (hook, mut callbacks) = callback_receiver().await;

    let response = app
        .server
        .get("/slack")
        .add_query_param("text", "top250")
        .add_query_param("response_url", hook.as_str())
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["text"],
        "The top rated TV chart is empty"
    );
    assert_no_callback(&mut callbacks).await;
}

#[tokio::test]
async fn background_failures_are_not_called_back() {
    let app = build_test_app(FixtureCatalog::default(), FakeRenderer { fail: false });
    let (hook, mut callbacks) = callback_receiver().await;

    let response = app
        .server
        .get("/slack")
        .add_query_param("text", "zzqxq")
        .add_query_param("response_url", hook.as_str())
        .await;

    response.assert_status_ok();
    assert_no_callback(&mut callbacks).await;
}

#[tokio::test]
async fn links_keep_the_public_base_path() {
    let app = build_test_app(FixtureCatalog::default(), FakeRenderer { fail: false });
    let link = app.callbacks.chart_link("Dark");
    assert_eq!(link.path(), "/graph");

    let dispatcher = CallbackDispatcher::new(
        app.charts.clone(),
        reqwest::Client::new(),
        Url::parse("https://example.com/epigraph/").unwrap(),
    )
    .unwrap();
    let link = dispatcher.chart_link("The Office (US)");
    assert_eq!(link.path(), "/epigraph/graph");
    assert_eq!(query_params(&link)["title"], "The Office (US)");
}
