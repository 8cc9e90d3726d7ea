use claims::assert_matches;
use httpmock::Method::GET;
use mailgun_manager::{Error, StatusFamily};
use serde_json::json;

use crate::helpers::{DOMAIN, TestApp, spawn_app};

async fn mock_campaign(app: &TestApp, status: u16) {
    app.server
        .mock_async(|when, then| {
            when.method(GET).path(app.path(&format!("/{DOMAIN}/campaigns/c1")));
            then.status(status).json_body(json!({
                "id": "c1",
                "name": "Spring Sale",
                "created_at": "Thu, 29 Feb 2024 10:00:00 GMT",
                "delivered_count": 2,
                "opened_count": 1,
                "clicked_count": 0
            }));
        })
        .await;
}

async fn mock_events(app: &TestApp, events: serde_json::Value) {
    app.server
        .mock_async(|when, then| {
            when.method(GET).path(app.path(&format!("/{DOMAIN}/campaigns/c1/events")));
            then.status(200).json_body(events);
        })
        .await;
}

#[tokio::test]
async fn campaign_keys_are_converted() {
    let app = spawn_app().await;
    mock_campaign(&app, 200).await;

    let campaign = app.client.campaign("c1").await.expect("get").expect("2xx");

    assert_eq!(campaign.id.as_deref(), Some("c1"));
    assert_eq!(campaign.name.as_deref(), Some("Spring Sale"));
    assert_eq!(campaign.created_at.as_deref(), Some("Thu, 29 Feb 2024 10:00:00 GMT"));
    assert_eq!(campaign.delivered_count, Some(2));
    assert_eq!(campaign.opened_count, Some(1));
    assert_eq!(campaign.bounced_count, None);
}

#[tokio::test]
async fn events_keep_wire_key_order() {
    let app = spawn_app().await;
    mock_events(
        &app,
        json!([
            { "recipient": "alice@example.com", "event": "opened", "timestamp": 1709200000 },
            { "recipient": "bob@example.com", "event": "clicked", "timestamp": 1709200100 }
        ]),
    )
    .await;

    let events = app.client.campaign_events("c1").await.expect("events").expect("2xx");

    assert_eq!(events.len(), 2);
    let keys: Vec<&str> = events[0].keys().map(String::as_str).collect();
    assert_eq!(keys, ["recipient", "event", "timestamp"]);
}

#[tokio::test]
async fn events_are_saved_as_csv() {
    let app = spawn_app().await;
    mock_campaign(&app, 200).await;
    mock_events(
        &app,
        json!([
            { "recipient": "alice@example.com", "event": "opened", "tags": ["spring", "sale"] },
            { "event": "clicked", "recipient": "bob@example.com", "url": "https://example.com" },
            { "recipient": "carol@example.com", "event": null }
        ]),
    )
    .await;
    let dir = tempfile::tempdir().expect("temp dir");

    let path = app
        .client
        .save_campaign_events_csv("c1", dir.path())
        .await
        .expect("export");

    assert_eq!(path.parent(), Some(dir.path()));
    let name = path.file_name().and_then(|n| n.to_str()).expect("file name");
    assert!(name.starts_with("Spring_Sale_(c1)_"), "{name}");
    assert!(name.ends_with(".csv"), "{name}");

    let contents = std::fs::read_to_string(&path).expect("read csv");
    assert_eq!(
        contents,
        "recipient,event,tags\n\
         alice@example.com,opened,\"[\"\"spring\"\",\"\"sale\"\"]\"\n\
         bob@example.com,clicked,\n\
         carol@example.com,,\n"
    );
}

#[tokio::test]
async fn unknown_campaign_falls_back_to_id_file_name() {
    let app = spawn_app().await;
    mock_campaign(&app, 404).await;
    mock_events(&app, json!([{ "event": "delivered" }])).await;
    let dir = tempfile::tempdir().expect("temp dir");

    let path = app.client.save_campaign_events_csv("c1", dir.path()).await.expect("export");

    let name = path.file_name().and_then(|n| n.to_str()).expect("file name");
    assert!(name.starts_with("c1_"), "{name}");
    assert_eq!(std::fs::read_to_string(&path).expect("read csv"), "event\ndelivered\n");
}

#[tokio::test]
async fn campaign_without_events_gives_empty_file() {
    let app = spawn_app().await;
    mock_campaign(&app, 200).await;
    mock_events(&app, json!([])).await;
    let dir = tempfile::tempdir().expect("temp dir");

    let path = app.client.save_campaign_events_csv("c1", dir.path()).await.expect("export");

    assert_eq!(std::fs::read_to_string(&path).expect("read csv"), "");
}

#[tokio::test]
async fn failed_event_fetch_writes_nothing() {
    let app = spawn_app().await;
    mock_campaign(&app, 200).await;
    app.server
        .mock_async(|when, then| {
            when.method(GET).path(app.path(&format!("/{DOMAIN}/campaigns/c1/events")));
            then.status(500).body("internal error");
        })
        .await;
    let dir = tempfile::tempdir().expect("temp dir");

    assert_matches!(
        app.client.save_campaign_events_csv("c1", dir.path()).await,
        Err(Error::Unsuccessful { family: StatusFamily::ServerError, .. })
    );
    assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 0);
    assert_eq!(app.client.campaign_events("c1").await.expect("events"), None);
}
