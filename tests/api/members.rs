use claims::{assert_matches, assert_none, assert_ok};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use httpmock::Method::{DELETE, GET, POST, PUT};
use mailgun_manager::{Error, ListMember, ListMemberRequest, MAX_MEMBERS_PER_CALL};
use serde::Deserialize;
use serde_json::json;

use crate::helpers::{LIST, PRIVATE_AUTH, spawn_app};

#[derive(Debug, Deserialize, PartialEq)]
struct MemberDetails {
    city: String,
    province: String,
}

fn alice() -> serde_json::Value {
    json!({
        "address": "alice@example.com",
        "name": "Alice",
        "subscribed": true,
        "vars": { "city": "Seattle", "province": "WA" }
    })
}

#[tokio::test]
async fn member_is_added_subscribed() {
    let app = spawn_app().await;
    let mock = app
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path(app.members_path())
                .header("authorization", PRIVATE_AUTH)
                .x_www_form_urlencoded_tuple("address", "alice@example.com")
                .x_www_form_urlencoded_tuple("name", "Alice")
                .x_www_form_urlencoded_tuple("subscribed", "true")
                .x_www_form_urlencoded_tuple("vars", r#"{"city":"Seattle"}"#);
            then.status(200).json_body(json!({ "member": alice(), "message": "Mailing list member has been created" }));
        })
        .await;

    let request = assert_ok!(ListMemberRequest::new("Alice <alice@example.com>"))
        .subscribed(false)
        .vars_json(r#"{"city":"Seattle"}"#);
    let added = app.client.add_list_member(LIST, &request).await.expect("add");

    assert!(added);
    mock.assert_async().await;
}

#[tokio::test]
async fn adding_a_member_twice_is_false() {
    let app = spawn_app().await;
    let request = assert_ok!(ListMemberRequest::new("alice@example.com"));

    let mut created = app
        .server
        .mock_async(|when, then| {
            when.method(POST).path(app.members_path());
            then.status(200).json_body(json!({ "member": alice() }));
        })
        .await;
    assert!(app.client.add_list_member(LIST, &request).await.expect("first add"));
    created.assert_async().await;
    created.delete_async().await;

    app.server
        .mock_async(|when, then| {
            when.method(POST).path(app.members_path());
            then.status(400)
                .json_body(json!({ "message": "Address already exists 'alice@example.com'" }));
        })
        .await;
    assert!(!app.client.add_list_member(LIST, &request).await.expect("second add"));
}

fn members(count: usize) -> Vec<ListMember> {
    (0..count)
        .map(|i| {
            ListMember::new(&format!("member{i}@example.com"))
                .expect("valid address")
                .with_vars(json!({ "index": i }))
        })
        .collect()
}

#[tokio::test]
async fn bulk_add_is_split_into_chunks() {
    let app = spawn_app().await;
    let batch = members(2500);

    // each upload must carry exactly its slice of the input, in input order
    let mut chunks = Vec::new();
    for range in [0..1000, 1000..2000, 2000..2500] {
        let expected = serde_json::to_string(&batch[range]).expect("serialize chunk");
        let mock = app
            .server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(format!("{}.json", app.members_path()))
                    .header("authorization", PRIVATE_AUTH)
                    .x_www_form_urlencoded_tuple("members", expected);
                then.status(200).json_body(json!({ "message": "Mailing list has been updated" }));
            })
            .await;
        chunks.push(mock);
    }

    let added = app.client.add_list_members(LIST, &batch).await.expect("bulk add");

    assert!(added);
    for mock in &chunks {
        mock.assert_hits_async(1).await;
    }
}

#[test]
fn chunk_bounds_keep_member_order() {
    let batch = members(2500);
    let chunks: Vec<&[ListMember]> = batch.chunks(MAX_MEMBERS_PER_CALL).collect();
    let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
    assert_eq!(sizes, [1000, 1000, 500]);

    let bounds: Vec<(&str, &str)> = chunks
        .iter()
        .map(|c| (c[0].address(), c[c.len() - 1].address()))
        .collect();
    assert_eq!(
        bounds,
        [
            ("member0@example.com", "member999@example.com"),
            ("member1000@example.com", "member1999@example.com"),
            ("member2000@example.com", "member2499@example.com"),
        ]
    );
}

#[tokio::test]
async fn bulk_add_sends_every_chunk_after_a_failure() {
    let app = spawn_app().await;
    let mock = app
        .server
        .mock_async(|when, then| {
            when.method(POST).path(format!("{}.json", app.members_path()));
            then.status(500).body("oops");
        })
        .await;

    let added = app.client.add_list_members(LIST, &members(1001)).await.expect("bulk add");

    assert!(!added);
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn bulk_add_of_nothing_makes_no_call() {
    let app = spawn_app().await;
    let mock = app
        .server
        .mock_async(|when, then| {
            when.method(POST).path(format!("{}.json", app.members_path()));
            then.status(200);
        })
        .await;

    assert!(app.client.add_list_members(LIST, &members(0)).await.expect("bulk add"));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn bulk_add_serializes_member_fields() {
    let app = spawn_app().await;
    let email: String = SafeEmail().fake();
    let expected = json!([{ "address": email, "name": "Fake", "subscribed": false }]).to_string();
    let mock = app
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("{}.json", app.members_path()))
                .x_www_form_urlencoded_tuple("members", &expected);
            then.status(200);
        })
        .await;

    let batch = vec![
        ListMember::<serde_json::Value>::new(&email)
            .expect("valid address")
            .with_name("Fake")
            .with_subscribed(false),
    ];
    assert!(app.client.add_list_members(LIST, &batch).await.expect("bulk add"));
    mock.assert_async().await;
}

#[tokio::test]
async fn member_vars_convert_to_the_requested_type() {
    let app = spawn_app().await;
    app.server
        .mock_async(|when, then| {
            when.method(GET).path(app.member_path("alice@example.com"));
            then.status(200).json_body(json!({ "member": alice() }));
        })
        .await;

    let raw = app
        .client
        .list_member(LIST, "alice@example.com")
        .await
        .expect("get")
        .expect("2xx");
    assert_eq!(raw.vars(), Some(&json!({ "city": "Seattle", "province": "WA" })));

    let typed = app
        .client
        .members(LIST)
        .get_as::<MemberDetails>("alice@example.com")
        .await
        .expect("get")
        .expect("2xx");
    assert_eq!(typed.address(), "alice@example.com");
    assert_eq!(typed.name(), Some("Alice"));
    assert!(typed.is_subscribed());
    assert_eq!(
        typed.into_vars(),
        Some(MemberDetails {
            city: "Seattle".to_string(),
            province: "WA".to_string(),
        })
    );
}

#[tokio::test]
async fn unknown_member_is_none() {
    let app = spawn_app().await;
    app.server
        .mock_async(|when, then| {
            when.method(GET).path(app.member_path("nobody@example.com"));
            then.status(404).json_body(json!({ "message": "Member nobody@example.com not found" }));
        })
        .await;

    let member = app.client.list_member(LIST, "nobody@example.com").await.expect("get");
    assert_none!(member);
}

#[tokio::test]
async fn listing_members() {
    let app = spawn_app().await;
    let mock = app
        .server
        .mock_async(|when, then| {
            when.method(GET).path(app.members_path());
            then.status(200).json_body(json!({
                "items": [
                    alice(),
                    { "address": "Bob <bob@example.com>", "name": "Bob", "subscribed": false, "vars": [] }
                ],
                "total_count": 2
            }));
        })
        .await;

    let members = app.client.list_members(LIST).await.expect("list").expect("2xx");

    assert_eq!(members.len(), 2);
    assert_eq!(members[0].to_string(), "Alice <alice@example.com>");
    assert!(!members[1].is_subscribed());
    assert_none!(members[1].vars());
    mock.assert_async().await;
}

#[tokio::test]
async fn mismatched_vars_type_is_an_error() {
    let app = spawn_app().await;
    app.server
        .mock_async(|when, then| {
            when.method(GET).path(app.members_path());
            then.status(200).json_body(json!({
                "items": [{ "address": "carol@example.com", "subscribed": true, "vars": { "age": 42 } }]
            }));
        })
        .await;

    assert_matches!(
        app.client.list_members_as::<MemberDetails>(LIST).await,
        Err(Error::VarsType { .. })
    );
}

#[tokio::test]
async fn member_is_updated_by_address() {
    let app = spawn_app().await;
    let mock = app
        .server
        .mock_async(|when, then| {
            when.method(PUT)
                .path(app.member_path("alice@example.com"))
                .x_www_form_urlencoded_tuple("address", "alice@example.com")
                .x_www_form_urlencoded_tuple("name", "Alice B.");
            then.status(200).json_body(json!({ "member": alice() }));
        })
        .await;

    let request = assert_ok!(ListMemberRequest::new("alice@example.com")).name("Alice B.");
    assert!(app.client.update_list_member(LIST, &request).await.expect("update"));
    mock.assert_async().await;
}

#[tokio::test]
async fn member_is_unsubscribed() {
    let app = spawn_app().await;
    let mock = app
        .server
        .mock_async(|when, then| {
            when.method(PUT)
                .path(app.member_path("alice@example.com"))
                .x_www_form_urlencoded_tuple("subscribed", "no");
            then.status(200).json_body(json!({ "member": alice() }));
        })
        .await;

    assert!(
        app.client
            .unsubscribe_list_member(LIST, "alice@example.com")
            .await
            .expect("unsubscribe")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn member_is_deleted() {
    let app = spawn_app().await;
    let mock = app
        .server
        .mock_async(|when, then| {
            when.method(DELETE).path(app.member_path("alice@example.com"));
            then.status(200).json_body(json!({ "message": "Mailing list member has been deleted" }));
        })
        .await;

    assert!(app.client.delete_list_member(LIST, "alice@example.com").await.expect("delete"));
    mock.assert_async().await;

    app.server
        .mock_async(|when, then| {
            when.method(DELETE).path(app.member_path("ghost@example.com"));
            then.status(404);
        })
        .await;
    assert!(!app.client.delete_list_member(LIST, "ghost@example.com").await.expect("delete"));
}
