use claims::assert_matches;
use httpmock::Method::GET;
use mailgun_manager::{Error, StatusFamily};
use serde_json::json;

use crate::helpers::{PUBLIC_AUTH, spawn_app};

#[tokio::test]
async fn valid_address_uses_public_key() {
    let app = spawn_app().await;
    let mock = app
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path(app.path("/address/validate"))
                .query_param("address", "foo@mailgun.net")
                .header("authorization", PUBLIC_AUTH);
            then.status(200).json_body(json!({
                "address": "foo@mailgun.net",
                "did_you_mean": null,
                "is_valid": true,
                "parts": { "display_name": null, "domain": "mailgun.net", "local_part": "foo" }
            }));
        })
        .await;

    let result = app.client.validate_address("foo@mailgun.net").await.expect("validate");

    assert!(result.is_valid);
    assert_eq!(result.address, "foo@mailgun.net");
    assert_eq!(result.did_you_mean, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn suggestion_is_returned() {
    let app = spawn_app().await;
    app.server
        .mock_async(|when, then| {
            when.method(GET)
                .path(app.path("/address/validate"))
                .query_param("address", "foo@mailgun.nett");
            then.status(200).json_body(json!({
                "address": "foo@mailgun.nett",
                "did_you_mean": "foo@mailgun.net",
                "is_valid": false
            }));
        })
        .await;

    let result = app.client.validate_address("foo@mailgun.nett").await.expect("validate");

    assert!(!result.is_valid);
    assert_eq!(result.did_you_mean.as_deref(), Some("foo@mailgun.net"));
}

#[tokio::test]
async fn malformed_address_never_reaches_mailgun() {
    let app = spawn_app().await;
    let mock = app
        .server
        .mock_async(|when, then| {
            when.method(GET).path(app.path("/address/validate"));
            then.status(200).json_body(json!({ "is_valid": true }));
        })
        .await;

    for address in ["", "no-at-sign", "@example.com", "john@"] {
        let result = app.client.validate_address(address).await.expect("validate");
        assert!(!result.is_valid, "{address:?} should be invalid");
        assert_eq!(result.did_you_mean, None);
    }
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn refused_validation_is_an_error() {
    let app = spawn_app().await;
    app.server
        .mock_async(|when, then| {
            when.method(GET).path(app.path("/address/validate"));
            then.status(401).body("Forbidden");
        })
        .await;

    assert_matches!(
        app.client.validate_address("foo@mailgun.net").await,
        Err(Error::Unsuccessful { family: StatusFamily::ClientError, .. })
    );
}
