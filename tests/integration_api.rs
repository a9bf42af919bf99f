//! API Integration Tests
//!
//! Drive the full router (context and logging middleware included) over an
//! in-memory store.

use axum::http::StatusCode;
use serde_json::Value;

use vsa_api::config::ApiSettings;
use vsa_api::domain::Direction;
use vsa_api::store::VolumeStore;

mod common;

use common::{create_array, seed_child, send, setup_app, setup_app_with};

// =========================================================================
// Health and arrays
// =========================================================================

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup_app();
    let request = axum::http::Request::builder()
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::util::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_array_lifecycle_e2e() {
    let (app, _) = setup_app_with(ApiSettings {
        vc_count: 3,
        ..ApiSettings::default()
    });

    // 1. Create with the default type
    let (status, json) = send(
        &app,
        "POST",
        "/v1.1/arrays",
        Some(r#"{"vsa": {"displayName": "arr1", "displayDescription": "first", "storage": "10GB"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let array = &json["vsa"];
    assert_eq!(array["vcType"], "m1.small");
    assert_eq!(array["vcCount"], 3);
    assert_eq!(array["driveCount"], 0);
    assert_eq!(array["displayName"], "arr1");
    assert_eq!(array["availabilityZone"], Value::Null);
    let id = array["id"].as_i64().unwrap();

    // 2. Summary list omits detail-only fields
    let (status, json) = send(&app, "GET", "/v1.1/arrays", None).await;
    assert_eq!(status, StatusCode::OK);
    let set = json["vsaSet"].as_array().unwrap();
    assert_eq!(set.len(), 1);
    assert!(set[0].get("availabilityZone").is_none());
    assert!(set[0].get("storage").is_none());

    // 3. Detail list includes them
    let (_, json) = send(&app, "GET", "/v1.1/arrays/detail", None).await;
    assert!(json["vsaSet"][0].get("availabilityZone").is_some());

    // 4. Show
    let (status, json) = send(&app, "GET", &format!("/v1.1/arrays/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["vsa"]["id"], id);

    // 5. Delete, then delete again
    let (status, json) = send(&app, "DELETE", &format!("/v1.1/arrays/{}", id), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json, Value::Null);

    let (status, json) = send(&app, "DELETE", &format!("/v1.1/arrays/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "array_not_found");
}

#[tokio::test]
async fn test_array_create_errors() {
    let (app, _) = setup_app();

    let (status, json) = send(&app, "POST", "/v1.1/arrays", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "malformed_request");

    let (status, json) = send(&app, "POST", "/v1.1/arrays", Some(r#"{"array": {}}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "malformed_request");

    let (status, json) = send(
        &app,
        "POST",
        "/v1.1/arrays",
        Some(r#"{"vsa": {"vcType": "no.such.type"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "instance_type_not_found");
}

#[tokio::test]
async fn test_array_placement_zone() {
    let (app, _) = setup_app();
    let (status, json) = send(
        &app,
        "POST",
        "/v1.1/arrays",
        Some(r#"{"vsa": {"vcType": "m1.large", "placement": {"AvailabilityZone": "zone-a"}}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["vsa"]["vcType"], "m1.large");
    assert_eq!(json["vsa"]["availabilityZone"], "zone-a");
}

#[tokio::test]
async fn test_non_integer_ids_are_not_found() {
    let (app, _) = setup_app();
    let id = create_array(&app, "arr").await;

    let (status, json) = send(&app, "GET", "/v1.1/arrays/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "array_not_found");

    let (status, json) = send(&app, "GET", &format!("/v1.1/arrays/{}/volumes/xyz", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "volume_not_found");
}

#[tokio::test]
async fn test_pagination() {
    let (app, _) = setup_app_with(ApiSettings {
        max_limit: 2,
        ..ApiSettings::default()
    });
    for name in ["a", "b", "c"] {
        create_array(&app, name).await;
    }

    let (_, json) = send(&app, "GET", "/v1.1/arrays", None).await;
    assert_eq!(json["vsaSet"].as_array().unwrap().len(), 2);

    let (_, json) = send(&app, "GET", "/v1.1/arrays?offset=2", None).await;
    let set = json["vsaSet"].as_array().unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set[0]["displayName"], "c");

    let (_, json) = send(&app, "GET", "/v1.1/arrays?limit=0", None).await;
    assert_eq!(json["vsaSet"].as_array().unwrap().len(), 2);

    let (status, json) = send(&app, "GET", "/v1.1/arrays?limit=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "invalid_request");
}

// =========================================================================
// Volumes
// =========================================================================

#[tokio::test]
async fn test_volume_lifecycle_e2e() {
    let (app, store) = setup_app();
    let array_id = create_array(&app, "arr").await;
    let base = format!("/v1.1/arrays/{}/volumes", array_id);

    // 1. Create
    let (status, json) = send(
        &app,
        "POST",
        &base,
        Some(r#"{"volume": {"size": 3, "displayName": "data"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["volume"]["vsaId"], array_id);
    assert_eq!(json["volume"]["size"], 3);
    assert_eq!(json["volume"]["displayName"], "data");
    let volume_id = json["volume"]["id"].as_i64().unwrap();

    // 2. List
    let (status, json) = send(&app, "GET", &base, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["volumes"].as_array().unwrap().len(), 1);

    // 3. Update: whitelisted fields applied, the rest ignored
    let (status, json) = send(
        &app,
        "PUT",
        &format!("{}/{}", base, volume_id),
        Some(r#"{"volume": {"status": "available", "displayDescription": "bulk", "size": 99}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json, Value::Null);

    let stored = store
        .get_volume(vsa_api::domain::VolumeId(volume_id))
        .await
        .unwrap();
    assert_eq!(stored.status, "available");
    assert_eq!(stored.display_description.as_deref(), Some("bulk"));
    assert_eq!(stored.size, 3);

    // 4. Show reflects the update
    let (status, json) = send(&app, "GET", &format!("{}/{}", base, volume_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["volume"]["status"], "available");

    // 5. Delete twice
    let (status, _) = send(&app, "DELETE", &format!("{}/{}", base, volume_id), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let (status, json) = send(&app, "DELETE", &format!("{}/{}", base, volume_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "volume_not_found");
}

#[tokio::test]
async fn test_volume_create_errors() {
    let (app, _) = setup_app();
    let array_id = create_array(&app, "arr").await;
    let base = format!("/v1.1/arrays/{}/volumes", array_id);

    let (status, json) = send(&app, "POST", &base, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "malformed_request");

    let (status, json) = send(&app, "POST", &base, Some(r#"{"volume": {"size": -2}}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "malformed_request");

    let (status, json) = send(
        &app,
        "POST",
        "/v1.1/arrays/4242/volumes",
        Some(r#"{"volume": {"size": 1}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "array_not_found");
}

#[tokio::test]
async fn test_cross_array_access_is_rejected() {
    let (app, store) = setup_app();
    let owner = create_array(&app, "owner").await;
    let other = create_array(&app, "other").await;
    let volume = seed_child(&store, owner, Direction::From, 4).await;
    let uri = format!("/v1.1/arrays/{}/volumes/{}", other, volume);

    let (status, json) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "ownership_mismatch");

    let (status, json) = send(&app, "PUT", &uri, Some(r#"{"volume": {"status": "error"}}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "ownership_mismatch");

    let (status, json) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "ownership_mismatch");

    // Still there, untouched, under its real owner
    let (status, json) = send(
        &app,
        "GET",
        &format!("/v1.1/arrays/{}/volumes/{}", owner, volume),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["volume"]["status"], "creating");
}

#[tokio::test]
async fn test_volume_attachments_detail() {
    let (app, store) = setup_app();
    let array_id = create_array(&app, "arr").await;
    let volume = seed_child(&store, array_id, Direction::From, 2).await;
    store.attach_volume(volume, 77, "/dev/vdb").await.unwrap();

    let (_, json) = send(&app, "GET", &format!("/v1.1/arrays/{}/volumes", array_id), None).await;
    let attachment = &json["volumes"][0]["attachments"][0];
    assert_eq!(attachment["serverId"], 77);
    assert!(attachment.get("device").is_none());

    let (_, json) = send(
        &app,
        "GET",
        &format!("/v1.1/arrays/{}/volumes/detail", array_id),
        None,
    )
    .await;
    let attachment = &json["volumes"][0]["attachments"][0];
    assert_eq!(attachment["device"], "/dev/vdb");
    assert_eq!(json["volumes"][0]["status"], "in-use");
}

// =========================================================================
// Drives
// =========================================================================

#[tokio::test]
async fn test_drive_endpoints() {
    let (app, store) = setup_app();
    let array_id = create_array(&app, "arr").await;
    let drive = seed_child(&store, array_id, Direction::To, 10).await;
    seed_child(&store, array_id, Direction::From, 1).await;
    let base = format!("/v1.1/arrays/{}/drives", array_id);

    // List only shows allocated drives
    let (status, json) = send(&app, "GET", &base, None).await;
    assert_eq!(status, StatusCode::OK);
    let drives = json["drives"].as_array().unwrap();
    assert_eq!(drives.len(), 1);
    assert_eq!(drives[0]["vsaId"], array_id);

    // Array view counts it
    let (_, json) = send(&app, "GET", &format!("/v1.1/arrays/{}", array_id), None).await;
    assert_eq!(json["vsa"]["driveCount"], 1);

    let (status, json) = send(&app, "GET", &format!("{}/{}", base, drive), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["drive"]["size"], 10);

    let (status, _) = send(&app, "DELETE", &format!("{}/{}", base, drive), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, json) = send(&app, "GET", &format!("{}/{}", base, drive), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "drive_not_found");
}

#[tokio::test]
async fn test_drive_create_and_update_are_refused() {
    let (app, store) = setup_app();
    let array_id = create_array(&app, "arr").await;
    let drive = seed_child(&store, array_id, Direction::To, 10).await;

    for uri in [
        format!("/v1.1/arrays/{}/drives", array_id),
        "/v1.1/arrays/31337/drives".to_string(),
    ] {
        let (status, json) = send(&app, "POST", &uri, Some(r#"{"drive": {"size": 1}}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], "operation_not_permitted");
    }

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/v1.1/arrays/{}/drives/{}", array_id, drive),
        Some(r#"{"drive": {"status": "error"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "operation_not_permitted");

    let (status, json) = send(&app, "PUT", "/v1.1/arrays/x/drives/y", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "operation_not_permitted");

    let record = store.get_volume(drive).await.unwrap();
    assert_eq!(record.status, "creating");
}
