mod common;

use axum::http::StatusCode;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use serde_json::json;

use common::{
    delete_request, get_request, insert_owner, insert_room, json_request, multipart_request,
    spawn_app,
};
use roomlink_backend::entities::prelude::Rooms;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn room_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("title", "Sunny room"),
        ("description", "Ten minutes from campus"),
        ("location", "Pune"),
        ("price", "5000"),
        ("available", "true"),
        ("rating", "4.5"),
        ("gender", "Female"),
        ("amenities", "WiFi, AC, Laundry"),
    ]
}

#[tokio::test]
async fn test_owner_creates_room_with_image() {
    let app = spawn_app().await;
    let owner = insert_owner(&app.db, "owner@roomlink.test").await;

    let (status, body) = app
        .send(multipart_request(
            "POST",
            "/api/room/createRooms",
            &app.owner_token(owner.id),
            &room_fields(),
            Some(("room.png", "image/png", PNG)),
        ))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Room Created Successfully");
    assert_eq!(body["room"]["title"], "Sunny room");
    assert_eq!(body["room"]["price"], 5000.0);
    assert_eq!(body["room"]["available"], true);
    assert_eq!(body["room"]["creatorId"], owner.id);
    assert_eq!(body["room"]["imagePublicId"], "rooms/img_1");
    assert_eq!(body["room"]["imageUrl"], "https://img.test/rooms/img_1.png");
    assert_eq!(app.images.uploaded(), vec!["room.png".to_string()]);
}

#[tokio::test]
async fn test_create_room_validation() {
    let app = spawn_app().await;
    let owner = insert_owner(&app.db, "owner@roomlink.test").await;
    let token = app.owner_token(owner.id);

    let (status, body) = app
        .send(multipart_request("POST", "/api/room/createRooms", &token, &room_fields(), None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");

    let (status, body) = app
        .send(multipart_request(
            "POST",
            "/api/room/createRooms",
            &token,
            &room_fields(),
            Some(("room.gif", "image/gif", &b"GIF89a"[..])),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid File Format. Only PNG and JPG are allowed");

    let partial: Vec<_> = room_fields()
        .into_iter()
        .filter(|(k, _)| *k != "location")
        .collect();
    let (status, body) = app
        .send(multipart_request(
            "POST",
            "/api/room/createRooms",
            &token,
            &partial,
            Some(("room.png", "image/png", PNG)),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: location");

    let mut bad_price = room_fields();
    bad_price[3] = ("price", "0");
    let (status, body) = app
        .send(multipart_request(
            "POST",
            "/api/room/createRooms",
            &token,
            &bad_price,
            Some(("room.png", "image/png", PNG)),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Price must be greater than 0");

    assert!(app.images.uploaded().is_empty());
    assert!(Rooms::find().all(&app.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_room_requires_owner_token() {
    let app = spawn_app().await;

    let (status, body) = app
        .send(multipart_request(
            "POST",
            "/api/room/createRooms",
            &app.user_token(1),
            &room_fields(),
            Some(("room.png", "image/png", PNG)),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid authentication token. Please login again.");
}

#[tokio::test]
async fn test_update_room_keeps_image_without_upload() {
    let app = spawn_app().await;
    let owner = insert_owner(&app.db, "owner@roomlink.test").await;
    let room = insert_room(&app.db, Some(owner.id), "Pune", dec!(5000)).await;

    let (status, body) = app
        .send(multipart_request(
            "PUT",
            &format!("/api/room/updateRooms/{}", room.id),
            &app.owner_token(owner.id),
            &[("price", "6500"), ("title", "Renovated room")],
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Room Details Updated Successfully");
    assert_eq!(body["room"]["price"], 6500.0);
    assert_eq!(body["room"]["title"], "Renovated room");
    assert_eq!(body["room"]["location"], "Pune");
    assert_eq!(body["room"]["imageUrl"], room.image_url);
    assert!(app.images.destroyed().is_empty());
}

#[tokio::test]
async fn test_update_room_replaces_image() {
    let app = spawn_app().await;
    let owner = insert_owner(&app.db, "owner@roomlink.test").await;
    let room = insert_room(&app.db, Some(owner.id), "Pune", dec!(5000)).await;

    let (status, body) = app
        .send(multipart_request(
            "PUT",
            &format!("/api/room/updateRooms/{}", room.id),
            &app.owner_token(owner.id),
            &[],
            Some(("new.jpg", "image/jpeg", &b"\xff\xd8\xff"[..])),
        ))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["room"]["imagePublicId"], "rooms/img_1");
    assert_eq!(app.images.destroyed(), vec![room.image_public_id.clone()]);
}

#[tokio::test]
async fn test_update_room_of_other_owner_is_404() {
    let app = spawn_app().await;
    let owner = insert_owner(&app.db, "owner@roomlink.test").await;
    let intruder = insert_owner(&app.db, "other@roomlink.test").await;
    let room = insert_room(&app.db, Some(owner.id), "Pune", dec!(5000)).await;

    let (status, body) = app
        .send(multipart_request(
            "PUT",
            &format!("/api/room/updateRooms/{}", room.id),
            &app.owner_token(intruder.id),
            &[("price", "1")],
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "Room not found or you don't have permission to update it"
    );
    let stored = Rooms::find_by_id(room.id).one(&app.db).await.unwrap().unwrap();
    assert_eq!(stored.price, dec!(5000));
}

#[tokio::test]
async fn test_delete_room() {
    let app = spawn_app().await;
    let owner = insert_owner(&app.db, "owner@roomlink.test").await;
    let intruder = insert_owner(&app.db, "other@roomlink.test").await;
    let room = insert_room(&app.db, Some(owner.id), "Pune", dec!(5000)).await;
    let uri = format!("/api/room/deleteRooms/{}", room.id);

    let (status, body) = app
        .send(delete_request(&uri, &app.owner_token(intruder.id)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You don't have permission to delete this room");

    let (status, body) = app.send(delete_request(&uri, &app.owner_token(owner.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Room Deleted Successfully");
    assert_eq!(app.images.destroyed(), vec![room.image_public_id.clone()]);
    assert!(Rooms::find_by_id(room.id).one(&app.db).await.unwrap().is_none());

    let (status, _) = app.send(delete_request(&uri, &app.owner_token(owner.id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_listings() {
    let app = spawn_app().await;

    let (status, body) = app
        .send(json_request("POST", "/api/room/getRooms", None, json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let owner = insert_owner(&app.db, "owner@roomlink.test").await;
    let pune = insert_room(&app.db, Some(owner.id), "Pune", dec!(5000)).await;
    insert_room(&app.db, Some(owner.id), "Goa", dec!(3000)).await;
    insert_room(&app.db, None, "Pune", dec!(4500)).await;

    let (_, body) = app
        .send(json_request("POST", "/api/room/getRooms", None, json!({})))
        .await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert!(body[0].get("imagePublicId").is_some());

    let (status, body) = app
        .send(get_request(&format!("/api/room/getRoomsById/{}", pune.id), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Room Found");
    assert_eq!(body["room"]["id"], pune.id);

    let (status, body) = app.send(get_request("/api/room/getRoomsById/999", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Room Not Found");

    let (status, body) = app.send(get_request("/api/room/getLocations", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Goa", "Pune"]));
}

#[tokio::test]
async fn test_owner_rooms_are_scoped_to_caller() {
    let app = spawn_app().await;
    let owner = insert_owner(&app.db, "owner@roomlink.test").await;
    let other = insert_owner(&app.db, "other@roomlink.test").await;
    let mine = insert_room(&app.db, Some(owner.id), "Pune", dec!(5000)).await;
    insert_room(&app.db, Some(other.id), "Goa", dec!(3000)).await;

    let (status, body) = app
        .send(get_request("/api/room/owner-rooms", Some(&app.owner_token(owner.id))))
        .await;
    assert_eq!(status, StatusCode::OK);
    let rooms = body.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["id"], mine.id);

    let loner = insert_owner(&app.db, "loner@roomlink.test").await;
    let (status, body) = app
        .send(get_request("/api/room/owner-rooms", Some(&app.owner_token(loner.id))))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_owner_can_delist_and_relist_unbooked_room() {
    let app = spawn_app().await;
    let owner = insert_owner(&app.db, "owner@roomlink.test").await;
    let room = insert_room(&app.db, Some(owner.id), "Pune", dec!(5000)).await;
    let uri = format!("/api/room/updateRooms/{}", room.id);
    let token = app.owner_token(owner.id);

    let (status, body) = app
        .send(multipart_request("PUT", &uri, &token, &[("available", "false")], None))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["room"]["available"], false);

    let (status, body) = app
        .send(multipart_request("PUT", &uri, &token, &[("available", "true")], None))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["room"]["available"], true);

    let stored = Rooms::find_by_id(room.id).one(&app.db).await.unwrap().unwrap();
    assert!(stored.available);
}
