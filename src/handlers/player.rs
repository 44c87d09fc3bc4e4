//! Player pawn handlers.
//!
//! Setters parse the body before resolving the pawn, so a bad body is
//! reported even when no pawn is under control.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{Rotator, Vector3, World};
use crate::http::body::parse_typed_body;
use crate::http::envelope::Envelope;
use crate::http::request::Request;
use crate::http::response::ApiResponse;

pub const NO_PAWN: &str = "Failed to get valid player pawn instance!";
pub const BODY_PARSE_FAILED: &str = "Failed to parse request body to json!";
pub const LOCATION_SET: &str = "Player location set successfully!";
pub const LOCATION_SET_FAILED: &str = "Failed to set player location!";
pub const ROTATION_SET: &str = "Player rotation set successfully!";
pub const ROTATION_SET_FAILED: &str = "Failed to set player rotation!";

fn error(message: &str) -> Option<ApiResponse> {
    Some(Envelope::error(message).into())
}

fn to_object<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// `GET /player/get_location` → `{x, y, z}`
pub fn get_player_location(world: &dyn World, _request: &Request) -> Option<ApiResponse> {
    let Some(pawn) = world.controlled_pawn() else {
        return error(NO_PAWN);
    };
    Some(Envelope::success_data(to_object(&pawn.location())).into())
}

/// `PUT /player/set_location` with `{x, y, z}`
pub fn set_player_location(world: &dyn World, request: &Request) -> Option<ApiResponse> {
    let location: Vector3 = match parse_typed_body(request) {
        Ok(location) => location,
        Err(_) => return error(BODY_PARSE_FAILED),
    };
    let Some(pawn) = world.controlled_pawn() else {
        return error(NO_PAWN);
    };

    tracing::info!(
        x = location.x,
        y = location.y,
        z = location.z,
        "Set player location"
    );
    if !pawn.set_location(location) {
        return error(LOCATION_SET_FAILED);
    }
    Some(Envelope::success_message(LOCATION_SET).into())
}

/// `GET /player/get_rotation` → `{pitch, yaw, roll}`
pub fn get_player_rotation(world: &dyn World, _request: &Request) -> Option<ApiResponse> {
    let Some(pawn) = world.controlled_pawn() else {
        return error(NO_PAWN);
    };
    Some(Envelope::success_data(to_object(&pawn.rotation())).into())
}

/// `PUT /player/set_rotation` with `{pitch, yaw, roll}`
pub fn set_player_rotation(world: &dyn World, request: &Request) -> Option<ApiResponse> {
    let rotation: Rotator = match parse_typed_body(request) {
        Ok(rotation) => rotation,
        Err(_) => return error(BODY_PARSE_FAILED),
    };
    let Some(pawn) = world.controlled_pawn() else {
        return error(NO_PAWN);
    };

    tracing::info!(
        pitch = rotation.pitch,
        yaw = rotation.yaw,
        roll = rotation.roll,
        "Set player rotation"
    );
    if !pawn.set_rotation(rotation) {
        return error(ROTATION_SET_FAILED);
    }
    Some(Envelope::success_message(ROTATION_SET).into())
}
