// Console user administration endpoints
use serde_json::Value;

use crate::api::path_param;
use crate::client::{OperationDescriptor, ResourceClient, Tag};
use crate::error::ClientError;
use crate::transport::RequestDescriptor;

pub const TAG: &str = "users";

pub fn register(client: &ResourceClient) -> Result<(), ClientError> {
    client.register(
        OperationDescriptor::query("users.list", |_args| RequestDescriptor::get("/users"))
            .with_tags(|_args| vec![Tag::list(TAG)]),
    )?;

    client.register(
        OperationDescriptor::query("users.get", |args| {
            RequestDescriptor::get(format!("/users/{}", path_param(args, "id")))
        })
        .with_tags(|args| vec![Tag::item(TAG, path_param(args, "id"))]),
    )?;

    client.register(
        OperationDescriptor::mutation("users.create", |args| {
            RequestDescriptor::post("/users", args.clone())
        })
        .with_tags(|_args| vec![Tag::list(TAG)]),
    )?;

    // Updating one user touches its detail view and the listing
    client.register(
        OperationDescriptor::mutation("users.update", |args| {
            RequestDescriptor::put(format!("/users/{}", path_param(args, "id")), body_of(args))
        })
        .with_tags(|args| vec![Tag::item(TAG, path_param(args, "id")), Tag::list(TAG)]),
    )?;

    client.register(
        OperationDescriptor::mutation("users.delete", |args| {
            RequestDescriptor::delete(format!("/users/{}", path_param(args, "id")))
        })
        .with_tags(|args| vec![Tag::item(TAG, path_param(args, "id")), Tag::list(TAG)]),
    )?;

    Ok(())
}

/// Payload for update calls: everything except the path identifier
fn body_of(args: &Value) -> Value {
    let mut body = args.clone();
    if let Some(map) = body.as_object_mut() {
        map.remove("id");
    }
    body
}
