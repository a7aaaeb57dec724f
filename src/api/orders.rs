// Order management endpoints
use serde_json::{json, Value};

use crate::api::path_param;
use crate::client::{OperationDescriptor, ResourceClient, Tag};
use crate::error::ClientError;
use crate::transport::RequestDescriptor;

pub const TAG: &str = "orders";

pub fn register(client: &ResourceClient) -> Result<(), ClientError> {
    // Listing accepts an optional status filter as a query string
    client.register(
        OperationDescriptor::query("orders.list", |args| {
            let path = match args.get("status").and_then(Value::as_str) {
                Some(status) => format!("/orders?status={}", status),
                None => "/orders".to_string(),
            };
            RequestDescriptor::get(path)
        })
        .with_tags(|_args| vec![Tag::list(TAG)]),
    )?;

    client.register(
        OperationDescriptor::query("orders.get", |args| {
            RequestDescriptor::get(format!("/orders/{}", path_param(args, "id")))
        })
        .with_tags(|args| vec![Tag::item(TAG, path_param(args, "id"))]),
    )?;

    client.register(
        OperationDescriptor::mutation("orders.create", |args| {
            RequestDescriptor::post("/orders", args.clone())
        })
        .with_tags(|_args| vec![Tag::list(TAG)]),
    )?;

    // Status changes show up in both the detail view and the order board
    client.register(
        OperationDescriptor::mutation("orders.update_status", |args| {
            RequestDescriptor::patch(
                format!("/orders/{}/status", path_param(args, "id")),
                json!({"status": args["status"]}),
            )
        })
        .with_tags(|args| vec![Tag::item(TAG, path_param(args, "id")), Tag::list(TAG)]),
    )?;

    client.register(
        OperationDescriptor::mutation("orders.cancel", |args| {
            RequestDescriptor::delete(format!("/orders/{}", path_param(args, "id")))
        })
        .with_tags(|args| vec![Tag::item(TAG, path_param(args, "id")), Tag::list(TAG)]),
    )?;

    Ok(())
}
