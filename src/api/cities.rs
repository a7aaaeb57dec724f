// City administration endpoints
use crate::api::path_param;
use crate::client::{OperationDescriptor, ResourceClient, Tag};
use crate::error::ClientError;
use crate::transport::RequestDescriptor;

pub const TAG: &str = "cities";

pub fn register(client: &ResourceClient) -> Result<(), ClientError> {
    client.register(
        OperationDescriptor::query("cities.list", |_args| RequestDescriptor::get("/cities"))
            .with_tags(|_args| vec![Tag::list(TAG)]),
    )?;

    client.register(
        OperationDescriptor::mutation("cities.create", |args| {
            RequestDescriptor::post("/cities", args.clone())
        })
        .with_tags(|_args| vec![Tag::list(TAG)]),
    )?;

    client.register(
        OperationDescriptor::mutation("cities.update", |args| {
            RequestDescriptor::put(format!("/cities/{}", path_param(args, "id")), args.clone())
        })
        .with_tags(|args| vec![Tag::item(TAG, path_param(args, "id")), Tag::list(TAG)]),
    )?;

    client.register(
        OperationDescriptor::mutation("cities.delete", |args| {
            RequestDescriptor::delete(format!("/cities/{}", path_param(args, "id")))
        })
        .with_tags(|args| vec![Tag::item(TAG, path_param(args, "id")), Tag::list(TAG)]),
    )?;

    Ok(())
}
