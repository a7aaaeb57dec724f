// Customer administration endpoints
use crate::api::path_param;
use crate::client::{OperationDescriptor, ResourceClient, Tag};
use crate::error::ClientError;
use crate::transport::RequestDescriptor;

pub const TAG: &str = "customers";

pub fn register(client: &ResourceClient) -> Result<(), ClientError> {
    client.register(
        OperationDescriptor::query("customers.list", |_args| RequestDescriptor::get("/customers"))
            .with_tags(|_args| vec![Tag::list(TAG)]),
    )?;

    client.register(
        OperationDescriptor::query("customers.get", |args| {
            RequestDescriptor::get(format!("/customers/{}", path_param(args, "id")))
        })
        .with_tags(|args| vec![Tag::item(TAG, path_param(args, "id"))]),
    )?;

    client.register(
        OperationDescriptor::mutation("customers.update", |args| {
            RequestDescriptor::put(format!("/customers/{}", path_param(args, "id")), args.clone())
        })
        .with_tags(|args| vec![Tag::item(TAG, path_param(args, "id")), Tag::list(TAG)]),
    )?;

    Ok(())
}
