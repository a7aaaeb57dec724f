// Login/onboarding and profile endpoints
use serde_json::json;

use crate::client::{OperationDescriptor, ResourceClient, Tag};
use crate::error::ClientError;
use crate::transport::RequestDescriptor;

pub const PROFILE_TAG: &str = "profile";

pub fn register(client: &ResourceClient) -> Result<(), ClientError> {
    client.register(OperationDescriptor::mutation("auth.login", |args| {
        RequestDescriptor::post(
            "/auth/login",
            json!({"email": args["email"], "password": args["password"]}),
        )
    }))?;

    // Onboarding: creates the tenant's first operator account
    client.register(OperationDescriptor::mutation("auth.signup", |args| {
        RequestDescriptor::post("/auth/signup", args.clone())
    }))?;

    client.register(OperationDescriptor::mutation("auth.logout", |_args| {
        RequestDescriptor::post("/auth/logout", json!({}))
    }))?;

    client.register(
        OperationDescriptor::query("auth.profile", |_args| {
            RequestDescriptor::get("/auth/profile")
        })
        .with_tags(|_args| vec![Tag::of(PROFILE_TAG)]),
    )?;

    client.register(
        OperationDescriptor::mutation("auth.update_profile", |args| {
            RequestDescriptor::put("/auth/profile", args.clone())
        })
        .with_tags(|_args| vec![Tag::of(PROFILE_TAG)]),
    )?;

    Ok(())
}
