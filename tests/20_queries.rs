mod common;

use std::time::Duration;

use anyhow::Result;
use serde_json::json;

use common::MockTransport;
use console_client::client::{FetchStatus, OperationDescriptor, ResourceClient, Tag};
use console_client::error::ClientError;
use console_client::transport::{Method, RequestDescriptor};

fn client_with_users_list(transport: &std::sync::Arc<MockTransport>) -> Result<ResourceClient> {
    let client = ResourceClient::new(transport.clone());
    client.register(
        OperationDescriptor::query("users.list", |_args| RequestDescriptor::get("/users"))
            .with_tags(|_args| vec![Tag::list("users")]),
    )?;
    Ok(client)
}

#[tokio::test]
async fn query_resolves_through_snapshot() -> Result<()> {
    common::init_tracing();
    let transport = MockTransport::new();
    transport.on(Method::Get, "/users", json!([{"id": 1, "name": "ada"}]));
    let client = client_with_users_list(&transport)?;

    let mut subscription = client.subscribe("users.list", json!({}))?;
    assert!(subscription.snapshot().is_loading());

    let snapshot = subscription.ready().await;
    assert_eq!(snapshot.status, FetchStatus::Fulfilled);
    assert_eq!(snapshot.data, Some(json!([{"id": 1, "name": "ada"}])));
    assert!(snapshot.error.is_none());
    assert!(snapshot.fetched_at.is_some());

    Ok(())
}

#[tokio::test]
async fn concurrent_subscribers_share_one_request() -> Result<()> {
    let transport = MockTransport::new();
    transport.on(Method::Get, "/users", json!([]));
    transport.set_latency(Duration::from_millis(50));
    let client = client_with_users_list(&transport)?;

    // Second subscription arrives while the first request is still in flight
    let mut first = client.subscribe("users.list", json!({}))?;
    let mut second = client.subscribe("users.list", json!({}))?;

    let a = first.ready().await;
    let b = second.ready().await;
    assert_eq!(a.status, FetchStatus::Fulfilled);
    assert_eq!(b.status, FetchStatus::Fulfilled);
    assert_eq!(transport.call_count(Method::Get, "/users"), 1);

    Ok(())
}

#[tokio::test]
async fn later_subscriber_reads_from_cache() -> Result<()> {
    let transport = MockTransport::new();
    transport.on(Method::Get, "/users", json!([{"id": 1}]));
    let client = client_with_users_list(&transport)?;

    let mut first = client.subscribe("users.list", json!({}))?;
    first.ready().await;

    // Entry is warm: no new request, data available immediately
    let second = client.subscribe("users.list", json!({}))?;
    let snapshot = second.snapshot();
    assert_eq!(snapshot.status, FetchStatus::Fulfilled);
    assert_eq!(snapshot.data, Some(json!([{"id": 1}])));
    assert_eq!(transport.call_count(Method::Get, "/users"), 1);

    Ok(())
}

#[tokio::test]
async fn different_arguments_are_distinct_cache_keys() -> Result<()> {
    let transport = MockTransport::new();
    transport.on(Method::Get, "/users/7", json!({"id": 7}));
    transport.on(Method::Get, "/users/8", json!({"id": 8}));
    let client = ResourceClient::new(transport.clone());
    client.register(
        OperationDescriptor::query("users.get", |args| {
            RequestDescriptor::get(format!("/users/{}", args["id"]))
        })
        .with_tags(|args| vec![Tag::item("users", &args["id"])]),
    )?;

    let mut seven = client.subscribe("users.get", json!({"id": 7}))?;
    let mut eight = client.subscribe("users.get", json!({"id": 8}))?;

    assert_eq!(seven.ready().await.data, Some(json!({"id": 7})));
    assert_eq!(eight.ready().await.data, Some(json!({"id": 8})));
    assert_eq!(transport.call_count(Method::Get, "/users/7"), 1);
    assert_eq!(transport.call_count(Method::Get, "/users/8"), 1);

    Ok(())
}

#[tokio::test]
async fn transport_failure_lands_in_snapshot_error() -> Result<()> {
    let transport = MockTransport::new();
    transport.fail(Method::Get, "/users", 500, json!({"message": "boom"}));
    let client = client_with_users_list(&transport)?;

    let mut subscription = client.subscribe("users.list", json!({}))?;
    let snapshot = subscription.ready().await;

    assert_eq!(snapshot.status, FetchStatus::Rejected);
    assert!(snapshot.data.is_none());
    let error = snapshot.error.expect("error should be set");
    assert_eq!(error.status(), Some(500));
    assert_eq!(error.display_message(), "boom");

    Ok(())
}

#[tokio::test]
async fn explicit_refetch_keeps_prior_data_while_fetching() -> Result<()> {
    let transport = MockTransport::new();
    transport.on(Method::Get, "/users", json!([{"id": 1}]));
    let client = client_with_users_list(&transport)?;

    let mut subscription = client.subscribe("users.list", json!({}))?;
    subscription.ready().await;

    transport.on(Method::Get, "/users", json!([{"id": 1}, {"id": 2}]));
    transport.set_latency(Duration::from_millis(30));
    subscription.refetch();

    let mid = subscription.snapshot();
    assert!(mid.is_fetching());
    assert!(!mid.is_loading(), "prior data stays visible during refetch");
    assert_eq!(mid.data, Some(json!([{"id": 1}])));

    let settled = subscription.ready().await;
    assert_eq!(settled.data, Some(json!([{"id": 1}, {"id": 2}])));
    assert_eq!(transport.call_count(Method::Get, "/users"), 2);

    Ok(())
}

#[tokio::test]
async fn registry_rejects_duplicates_and_kind_mismatch() -> Result<()> {
    let transport = MockTransport::new();
    let client = client_with_users_list(&transport)?;

    let duplicate = client.register(OperationDescriptor::query("users.list", |_args| {
        RequestDescriptor::get("/users")
    }));
    assert!(matches!(duplicate, Err(ClientError::DuplicateOperation(_))));

    let unknown = client.subscribe("users.missing", json!({}));
    assert!(matches!(unknown, Err(ClientError::UnknownOperation(_))));

    // users.list is a query; asking for a mutation handle is a usage error
    let mismatch = client.mutation("users.list");
    assert!(matches!(mismatch, Err(ClientError::KindMismatch { .. })));

    Ok(())
}

#[tokio::test]
async fn mutation_state_machine() -> Result<()> {
    let transport = MockTransport::new();
    transport.on(Method::Post, "/users", json!({"id": 9}));
    let client = ResourceClient::new(transport.clone());
    client.register(OperationDescriptor::mutation("users.create", |args| {
        RequestDescriptor::post("/users", args.clone())
    }))?;

    let handle = client.mutation("users.create")?;
    assert_eq!(handle.snapshot().status, FetchStatus::Uninitialized);

    let result = handle.trigger(json!({"name": "nia"})).await?;
    assert_eq!(result, json!({"id": 9}));
    assert_eq!(handle.snapshot().status, FetchStatus::Fulfilled);
    assert_eq!(handle.snapshot().data, Some(json!({"id": 9})));

    // Only an explicit reset returns to idle
    handle.reset();
    assert_eq!(handle.snapshot().status, FetchStatus::Uninitialized);

    // Re-trigger re-enters loading and settles again
    handle.trigger(json!({"name": "rui"})).await?;
    assert_eq!(handle.snapshot().status, FetchStatus::Fulfilled);
    assert_eq!(transport.call_count(Method::Post, "/users"), 2);

    Ok(())
}

#[tokio::test]
async fn failed_mutation_reports_error_state() -> Result<()> {
    let transport = MockTransport::new();
    transport.fail(
        Method::Post,
        "/users",
        422,
        json!({"message": "email is invalid"}),
    );
    let client = ResourceClient::new(transport.clone());
    client.register(OperationDescriptor::mutation("users.create", |args| {
        RequestDescriptor::post("/users", args.clone())
    }))?;

    let handle = client.mutation("users.create")?;
    let result = handle.trigger(json!({"email": "nope"})).await;

    assert!(result.is_err());
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.status, FetchStatus::Rejected);
    let error = snapshot.error.expect("error should be set");
    assert_eq!(error.display_message(), "email is invalid");

    Ok(())
}
