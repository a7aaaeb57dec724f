// Declarative endpoint registrations for the console's feature modules.
// Each module registers its operations against an explicitly passed client;
// there is no central operation list.
pub mod auth;
pub mod cities;
pub mod customers;
pub mod orders;
pub mod users;

use serde_json::Value;

use crate::client::ResourceClient;
use crate::error::ClientError;

/// Register every console feature module on one client
pub fn register_all(client: &ResourceClient) -> Result<(), ClientError> {
    auth::register(client)?;
    orders::register(client)?;
    users::register(client)?;
    cities::register(client)?;
    customers::register(client)?;
    Ok(())
}

/// Render an argument for embedding in a path. Strings are used verbatim
/// (Display on a JSON string would add quotes); anything else falls back to
/// its JSON rendering. Missing arguments become empty segments and surface
/// as a transport-layer error.
pub(crate) fn path_param(args: &Value, key: &str) -> String {
    match args.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}
