use serde_json::Value;

use crate::error::AuthError;
use crate::http::get_json_bearer;

/// Look up the home IDs attached to the account behind `access_token`.
pub async fn fetch_home_ids(
    client: &reqwest::Client,
    api_base: &str,
    access_token: &str,
) -> Result<Vec<String>, AuthError> {
    let url = format!("{}/me", api_base.trim_end_matches('/'));
    let me = get_json_bearer(client, &url, access_token).await?;
    Ok(home_ids(&me))
}

/// Pull `homes[].id` out of a `/me` document, skipping entries without one.
pub fn home_ids(me: &Value) -> Vec<String> {
    me.get("homes")
        .and_then(Value::as_array)
        .map(|homes| {
            homes
                .iter()
                .filter_map(|h| match h.get("id") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => Some(other.to_string()),
                })
                .collect()
        })
        .unwrap_or_default()
}
