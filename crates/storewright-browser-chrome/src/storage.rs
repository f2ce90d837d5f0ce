//! Storage snapshots: cookies over CDP, local storage through small scripts.
//!
//! Snapshots use the `{"cookies": [...], "origins": [{"origin", "localStorage"}]}`
//! layout shared by every provider.

use crate::error::ChromeError;
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use storewright_interfaces::{ApiError, StorageState};

/// Cookie attributes kept in a snapshot and accepted back by `Network.setCookies`.
const COOKIE_FIELDS: [&str; 8] = [
    "name", "value", "domain", "path", "expires", "httpOnly", "secure", "sameSite",
];

/// Captures the current origin and its local storage.
pub const CAPTURE_LOCAL_STORAGE: &str = r#"JSON.stringify({
  origin: location.origin,
  localStorage: Object.keys(localStorage).map(k => ({ name: k, value: localStorage.getItem(k) })),
})"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captured {
    origin: String,
    local_storage: Vec<Value>,
}

/// Builds a snapshot from a [`CAPTURE_LOCAL_STORAGE`] reply and the page's CDP cookies.
pub fn snapshot(raw_local_storage: &str, cookies: Vec<Value>) -> Result<StorageState, ApiError> {
    let captured: Captured = serde_json::from_str(raw_local_storage)?;
    let cookies: Vec<Value> = cookies
        .into_iter()
        .filter_map(|cookie| match cookie {
            Value::Object(map) => Some(Value::Object(
                map.into_iter()
                    .filter(|(key, _)| COOKIE_FIELDS.contains(&key.as_str()))
                    .collect(),
            )),
            _ => None,
        })
        .collect();
    Ok(StorageState::new(json!({
        "cookies": cookies,
        "origins": [{ "origin": captured.origin, "localStorage": captured.local_storage }],
    })))
}

/// The snapshot's cookies as `Network.setCookies` parameters, each bound to `url`.
///
/// Session cookies (`expires` <= 0) are restored without an expiry.
pub fn cookie_params(state: &StorageState, url: &str) -> Result<Vec<CookieParam>, ChromeError> {
    let Some(cookies) = state.as_value()["cookies"].as_array() else {
        return Ok(Vec::new());
    };
    cookies
        .iter()
        .filter_map(Value::as_object)
        .map(|cookie| {
            let mut param: Map<String, Value> = cookie
                .iter()
                .filter(|(key, _)| COOKIE_FIELDS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            if param
                .get("expires")
                .and_then(Value::as_f64)
                .is_some_and(|expires| expires <= 0.0)
            {
                param.remove("expires");
            }
            param.insert("url".to_string(), Value::String(url.to_string()));
            serde_json::from_value(Value::Object(param))
                .map_err(|e| ChromeError::Payload(format!("cookie: {}", e)))
        })
        .collect()
}

/// Writes the snapshot's local storage entries for the current origin.
pub fn seed_local_storage(state: &StorageState) -> Result<String, ChromeError> {
    let origins = serde_json::to_string(&state.as_value()["origins"])
        .map_err(|e| ChromeError::Payload(e.to_string()))?;
    Ok(format!(
        r#"JSON.stringify((() => {{
  const origins = {origins} || [];
  for (const o of origins) {{
    if (o.origin !== location.origin) continue;
    for (const e of o.localStorage || []) localStorage.setItem(e.name, e.value);
  }}
  return true;
}})())"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cdp_cookie() -> Value {
        json!({
            "name": "session-username",
            "value": "standard_user",
            "domain": "www.saucedemo.com",
            "path": "/",
            "expires": -1.0,
            "size": 29,
            "httpOnly": true,
            "secure": false,
            "session": true,
            "priority": "Medium",
            "sourceScheme": "Secure",
            "sourcePort": 443,
        })
    }

    #[test]
    fn snapshot_keeps_http_only_cookies_and_local_storage() {
        let raw = r#"{"origin":"https://www.saucedemo.com","localStorage":[{"name":"cart-contents","value":"[4]"}]}"#;
        let state = snapshot(raw, vec![cdp_cookie()]).unwrap();
        let value = state.as_value();

        assert_eq!(value["cookies"][0]["name"], "session-username");
        assert_eq!(value["cookies"][0]["httpOnly"], true);
        assert!(value["cookies"][0].get("sourcePort").is_none());
        assert_eq!(value["origins"][0]["origin"], "https://www.saucedemo.com");
        assert_eq!(value["origins"][0]["localStorage"][0]["value"], "[4]");
    }

    #[test]
    fn cookies_restore_as_set_cookie_params() {
        let raw = r#"{"origin":"https://www.saucedemo.com","localStorage":[]}"#;
        let state = snapshot(raw, vec![cdp_cookie()]).unwrap();

        let params = cookie_params(&state, "https://www.saucedemo.com").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "session-username");
        assert_eq!(params[0].value, "standard_user");
        assert_eq!(params[0].url.as_deref(), Some("https://www.saucedemo.com"));
        assert_eq!(params[0].http_only, Some(true));
        assert!(params[0].expires.is_none());

        assert!(cookie_params(&StorageState::default(), "https://x").unwrap().is_empty());
    }

    #[test]
    fn seeding_script_embeds_the_origins() {
        let state = StorageState::new(json!({
            "origins": [{ "origin": "https://www.saucedemo.com", "localStorage": [{ "name": "cart-contents", "value": "[1]" }] }],
        }));
        let script = seed_local_storage(&state).unwrap();
        assert!(script.contains("cart-contents"));
        assert!(script.contains("location.origin"));
    }
}
