pub mod vendor_mock;

use std::path::Path;

/// A localhost port that was free a moment ago.
#[allow(dead_code)]
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Parse the JSON written by a helper.
#[allow(dead_code)]
pub fn read_json(path: &Path) -> serde_json::Value {
    let data = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&data).unwrap()
}

/// Value of `key` in the query string of `url`.
#[allow(dead_code)]
pub fn query_value(url: &str, key: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
