//! Client configuration record
//!
//! The fixed set of initialization parameters a web client SDK needs.
//! The record is read either from a JSON object in storage or from
//! environment variables, and written back out as JSON.

use serde::{Deserialize, Deserializer, Serialize};
use std::ffi::OsString;

// ============================================================================
// Environment Variable Names
// ============================================================================

pub const API_KEY_VAR: &str = "FIREBASE_API_KEY";
pub const AUTH_DOMAIN_VAR: &str = "FIREBASE_AUTH_DOMAIN";
pub const PROJECT_ID_VAR: &str = "FIREBASE_PROJECT_ID";
pub const STORAGE_BUCKET_VAR: &str = "FIREBASE_STORAGE_BUCKET";
pub const MESSAGING_SENDER_ID_VAR: &str = "FIREBASE_MESSAGING_SENDER_ID";
pub const APP_ID_VAR: &str = "FIREBASE_APP_ID";
pub const MEASUREMENT_ID_VAR: &str = "FIREBASE_MEASUREMENT_ID";

/// All variables read by [`ClientConfig::from_env`], in field order
pub const CONFIG_ENV_VARS: [&str; 7] = [
    API_KEY_VAR,
    AUTH_DOMAIN_VAR,
    PROJECT_ID_VAR,
    STORAGE_BUCKET_VAR,
    MESSAGING_SENDER_ID_VAR,
    APP_ID_VAR,
    MEASUREMENT_ID_VAR,
];

// ============================================================================
// Record
// ============================================================================

/// Client Configuration Record
///
/// All fields are opaque strings. Unknown JSON fields are ignored, and
/// missing or `null` fields decode to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    #[serde(deserialize_with = "string_or_null")]
    pub api_key: String,

    #[serde(deserialize_with = "string_or_null")]
    pub auth_domain: String,

    #[serde(deserialize_with = "string_or_null")]
    pub project_id: String,

    #[serde(deserialize_with = "string_or_null")]
    pub storage_bucket: String,

    #[serde(deserialize_with = "string_or_null")]
    pub messaging_sender_id: String,

    #[serde(deserialize_with = "string_or_null")]
    pub app_id: String,

    #[serde(deserialize_with = "string_or_null")]
    pub measurement_id: String,
}

impl ClientConfig {
    /// Build the record from the process environment, defaulting unset
    /// variables to the empty string.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Build the record from an arbitrary variable lookup.
    ///
    /// Values that are not valid UTF-8 are decoded lossily.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let get = |name: &str| match lookup(name) {
            Some(value) => value.into_string().unwrap_or_else(|raw| {
                tracing::warn!(variable = name, "Value is not valid UTF-8, decoding lossily");
                raw.to_string_lossy().into_owned()
            }),
            None => String::new(),
        };

        Self {
            api_key: get(API_KEY_VAR),
            auth_domain: get(AUTH_DOMAIN_VAR),
            project_id: get(PROJECT_ID_VAR),
            storage_bucket: get(STORAGE_BUCKET_VAR),
            messaging_sender_id: get(MESSAGING_SENDER_ID_VAR),
            app_id: get(APP_ID_VAR),
            measurement_id: get(MEASUREMENT_ID_VAR),
        }
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample() -> ClientConfig {
        ClientConfig {
            api_key: "AIzaSyExample".to_string(),
            auth_domain: "demo.firebaseapp.com".to_string(),
            project_id: "demo".to_string(),
            storage_bucket: "demo.appspot.com".to_string(),
            messaging_sender_id: "1234567890".to_string(),
            app_id: "1:1234567890:web:abcdef".to_string(),
            measurement_id: "G-XYZ123".to_string(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 7);
        assert_eq!(object["apiKey"], "AIzaSyExample");
        assert_eq!(object["authDomain"], "demo.firebaseapp.com");
        assert_eq!(object["projectId"], "demo");
        assert_eq!(object["storageBucket"], "demo.appspot.com");
        assert_eq!(object["messagingSenderId"], "1234567890");
        assert_eq!(object["appId"], "1:1234567890:web:abcdef");
        assert_eq!(object["measurementId"], "G-XYZ123");
    }

    #[test]
    fn test_values_survive_reserialization() {
        let original = r#"{
            "apiKey": "  spaced  ",
            "authDomain": "ünïcödé.example",
            "projectId": "p\"quoted\"",
            "storageBucket": "",
            "messagingSenderId": "0000",
            "appId": "a\nb",
            "measurementId": "G-1"
        }"#;

        let config: ClientConfig = serde_json::from_str(original).unwrap();
        let reparsed: ClientConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();

        assert_eq!(config, reparsed);
        assert_eq!(reparsed.api_key, "  spaced  ");
        assert_eq!(reparsed.auth_domain, "ünïcödé.example");
        assert_eq!(reparsed.project_id, "p\"quoted\"");
        assert_eq!(reparsed.app_id, "a\nb");
    }

    #[test]
    fn test_missing_and_unknown_fields() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"projectId": "demo", "databaseURL": "https://x"}"#).unwrap();

        assert_eq!(config.project_id, "demo");
        assert_eq!(config.api_key, "");
        assert_eq!(config.measurement_id, "");
    }

    #[test]
    fn test_null_fields_decode_to_empty() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"apiKey": null, "appId": "x"}"#).unwrap();

        assert_eq!(config.api_key, "");
        assert_eq!(config.app_id, "x");
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(serde_json::from_str::<ClientConfig>("{\"apiKey\": ").is_err());
        assert!(serde_json::from_str::<ClientConfig>(r#"{"apiKey": 42}"#).is_err());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (API_KEY_VAR, "key"),
            (PROJECT_ID_VAR, "demo"),
            (MEASUREMENT_ID_VAR, "G-1"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_lookup(|name| vars.get(name).map(OsString::from));

        assert_eq!(config.api_key, "key");
        assert_eq!(config.project_id, "demo");
        assert_eq!(config.measurement_id, "G-1");
        assert_eq!(config.auth_domain, "");
        assert_eq!(config.app_id, "");
    }

    #[test]
    fn test_from_lookup_all_unset() {
        assert_eq!(ClientConfig::from_lookup(|_| None), ClientConfig::default());
    }

    #[cfg(unix)]
    #[test]
    fn test_from_lookup_decodes_non_utf8_lossily() {
        use std::os::unix::ffi::OsStringExt;

        let config = ClientConfig::from_lookup(|name| match name {
            PROJECT_ID_VAR => Some(OsString::from_vec(b"demo-\xff".to_vec())),
            _ => None,
        });

        assert_eq!(config.project_id, "demo-\u{fffd}");
        assert_eq!(config.api_key, "");
    }
}
