/// Core workflow type definitions
///
/// Defines the workflow record as the editors build it: credentials, input
/// fields, a query template and webhook settings. These types are serialized
/// with camelCase keys, both on the wire and in the durable store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A complete workflow definition
///
/// `id` is empty until the registry assigns one on first save, and never
/// changes afterwards. `updated_at` is stamped by the registry on every save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowDefinition {
    /// Opaque unique identifier (UUID v4 when generated by the registry)
    pub id: String,
    /// Human-readable workflow name
    pub name: String,
    pub description: Option<String>,
    /// Credentials available to the query template, in editor order
    pub credentials: Vec<Credential>,
    /// Input fields collected before execution, in editor order
    pub fields: Vec<Field>,
    pub query: QueryTemplate,
    pub webhook_settings: WebhookSettings,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkflowDefinition {
    /// Create an unsaved definition with the given name and defaults everywhere else
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a manual-execution payload from the fields' default values
    ///
    /// Every field contributes `name -> defaultValue`, with an empty string when
    /// no default is set. Later fields win on duplicate names.
    pub fn default_payload(&self) -> Value {
        let payload: Map<String, Value> = self
            .fields
            .iter()
            .map(|field| {
                (
                    field.name.clone(),
                    Value::String(field.default_value.clone().unwrap_or_default()),
                )
            })
            .collect();
        Value::Object(payload)
    }
}

/// A stored secret used by the query template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credential {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub credential_type: CredentialType,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialType {
    #[default]
    ApiKey,
    BearerToken,
    BasicAuth,
    #[serde(rename = "oauth2")]
    OAuth2,
    Custom,
}

/// A typed input field rendered by the execution form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    pub default_value: Option<String>,
    /// Choices for `select` and `radio` fields
    pub options: Vec<FieldOption>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Email,
    Password,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Date,
    File,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Request template the workflow would dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryTemplate {
    #[serde(rename = "type")]
    pub query_type: QueryType,
    /// HTTP verb, e.g. "GET" or "POST"
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub params: BTreeMap<String, String>,
    pub body: String,
}

impl Default for QueryTemplate {
    fn default() -> Self {
        Self {
            query_type: QueryType::Http,
            method: "GET".to_string(),
            url: String::new(),
            headers: BTreeMap::new(),
            params: BTreeMap::new(),
            body: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    #[default]
    Http,
    Webhook,
    Database,
    Custom,
}

/// Webhook endpoint settings
///
/// Recorded for display only; the trigger surface does not enforce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookSettings {
    pub enabled: bool,
    pub authentication: WebhookAuthentication,
    pub api_key: String,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            authentication: WebhookAuthentication::None,
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookAuthentication {
    #[default]
    None,
    Apikey,
    Bearer,
}
