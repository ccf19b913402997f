//! Mount-time session parameters.
//!
//! The rendered auth pages receive a plain key/value map built from the
//! resolved configuration. Values are copied verbatim. Absent fields are left
//! out of the map.

use std::collections::BTreeMap;

use crate::routing::ids::ResourceId;
use crate::routing::translation::Translator;

/// One session value.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionValue {
    Text(String),
    List(Vec<String>),
    Json(serde_json::Value),
    Translator(Translator),
}

impl SessionValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SessionValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Parameter map handed to the rendered UI at mount time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionParams(BTreeMap<&'static str, SessionValue>);

impl SessionParams {
    pub fn get(&self, key: &str) -> Option<&SessionValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON view of the map. Translators are rendered by name.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .0
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    SessionValue::Text(text) => serde_json::Value::from(text.as_str()),
                    SessionValue::List(items) => serde_json::Value::from(items.clone()),
                    SessionValue::Json(json) => json.clone(),
                    SessionValue::Translator(t) => serde_json::Value::from(t.name()),
                };
                ((*key).to_string(), value)
            })
            .collect();

        serde_json::Value::Object(map)
    }

    fn insert(&mut self, key: &'static str, value: Option<SessionValue>) {
        if let Some(value) = value {
            self.0.insert(key, value);
        }
    }
}

/// Resolved fields a session map may carry.
#[derive(Debug, Default)]
pub struct SessionFields<'a> {
    pub path: Option<&'a str>,
    pub register_path: Option<&'a str>,
    pub reset_path: Option<&'a str>,
    pub auth_routes_prefix: Option<&'a str>,
    pub overrides: Option<&'a [String]>,
    pub translator: Option<&'a Translator>,
    pub otp_app: Option<&'a str>,
    pub resource: Option<&'a ResourceId>,
    pub strategy: Option<&'a str>,
    pub context: Option<&'a serde_json::Map<String, serde_json::Value>>,
}

/// Package resolved fields into a session map.
pub fn assemble(fields: &SessionFields<'_>) -> SessionParams {
    let text = |value: Option<&str>| value.map(|v| SessionValue::Text(v.to_string()));

    let mut params = SessionParams::default();
    params.insert("path", text(fields.path));
    params.insert("register_path", text(fields.register_path));
    params.insert("reset_path", text(fields.reset_path));
    params.insert("auth_routes_prefix", text(fields.auth_routes_prefix));
    params.insert("overrides", fields.overrides.map(|o| SessionValue::List(o.to_vec())));
    params.insert("gettext_fn", fields.translator.cloned().map(SessionValue::Translator));
    params.insert("otp_app", text(fields.otp_app));
    params.insert("resource", text(fields.resource.map(ResourceId::as_str)));
    params.insert("strategy", text(fields.strategy));
    params.insert(
        "context",
        fields
            .context
            .map(|c| SessionValue::Json(serde_json::Value::Object(c.clone()))),
    );
    params
}
