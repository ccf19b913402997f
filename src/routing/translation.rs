//! Translation function references.
//!
//! The route layer never translates anything itself. It turns a backend
//! descriptor into a [`Translator`] through a [`TranslationGenerator`] and
//! forwards the result to the rendered UI untouched.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Message bindings passed to a translator.
pub type Bindings = BTreeMap<String, String>;

type TranslateFn = dyn Fn(&str, &Bindings) -> String + Send + Sync;

/// Describes a translation backend, e.g. a catalogue module and its domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranslationBackend {
    pub backend: String,
    #[serde(default = "default_domain")]
    pub domain: String,
}

fn default_domain() -> String {
    "auth".to_string()
}

impl TranslationBackend {
    pub fn new(backend: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            domain: domain.into(),
        }
    }
}

/// A callable `(message_id, bindings) -> String` with a printable name.
#[derive(Clone)]
pub struct Translator {
    name: String,
    func: Arc<TranslateFn>,
}

impl Translator {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str, &Bindings) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn translate(&self, message_id: &str, bindings: &Bindings) -> String {
        (self.func)(message_id, bindings)
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator").field("name", &self.name).finish()
    }
}

// Two references are equal when they name the same function.
impl PartialEq for Translator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Produces a translator for a backend descriptor.
pub trait TranslationGenerator: Send + Sync {
    fn generate(&self, backend: &TranslationBackend) -> Translator;
}

/// Generator whose translators return the message id with `%{key}`
/// placeholders substituted from the bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterpolatingTranslations;

impl TranslationGenerator for InterpolatingTranslations {
    fn generate(&self, backend: &TranslationBackend) -> Translator {
        let name = format!("{}:{}", backend.backend, backend.domain);
        Translator::new(name, |message_id, bindings| {
            bindings
                .iter()
                .fold(message_id.to_string(), |message, (key, value)| {
                    message.replace(&format!("%{{{key}}}"), value)
                })
        })
    }
}
