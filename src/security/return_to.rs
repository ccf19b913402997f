//! Request-time redirect handling.
//!
//! Reads the router's redirect parameter from the query string and hands back
//! a target that is safe to redirect to.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Query;
use axum::http::Uri;
use axum::response::Redirect;

use crate::config::schema::RouterDefaults;
use crate::observability::metrics;
use crate::security::redirect::RedirectPolicy;

/// Post-authentication redirect guard. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ReturnTo {
    param: Arc<str>,
    policy: Arc<RedirectPolicy>,
}

impl ReturnTo {
    pub fn new(param: impl Into<Arc<str>>, policy: RedirectPolicy) -> Self {
        Self {
            param: param.into(),
            policy: Arc::new(policy),
        }
    }

    pub fn from_defaults(defaults: &RouterDefaults) -> Self {
        Self::new(
            defaults.redirect_param.as_str(),
            RedirectPolicy::new(&defaults.redirect),
        )
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    /// Safe target for a request URI. Missing or malformed parameters yield
    /// the fallback.
    pub fn target(&self, uri: &Uri) -> String {
        let Ok(Query(params)) = Query::<HashMap<String, String>>::try_from_uri(uri) else {
            return self.policy.fallback().to_string();
        };

        let Some(candidate) = params.get(self.param.as_ref()) else {
            return self.policy.fallback().to_string();
        };

        match self.policy.check(candidate) {
            Ok(()) => candidate.clone(),
            Err(reason) => {
                tracing::warn!(
                    reason = %reason,
                    param = %self.param,
                    "Rejected redirect target"
                );
                metrics::record_redirect_rejected(reason.as_str());
                self.policy.fallback().to_string()
            }
        }
    }

    pub fn redirect(&self, uri: &Uri) -> Redirect {
        Redirect::to(&self.target(uri))
    }
}
