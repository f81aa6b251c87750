use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::interpreters::{AlertInterpreter, DeploymentInterpreter, PayloadInterpreter};

pub const HEALTH_PATHS: [&str; 2] = ["/health", "/healthz"];
pub const READY_PATHS: [&str; 2] = ["/ready", "/readyz"];
pub const ALERT_PATHS: [&str; 1] = ["/sms"];
pub const ARGOCD_PATHS: [&str; 2] = ["/argocd", "/argocd/webhook"];

/// What a request path resolves to.
#[derive(Clone)]
pub enum Route {
    Health,
    Ready,
    Webhook(Arc<dyn PayloadInterpreter>),
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Health => f.write_str("Health"),
            Route::Ready => f.write_str("Ready"),
            Route::Webhook(interpreter) => write!(f, "Webhook({})", interpreter.name()),
        }
    }
}

/// Exact, case-sensitive path table built once at startup.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Health, readiness, `/sms` and the ArgoCD paths.
    pub fn standard() -> Self {
        let alert: Arc<dyn PayloadInterpreter> = Arc::new(AlertInterpreter::new());
        let argocd: Arc<dyn PayloadInterpreter> = Arc::new(DeploymentInterpreter::new());

        let mut table = Self::new();
        for path in HEALTH_PATHS {
            table.register(path, Route::Health);
        }
        for path in READY_PATHS {
            table.register(path, Route::Ready);
        }
        for path in ALERT_PATHS {
            table.register(path, Route::Webhook(alert.clone()));
        }
        for path in ARGOCD_PATHS {
            table.register(path, Route::Webhook(argocd.clone()));
        }
        table
    }

    pub fn register(&mut self, path: impl Into<String>, route: Route) -> &mut Self {
        self.routes.insert(path.into(), route);
        self
    }

    pub fn resolve(&self, path: &str) -> Option<&Route> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
