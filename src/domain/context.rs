//! Request context
//!
//! Who asked for an operation, carried from the middleware to audit events.

use std::net::IpAddr;
use uuid::Uuid;

/// Caller identity and tracing data for one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationContext {
    /// X-Auth-Project-Id
    pub project_id: Option<String>,
    /// X-Auth-User-Id
    pub user_id: Option<String>,
    pub correlation_id: Option<Uuid>,
    pub client_ip: Option<IpAddr>,
}

impl OperationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a caller identified by project and user
    pub fn for_caller(project_id: Option<String>, user_id: Option<String>) -> Self {
        Self {
            project_id,
            user_id,
            ..Self::default()
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Generate a new correlation ID if not present
    pub fn ensure_correlation_id(&mut self) -> Uuid {
        *self.correlation_id.get_or_insert_with(Uuid::new_v4)
    }
}
