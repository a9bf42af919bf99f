//! Audit events
//!
//! Every mutating operation on arrays, volumes and drives is recorded as a
//! structured `tracing` event on the `vsa_api::audit` target, so a
//! subscriber can route audit records separately from diagnostics.

use std::net::IpAddr;

use uuid::Uuid;

use crate::domain::{ArrayId, ChildKind, OperationContext};

pub const AUDIT_TARGET: &str = "vsa_api::audit";

/// Audit action types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    ArrayCreated,
    ArrayDeleted,
    VolumeCreated,
    VolumeUpdated,
    VolumeDeleted,
    DriveDeleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ArrayCreated => "array.created",
            AuditAction::ArrayDeleted => "array.deleted",
            AuditAction::VolumeCreated => "volume.created",
            AuditAction::VolumeUpdated => "volume.updated",
            AuditAction::VolumeDeleted => "volume.deleted",
            AuditAction::DriveDeleted => "drive.deleted",
        }
    }

    /// Deletion action for a child resource kind
    pub fn child_deleted(kind: ChildKind) -> Self {
        match kind {
            ChildKind::Volume => AuditAction::VolumeDeleted,
            ChildKind::Drive => AuditAction::DriveDeleted,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builder for an audit event
#[derive(Debug, Clone)]
pub struct AuditEvent {
    action: AuditAction,
    resource_type: Option<&'static str>,
    resource_id: Option<String>,
    array_id: Option<ArrayId>,
    changed_fields: Vec<&'static str>,
    summary: Option<String>,
}

impl AuditEvent {
    pub fn new(action: AuditAction) -> Self {
        Self {
            action,
            resource_type: None,
            resource_id: None,
            array_id: None,
            changed_fields: Vec::new(),
            summary: None,
        }
    }

    pub fn resource_type(mut self, resource_type: &'static str) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    pub fn resource_id(mut self, resource_id: impl ToString) -> Self {
        self.resource_id = Some(resource_id.to_string());
        self
    }

    /// Parent array for child resource events
    pub fn array_id(mut self, array_id: ArrayId) -> Self {
        self.array_id = Some(array_id);
        self
    }

    pub fn changed_fields(mut self, fields: Vec<&'static str>) -> Self {
        self.changed_fields = fields;
        self
    }

    /// Free-form description, e.g. requested size or type
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn action(&self) -> AuditAction {
        self.action
    }

    /// Combine the event with the request context
    pub fn record(&self, context: &OperationContext) -> AuditRecord {
        AuditRecord {
            action: self.action,
            resource_type: self.resource_type,
            resource_id: self.resource_id.clone(),
            array_id: self.array_id,
            changed_fields: self.changed_fields.clone(),
            summary: self.summary.clone(),
            project_id: context.project_id.clone(),
            user_id: context.user_id.clone(),
            correlation_id: context.correlation_id,
            client_ip: context.client_ip,
        }
    }

    /// Emit the event with the request context attached
    pub fn emit(self, context: &OperationContext) {
        self.record(context).emit();
    }
}

/// Audit event joined with who asked for it
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub action: AuditAction,
    pub resource_type: Option<&'static str>,
    pub resource_id: Option<String>,
    pub array_id: Option<ArrayId>,
    pub changed_fields: Vec<&'static str>,
    pub summary: Option<String>,
    pub project_id: Option<String>,
    pub user_id: Option<String>,
    pub correlation_id: Option<Uuid>,
    pub client_ip: Option<IpAddr>,
}

impl AuditRecord {
    fn emit(&self) {
        tracing::info!(
            target: AUDIT_TARGET,
            action = %self.action,
            resource_type = self.resource_type,
            resource_id = self.resource_id.as_deref(),
            array_id = self.array_id.map(ArrayId::value),
            changed_fields = ?self.changed_fields,
            summary = self.summary.as_deref(),
            project_id = self.project_id.as_deref(),
            user_id = self.user_id.as_deref(),
            correlation_id = ?self.correlation_id,
            client_ip = ?self.client_ip,
            "audit"
        );
    }
}
