//! Shared application state

use std::sync::Arc;

use crate::config::ApiSettings;
use crate::domain::ChildKind;
use crate::handlers::{ArrayHandler, ChildResourceHandler};
use crate::store::{ArrayStore, InstanceTypeCatalog, VolumeStore};

/// State handed to every route
///
/// The three store handles usually point at the same backend; they are kept
/// apart so each handler only sees the capability it needs.
#[derive(Clone)]
pub struct AppState {
    pub arrays: Arc<dyn ArrayStore>,
    pub volumes: Arc<dyn VolumeStore>,
    pub instance_types: Arc<dyn InstanceTypeCatalog>,
    pub settings: Arc<ApiSettings>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, settings: ApiSettings) -> Self
    where
        S: ArrayStore + VolumeStore + InstanceTypeCatalog + 'static,
    {
        Self {
            arrays: store.clone(),
            volumes: store.clone(),
            instance_types: store,
            settings: Arc::new(settings),
        }
    }

    pub fn array_handler(&self) -> ArrayHandler {
        ArrayHandler::new(
            self.arrays.clone(),
            self.instance_types.clone(),
            self.settings.clone(),
        )
    }

    pub fn child_handler(&self, kind: ChildKind) -> ChildResourceHandler {
        ChildResourceHandler::new(kind, self.arrays.clone(), self.volumes.clone())
    }
}
