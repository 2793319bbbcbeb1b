//! Transport registry - destination kind to service definition mapping

use std::collections::HashMap;
use std::sync::Arc;

use contracts::{ContractError, ServiceDefinition, TargetKind};

use crate::transports::{
    FifoQueueDefinition, FileQueueDefinition, LogQueueDefinition, MemoryQueueDefinition,
};

/// Registry of destination types.
///
/// The engine resolves a target's kind here and only ever talks through the
/// capability contract; kind-specific behavior stays inside the plugins. A
/// kind without a registered definition fails dispatch for every record
/// destined there (`InvalidServiceModule`).
#[derive(Default)]
pub struct TransportRegistry {
    definitions: HashMap<TargetKind, Arc<dyn ServiceDefinition>>,
}

impl TransportRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in destination type registered
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FifoQueueDefinition::new()));
        registry.register(Arc::new(FileQueueDefinition::new()));
        registry.register(Arc::new(LogQueueDefinition::new()));
        registry.register(Arc::new(MemoryQueueDefinition::new()));
        registry
    }

    /// Register a destination type, keyed by its declared kind.
    /// A later registration for the same kind replaces the earlier one.
    pub fn register(&mut self, definition: Arc<dyn ServiceDefinition>) {
        self.definitions.insert(definition.kind(), definition);
    }

    /// Resolve a kind to its service definition.
    ///
    /// # Errors
    /// `InvalidServiceModule` when the kind is not registered.
    pub fn resolve(&self, kind: TargetKind) -> Result<&Arc<dyn ServiceDefinition>, ContractError> {
        self.definitions
            .get(&kind)
            .ok_or(ContractError::InvalidServiceModule {
                kind: format!("{kind:?}"),
            })
    }

    /// Registered kinds (for diagnostics and `info` output)
    pub fn kinds(&self) -> Vec<TargetKind> {
        self.definitions.keys().copied().collect()
    }
}
