//! ModelRegistry for mapping entity names to EntityModel implementations.

use crate::domain::model::{CardapioModel, ClienteModel, EntityModel, PedidoModel};
use std::collections::HashMap;
use std::sync::Arc;

/// A registry that maps entity names (the `{entity}` path segment) to their models.
pub struct ModelRegistry {
    models: HashMap<String, Arc<dyn EntityModel>>,
}

impl ModelRegistry {
    /// Creates a new empty ModelRegistry.
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Registry holding the menu, customer and order models.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.register(CardapioModel);
        reg.register(ClienteModel);
        reg.register(PedidoModel);
        reg
    }

    /// Registers a model under its table name.
    pub fn register<M: EntityModel + 'static>(&mut self, model: M) {
        self.models.insert(model.table_name().to_string(), Arc::new(model));
    }

    /// Retrieves a model implementation by name.
    /// Returns None if the model is not registered.
    pub fn get(&self, name: &str) -> Option<Arc<dyn EntityModel>> {
        self.models.get(name).cloned()
    }

    /// Returns all registered model names, sorted.
    pub fn list_models(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
