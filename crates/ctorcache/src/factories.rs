//! Factories: one explicitly owned memoizer per constructor family

use std::sync::Arc;

use crate::config::FactoryConfig;
use crate::families::either::EitherFactory;
use crate::families::list::ListFactory;
use crate::families::map::MapFactory;
use crate::families::option::OptionFactory;
use crate::families::result::ResultFactory;
use crate::registry::TypeRegistry;

/// Every constructor family over one shared registry
///
/// Owns its caches; they live exactly as long as this value. Share it
/// between threads by reference or behind an `Arc`.
#[derive(Debug)]
pub struct Factories {
    registry: Arc<TypeRegistry>,
    either: EitherFactory,
    list: ListFactory,
    map: MapFactory,
    option: OptionFactory,
    result: ResultFactory,
}

impl Factories {
    /// Build all families from a filled registry
    pub fn new(registry: TypeRegistry, config: &FactoryConfig) -> Self {
        let registry = Arc::new(registry);
        Self {
            either: EitherFactory::new(Arc::clone(&registry), config.either_capacity),
            list: ListFactory::new(Arc::clone(&registry), config.list_capacity),
            map: MapFactory::new(Arc::clone(&registry), config.map_capacity),
            option: OptionFactory::new(Arc::clone(&registry), config.option_capacity),
            result: ResultFactory::new(Arc::clone(&registry), config.result_capacity),
            registry,
        }
    }

    /// The shared type registry
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Either family
    pub fn either(&self) -> &EitherFactory {
        &self.either
    }

    /// List family
    pub fn list(&self) -> &ListFactory {
        &self.list
    }

    /// Map family
    pub fn map(&self) -> &MapFactory {
        &self.map
    }

    /// Option family
    pub fn option(&self) -> &OptionFactory {
        &self.option
    }

    /// Result family
    pub fn result(&self) -> &ResultFactory {
        &self.result
    }
}
