//! Map family: `HashMap<K, V>` from type-erased key/value pairs

use std::any::Any;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::compiler::Compiler;
use crate::error::{CompileError, Result};
use crate::memo::FactoryMemoizer;
use crate::registry::{cast, MapKernel, TypeRegistry};
use crate::signature::{element, Element, TypeDescriptor, TypeSignature};

/// Compiles `HashMap<K, V>` constructors
pub struct MapCompiler {
    registry: Arc<TypeRegistry>,
}

impl MapCompiler {
    /// Create a compiler over `registry`
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl Compiler for MapCompiler {
    type Constructor = MapKernel;

    fn arity(&self) -> RangeInclusive<usize> {
        2..=2
    }

    fn compile(&self, signature: &TypeSignature) -> std::result::Result<MapKernel, CompileError> {
        match signature.as_slice() {
            [key, value] => self.registry.map_kernel(key, value),
            other => Err(CompileError::Unsupported {
                family: "map",
                len: other.len(),
            }),
        }
    }
}

/// Memoized `HashMap<K, V>` constructors
///
/// Duplicate keys are rejected rather than overwritten.
#[derive(Debug)]
pub struct MapFactory {
    memo: FactoryMemoizer<MapCompiler>,
}

impl MapFactory {
    /// Create a factory caching at most `capacity` key/value type pairs
    pub fn new(registry: Arc<TypeRegistry>, capacity: usize) -> Self {
        Self {
            memo: FactoryMemoizer::new(MapCompiler::new(registry), capacity),
        }
    }

    /// The cached constructor for `(key, value)`
    pub fn constructor(&self, key: TypeDescriptor, value: TypeDescriptor) -> Result<MapKernel> {
        self.memo.get_or_compile(&TypeSignature::pair(key, value))
    }

    /// Build a boxed `HashMap<K, V>` where `K` and `V` are described by `key` and `value`
    pub fn create(
        &self,
        key: TypeDescriptor,
        value: TypeDescriptor,
        pairs: Vec<(Element, Element)>,
    ) -> Result<Element> {
        let constructor = self.constructor(key, value)?;
        constructor(pairs)
    }

    /// Build a `HashMap<K, V>` through the cached constructor for `(K, V)`
    pub fn create_typed<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> Result<HashMap<K, V>>
    where
        K: Any + Send + Eq + Hash,
        V: Any + Send,
    {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| (element(k), element(v)))
            .collect();
        let built = self.create(TypeDescriptor::of::<K>(), TypeDescriptor::of::<V>(), pairs)?;
        cast::<HashMap<K, V>>(built)
    }

    /// The underlying memoizer
    pub fn memoizer(&self) -> &FactoryMemoizer<MapCompiler> {
        &self.memo
    }
}
