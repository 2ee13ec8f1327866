//! List family: `Vec<T>` from type-erased elements

use std::any::Any;
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::compiler::Compiler;
use crate::error::{CompileError, Result};
use crate::memo::FactoryMemoizer;
use crate::registry::{cast, ListKernel, TypeRegistry};
use crate::signature::{element, Element, TypeDescriptor, TypeSignature};

/// Compiles `Vec<T>` constructors
pub struct ListCompiler {
    registry: Arc<TypeRegistry>,
}

impl ListCompiler {
    /// Create a compiler over `registry`
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl Compiler for ListCompiler {
    type Constructor = ListKernel;

    fn arity(&self) -> RangeInclusive<usize> {
        1..=1
    }

    fn compile(&self, signature: &TypeSignature) -> std::result::Result<ListKernel, CompileError> {
        match signature.as_slice() {
            [ty] => Ok(self.registry.kernels(ty)?.list),
            other => Err(CompileError::Unsupported {
                family: "list",
                len: other.len(),
            }),
        }
    }
}

/// Memoized `Vec<T>` constructors
#[derive(Debug)]
pub struct ListFactory {
    memo: FactoryMemoizer<ListCompiler>,
}

impl ListFactory {
    /// Create a factory caching at most `capacity` element types
    pub fn new(registry: Arc<TypeRegistry>, capacity: usize) -> Self {
        Self {
            memo: FactoryMemoizer::new(ListCompiler::new(registry), capacity),
        }
    }

    /// Build a boxed `Vec<T>` where `T` is described by `ty`
    pub fn create(&self, ty: TypeDescriptor, elements: Vec<Element>) -> Result<Element> {
        let constructor = self.memo.get_or_compile(&TypeSignature::single(ty))?;
        constructor(elements)
    }

    /// Build a `Vec<T>` through the cached constructor for `T`
    pub fn create_typed<T: Any + Send>(&self, elements: impl IntoIterator<Item = T>) -> Result<Vec<T>> {
        let elements = elements.into_iter().map(element).collect();
        cast::<Vec<T>>(self.create(TypeDescriptor::of::<T>(), elements)?)
    }

    /// The underlying memoizer
    pub fn memoizer(&self) -> &FactoryMemoizer<ListCompiler> {
        &self.memo
    }
}
