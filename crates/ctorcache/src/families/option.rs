//! Option family: `Some(T)` and `None::<T>` for a runtime type
//!
//! Both constructors of a type are compiled together and cached under the
//! same one-type signature.

use std::any::Any;
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::compiler::Compiler;
use crate::error::{CompileError, Result};
use crate::memo::FactoryMemoizer;
use crate::registry::{cast, NoneKernel, TypeRegistry, WrapKernel};
use crate::signature::{element, Element, TypeDescriptor, TypeSignature};

/// The pair of option constructors for one type
#[derive(Clone, Copy)]
pub struct OptionConstructors {
    /// Builds `Some(T)`
    pub some: WrapKernel,
    /// Builds `None::<T>`
    pub none: NoneKernel,
}

/// Compiles option constructors
pub struct OptionCompiler {
    registry: Arc<TypeRegistry>,
}

impl OptionCompiler {
    /// Create a compiler over `registry`
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl Compiler for OptionCompiler {
    type Constructor = OptionConstructors;

    fn arity(&self) -> RangeInclusive<usize> {
        1..=1
    }

    fn compile(&self, signature: &TypeSignature) -> std::result::Result<OptionConstructors, CompileError> {
        match signature.as_slice() {
            [ty] => {
                let kernels = self.registry.kernels(ty)?;
                Ok(OptionConstructors {
                    some: kernels.some,
                    none: kernels.none,
                })
            }
            other => Err(CompileError::Unsupported {
                family: "option",
                len: other.len(),
            }),
        }
    }
}

/// Memoized option constructors
#[derive(Debug)]
pub struct OptionFactory {
    memo: FactoryMemoizer<OptionCompiler>,
}

impl OptionFactory {
    /// Create a factory caching at most `capacity` types
    pub fn new(registry: Arc<TypeRegistry>, capacity: usize) -> Self {
        Self {
            memo: FactoryMemoizer::new(OptionCompiler::new(registry), capacity),
        }
    }

    /// Build a boxed `Some(T)` where `T` is described by `ty`
    pub fn some(&self, ty: TypeDescriptor, element: Element) -> Result<Element> {
        let constructors = self.memo.get_or_compile(&TypeSignature::single(ty))?;
        (constructors.some)(element)
    }

    /// Build a boxed `None::<T>` where `T` is described by `ty`
    pub fn none(&self, ty: TypeDescriptor) -> Result<Element> {
        let constructors = self.memo.get_or_compile(&TypeSignature::single(ty))?;
        Ok((constructors.none)())
    }

    /// Build `Some(value)` through the cached constructors for `T`
    pub fn some_typed<T: Any + Send>(&self, value: T) -> Result<Option<T>> {
        cast::<Option<T>>(self.some(TypeDescriptor::of::<T>(), element(value))?)
    }

    /// Build `None::<T>` through the cached constructors for `T`
    pub fn none_typed<T: Any + Send>(&self) -> Result<Option<T>> {
        cast::<Option<T>>(self.none(TypeDescriptor::of::<T>())?)
    }

    /// The underlying memoizer
    pub fn memoizer(&self) -> &FactoryMemoizer<OptionCompiler> {
        &self.memo
    }
}
