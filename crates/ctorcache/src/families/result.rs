//! Result family: `Ok(T)` and faulted `Err(Faults)` for a runtime type
//!
//! Like the option family, both constructors of a type are compiled and
//! cached together.

use std::any::Any;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::compiler::Compiler;
use crate::error::{CompileError, Result};
use crate::memo::FactoryMemoizer;
use crate::registry::{cast, FaultKernel, TypeRegistry, WrapKernel};
use crate::signature::{element, Element, TypeDescriptor, TypeSignature};

/// Broad category of a failed result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FaultClass {
    /// No particular category
    #[default]
    Unspecified,
    /// The input was rejected
    InvalidInput,
    /// Something that was looked up does not exist
    NotFound,
    /// The operation clashed with existing state
    Conflict,
    /// A dependency could not be reached
    Unavailable,
    /// An unexpected internal failure
    Internal,
}

/// Error side of a constructed result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Faults {
    /// Category shared by all messages
    pub class: FaultClass,
    /// Individual error messages
    pub messages: Vec<String>,
}

impl Faults {
    /// Create a set of faults
    pub fn new(class: FaultClass, messages: Vec<String>) -> Self {
        Self { class, messages }
    }
}

impl fmt::Display for Faults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.class, self.messages.join("; "))
    }
}

/// The pair of result constructors for one type
#[derive(Clone, Copy)]
pub struct ResultConstructors {
    /// Builds `Ok::<T, Faults>(value)`
    pub ok: WrapKernel,
    /// Builds `Err::<T, Faults>(faults)`
    pub with_errors: FaultKernel,
}

/// Compiles result constructors
pub struct ResultCompiler {
    registry: Arc<TypeRegistry>,
}

impl ResultCompiler {
    /// Create a compiler over `registry`
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl Compiler for ResultCompiler {
    type Constructor = ResultConstructors;

    fn arity(&self) -> RangeInclusive<usize> {
        1..=1
    }

    fn compile(&self, signature: &TypeSignature) -> std::result::Result<ResultConstructors, CompileError> {
        match signature.as_slice() {
            [ty] => {
                let kernels = self.registry.kernels(ty)?;
                Ok(ResultConstructors {
                    ok: kernels.ok,
                    with_errors: kernels.with_errors,
                })
            }
            other => Err(CompileError::Unsupported {
                family: "result",
                len: other.len(),
            }),
        }
    }
}

/// Memoized result constructors
#[derive(Debug)]
pub struct ResultFactory {
    memo: FactoryMemoizer<ResultCompiler>,
}

impl ResultFactory {
    /// Create a factory caching at most `capacity` types
    pub fn new(registry: Arc<TypeRegistry>, capacity: usize) -> Self {
        Self {
            memo: FactoryMemoizer::new(ResultCompiler::new(registry), capacity),
        }
    }

    /// Build a boxed `Ok::<T, Faults>` where `T` is described by `ty`
    pub fn ok(&self, ty: TypeDescriptor, element: Element) -> Result<Element> {
        let constructors = self.memo.get_or_compile(&TypeSignature::single(ty))?;
        (constructors.ok)(element)
    }

    /// Build a boxed `Err::<T, Faults>` where `T` is described by `ty`
    pub fn with_errors(&self, ty: TypeDescriptor, faults: Faults) -> Result<Element> {
        let constructors = self.memo.get_or_compile(&TypeSignature::single(ty))?;
        Ok((constructors.with_errors)(faults))
    }

    /// Build `Ok(value)` through the cached constructors for `T`
    pub fn ok_typed<T: Any + Send>(&self, value: T) -> Result<std::result::Result<T, Faults>> {
        cast::<std::result::Result<T, Faults>>(self.ok(TypeDescriptor::of::<T>(), element(value))?)
    }

    /// Build `Err(faults)` through the cached constructors for `T`
    pub fn with_errors_typed<T: Any + Send>(&self, faults: Faults) -> Result<std::result::Result<T, Faults>> {
        cast::<std::result::Result<T, Faults>>(self.with_errors(TypeDescriptor::of::<T>(), faults)?)
    }

    /// The underlying memoizer
    pub fn memoizer(&self) -> &FactoryMemoizer<ResultCompiler> {
        &self.memo
    }
}
