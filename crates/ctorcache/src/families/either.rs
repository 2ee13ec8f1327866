//! Either family: one of 1 to 8 alternative shapes
//!
//! A signature `(T0, ..., Tn)` describes a value holding exactly one of
//! its types. The constructor picks the alternative by index and checks
//! that the element really is of that type.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::compiler::{Compiler, Selector};
use crate::error::{CompileError, FactoryError, Result};
use crate::memo::FactoryMemoizer;
use crate::registry::TypeRegistry;
use crate::signature::{Element, TypeDescriptor, TypeSignature};

/// Compiles either-constructors from registered types
pub struct EitherCompiler {
    registry: Arc<TypeRegistry>,
}

impl EitherCompiler {
    /// Create a compiler over `registry`
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl Compiler for EitherCompiler {
    type Constructor = EitherConstructor;

    fn compile(&self, signature: &TypeSignature) -> std::result::Result<EitherConstructor, CompileError> {
        let alternatives = signature
            .iter()
            .map(|ty| self.registry.kernels(ty).map(|kernels| kernels.descriptor))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(EitherConstructor {
            signature: signature.clone(),
            alternatives: alternatives.into(),
        })
    }
}

/// Compiled constructor for one either-signature
#[derive(Clone, Debug)]
pub struct EitherConstructor {
    signature: TypeSignature,
    alternatives: Arc<[TypeDescriptor]>,
}

impl Selector for EitherConstructor {
    type Output = EitherValue;

    fn shapes(&self) -> usize {
        self.alternatives.len()
    }

    fn select(&self, index: usize, element: Element) -> Result<EitherValue> {
        let ty = self
            .alternatives
            .get(index)
            .ok_or(FactoryError::IndexOutOfRange {
                index,
                len: self.alternatives.len(),
            })?;

        if !ty.matches(&*element) {
            return Err(FactoryError::TypeMismatch {
                expected: ty.name(),
            });
        }

        Ok(EitherValue {
            signature: self.signature.clone(),
            index,
            value: element,
        })
    }
}

/// A value holding one alternative of an either-signature
pub struct EitherValue {
    signature: TypeSignature,
    index: usize,
    value: Element,
}

impl EitherValue {
    /// Which alternative is held
    pub fn index(&self) -> usize {
        self.index
    }

    /// The full signature
    pub fn signature(&self) -> &TypeSignature {
        &self.signature
    }

    /// Type of the held alternative
    pub fn descriptor(&self) -> TypeDescriptor {
        // index was checked against the signature on construction
        self.signature.as_slice()[self.index]
    }

    /// Whether the held value is a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Borrow the held value as a `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Take the held value as a `T`, or get `self` back
    pub fn into_inner<T: Any>(self) -> std::result::Result<T, Self> {
        let Self {
            signature,
            index,
            value,
        } = self;
        value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|value| Self {
                signature,
                index,
                value,
            })
    }

    /// Take the held value type-erased
    pub fn into_element(self) -> Element {
        self.value
    }
}

impl fmt::Debug for EitherValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EitherValue")
            .field("signature", &self.signature)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Memoized constructors for the either family
#[derive(Debug)]
pub struct EitherFactory {
    memo: FactoryMemoizer<EitherCompiler>,
}

impl EitherFactory {
    /// Create a factory caching at most `capacity` signatures
    pub fn new(registry: Arc<TypeRegistry>, capacity: usize) -> Self {
        Self {
            memo: FactoryMemoizer::new(EitherCompiler::new(registry), capacity),
        }
    }

    /// Build the alternative at `index` of `signature` around `element`
    pub fn create(&self, signature: &TypeSignature, index: usize, element: Element) -> Result<EitherValue> {
        self.memo.build(signature, index, element)
    }

    /// Like [`create`](Self::create), from a plain list of types
    pub fn create_from(&self, types: Vec<TypeDescriptor>, index: usize, element: Element) -> Result<EitherValue> {
        let signature = TypeSignature::new(types)?;
        self.create(&signature, index, element)
    }

    /// The underlying memoizer
    pub fn memoizer(&self) -> &FactoryMemoizer<EitherCompiler> {
        &self.memo
    }
}
