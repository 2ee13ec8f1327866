//! Compiler service contract
//!
//! A compiler turns a [`TypeSignature`] into a constructor. Compilation is
//! deterministic and possibly expensive; memoizing the results is the job
//! of [`FactoryMemoizer`](crate::FactoryMemoizer), never of the compiler.

use std::ops::RangeInclusive;

use crate::error::{CompileError, Result};
use crate::signature::{Element, TypeSignature, MAX_ARITY};

/// Produces constructors for type signatures
pub trait Compiler: Send + Sync {
    /// What compilation yields; cloned out of the cache on every hit
    type Constructor: Clone + Send;

    /// Signature lengths this compiler accepts
    fn arity(&self) -> RangeInclusive<usize> {
        1..=MAX_ARITY
    }

    /// Compile a constructor for `signature`
    fn compile(&self, signature: &TypeSignature) -> std::result::Result<Self::Constructor, CompileError>;
}

/// Constructor choosing one of several shapes by index
pub trait Selector {
    /// Constructed value
    type Output;

    /// Number of shapes to choose from
    fn shapes(&self) -> usize;

    /// Build the shape at `index` around `element`
    fn select(&self, index: usize, element: Element) -> Result<Self::Output>;
}

/// Adapts a closure into a [`Compiler`]
///
/// ```
/// use ctorcache::{signature, CompileError, Compiler, FnCompiler, TypeSignature};
///
/// let compiler = FnCompiler::new(|sig: &TypeSignature| Ok::<_, CompileError>(sig.len()));
/// assert_eq!(compiler.compile(&signature![u8, u16].unwrap()), Ok(2));
/// ```
pub struct FnCompiler<F> {
    compile: F,
    arity: RangeInclusive<usize>,
}

impl<F> FnCompiler<F> {
    /// Wrap `compile`, accepting every arity up to [`MAX_ARITY`]
    pub fn new(compile: F) -> Self {
        Self {
            compile,
            arity: 1..=MAX_ARITY,
        }
    }

    /// Restrict the accepted signature lengths
    pub fn with_arity(mut self, arity: RangeInclusive<usize>) -> Self {
        self.arity = arity;
        self
    }
}

impl<F, C> Compiler for FnCompiler<F>
where
    F: Fn(&TypeSignature) -> std::result::Result<C, CompileError> + Send + Sync,
    C: Clone + Send,
{
    type Constructor = C;

    fn arity(&self) -> RangeInclusive<usize> {
        self.arity.clone()
    }

    fn compile(&self, signature: &TypeSignature) -> std::result::Result<C, CompileError> {
        (self.compile)(signature)
    }
}
