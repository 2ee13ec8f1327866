//! FactoryMemoizer: compile-once cache of constructors

use std::fmt;

use lrucache::{BoundedCache, Outcome};
use tracing::{debug, trace};

use crate::compiler::{Compiler, Selector};
use crate::error::{FactoryError, Result, SignatureError};
use crate::signature::{Element, TypeSignature};

/// Memoizes a [`Compiler`] per [`TypeSignature`]
///
/// Signatures are validated before the cache is touched. A compiled
/// constructor stays cached until evicted; a failed compilation is
/// never cached, so the next call for the same signature compiles again.
///
/// Compilation runs with the constructor cache locked. A [`Compiler`] must
/// not call back into the memoizer it is compiling for (to build a nested
/// signature, say); that call would deadlock. Use a separate memoizer for
/// nested shapes.
pub struct FactoryMemoizer<C: Compiler> {
    /// Constructors by signature
    cache: BoundedCache<TypeSignature, C::Constructor>,

    /// Compiler service
    compiler: C,
}

impl<C: Compiler> FactoryMemoizer<C> {
    /// Create a memoizer holding at most `capacity` constructors
    pub fn new(compiler: C, capacity: usize) -> Self {
        Self {
            cache: BoundedCache::new(capacity),
            compiler,
        }
    }

    /// Check that the compiler supports the signature's length
    pub fn validate(&self, signature: &TypeSignature) -> Result<()> {
        let arity = self.compiler.arity();
        if !arity.contains(&signature.len()) {
            return Err(SignatureError::Arity {
                len: signature.len(),
                min: *arity.start(),
                max: *arity.end(),
            }
            .into());
        }
        Ok(())
    }

    /// Get the cached constructor for `signature`, compiling it on a miss
    pub fn get_or_compile(&self, signature: &TypeSignature) -> Result<C::Constructor> {
        self.validate(signature)?;

        let (constructor, outcome) = self.cache.try_get_or_insert(signature.clone(), || {
            debug!(%signature, "compiling constructor");
            self.compiler.compile(signature)
        })?;

        if outcome == Outcome::Hit {
            trace!(%signature, "constructor cache hit");
        }

        Ok(constructor)
    }

    /// Change how many constructors are kept
    pub fn set_capacity(&self, capacity: i64) -> Result<()> {
        self.cache.set_capacity(capacity)?;
        Ok(())
    }

    /// The constructor cache
    pub fn cache(&self) -> &BoundedCache<TypeSignature, C::Constructor> {
        &self.cache
    }

    /// The compiler service
    pub fn compiler(&self) -> &C {
        &self.compiler
    }
}

impl<C> FactoryMemoizer<C>
where
    C: Compiler,
    C::Constructor: Selector,
{
    /// Build the shape at `index` of `signature` around `element`
    ///
    /// The index is checked before the cache is consulted.
    pub fn build(
        &self,
        signature: &TypeSignature,
        index: usize,
        element: Element,
    ) -> Result<<C::Constructor as Selector>::Output> {
        if index >= signature.len() {
            return Err(FactoryError::IndexOutOfRange {
                index,
                len: signature.len(),
            });
        }

        self.get_or_compile(signature)?.select(index, element)
    }
}

impl<C: Compiler> fmt::Debug for FactoryMemoizer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryMemoizer")
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::families::either::EitherCompiler;
    use crate::registry::TypeRegistry;
    use crate::signature::{element, TypeDescriptor};
    use crate::{signature, FnCompiler};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Wraps a compiler and counts its invocations
    struct Counting<C> {
        inner: C,
        calls: AtomicUsize,
    }

    impl<C: Compiler> Compiler for Counting<C> {
        type Constructor = C::Constructor;

        fn arity(&self) -> std::ops::RangeInclusive<usize> {
            self.inner.arity()
        }

        fn compile(&self, signature: &TypeSignature) -> std::result::Result<C::Constructor, CompileError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.compile(signature)
        }
    }

    fn counting_either(capacity: usize) -> FactoryMemoizer<Counting<EitherCompiler>> {
        let registry = Arc::new(TypeRegistry::with_primitives());
        FactoryMemoizer::new(
            Counting {
                inner: EitherCompiler::new(registry),
                calls: AtomicUsize::new(0),
            },
            capacity,
        )
    }

    #[test]
    fn test_build_compiles_once() {
        let memo = counting_either(20);
        let sig = signature![i32].unwrap();

        let first = memo.build(&sig, 0, element(14i32)).unwrap();
        let second = memo.build(&sig, 0, element(99i32)).unwrap();

        assert_eq!(memo.compiler().calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.downcast_ref::<i32>(), Some(&14));
        assert_eq!(second.downcast_ref::<i32>(), Some(&99));
    }

    #[test]
    fn test_distinct_signatures_compile_separately() {
        let memo = counting_either(20);

        memo.get_or_compile(&signature![i32, String].unwrap()).unwrap();
        memo.get_or_compile(&signature![String, i32].unwrap()).unwrap();
        memo.get_or_compile(&signature![i32, String].unwrap()).unwrap();

        assert_eq!(memo.compiler().calls.load(Ordering::SeqCst), 2);
        assert_eq!(memo.cache().count(), 2);
    }

    #[test]
    fn test_index_checked_before_compiling() {
        let memo = counting_either(20);
        let sig = signature![i32, bool].unwrap();

        let err = memo.build(&sig, 2, element(true)).unwrap_err();
        assert_eq!(err, FactoryError::IndexOutOfRange { index: 2, len: 2 });
        assert_eq!(memo.compiler().calls.load(Ordering::SeqCst), 0);
        assert!(memo.cache().is_empty());
    }

    #[test]
    fn test_arity_checked_before_compiling() {
        let compiled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&compiled);
        let memo = FactoryMemoizer::new(
            FnCompiler::new(move |sig: &TypeSignature| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, CompileError>(sig.len())
            })
            .with_arity(1..=1),
            4,
        );

        let err = memo.get_or_compile(&signature![u8, u8].unwrap()).unwrap_err();
        assert_eq!(
            err,
            FactoryError::InvalidSignature(SignatureError::Arity { len: 2, min: 1, max: 1 })
        );
        assert_eq!(compiled.load(Ordering::SeqCst), 0);
        assert_eq!(memo.get_or_compile(&signature![u8].unwrap()), Ok(1));
    }

    #[test]
    fn test_compile_failure_is_not_cached() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let memo = FactoryMemoizer::new(
            FnCompiler::new(move |sig: &TypeSignature| {
                let mut log = log.lock();
                log.push(sig.clone());
                if log.len() == 1 {
                    Err(CompileError::Failed("transient".to_string()))
                } else {
                    Ok(log.len())
                }
            }),
            4,
        );
        let sig = signature![u64].unwrap();

        assert_eq!(
            memo.get_or_compile(&sig),
            Err(FactoryError::Compilation(CompileError::Failed("transient".to_string())))
        );
        assert!(memo.cache().is_empty());

        assert_eq!(memo.get_or_compile(&sig), Ok(2));
        assert_eq!(memo.get_or_compile(&sig), Ok(2));
        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn test_unregistered_type_fails_compilation() {
        let memo = counting_either(4);
        struct Opaque;
        let sig = TypeSignature::single(TypeDescriptor::of::<Opaque>());

        let err = memo.build(&sig, 0, element(Opaque)).unwrap_err();
        assert!(matches!(
            err,
            FactoryError::Compilation(CompileError::Unregistered(_))
        ));
    }

    #[test]
    fn test_nested_shapes_use_a_separate_memoizer() {
        let inner = Arc::new(counting_either(4));
        let nested = Arc::clone(&inner);
        let outer = FactoryMemoizer::new(
            FnCompiler::new(move |sig: &TypeSignature| {
                let mut shapes = 0;
                for ty in sig.iter() {
                    let constructor = nested
                        .get_or_compile(&TypeSignature::single(*ty))
                        .map_err(|err| CompileError::Failed(err.to_string()))?;
                    shapes += constructor.shapes();
                }
                Ok::<_, CompileError>(shapes)
            }),
            4,
        );

        assert_eq!(outer.get_or_compile(&signature![i32, bool].unwrap()), Ok(2));
        assert_eq!(outer.get_or_compile(&signature![i32].unwrap()), Ok(1));
        assert_eq!(inner.compiler().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_eviction_forces_recompile() {
        let memo = counting_either(1);
        let ints = signature![i32].unwrap();
        let strings = signature![String].unwrap();

        memo.get_or_compile(&ints).unwrap();
        memo.get_or_compile(&strings).unwrap();
        memo.get_or_compile(&ints).unwrap();

        assert_eq!(memo.compiler().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_zero_capacity_still_builds() {
        let memo = counting_either(0);
        let sig = signature![bool].unwrap();

        for flag in [true, false] {
            let built = memo.build(&sig, 0, element(flag)).unwrap();
            assert_eq!(built.downcast_ref::<bool>(), Some(&flag));
        }
        assert_eq!(memo.compiler().calls.load(Ordering::SeqCst), 2);
        assert!(memo.cache().is_empty());
    }

    #[test]
    fn test_set_capacity() {
        let memo = counting_either(4);
        memo.get_or_compile(&signature![i32].unwrap()).unwrap();
        memo.get_or_compile(&signature![u8].unwrap()).unwrap();

        memo.set_capacity(1).unwrap();
        assert_eq!(memo.cache().count(), 1);
        assert_eq!(
            memo.set_capacity(-5),
            Err(FactoryError::Cache(lrucache::Error::NegativeCapacity(-5)))
        );
    }

    #[test]
    fn test_concurrent_callers_share_one_compilation() {
        let memo = counting_either(8);
        let sig = signature![i64, String].unwrap();

        std::thread::scope(|s| {
            for t in 0..8i64 {
                let memo = &memo;
                let sig = &sig;
                s.spawn(move || {
                    let built = memo.build(sig, 0, element(t)).unwrap();
                    assert_eq!(built.downcast_ref::<i64>(), Some(&t));
                });
            }
        });

        assert_eq!(memo.compiler().calls.load(Ordering::SeqCst), 1);
    }
}
