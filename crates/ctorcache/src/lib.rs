//! # ctorcache
//!
//! Memoized, type-specialized constructors keyed by runtime type signatures.
//!
//! ## Architecture
//! - **TypeRegistry**: dispatch table of monomorphized kernels per registered type
//! - **Compiler**: turns a [`TypeSignature`] into a constructor (possibly expensive)
//! - **FactoryMemoizer**: compiles each signature at most once while it stays
//!   cached in an [`lrucache::BoundedCache`]
//! - **Families**: either (1 to 8 alternatives), list, map, option and result
//!
//! ```
//! use std::sync::Arc;
//! use ctorcache::{element, signature, EitherFactory, TypeRegistry};
//!
//! let factory = EitherFactory::new(Arc::new(TypeRegistry::with_primitives()), 16);
//! let sig = signature![i32, String].unwrap();
//!
//! let value = factory.create(&sig, 0, element(14i32)).unwrap();
//! assert_eq!(value.downcast_ref::<i32>(), Some(&14));
//! ```

#![warn(missing_docs)]

mod compiler;
mod config;
mod error;
mod factories;
pub mod families;
mod memo;
mod registry;
mod signature;

pub use compiler::{Compiler, FnCompiler, Selector};
pub use config::{FactoryConfig, DEFAULT_FAMILY_CAPACITY};
pub use error::{CompileError, FactoryError, Result, SignatureError};
pub use factories::Factories;
pub use families::either::{EitherCompiler, EitherConstructor, EitherFactory, EitherValue};
pub use families::list::{ListCompiler, ListFactory};
pub use families::map::{MapCompiler, MapFactory};
pub use families::option::{OptionCompiler, OptionConstructors, OptionFactory};
pub use families::result::{FaultClass, Faults, ResultCompiler, ResultConstructors, ResultFactory};
pub use memo::FactoryMemoizer;
pub use registry::{FaultKernel, Kernels, ListKernel, MapKernel, NoneKernel, TypeRegistry, WrapKernel};
pub use signature::{element, Element, TypeDescriptor, TypeSignature, MAX_ARITY};
