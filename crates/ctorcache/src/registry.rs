//! Type registry: the dispatch table behind the compiler service
//!
//! Every registered type contributes a set of monomorphized kernels
//! (plain `fn` pointers) that build concrete values out of type-erased
//! elements. Compiling a constructor for a signature means looking up
//! and assembling the kernels of its types.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

use crate::error::{CompileError, FactoryError, Result};
use crate::families::result::Faults;
use crate::signature::{Element, TypeDescriptor};

/// Builds a `Vec<T>` out of elements of type `T`
pub type ListKernel = fn(Vec<Element>) -> Result<Element>;

/// Builds a `HashMap<K, V>` out of key/value element pairs
pub type MapKernel = fn(Vec<(Element, Element)>) -> Result<Element>;

/// Wraps an element of type `T` into `Some(T)` or `Ok(T)`
pub type WrapKernel = fn(Element) -> Result<Element>;

/// Builds `None::<T>`
pub type NoneKernel = fn() -> Element;

/// Builds `Err::<T, Faults>(faults)`
pub type FaultKernel = fn(Faults) -> Element;

/// Kernels registered for a single type
#[derive(Clone, Copy, Debug)]
pub struct Kernels {
    /// Descriptor of the type
    pub descriptor: TypeDescriptor,
    /// `Vec<T>` builder
    pub list: ListKernel,
    /// `Some(T)` builder
    pub some: WrapKernel,
    /// `None::<T>` builder
    pub none: NoneKernel,
    /// `Ok(T)` builder
    pub ok: WrapKernel,
    /// `Err(Faults)` builder
    pub with_errors: FaultKernel,
}

/// Registry of the types constructors can be compiled for
///
/// Fill it up front, then share it read-only (typically behind an `Arc`).
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<TypeId, Kernels, RandomState>,
    maps: HashMap<(TypeId, TypeId), MapKernel, RandomState>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the primitive types and `String` registered
    pub fn with_primitives() -> Self {
        let mut registry = Self::new();
        registry
            .register::<()>()
            .register::<bool>()
            .register::<char>()
            .register::<i8>()
            .register::<i16>()
            .register::<i32>()
            .register::<i64>()
            .register::<i128>()
            .register::<isize>()
            .register::<u8>()
            .register::<u16>()
            .register::<u32>()
            .register::<u64>()
            .register::<u128>()
            .register::<usize>()
            .register::<f32>()
            .register::<f64>()
            .register::<String>();
        registry
    }

    /// Register `T`
    pub fn register<T: Any + Send>(&mut self) -> &mut Self {
        self.types.insert(
            TypeId::of::<T>(),
            Kernels {
                descriptor: TypeDescriptor::of::<T>(),
                list: build_list::<T>,
                some: build_some::<T>,
                none: build_none::<T>,
                ok: build_ok::<T>,
                with_errors: build_with_errors::<T>,
            },
        );
        self
    }

    /// Register the map kernel for `(K, V)`, along with `K` and `V` themselves
    pub fn register_map<K, V>(&mut self) -> &mut Self
    where
        K: Any + Send + Eq + Hash,
        V: Any + Send,
    {
        self.register::<K>().register::<V>();
        self.maps
            .insert((TypeId::of::<K>(), TypeId::of::<V>()), build_map::<K, V>);
        self
    }

    /// Whether kernels exist for the type
    pub fn contains(&self, ty: &TypeDescriptor) -> bool {
        self.types.contains_key(&ty.id())
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Kernels of a type
    pub fn kernels(&self, ty: &TypeDescriptor) -> std::result::Result<&Kernels, CompileError> {
        self.types
            .get(&ty.id())
            .ok_or(CompileError::Unregistered(ty.name()))
    }

    /// Map kernel of a key/value pair
    pub fn map_kernel(
        &self,
        key: &TypeDescriptor,
        value: &TypeDescriptor,
    ) -> std::result::Result<MapKernel, CompileError> {
        self.maps
            .get(&(key.id(), value.id()))
            .copied()
            .ok_or(CompileError::UnregisteredMap {
                key: key.name(),
                value: value.name(),
            })
    }
}

/// Unbox an element as `T`
pub(crate) fn cast<T: Any>(element: Element) -> Result<T> {
    element
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| FactoryError::TypeMismatch {
            expected: type_name::<T>(),
        })
}

fn build_list<T: Any + Send>(elements: Vec<Element>) -> Result<Element> {
    let items = elements
        .into_iter()
        .map(cast::<T>)
        .collect::<Result<Vec<T>>>()?;
    Ok(Box::new(items))
}

fn build_map<K, V>(pairs: Vec<(Element, Element)>) -> Result<Element>
where
    K: Any + Send + Eq + Hash,
    V: Any + Send,
{
    let mut map = HashMap::with_capacity(pairs.len());
    for (position, (key, value)) in pairs.into_iter().enumerate() {
        let key = cast::<K>(key)?;
        let value = cast::<V>(value)?;
        if map.insert(key, value).is_some() {
            return Err(FactoryError::DuplicateKey(position));
        }
    }
    Ok(Box::new(map))
}

fn build_some<T: Any + Send>(element: Element) -> Result<Element> {
    Ok(Box::new(Some(cast::<T>(element)?)))
}

fn build_none<T: Any + Send>() -> Element {
    Box::new(None::<T>)
}

fn build_ok<T: Any + Send>(element: Element) -> Result<Element> {
    Ok(Box::new(Ok::<T, Faults>(cast::<T>(element)?)))
}

fn build_with_errors<T: Any + Send>(faults: Faults) -> Element {
    Box::new(Err::<T, Faults>(faults))
}
