//! Runtime type signatures used as cache keys

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::SignatureError;

/// Largest number of types in a signature
pub const MAX_ARITY: usize = 8;

/// Type-erased value handed to and returned by constructors
pub type Element = Box<dyn Any + Send>;

/// Box a value as an [`Element`]
pub fn element<T: Any + Send>(value: T) -> Element {
    Box::new(value)
}

/// Runtime tag for a concrete type
///
/// Equality and hashing use the [`TypeId`] only; the name is kept for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    /// Descriptor of `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The underlying type id
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether `value` is of this type
    pub fn matches(&self, value: &(dyn Any + Send)) -> bool {
        value.type_id() == self.id
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Ordered list of 1 to [`MAX_ARITY`] type descriptors
///
/// Two signatures are equal iff they have the same length and pairwise
/// equal descriptors. Cloning is cheap.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeSignature {
    types: Arc<[TypeDescriptor]>,
}

impl TypeSignature {
    /// Build a signature, rejecting empty and oversized lists
    pub fn new(types: Vec<TypeDescriptor>) -> Result<Self, SignatureError> {
        if types.is_empty() {
            return Err(SignatureError::Empty);
        }
        if types.len() > MAX_ARITY {
            return Err(SignatureError::TooLong {
                len: types.len(),
                max: MAX_ARITY,
            });
        }
        Ok(Self {
            types: types.into(),
        })
    }

    /// Signature with one type
    pub fn single(ty: TypeDescriptor) -> Self {
        Self {
            types: Arc::new([ty]),
        }
    }

    /// Signature with two types
    pub fn pair(first: TypeDescriptor, second: TypeDescriptor) -> Self {
        Self {
            types: Arc::new([first, second]),
        }
    }

    /// Number of types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false; a signature holds at least one type
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Descriptor at `index`
    pub fn get(&self, index: usize) -> Option<&TypeDescriptor> {
        self.types.get(index)
    }

    /// Iterate over the descriptors in order
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> + '_ {
        self.types.iter()
    }

    /// All descriptors as a slice
    pub fn as_slice(&self) -> &[TypeDescriptor] {
        &self.types
    }
}

impl TryFrom<Vec<TypeDescriptor>> for TypeSignature {
    type Error = SignatureError;

    fn try_from(types: Vec<TypeDescriptor>) -> Result<Self, Self::Error> {
        Self::new(types)
    }
}

impl fmt::Debug for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.types.iter()).finish()
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, ty) in self.types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(ty.name())?;
        }
        f.write_str(")")
    }
}

/// Build a [`TypeSignature`] from a list of types
///
/// Expands to a `Result<TypeSignature, SignatureError>`.
///
/// ```
/// let sig = ctorcache::signature![i32, String].unwrap();
/// assert_eq!(sig.len(), 2);
/// ```
#[macro_export]
macro_rules! signature {
    ($($ty:ty),+ $(,)?) => {
        $crate::TypeSignature::new(vec![$($crate::TypeDescriptor::of::<$ty>()),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_equality_uses_type_id() {
        assert_eq!(TypeDescriptor::of::<i32>(), TypeDescriptor::of::<i32>());
        assert_ne!(TypeDescriptor::of::<i32>(), TypeDescriptor::of::<u32>());
        assert_eq!(TypeDescriptor::of::<String>().name(), type_name::<String>());
    }

    #[test]
    fn test_descriptor_matches_boxed_value() {
        let value = element(14i32);
        assert!(TypeDescriptor::of::<i32>().matches(&*value));
        assert!(!TypeDescriptor::of::<Element>().matches(&*value));
    }

    #[test]
    fn test_signature_rejects_empty() {
        assert_eq!(TypeSignature::new(vec![]), Err(SignatureError::Empty));
    }

    #[test]
    fn test_signature_rejects_too_long() {
        let types = vec![TypeDescriptor::of::<u8>(); MAX_ARITY + 1];
        assert_eq!(
            TypeSignature::new(types),
            Err(SignatureError::TooLong { len: 9, max: 8 })
        );

        let types = vec![TypeDescriptor::of::<u8>(); MAX_ARITY];
        assert_eq!(TypeSignature::new(types).unwrap().len(), MAX_ARITY);
    }

    #[test]
    fn test_signature_equality_is_ordered() {
        let a = signature![i32, String].unwrap();
        let b = TypeSignature::pair(TypeDescriptor::of::<i32>(), TypeDescriptor::of::<String>());
        let c = signature![String, i32].unwrap();
        let d = signature![i32].unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(d, TypeSignature::single(TypeDescriptor::of::<i32>()));
    }

    #[test]
    fn test_signature_display() {
        let sig = signature![i32, bool].unwrap();
        assert_eq!(sig.to_string(), "(i32, bool)");
        assert_eq!(sig.get(1), Some(&TypeDescriptor::of::<bool>()));
        assert_eq!(sig.get(2), None);
    }
}
