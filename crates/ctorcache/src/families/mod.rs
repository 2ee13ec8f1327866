//! Constructor families built on [`FactoryMemoizer`](crate::FactoryMemoizer)
//!
//! Each family owns one memoizer; the list, map, option and result
//! families use fixed one- or two-type signatures and need no selector.

pub mod either;
pub mod list;
pub mod map;
pub mod option;
pub mod result;
