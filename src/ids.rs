//! Typed Ids
//!
//! The commerce backend identifies carts, products, coupons and addresses with
//! opaque strings. Wrapping them in a marker type keeps a coupon id from being
//! passed where an address id is expected.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An opaque server identifier tagged with the kind of entity it names.
pub struct TypedId<T>(String, PhantomData<T>);

impl<T> TypedId<T> {
    /// Wrap a raw server id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into(), PhantomData)
    }

    /// Borrow the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the raw id.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Marker for cart ids.
#[derive(Debug)]
pub enum CartMarker {}

/// Marker for cart line ids.
#[derive(Debug)]
pub enum LineMarker {}

/// Marker for product ids.
#[derive(Debug)]
pub enum ProductMarker {}

/// Marker for product variant ids.
#[derive(Debug)]
pub enum VariantMarker {}

/// Marker for coupon ids.
#[derive(Debug)]
pub enum CouponMarker {}

/// Marker for delivery address ids.
#[derive(Debug)]
pub enum AddressMarker {}

/// Cart Id
pub type CartId = TypedId<CartMarker>;

/// Cart Line Id
pub type LineId = TypedId<LineMarker>;

/// Product Id
pub type ProductId = TypedId<ProductMarker>;

/// Variant Id
pub type VariantId = TypedId<VariantMarker>;

/// Coupon Id
pub type CouponId = TypedId<CouponMarker>;

/// Address Id
pub type AddressId = TypedId<AddressMarker>;

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> From<String> for TypedId<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T> From<&str> for TypedId<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for TypedId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, T> Deserialize<'de> for TypedId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
