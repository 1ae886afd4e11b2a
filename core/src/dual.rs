//! Two-sided values.
//!
//! Every comparison in this crate is between two inputs, side [`Side::A`] and
//! side [`Side::B`]. A [`DualValue`] carries whatever is known about one item
//! on each side: present on A only, on B only, on both (paired), or, as a
//! placeholder, on neither.

use serde::{Deserialize, Serialize};

/// One of the two inputs being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn opposite(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// Zero, one, or two values of `T`, one per [`Side`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DualValue<T> {
    pub a: Option<T>,
    pub b: Option<T>,
}

/// A single element correspondence produced during alignment.
pub type IndexPair = DualValue<u32>;

impl<T> DualValue<T> {
    pub fn new(a: Option<T>, b: Option<T>) -> Self {
        Self { a, b }
    }

    pub fn paired(a: T, b: T) -> Self {
        Self {
            a: Some(a),
            b: Some(b),
        }
    }

    pub fn only_a(a: T) -> Self {
        Self { a: Some(a), b: None }
    }

    pub fn only_b(b: T) -> Self {
        Self { a: None, b: Some(b) }
    }

    /// A value present on `side` only.
    pub fn only(side: Side, value: T) -> Self {
        match side {
            Side::A => Self::only_a(value),
            Side::B => Self::only_b(value),
        }
    }

    pub fn neither() -> Self {
        Self { a: None, b: None }
    }

    pub fn get(&self, side: Side) -> Option<&T> {
        match side {
            Side::A => self.a.as_ref(),
            Side::B => self.b.as_ref(),
        }
    }

    pub fn is_paired(&self) -> bool {
        self.a.is_some() && self.b.is_some()
    }

    pub fn is_only_a(&self) -> bool {
        self.a.is_some() && self.b.is_none()
    }

    pub fn is_only_b(&self) -> bool {
        self.a.is_none() && self.b.is_some()
    }

    pub fn is_only(&self, side: Side) -> bool {
        match side {
            Side::A => self.is_only_a(),
            Side::B => self.is_only_b(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_none() && self.b.is_none()
    }

    /// The side holding the value when exactly one side is present.
    pub fn single_side(&self) -> Option<Side> {
        match (&self.a, &self.b) {
            (Some(_), None) => Some(Side::A),
            (None, Some(_)) => Some(Side::B),
            _ => None,
        }
    }

    /// Both values, if paired.
    pub fn both(&self) -> Option<(&T, &T)> {
        match (&self.a, &self.b) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> DualValue<&T> {
        DualValue {
            a: self.a.as_ref(),
            b: self.b.as_ref(),
        }
    }

    /// Apply `f` to each present value, passing the side it came from.
    pub fn map<U>(self, mut f: impl FnMut(Side, T) -> U) -> DualValue<U> {
        DualValue {
            a: self.a.map(|v| f(Side::A, v)),
            b: self.b.map(|v| f(Side::B, v)),
        }
    }

    /// Like [`DualValue::map`], but `f` may fail; the first error wins.
    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(Side, T) -> Result<U, E>,
    ) -> Result<DualValue<U>, E> {
        let a = self.a.map(|v| f(Side::A, v)).transpose()?;
        let b = self.b.map(|v| f(Side::B, v)).transpose()?;
        Ok(DualValue { a, b })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        self.a
            .iter()
            .map(|v| (Side::A, v))
            .chain(self.b.iter().map(|v| (Side::B, v)))
    }
}

impl<T> Default for DualValue<T> {
    fn default() -> Self {
        Self::neither()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_flips_side() {
        assert_eq!(Side::A.opposite(), Side::B);
        assert_eq!(Side::B.opposite(), Side::A);
    }

    #[test]
    fn classification_helpers() {
        let pair = DualValue::paired(1, 2);
        assert!(pair.is_paired());
        assert_eq!(pair.single_side(), None);

        let a = DualValue::only_a("x");
        assert!(a.is_only_a());
        assert!(a.is_only(Side::A));
        assert_eq!(a.single_side(), Some(Side::A));
        assert_eq!(a.get(Side::B), None);

        assert!(DualValue::<u8>::neither().is_empty());
    }

    #[test]
    fn map_passes_side_through() {
        let pair = DualValue::paired(10u32, 20u32);
        let mapped = pair.map(|side, v| format!("{side}{v}"));
        assert_eq!(mapped, DualValue::paired("A10".to_string(), "B20".to_string()));

        let only_b = DualValue::only_b(3u32).map(|_, v| v * 2);
        assert_eq!(only_b, DualValue::only_b(6));
    }

    #[test]
    fn try_map_stops_on_error() {
        let pair = DualValue::paired(1, -1);
        let result: Result<DualValue<u32>, String> =
            pair.try_map(|side, v| u32::try_from(v).map_err(|_| format!("negative on {side}")));
        assert_eq!(result, Err("negative on B".to_string()));
    }
}
