//! Acceptance sets for response status codes.
//!
//! # Design
//! Callers pass either one code or several; both normalize to a set at the
//! boundary, and the executor only ever asks "is this status accepted".

use std::collections::BTreeSet;

/// Status codes a caller accepts for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedStatus {
    Single(u16),
    Set(BTreeSet<u16>),
}

impl ExpectedStatus {
    /// Normalized acceptance set. A single code becomes a one-element set.
    pub fn allowed(&self) -> BTreeSet<u16> {
        match self {
            ExpectedStatus::Single(code) => BTreeSet::from([*code]),
            ExpectedStatus::Set(codes) => codes.clone(),
        }
    }

    pub fn accepts(&self, status: u16) -> bool {
        match self {
            ExpectedStatus::Single(code) => *code == status,
            ExpectedStatus::Set(codes) => codes.contains(&status),
        }
    }
}

impl Default for ExpectedStatus {
    fn default() -> Self {
        ExpectedStatus::Single(200)
    }
}

impl From<u16> for ExpectedStatus {
    fn from(code: u16) -> Self {
        ExpectedStatus::Single(code)
    }
}

impl<const N: usize> From<[u16; N]> for ExpectedStatus {
    fn from(codes: [u16; N]) -> Self {
        ExpectedStatus::Set(codes.into_iter().collect())
    }
}

impl From<&[u16]> for ExpectedStatus {
    fn from(codes: &[u16]) -> Self {
        ExpectedStatus::Set(codes.iter().copied().collect())
    }
}

impl From<Vec<u16>> for ExpectedStatus {
    fn from(codes: Vec<u16>) -> Self {
        ExpectedStatus::Set(codes.into_iter().collect())
    }
}

impl From<BTreeSet<u16>> for ExpectedStatus {
    fn from(codes: BTreeSet<u16>) -> Self {
        ExpectedStatus::Set(codes)
    }
}
