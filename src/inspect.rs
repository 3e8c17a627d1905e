use std::collections::BTreeMap;

use thiserror::Error;

use crate::value::FieldValue;

pub type Result<T> = std::result::Result<T, InspectError>;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("field enumeration failed: {0}")]
    Enumeration(String),
    #[error("failed to read field {name:?}: {reason}")]
    FieldRead { name: String, reason: String },
}

/// Enumerates the externally visible fields of a watched value as ordered
/// `(name, value)` pairs.
///
/// Implementations must keep the enumeration deterministic: the field at
/// index `i` in one call has to be the same field at index `i` in the next,
/// for the whole lifetime of a recorder. The recorder diffs snapshots by
/// index, so an implementation that reorders or resizes its output mid-run
/// produces meaningless (possibly spurious) change records.
///
/// Being hand-written next to the watched type, an implementation is free to
/// expose fields the type keeps private.
pub trait Inspect {
    fn fields(&self) -> Result<Vec<(String, FieldValue)>>;
}

/// Sorted key order makes `BTreeMap` enumeration deterministic and stable,
/// which is why `HashMap` gets no such impl.
impl Inspect for BTreeMap<String, FieldValue> {
    fn fields(&self) -> Result<Vec<(String, FieldValue)>> {
        Ok(self
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect())
    }
}
