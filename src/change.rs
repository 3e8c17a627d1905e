use std::fmt;

use crate::value::FieldValue;

/// One detected field change: the field's name and its value before and
/// after. Immutable after construction.
#[derive(Clone, PartialEq)]
pub struct ObjectChange {
    name: String,
    from: FieldValue,
    to: FieldValue,
}

impl ObjectChange {
    pub fn new(name: String, from: FieldValue, to: FieldValue) -> ObjectChange {
        ObjectChange { name, from, to }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn from(&self) -> &FieldValue {
        &self.from
    }

    pub fn to(&self) -> &FieldValue {
        &self.to
    }
}

impl fmt::Display for ObjectChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ObjectChange[name={} from={} to={}]",
            self.name, self.from, self.to
        )
    }
}

// `Debug` delegates to `Display` so dumping a `Vec<ObjectChange>` with `{:?}`
// yields the bracketed, comma-separated, oldest-first list.
impl fmt::Debug for ObjectChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
