use crate::change::ObjectChange;
use crate::value::FieldValue;

/// Compares two snapshots index by index and returns one record per
/// inequality, in ascending index order.
///
/// The snapshots are expected to have the same length; zipping means a
/// contract-violating length change degrades to comparing the common prefix
/// rather than panicking.
pub(crate) fn diff_snapshots(
    previous: &[FieldValue],
    current: &[FieldValue],
    names: &[String],
) -> Vec<ObjectChange> {
    previous
        .iter()
        .zip(current.iter())
        .zip(names.iter())
        .filter(|((previous, current), _)| previous != current)
        .map(|((previous, current), name)| {
            ObjectChange::new(name.clone(), previous.clone(), current.clone())
        })
        .collect()
}
