//! Background field-change recorder.
//!
//! A [`ChangeRecorder`] watches a shared value through a [`WatchHandle`],
//! samples its named fields at a fixed interval on a background thread, and
//! appends an [`ObjectChange`] record whenever a field's value differs from
//! the previous sample. The watched type describes its own fields by
//! implementing [`Inspect`].
//!
//! ```no_run
//! use std::sync::{Arc, RwLock};
//! use fieldscope::{ChangeRecorder, FieldValue, Inspect, InspectError};
//!
//! struct Point { x: i64, y: i64 }
//!
//! impl Inspect for Point {
//!     fn fields(&self) -> Result<Vec<(String, FieldValue)>, InspectError> {
//!         Ok(vec![("x".into(), self.x.into()), ("y".into(), self.y.into())])
//!     }
//! }
//!
//! let point = Arc::new(RwLock::new(Point { x: 1, y: 2 }));
//! let mut recorder = ChangeRecorder::new(Arc::clone(&point));
//! recorder.start();
//! point.write().unwrap().x = 1337;
//! # recorder.stop().unwrap();
//! ```

mod change;
mod diff;
mod inspect;
mod recorder;
mod value;

pub use change::ObjectChange;
pub use inspect::{Inspect, InspectError};
pub use recorder::{ChangeRecorder, RecorderConfig, RecorderError, WatchHandle};
pub use value::FieldValue;
