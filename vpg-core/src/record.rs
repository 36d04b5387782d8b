//! Types and traits for recording training metrics.
//!
//! A [`Record`] is a set of key-value pairs produced during training and
//! evaluation, for example the loss of an optimization step or the return of
//! an episode. Records are routed to a [`Recorder`], whose implementations
//! write them to an output destination such as Tensorboard.
//!
//! [`RecordStorage`] aggregates scalar values of records stored between two
//! flushes of an [`AggregateRecorder`] (min/max/mean/median).
//!
//! ```rust
//! use vpg_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let episode = 1;
//! let obs = vec![1f32, 2.0, 3.0, 4.0];
//! let reward = -1f32;
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(episode as f32));
//! record.insert("reward", RecordValue::Scalar(reward));
//! record.insert("obs", RecordValue::Array1(obs));
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
