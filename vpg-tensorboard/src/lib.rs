//! Tensorboard recorder.
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;
use vpg_core::record::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};

/// Writes records to TFRecord files.
///
/// Scalar values stored between two flushes are aggregated by a
/// [`RecordStorage`] before being written.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    storage: RecordStorage,
    step_key: String,
    ignore_unsupported_value: bool,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            storage: RecordStorage::new(),
            step_key: "episode".to_string(),
            ignore_unsupported_value: true,
        }
    }

    /// Construct a [`TensorboardRecorder`] with checking unsupported record value.
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new_with_check_unsupported_value<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            storage: RecordStorage::new(),
            step_key: "episode".to_string(),
            ignore_unsupported_value: false,
        }
    }

    fn write_with_step(&mut self, record: Record, step: usize) {
        for (k, v) in record.iter() {
            if *k != self.step_key {
                match v {
                    RecordValue::Scalar(v) => self.writer.add_scalar(k, *v as f32, step),
                    RecordValue::DateTime(_) => {} // discard value
                    _ => {
                        if !self.ignore_unsupported_value {
                            panic!("Unsupported value: {:?}", (k, v));
                        }
                    }
                };
            }
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [`Record`] into a TFRecord.
    ///
    /// This method handles [`RecordValue::Scalar`] in the record.
    /// Other variants will be ignored. The step is taken from the
    /// `episode` entry of the record.
    fn write(&mut self, record: Record) {
        let step = match record.get(&self.step_key).unwrap() {
            RecordValue::Scalar(v) => *v as usize,
            _ => {
                panic!("Record value of key {} is not a scalar", self.step_key)
            }
        };

        self.write_with_step(record, step);
    }
}

impl AggregateRecorder for TensorboardRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        let record = self.storage.aggregate();
        self.write_with_step(record, step as usize);
        self.writer.flush();
    }
}
