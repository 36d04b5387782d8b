use super::Record;

/// Writes a record to an output destination.
pub trait Recorder {
    /// Write a record to the output destination.
    fn write(&mut self, record: Record);
}

/// A recorder that buffers records and writes aggregated values.
///
/// Scalar values stored between two calls of [`AggregateRecorder::flush`]
/// are aggregated (e.g., min/max/mean/median) before being written.
pub trait AggregateRecorder: Recorder {
    /// Store a record for later aggregation.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records at the given step.
    fn flush(&mut self, step: i64);
}
