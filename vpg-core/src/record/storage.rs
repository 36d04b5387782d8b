//! Record storage and aggregation.
use super::{Record, RecordValue};
use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

/// A storage of records with aggregation capabilities.
///
/// Scalar values sharing a key are aggregated into min/max/mean/median
/// when [`RecordStorage::aggregate`] is called; for other value types the
/// most recent value wins.
pub struct RecordStorage {
    data: Vec<Record>,
}

fn min(vs: &Vec<f32>) -> RecordValue {
    RecordValue::Scalar(*vs.iter().min_by(|x, y| x.total_cmp(y)).unwrap())
}

fn max(vs: &Vec<f32>) -> RecordValue {
    RecordValue::Scalar(*vs.iter().min_by(|x, y| y.total_cmp(x)).unwrap())
}

fn mean(vs: &Vec<f32>) -> RecordValue {
    RecordValue::Scalar(vs.iter().map(|v| *v).sum::<f32>() / vs.len() as f32)
}

fn median(mut vs: Vec<f32>) -> RecordValue {
    vs.sort_by(|x, y| x.partial_cmp(y).unwrap());
    RecordValue::Scalar(vs[vs.len() / 2])
}

impl RecordStorage {
    fn get_keys(&self) -> HashSet<String, Xxh3Builder> {
        let mut keys = HashSet::<String, Xxh3Builder>::default();
        for record in self.data.iter() {
            for k in record.keys() {
                keys.insert(k.clone());
            }
        }
        keys
    }

    /// Finds the first occurrence of a value with the given key.
    fn find(&self, key: &String) -> &RecordValue {
        for record in self.data.iter() {
            if let Some(value) = record.get(key) {
                return value;
            }
        }
        panic!("Key '{}' was not found. ", key);
    }

    /// Gets the most recent datetime value for a given key.
    fn datetime(&self, key: &String) -> Record {
        for record in self.data.iter().rev() {
            if let Some(value) = record.get(key) {
                match value {
                    RecordValue::DateTime(..) => {
                        return Record::from_slice(&[(key, value.clone())]);
                    }
                    _ => panic!("Expect RecordValue::DateTime for {}", key),
                }
            }
        }
        panic!("Unexpected");
    }

    /// Gets the most recent 1D array value for a given key.
    fn array1(&self, key: &String) -> Record {
        for record in self.data.iter().rev() {
            if let Some(value) = record.get(key) {
                match value {
                    RecordValue::Array1(..) => {
                        return Record::from_slice(&[(key, value.clone())]);
                    }
                    _ => panic!("Expect RecordValue::Array1 for {}", key),
                }
            }
        }
        panic!("Unexpected");
    }

    /// Gets the most recent string value for a given key.
    fn string(&self, key: &String) -> Record {
        for record in self.data.iter().rev() {
            if let Some(value) = record.get(key) {
                match value {
                    RecordValue::String(..) => {
                        return Record::from_slice(&[(key, value.clone())]);
                    }
                    _ => panic!("Expect RecordValue::String for {}", key),
                }
            }
        }
        panic!("Unexpected");
    }

    /// Aggregates scalar values with statistical measures.
    ///
    /// For a single value, returns it directly. For multiple values,
    /// calculates min, max, mean, and median.
    fn scalar(&self, key: &String) -> Record {
        let vs: Vec<f32> = self
            .data
            .iter()
            .filter_map(|record| match record.get(key) {
                Some(v) => match v {
                    RecordValue::Scalar(v) => Some(*v),
                    _ => panic!("Expect RecordValue::Scalar for {}", key),
                },
                None => None,
            })
            .collect();

        if vs.len() == 1 {
            Record::from_slice(&[(format!("{}", key), RecordValue::Scalar(vs[0]))])
        } else {
            Record::from_slice(&[
                (format!("{}_min", key), min(&vs)),
                (format!("{}_max", key), max(&vs)),
                (format!("{}_mean", key), mean(&vs)),
                (format!("{}_median", key), median(vs)),
            ])
        }
    }

    /// Creates a new empty record storage.
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Stores a record in the storage.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Aggregates all stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut record = Record::empty();

        for key in self.get_keys().iter() {
            let value = self.find(key);
            let r = match value {
                RecordValue::DateTime(..) => self.datetime(key),
                RecordValue::Array1(..) => self.array1(key),
                RecordValue::String(..) => self.string(key),
                RecordValue::Scalar(..) => self.scalar(key),
            };
            record = record.merge(r);
        }

        self.data = vec![];

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_aggregation() {
        let mut storage = RecordStorage::new();
        for v in [1f32, 2., 3.] {
            storage.store(Record::from_scalar("episode_return", v));
        }

        let record = storage.aggregate();
        assert_eq!(record.get_scalar("episode_return_min").unwrap(), 1.);
        assert_eq!(record.get_scalar("episode_return_max").unwrap(), 3.);
        assert_eq!(record.get_scalar("episode_return_mean").unwrap(), 2.);
        assert_eq!(record.get_scalar("episode_return_median").unwrap(), 2.);

        // The storage is cleared by aggregation.
        assert!(storage.aggregate().is_empty());
    }

    #[test]
    fn test_single_scalar_passes_through() {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_scalar("loss", 0.25));
        let record = storage.aggregate();
        assert_eq!(record.get_scalar("loss").unwrap(), 0.25);
    }
}
