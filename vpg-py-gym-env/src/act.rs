//! Action filters.
use crate::GymActFilter;
use pyo3::{IntoPy, PyObject};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use vpg_core::{
    record::{Record, RecordValue},
    Act,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
/// Configuration of [`DiscreteActFilter`].
pub struct DiscreteActFilterConfig {}

impl Default for DiscreteActFilterConfig {
    fn default() -> Self {
        Self {}
    }
}

/// Converts a discrete action to PyObject.
///
/// Type `A` must be able to be converted into `Vec<i32>`.
#[derive(Clone, Debug)]
pub struct DiscreteActFilter<A> {
    phantom: PhantomData<A>,
}

impl<A> Default for DiscreteActFilter<A> {
    fn default() -> Self {
        Self {
            phantom: PhantomData,
        }
    }
}

impl<A> GymActFilter<A> for DiscreteActFilter<A>
where
    A: Act + Into<Vec<i32>>,
{
    type Config = DiscreteActFilterConfig;

    fn build(_config: &Self::Config) -> anyhow::Result<Self>
    where
        Self: Sized,
    {
        Ok(Self {
            phantom: PhantomData,
        })
    }

    fn filt(&mut self, act: A) -> (PyObject, Record) {
        let act = act.into();
        let record = Record::from_slice(&[(
            "act",
            RecordValue::Array1(act.iter().map(|v| *v as f32).collect::<Vec<_>>()),
        )]);

        let act = pyo3::Python::with_gil(|py| act[0].into_py(py));

        (act, record)
    }
}
