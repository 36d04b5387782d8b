//! Observation filters.
use crate::{util::pyobj_to_arrayd, GymObsFilter};
use ndarray::ArrayD;
use num_traits::cast::AsPrimitive;
use numpy::Element;
use pyo3::PyObject;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, marker::PhantomData};
use vpg_core::{
    record::{Record, RecordValue},
    Obs,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
/// Configuration of [`ArrayObsFilter`].
pub struct ArrayObsFilterConfig {}

impl Default for ArrayObsFilterConfig {
    fn default() -> Self {
        Self {}
    }
}

/// An observation filter that converts a PyObject of a numpy array.
///
/// Type parameter `O` must implement [`From`]`<ArrayD>` and
/// [`vpg_core::Obs`]. `T1` is the dtype of the array in Python, `T2` the
/// dtype on the Rust side.
pub struct ArrayObsFilter<T1, T2, O> {
    /// Marker.
    pub phantom: PhantomData<(T1, T2, O)>,
}

impl<T1, T2, O> Default for ArrayObsFilter<T1, T2, O> {
    fn default() -> Self {
        Self {
            phantom: PhantomData,
        }
    }
}

impl<T1, T2, O> GymObsFilter<O> for ArrayObsFilter<T1, T2, O>
where
    T1: Element + Debug + num_traits::identities::Zero + AsPrimitive<T2>,
    T2: 'static + Copy + Debug + num_traits::Zero + AsPrimitive<f32>,
    O: Obs + From<ArrayD<T2>>,
{
    type Config = ArrayObsFilterConfig;

    fn build(_config: &Self::Config) -> anyhow::Result<Self>
    where
        Self: Sized,
    {
        Ok(Self {
            phantom: PhantomData,
        })
    }

    /// Convert `PyObject` to an observation, which can be converted from
    /// [`ArrayD`].
    ///
    /// The [`Record`] in the returned value has `obs`, a flattened array of
    /// the observation.
    fn filt(&mut self, obs: PyObject) -> (O, Record) {
        let obs = pyo3::Python::with_gil(|py| {
            if obs.as_ref(py).get_type().name().unwrap() == "NoneType" {
                panic!();
            } else {
                pyobj_to_arrayd::<T1, T2>(obs)
            }
        });
        let record = {
            let vec = obs.iter().map(|x| x.as_()).collect();
            Record::from_slice(&[("obs", RecordValue::Array1(vec))])
        };
        (obs.into(), record)
    }
}
