//! Conversion of Python objects.
use ndarray::{ArrayD, Axis};
use num_traits::cast::AsPrimitive;
use numpy::{Element, PyArrayDyn};
use pyo3::PyObject;

/// Converts a numpy array of the Python runtime into [`ArrayD`].
///
/// `T1` is the dtype of the array in Python, `T2` the dtype on the Rust
/// side. A leading batch dimension is added when the array is 1-dimensional.
pub fn pyobj_to_arrayd<T1, T2>(obs: PyObject) -> ArrayD<T2>
where
    T1: Element + AsPrimitive<T2>,
    T2: 'static + Copy,
{
    pyo3::Python::with_gil(|py| {
        let obs: &PyArrayDyn<T1> = obs.extract(py).unwrap();
        let obs = obs.to_owned_array();
        let obs = obs.mapv(|elem| elem.as_());

        match obs.ndim() {
            1 => obs.insert_axis(Axis(0)),
            _ => obs,
        }
    })
}
