//! A wrapper of [Gymnasium](https://gymnasium.farama.org) environments on Python.
//!
//! [`GymEnv`] wraps a Gymnasium environment based on
//! [`PyO3`](https://github.com/PyO3/pyo3). The dynamics of the environment
//! live entirely on the Python side; this crate only converts observations
//! and actions between the two runtimes.
//!
//! Observations created in Python are converted to Rust objects by a
//! [`GymObsFilter`]. [`ArrayObsFilter`] is the built-in implementation for
//! environments whose observation is an array (e.g., CartPole): the numpy
//! array is converted to [`ndarray::ArrayD`] and then into the observation
//! type of the environment via [`From`].
//!
//! Actions created by a [`Policy`] are converted to Python objects by a
//! [`GymActFilter`]. [`DiscreteActFilter`] converts a discrete action into
//! `Vec<i32>` and passes its single element to Python.
//!
//! [`Policy`]: vpg_core::Policy
mod act;
mod base;
mod config;
mod obs;
pub mod util;
pub use act::{DiscreteActFilter, DiscreteActFilterConfig};
pub use base::{GymActFilter, GymEnv, GymInfo, GymObsFilter};
pub use config::GymEnvConfig;
pub use obs::{ArrayObsFilter, ArrayObsFilterConfig};
