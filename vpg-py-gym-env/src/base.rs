//! Wrapper of gym environments implemented in Python.
#![allow(clippy::float_cmp)]
use crate::GymEnvConfig;
use anyhow::Result;
use log::{info, trace};
use pyo3::types::{IntoPyDict, PyTuple};
use pyo3::{PyObject, Python, ToPyObject};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::{fmt::Debug, time::Duration};
use vpg_core::{record::Record, Act, Env, Info, Obs, Step};

/// Information given at every step of the interaction with the environment.
///
/// Currently, it is empty and used to match the type signature.
pub struct GymInfo {}

impl Info for GymInfo {}

/// Converts [`PyObject`] to [`GymEnv`]::Obs with a preprocessing.
pub trait GymObsFilter<O: Obs> {
    /// Configuration.
    type Config: Clone + Default + Serialize + DeserializeOwned;

    /// Build filter.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Convert PyObject into observation with filtering.
    fn filt(&mut self, obs: PyObject) -> (O, Record);

    /// Called when resetting the environment.
    ///
    /// This method is useful for stateful filters.
    fn reset(&mut self, obs: PyObject) -> O {
        let (obs, _) = self.filt(obs);
        obs
    }

    /// Returns default configuration.
    fn default_config() -> Self::Config {
        Self::Config::default()
    }
}

/// Converts [`GymEnv`]::Act to [`PyObject`] with a preprocessing.
pub trait GymActFilter<A: Act> {
    /// Configuration.
    type Config: Clone + Default + Serialize + DeserializeOwned;

    /// Build filter.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Filter action and convert it to PyObject.
    fn filt(&mut self, act: A) -> (PyObject, Record);

    /// Called when resetting the environment.
    ///
    /// This method is useful for stateful filters.
    fn reset(&mut self, _is_done: &Option<&Vec<i8>>) {}

    /// Returns default configuration.
    fn default_config() -> Self::Config {
        Self::Config::default()
    }
}

/// An environment in [Gymnasium](https://gymnasium.farama.org).
#[derive(Debug)]
pub struct GymEnv<O, A, OF, AF>
where
    O: Obs,
    A: Act,
    OF: GymObsFilter<O>,
    AF: GymActFilter<A>,
{
    render: bool,

    env: PyObject,

    /// The number of available actions.
    n_actions: i64,

    /// Shape of the observation space.
    obs_shape: Vec<usize>,

    count_steps: usize,

    max_steps: Option<usize>,

    obs_filter: OF,

    act_filter: AF,

    wait: Duration,

    /// Initial seed.
    ///
    /// This value will be used at the first call of the reset method.
    initial_seed: Option<i64>,

    phantom: PhantomData<(O, A)>,
}

impl<O, A, OF, AF> GymEnv<O, A, OF, AF>
where
    O: Obs,
    A: Act,
    OF: GymObsFilter<O>,
    AF: GymActFilter<A>,
{
    /// Set rendering mode.
    ///
    /// If `true`, it renders the state at every step.
    pub fn set_render(&mut self, render: bool) {
        self.render = render;
    }

    /// Set the maximum number of steps in the environment.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// Set wait time at every interaction steps.
    pub fn set_wait(&mut self, d: Duration) {
        self.wait = d;
    }

    /// The number of available actions of the environment.
    pub fn n_actions(&self) -> i64 {
        self.n_actions
    }

    /// Shape of the observation space of the environment.
    pub fn obs_shape(&self) -> &[usize] {
        &self.obs_shape
    }
}

impl<O, A, OF, AF> Env for GymEnv<O, A, OF, AF>
where
    O: Obs,
    A: Act + Debug,
    OF: GymObsFilter<O>,
    AF: GymActFilter<A>,
{
    type Obs = O;
    type Act = A;
    type Info = GymInfo;
    type Config = GymEnvConfig<O, A, OF, AF>;

    /// Performs an environment step and resets the environment if an
    /// episode ends.
    ///
    /// The observation of the initial state of the next episode is set to
    /// [`Step::init_obs`].
    fn step_with_reset(&mut self, a: &Self::Act) -> (Step<Self>, Record)
    where
        Self: Sized,
    {
        let (step, record) = self.step(a);
        assert_eq!(step.is_terminated.len(), 1);
        let step = if step.is_done() {
            let init_obs = self.reset(None).unwrap();
            Step {
                act: step.act,
                obs: step.obs,
                reward: step.reward,
                is_terminated: step.is_terminated,
                is_truncated: step.is_truncated,
                info: step.info,
                init_obs: Some(init_obs),
            }
        } else {
            step
        };

        (step, record)
    }

    /// Resets the environment and returns an observation.
    ///
    /// This method also resets the observation and action filters.
    ///
    /// In this environment, the length of `is_done` is assumed to be 1.
    fn reset(&mut self, is_done: Option<&Vec<i8>>) -> Result<O> {
        trace!("GymEnv::reset()");

        // Reset the action filter, required for stateful filters.
        self.act_filter.reset(&is_done);

        let reset = match is_done {
            None => true,
            Some(v) => {
                debug_assert_eq!(v.len(), 1);
                v[0] != 0
            }
        };

        if !reset {
            Ok(O::dummy(1))
        } else {
            self.count_steps = 0;
            pyo3::Python::with_gil(|py| {
                let obs = {
                    let ret_values = if let Some(seed) = self.initial_seed {
                        self.initial_seed = None;
                        let kwargs = Some(vec![("seed", seed)].into_py_dict(py));
                        self.env.call_method(py, "reset", (), kwargs)?
                    } else {
                        self.env.call_method0(py, "reset")?
                    };
                    // Gymnasium returns a tuple of an observation and info.
                    let ret_values_: &PyTuple = ret_values.extract(py).unwrap();
                    ret_values_.get_item(0).extract().unwrap()
                };
                Ok(self.obs_filter.reset(obs))
            })
        }
    }

    /// Resets the environment with the given index.
    ///
    /// Specifically, `env.reset(seed=ix)` is called in the Python interpreter.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.initial_seed = Some(ix as _);
        self.reset(None)
    }

    /// Runs a step of the environment's dynamics.
    ///
    /// It returns [`Step`] and [`Record`] objects. The [`Record`] is
    /// composed of the records constructed in the observation and action
    /// filters.
    fn step(&mut self, a: &A) -> (Step<Self>, Record) {
        trace!("GymEnv::step()");

        pyo3::Python::with_gil(|py| {
            if self.render {
                let _ = self.env.call_method0(py, "render");
                std::thread::sleep(self.wait);
            }

            let (a_py, record_a) = self.act_filter.filt(a.clone());
            let ret = self.env.call_method(py, "step", (a_py,), None).unwrap();
            let step: &PyTuple = ret.extract(py).unwrap();
            let obs = step.get_item(0).to_owned();
            let (obs, record_o) = self.obs_filter.filt(obs.to_object(py));
            let reward: Vec<f32> = vec![step.get_item(1).extract().unwrap()];
            let terminated: bool = step.get_item(2).extract().unwrap();
            let truncated: bool = step.get_item(3).extract().unwrap();
            let is_terminated = vec![terminated as i8];
            let mut is_truncated = vec![truncated as i8];

            self.count_steps += 1;
            if let Some(max_steps) = self.max_steps {
                if self.count_steps >= max_steps {
                    is_truncated[0] = 1;
                }
            };

            (
                Step::<Self>::new(
                    obs,
                    a.clone(),
                    reward,
                    is_terminated,
                    is_truncated,
                    GymInfo {},
                    None,
                ),
                record_o.merge(record_a),
            )
        })
    }

    /// Constructs [`GymEnv`].
    ///
    /// * `seed` - The seed value of the random number generator.
    ///   This value will be used at the first call of the reset method.
    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let gil = Python::acquire_gil();
        let py = gil.python();

        // sys.argv is used by some renderers and can be empty depending on
        // the interpreter, so a program name is set here.
        let locals = [("sys", py.import("sys")?)].into_py_dict(py);
        let _ = py.eval("sys.argv.insert(0, 'GymEnv')", None, Some(&locals))?;
        let ver = py.eval("sys.version", None, Some(&locals))?;
        info!("Initialize GymEnv");
        info!("Python version = {}", ver);

        let name = config.name.as_str();
        let gym = py.import("gymnasium")?;
        let kwargs = config
            .render_mode
            .clone()
            .map(|render_mode| vec![("render_mode", render_mode)].into_py_dict(py));
        let env = gym.getattr("make")?.call((name,), kwargs)?;

        let n_actions = env.getattr("action_space")?.getattr("n")?.extract()?;
        let obs_shape: Vec<usize> = env
            .getattr("observation_space")?
            .getattr("shape")?
            .extract()?;
        info!("Observation space shape = {:?}", obs_shape);
        info!("Number of actions = {}", n_actions);

        Ok(GymEnv {
            env: env.into(),
            n_actions,
            obs_shape,
            obs_filter: OF::build(&config.obs_filter_config.as_ref().unwrap())?,
            act_filter: AF::build(&config.act_filter_config.as_ref().unwrap())?,
            render: config.render_mode.is_some(),
            count_steps: 0,
            wait: config.wait(),
            max_steps: config.max_steps,
            initial_seed: Some(seed),
            phantom: PhantomData,
        })
    }
}
