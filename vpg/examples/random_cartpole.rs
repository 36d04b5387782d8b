use anyhow::Result;
use serde::Serialize;
use std::{convert::TryFrom, fs::File};
use vpg_core::{
    record::{BufferedRecorder, Record},
    util, Env as _, Policy,
};
use vpg_py_gym_env::{
    ArrayObsFilter, DiscreteActFilter, GymActFilter, GymEnv, GymEnvConfig, GymObsFilter,
};

use ndarray::{ArrayD, IxDyn};

#[derive(Clone, Debug)]
struct Obs(ArrayD<f32>);

impl vpg_core::Obs for Obs {
    fn dummy(_n: usize) -> Self {
        Self(ArrayD::zeros(IxDyn(&[0])))
    }

    fn len(&self) -> usize {
        self.0.shape()[0]
    }
}

impl From<ArrayD<f32>> for Obs {
    fn from(obs: ArrayD<f32>) -> Self {
        Obs(obs)
    }
}

#[derive(Clone, Debug)]
struct Act(Vec<i32>);

impl vpg_core::Act for Act {}

impl From<Act> for Vec<i32> {
    fn from(value: Act) -> Self {
        value.0
    }
}

type ObsFilter = ArrayObsFilter<f32, f32, Obs>;
type ActFilter = DiscreteActFilter<Act>;
type Env = GymEnv<Obs, Act, ObsFilter, ActFilter>;

struct RandomPolicy {}

impl Policy<Env> for RandomPolicy {
    fn sample(&mut self, _: &Obs) -> Act {
        let v = fastrand::u32(..=1);
        Act(vec![v as i32])
    }
}

#[derive(Debug, Serialize)]
struct CartpoleRecord {
    episode: usize,
    step: usize,
    reward: f32,
    obs: Vec<f64>,
}

impl TryFrom<&Record> for CartpoleRecord {
    type Error = anyhow::Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            episode: record.get_scalar("episode")? as _,
            step: record.get_scalar("step")? as _,
            reward: record.get_scalar("reward")?,
            obs: record
                .get_array1("obs")?
                .iter()
                .map(|v| *v as f64)
                .collect(),
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    fastrand::seed(42);

    let env_config = GymEnvConfig::default()
        .name("CartPole-v1".to_string())
        .render_mode(Some("human".to_string()))
        .obs_filter_config(ObsFilter::default_config())
        .act_filter_config(ActFilter::default_config());
    let mut env = Env::build(&env_config, 0)?;
    let mut recorder = BufferedRecorder::new();
    let mut policy = RandomPolicy {};

    let _ = util::eval_with_recorder(&mut env, &mut policy, 5, &mut recorder)?;

    // Vec<_> field in a struct does not support writing a header in csv crate, so disable it.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(File::create("vpg/examples/random_cartpole_eval.csv")?);
    for record in recorder.iter() {
        wtr.serialize(CartpoleRecord::try_from(record)?)?;
    }

    Ok(())
}
