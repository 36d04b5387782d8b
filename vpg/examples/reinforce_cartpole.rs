use anyhow::Result;
use clap::Parser;
use ndarray::{ArrayD, IxDyn};
use vpg_candle_agent::{
    mlp::{Mlp, MlpConfig},
    opt::OptimizerConfig,
    reinforce::{PolicyModelConfig, Reinforce, ReinforceConfig},
    util::{arrayd_to_tensor, vec_to_tensor},
    TensorBatch,
};
use vpg_core::{
    generic_episode_buffer::{
        BatchBase, SimpleEpisodeBuffer, SimpleEpisodeBufferConfig, SimpleStepProcessor,
        SimpleStepProcessorConfig,
    },
    record::AggregateRecorder,
    Agent, Configurable, DefaultEvaluator, Env as _, EpisodeBufferBase, Evaluator as _,
    StepProcessor, Trainer, TrainerConfig,
};
use vpg_py_gym_env::{
    ArrayObsFilter, DiscreteActFilter, GymActFilter, GymEnv, GymEnvConfig, GymObsFilter,
};
use vpg_tensorboard::TensorboardRecorder;

use candle_core::{Device, Tensor};

const DIM_OBS: i64 = 4;
const DIM_ACT: i64 = 2;
const HIDDEN_UNITS: i64 = 64;
const LR: f64 = 0.002;
const GAMMA: f64 = 0.99;
const ENTROPY_BETA: f64 = 0.01;
const MAX_N_GAMES: usize = 10000;
const BASELINE_WINDOW: usize = 30000;
const EPISODE_BUFFER_CAPACITY: usize = 1000;
const EVAL_INTERVAL: usize = 100;
const FLUSH_RECORD_INTERVAL: usize = 100;
const N_EPISODES_PER_EVAL: usize = 5;
const MODEL_DIR: &str = "./vpg/examples/model/reinforce_cartpole";

mod obs_act_types {
    use super::*;

    #[derive(Clone, Debug)]
    pub struct Obs(ArrayD<f32>);

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

    impl From<Obs> for Tensor {
        fn from(obs: Obs) -> Tensor {
            arrayd_to_tensor::<_, f32>(obs.0, false).unwrap()
        }
    }

    pub struct ObsBatch(TensorBatch);

    impl BatchBase for ObsBatch {
        fn new(capacity: usize) -> Self {
            Self(TensorBatch::new(capacity))
        }

        fn push(&mut self, i: usize, data: Self) {
            self.0.push(i, data.0)
        }

        fn sample(&self, ixs: &Vec<usize>) -> Self {
            let buf = self.0.sample(ixs);
            Self(buf)
        }
    }

    impl From<Obs> for ObsBatch {
        fn from(obs: Obs) -> Self {
            let tensor = obs.into();
            Self(TensorBatch::from_tensor(tensor))
        }
    }

    impl From<ObsBatch> for Tensor {
        fn from(b: ObsBatch) -> Self {
            b.0.into()
        }
    }

    #[derive(Clone, Debug)]
    pub struct Act(Vec<i32>);

    impl vpg_core::Act for Act {}

    impl From<Act> for Vec<i32> {
        fn from(value: Act) -> Self {
            value.0
        }
    }

    impl From<Tensor> for Act {
        // `t` must be a 1-dimentional tensor of `i64`
        fn from(t: Tensor) -> Self {
            let data = t.to_vec1::<i64>().expect("Failed to convert Tensor to Act");
            let data = data.iter().map(|&e| e as i32).collect();
            Self(data)
        }
    }

    pub struct ActBatch(TensorBatch);

    impl BatchBase for ActBatch {
        fn new(capacity: usize) -> Self {
            Self(TensorBatch::new(capacity))
        }

        fn push(&mut self, i: usize, data: Self) {
            self.0.push(i, data.0)
        }

        fn sample(&self, ixs: &Vec<usize>) -> Self {
            let buf = self.0.sample(ixs);
            Self(buf)
        }
    }

    impl From<Act> for ActBatch {
        fn from(act: Act) -> Self {
            let t =
                vec_to_tensor::<_, i64>(act.0, true).expect("Failed to convert Act to ActBatch");
            Self(TensorBatch::from_tensor(t))
        }
    }

    // Required by Reinforce to gather log-probabilities of taken actions.
    impl From<ActBatch> for Tensor {
        fn from(act: ActBatch) -> Self {
            act.0.into()
        }
    }

    type PyObsDtype = f32;
    pub type ObsFilter = ArrayObsFilter<PyObsDtype, f32, Obs>;
    pub type ActFilter = DiscreteActFilter<Act>;
    pub type EnvConfig = GymEnvConfig<Obs, Act, ObsFilter, ActFilter>;
    pub type Env = GymEnv<Obs, Act, ObsFilter, ActFilter>;
    pub type StepProc = SimpleStepProcessor<Env, ObsBatch, ActBatch>;
    pub type EpisodeBuffer = SimpleEpisodeBuffer<ObsBatch, ActBatch>;
    pub type Evaluator = DefaultEvaluator<Env, Reinforce<Env, Mlp, EpisodeBuffer>>;
}

use obs_act_types::*;

mod config {
    use super::*;

    pub struct ReinforceCartpoleConfig {
        pub env_config: EnvConfig,
        pub agent_config: ReinforceConfig<Mlp>,
        pub trainer_config: TrainerConfig,
    }

    impl ReinforceCartpoleConfig {
        pub fn new(
            in_dim: i64,
            out_dim: i64,
            max_episodes: usize,
            model_dir: &str,
            eval_interval: usize,
        ) -> Self {
            let env_config = create_env_config();
            let agent_config = create_agent_config(in_dim, out_dim);
            let trainer_config = TrainerConfig::default()
                .max_episodes(max_episodes)
                .eval_interval(eval_interval)
                .flush_record_interval(FLUSH_RECORD_INTERVAL)
                .record_compute_cost_interval(FLUSH_RECORD_INTERVAL)
                .save_interval(eval_interval)
                .model_dir(model_dir);
            Self {
                env_config,
                agent_config,
                trainer_config,
            }
        }
    }

    pub fn create_env_config() -> EnvConfig {
        EnvConfig::default()
            .name("CartPole-v1".to_string())
            .obs_filter_config(ObsFilter::default_config())
            .act_filter_config(ActFilter::default_config())
    }

    pub fn create_agent_config(in_dim: i64, out_dim: i64) -> ReinforceConfig<Mlp> {
        let device = Device::cuda_if_available(0).unwrap();
        let opt_config = OptimizerConfig::default().learning_rate(LR);
        let mlp_config = MlpConfig::new(in_dim, vec![HIDDEN_UNITS], out_dim, false);
        let model_config = PolicyModelConfig::default()
            .policy_config(mlp_config)
            .out_dim(out_dim)
            .opt_config(opt_config);
        ReinforceConfig::default()
            .discount_factor(GAMMA)
            .entropy_beta(ENTROPY_BETA)
            .baseline_window(BASELINE_WINDOW)
            .model_config(model_config)
            .device(device)
    }
}

use config::{create_agent_config, create_env_config, ReinforceCartpoleConfig};

/// Train/eval REINFORCE agent in cartpole environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Train REINFORCE agent, not evaluate
    #[arg(short, long, default_value_t = false)]
    train: bool,

    /// Evaluate REINFORCE agent, not train
    #[arg(short, long, default_value_t = false)]
    eval: bool,
}

fn train(max_episodes: usize, model_dir: &str, eval_interval: usize) -> Result<()> {
    let config = ReinforceCartpoleConfig::new(
        DIM_OBS,
        DIM_ACT,
        max_episodes,
        model_dir,
        eval_interval,
    );
    let step_proc_config = SimpleStepProcessorConfig {};
    let buffer_config = SimpleEpisodeBufferConfig::default().capacity(EPISODE_BUFFER_CAPACITY);
    let mut recorder: Box<dyn AggregateRecorder> = Box::new(TensorboardRecorder::new(model_dir));
    let mut trainer = Trainer::build(config.trainer_config.clone());

    let env = Env::build(&config.env_config, 0)?;
    let step_proc = StepProc::build(&step_proc_config);
    let mut agent = Reinforce::build(config.agent_config);
    let mut buffer = EpisodeBuffer::build(&buffer_config);
    let mut evaluator = {
        let env = Env::build(&config.env_config, 0)?;
        Evaluator::new(env, N_EPISODES_PER_EVAL)?
    };

    trainer.train(
        env,
        step_proc,
        &mut agent,
        &mut buffer,
        &mut recorder,
        &mut evaluator,
    )?;

    Ok(())
}

fn eval(model_dir: &str, render: bool) -> Result<()> {
    let env_config = {
        let mut env_config = create_env_config();
        if render {
            env_config = env_config
                .render_mode(Some("human".to_string()))
                .set_wait_in_millis(10);
        }
        env_config
    };
    let mut agent: Reinforce<Env, Mlp, EpisodeBuffer> = {
        let mut agent = Reinforce::build(create_agent_config(DIM_OBS, DIM_ACT));
        agent.load_params(model_dir.as_ref())?;
        agent.eval();
        agent
    };

    let _ = {
        let env = Env::build(&env_config, 0)?;
        Evaluator::new(env, 5)?
    }
    .evaluate(&mut agent);

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.train {
        train(MAX_N_GAMES, MODEL_DIR, EVAL_INTERVAL)?;
    } else if args.eval {
        eval(&(MODEL_DIR.to_owned() + "/best"), true)?;
    } else {
        train(MAX_N_GAMES, MODEL_DIR, EVAL_INTERVAL)?;
        eval(&(MODEL_DIR.to_owned() + "/best"), true)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{eval, train};
    use anyhow::Result;
    use tempdir::TempDir;

    #[test]
    fn test_reinforce_cartpole() -> Result<()> {
        let tmp_dir = TempDir::new("reinforce_cartpole")?;
        let model_dir = match tmp_dir.as_ref().to_str() {
            Some(s) => s,
            None => panic!("Failed to get string of temporary directory"),
        };
        train(100, model_dir, 100)?;
        eval(&(model_dir.to_owned() + "/best"), false)?;
        Ok(())
    }
}
