//! Drives the episode-driven training loop with a scripted environment.
use anyhow::Result;
use vpg_core::{
    discounted_returns,
    generic_episode_buffer::{
        BatchBase, SimpleEpisodeBuffer, SimpleEpisodeBufferConfig, SimpleStepProcessor,
        SimpleStepProcessorConfig,
    },
    record::{NullRecorder, Record},
    Agent, BaselineWindow, Configurable, DefaultEvaluator, Env, EpisodeBufferBase, Policy, Step,
    StepProcessor, Trainer, TrainerConfig, TransitionBatch,
};

const EPISODE_LEN: usize = 3;
const MAX_EPISODES: usize = 5;

#[derive(Clone, Debug)]
struct TestObs(Vec<f32>);

impl vpg_core::Obs for TestObs {
    fn dummy(_n: usize) -> Self {
        Self(vec![0.])
    }

    fn len(&self) -> usize {
        1
    }
}

#[derive(Clone, Debug)]
struct TestAct(i32);

impl vpg_core::Act for TestAct {}

#[derive(Clone)]
struct TestEnvConfig {
    episode_len: usize,
}

/// Emits reward 1 at every step and terminates after `episode_len` steps.
struct TestEnv {
    episode_len: usize,
    count: usize,
}

impl Env for TestEnv {
    type Config = TestEnvConfig;
    type Obs = TestObs;
    type Act = TestAct;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            episode_len: config.episode_len,
            count: 0,
        })
    }

    fn reset(&mut self, _is_done: Option<&Vec<i8>>) -> Result<Self::Obs> {
        self.count = 0;
        Ok(TestObs(vec![0.]))
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
        self.reset(None)
    }

    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        self.count += 1;
        let is_terminated = if self.count == self.episode_len { 1 } else { 0 };
        let step = Step::new(
            TestObs(vec![self.count as f32]),
            a.clone(),
            vec![1.],
            vec![is_terminated],
            vec![0],
            (),
            None,
        );
        (step, Record::empty())
    }

    fn step_with_reset(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        let (mut step, record) = self.step(a);
        if step.is_done() {
            let init_obs = self.reset(None).unwrap();
            step.init_obs = Some(init_obs);
        }
        (step, record)
    }
}

struct VecBatch(Vec<Vec<f32>>);

impl BatchBase for VecBatch {
    fn new(capacity: usize) -> Self {
        Self(vec![vec![]; capacity])
    }

    fn push(&mut self, ix: usize, data: Self) {
        for (i, v) in data.0.into_iter().enumerate() {
            self.0[ix + i] = v;
        }
    }

    fn sample(&self, ixs: &Vec<usize>) -> Self {
        Self(ixs.iter().map(|ix| self.0[*ix].clone()).collect())
    }
}

impl From<TestObs> for VecBatch {
    fn from(obs: TestObs) -> Self {
        Self(vec![obs.0])
    }
}

impl From<TestAct> for VecBatch {
    fn from(act: TestAct) -> Self {
        Self(vec![vec![act.0 as f32]])
    }
}

type StepProc = SimpleStepProcessor<TestEnv, VecBatch, VecBatch>;
type EpisodeBuffer = SimpleEpisodeBuffer<VecBatch, VecBatch>;

/// Counts optimization steps and checks the per-episode batch invariants.
struct TestAgent {
    baseline: BaselineWindow,
    n_opts: usize,
    train: bool,
}

impl Policy<TestEnv> for TestAgent {
    fn sample(&mut self, _obs: &TestObs) -> TestAct {
        TestAct(0)
    }
}

impl Configurable<TestEnv> for TestAgent {
    type Config = usize;

    fn build(baseline_window: Self::Config) -> Self {
        Self {
            baseline: BaselineWindow::new(baseline_window),
            n_opts: 0,
            train: false,
        }
    }
}

impl Agent<TestEnv, EpisodeBuffer> for TestAgent {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt_with_record(&mut self, buffer: &mut EpisodeBuffer) -> Result<Record> {
        let batch = buffer.take_episode()?;
        assert_eq!(batch.len(), EPISODE_LEN);

        let (obs, _act, _next_obs, reward, is_terminated, is_truncated) = batch.unpack();

        // Observations arrive in temporal order, starting at the reset state.
        let expected = (0..EPISODE_LEN).map(|i| vec![i as f32]).collect::<Vec<_>>();
        assert_eq!(obs.0, expected);

        // Only the final transition terminates the episode.
        let dones = is_terminated
            .iter()
            .zip(is_truncated.iter())
            .map(|(t, tr)| t | tr)
            .collect::<Vec<i8>>();
        assert_eq!(dones, vec![0, 0, 1]);

        let returns = discounted_returns(&reward, &dones, 1.0);
        assert_eq!(returns, vec![3., 2., 1.]);

        self.baseline.extend(&returns);
        if self.n_opts == 0 {
            // First episode: baseline = mean([3, 2, 1]) = 2, advantages [1, 0, -1].
            let baseline = self.baseline.mean().unwrap();
            assert_eq!(baseline, 2.);
            let advantages = returns.iter().map(|g| g - baseline).collect::<Vec<f32>>();
            assert_eq!(advantages, vec![1., 0., -1.]);
        }

        self.n_opts += 1;
        Ok(Record::from_scalar("loss", 0.))
    }

    fn save_params(&self, _path: &std::path::Path) -> Result<()> {
        Ok(())
    }

    fn load_params(&mut self, _path: &std::path::Path) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_trainer_opt_per_episode() -> Result<()> {
    let env_config = TestEnvConfig {
        episode_len: EPISODE_LEN,
    };
    let env = TestEnv::build(&env_config, 0)?;
    let step_proc = StepProc::build(&SimpleStepProcessorConfig::default());
    let buffer_config = SimpleEpisodeBufferConfig::default().capacity(EPISODE_LEN);
    let mut buffer = EpisodeBuffer::build(&buffer_config);
    let mut agent = TestAgent::build(16);
    let mut recorder: Box<dyn vpg_core::record::AggregateRecorder> = Box::new(NullRecorder {});
    let mut evaluator = {
        let env = TestEnv::build(&env_config, 0)?;
        DefaultEvaluator::new(env, 2)?
    };

    let config = TrainerConfig::default()
        .max_episodes(MAX_EPISODES)
        .eval_interval(2)
        .flush_record_interval(2);
    let mut trainer = Trainer::build(config);

    trainer.train(
        env,
        step_proc,
        &mut agent,
        &mut buffer,
        &mut recorder,
        &mut evaluator,
    )?;

    // One optimization step per episode, buffer empty at the end.
    assert_eq!(agent.n_opts, MAX_EPISODES);
    assert_eq!(vpg_core::ExperienceBufferBase::len(&buffer), 0);

    // The evaluator leaves the agent in training mode.
    assert!(agent.is_train());

    Ok(())
}
