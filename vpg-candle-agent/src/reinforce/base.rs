//! REINFORCE agent implemented with candle.
use super::{config::ReinforceConfig, model::PolicyModel};
use crate::{model::SubModel1, util::OutDim};
use anyhow::Result;
use candle_core::{shape::D, DType, Device, Tensor};
use candle_nn::ops::{log_softmax, softmax};
use rand::{distributions::WeightedIndex, rngs::SmallRng, Rng, SeedableRng};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, marker::PhantomData, path::Path};
use vpg_core::{
    discounted_returns,
    record::{Record, RecordValue},
    Agent, BaselineWindow, Configurable, Env, EpisodeBufferBase, Policy, TransitionBatch,
};

/// Draws one action per row from the categorical distributions given by `probs`.
fn sample_from_probs(probs: &Tensor, rng: &mut impl Rng) -> Tensor {
    let device = probs.device();
    let probs = probs.to_vec2::<f32>().unwrap();
    let n_samples = probs.len();
    let data = probs
        .into_iter()
        .map(|p| rng.sample(WeightedIndex::new(&p).unwrap()) as i64)
        .collect::<Vec<_>>();
    Tensor::from_vec(data, &[n_samples], device).unwrap()
}

/// Assembles the policy-gradient loss of one episode.
///
/// `logits` has shape `(n_steps, n_actions)`, `act` is an `(n_steps, 1)`
/// integer tensor of the taken actions and `adv` an `(n_steps,)` tensor of
/// advantages. Returns `(loss, loss_policy, neg_entropy)`, where
/// `loss = loss_policy + entropy_beta * neg_entropy`.
fn policy_gradient_loss(
    logits: &Tensor,
    act: &Tensor,
    adv: &Tensor,
    entropy_beta: f64,
) -> Result<(Tensor, Tensor, Tensor)> {
    let log_p = log_softmax(logits, D::Minus1)?;
    let logp_act = log_p.gather(act, D::Minus1)?.squeeze(D::Minus1)?;
    let loss_policy = (adv * logp_act)?.mean_all()?.neg()?;
    // sum_a pi(a|s) log pi(a|s) = -H(pi(.|s))
    let neg_entropy = (softmax(logits, D::Minus1)? * &log_p)?
        .sum(D::Minus1)?
        .mean_all()?;
    let loss = (&loss_policy + (entropy_beta * &neg_entropy)?)?;
    Ok((loss, loss_policy, neg_entropy))
}

/// REINFORCE agent implemented with candle.
///
/// In training mode actions are sampled from the softmax of the policy
/// logits; in evaluation mode the agent takes the argmax action.
pub struct Reinforce<E, P, R>
where
    E: Env,
    P: SubModel1<Output = Tensor>,
    R: EpisodeBufferBase,
    E::Obs: Into<P::Input>,
    E::Act: From<Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<P::Input>,
    <R::Batch as TransitionBatch>::ActBatch: Into<Tensor>,
{
    pub(in crate::reinforce) model: PolicyModel<P>,
    pub(in crate::reinforce) discount_factor: f64,
    pub(in crate::reinforce) entropy_beta: f64,
    pub(in crate::reinforce) baseline: BaselineWindow,
    pub(in crate::reinforce) train: bool,
    pub(in crate::reinforce) device: Device,
    pub(in crate::reinforce) n_opts: usize,
    rng: SmallRng,
    phantom: PhantomData<(E, R)>,
}

impl<E, P, R> Reinforce<E, P, R>
where
    E: Env,
    P: SubModel1<Output = Tensor>,
    R: EpisodeBufferBase,
    E::Obs: Into<P::Input>,
    E::Act: From<Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<P::Input>,
    <R::Batch as TransitionBatch>::ActBatch: Into<Tensor>,
{
    /// Performs one optimization step over the transitions of a finished
    /// episode.
    fn opt_(&mut self, buffer: &mut R) -> Result<Record> {
        let batch = buffer.take_episode()?;
        let n_steps = batch.len();
        let (obs, act, _next_obs, reward, is_terminated, is_truncated) = batch.unpack();

        let dones = is_terminated
            .iter()
            .zip(is_truncated.iter())
            .map(|(t, tr)| t | tr)
            .collect::<Vec<i8>>();
        let returns = discounted_returns(&reward, &dones, self.discount_factor as f32);

        // The baseline includes the returns of the episode being processed.
        self.baseline.extend(&returns);
        let baseline = self.baseline.mean().unwrap_or(0.);
        let advantages = returns.iter().map(|g| g - baseline).collect::<Vec<f32>>();

        let obs = obs.into();
        let act = act.into().to_dtype(DType::I64)?.to_device(&self.device)?;
        let adv = Tensor::from_slice(&advantages[..], (n_steps,), &self.device)?;

        let logits = self.model.forward(&obs);
        let (loss, loss_policy, neg_entropy) =
            policy_gradient_loss(&logits, &act, &adv, self.entropy_beta)?;

        self.model.backward_step(&loss)?;
        self.n_opts += 1;

        Ok(Record::from_slice(&[
            ("loss", RecordValue::Scalar(loss.to_scalar::<f32>()?)),
            (
                "loss_policy",
                RecordValue::Scalar(loss_policy.to_scalar::<f32>()?),
            ),
            (
                "entropy",
                RecordValue::Scalar(-neg_entropy.to_scalar::<f32>()?),
            ),
            ("baseline", RecordValue::Scalar(baseline)),
        ]))
    }
}

impl<E, P, R> Policy<E> for Reinforce<E, P, R>
where
    E: Env,
    P: SubModel1<Output = Tensor>,
    R: EpisodeBufferBase,
    E::Obs: Into<P::Input>,
    E::Act: From<Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<P::Input>,
    <R::Batch as TransitionBatch>::ActBatch: Into<Tensor>,
{
    /// Samples an action from the policy distribution.
    ///
    /// In evaluation mode, the argmax action is taken instead.
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        let logits = self.model.forward(&obs.clone().into());
        let act = if self.train {
            let probs = softmax(&logits, 1).unwrap();
            sample_from_probs(&probs, &mut self.rng)
        } else {
            logits.argmax(D::Minus1).unwrap().to_dtype(DType::I64).unwrap()
        };
        act.into()
    }
}

impl<E, P, R> Configurable<E> for Reinforce<E, P, R>
where
    E: Env,
    P: SubModel1<Output = Tensor>,
    R: EpisodeBufferBase,
    E::Obs: Into<P::Input>,
    E::Act: From<Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<P::Input>,
    <R::Batch as TransitionBatch>::ActBatch: Into<Tensor>,
{
    type Config = ReinforceConfig<P>;

    /// Constructs a REINFORCE agent.
    fn build(config: Self::Config) -> Self {
        let device: Device = config
            .device
            .expect("No device is given for REINFORCE agent")
            .into();
        let model = PolicyModel::build(config.model_config, device.clone()).unwrap();

        Reinforce {
            model,
            discount_factor: config.discount_factor,
            entropy_beta: config.entropy_beta,
            baseline: BaselineWindow::new(config.baseline_window),
            train: config.train,
            device,
            n_opts: 0,
            rng: SmallRng::seed_from_u64(config.seed),
            phantom: PhantomData,
        }
    }
}

impl<E, P, R> Agent<E, R> for Reinforce<E, P, R>
where
    E: Env,
    P: SubModel1<Output = Tensor>,
    R: EpisodeBufferBase,
    E::Obs: Into<P::Input>,
    E::Act: From<Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<P::Input>,
    <R::Batch as TransitionBatch>::ActBatch: Into<Tensor>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt_with_record(&mut self, buffer: &mut R) -> Result<Record> {
        self.opt_(buffer)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(&path)?;
        self.model.save(&path.join("policy.pt").as_path())?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.model.load(&path.join("policy.pt").as_path())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn test_sampling_follows_softmax() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(42);
        // probs = softmax([0, ln 3]) = [0.25, 0.75]
        let logits = Tensor::from_slice(&[0f32, 3f32.ln()], (1, 2), &Device::Cpu)?;
        let probs = softmax(&logits, 1)?;

        let n_draws = 10_000;
        let mut n_ones = 0usize;
        for _ in 0..n_draws {
            let act = sample_from_probs(&probs, &mut rng).to_vec1::<i64>()?;
            if act[0] == 1 {
                n_ones += 1;
            }
        }

        let freq = n_ones as f32 / n_draws as f32;
        assert!((freq - 0.75).abs() < 0.02, "freq = {}", freq);
        Ok(())
    }

    #[test]
    fn test_entropy_term_sign() -> Result<()> {
        // Uniform logits and zero advantages: the policy term vanishes and
        // the total loss is entropy_beta * (-ln n_actions).
        let n_steps = 4usize;
        let entropy_beta = 0.01;
        let logits = Tensor::zeros((n_steps, 2), DType::F32, &Device::Cpu)?;
        let act = Tensor::zeros((n_steps, 1), DType::I64, &Device::Cpu)?;
        let adv = Tensor::zeros((n_steps,), DType::F32, &Device::Cpu)?;

        let (loss, loss_policy, neg_entropy) =
            policy_gradient_loss(&logits, &act, &adv, entropy_beta)?;

        assert!(loss_policy.to_scalar::<f32>()?.abs() < 1e-6);
        let expected = entropy_beta as f32 * (-(2f32.ln()));
        assert!((loss.to_scalar::<f32>()? - expected).abs() < 1e-6);
        assert!((neg_entropy.to_scalar::<f32>()? - (-(2f32.ln()))).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_policy_loss_weights_log_probs_by_advantages() -> Result<()> {
        // Two steps with uniform logits: log pi(a) = ln 0.5 for any action.
        // With advantages [2, -1], the policy loss is
        // -mean([2 * ln 0.5, -1 * ln 0.5]) = -0.5 * ln 0.5.
        let logits = Tensor::zeros((2, 2), DType::F32, &Device::Cpu)?;
        let act = Tensor::from_slice(&[0i64, 1], (2, 1), &Device::Cpu)?;
        let adv = Tensor::from_slice(&[2f32, -1.], (2,), &Device::Cpu)?;

        let (loss, loss_policy, _) = policy_gradient_loss(&logits, &act, &adv, 0.)?;

        let expected = -0.5 * 0.5f32.ln();
        assert!((loss_policy.to_scalar::<f32>()? - expected).abs() < 1e-6);
        // With entropy_beta = 0 the total loss equals the policy loss.
        assert!((loss.to_scalar::<f32>()? - expected).abs() < 1e-6);
        Ok(())
    }
}
