//! Configuration of the REINFORCE agent.
use super::PolicyModelConfig;
use crate::{model::SubModel1, util::OutDim, Device};
use anyhow::Result;
use candle_core::Tensor;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    marker::PhantomData,
    path::Path,
};

/// Configuration of [`Reinforce`](super::Reinforce).
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ReinforceConfig<P>
where
    P: SubModel1<Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    pub(super) model_config: PolicyModelConfig<P::Config>,
    pub(super) discount_factor: f64,
    pub(super) entropy_beta: f64,
    pub(super) baseline_window: usize,
    pub(super) seed: u64,
    pub(super) train: bool,
    pub device: Option<Device>,
    phantom: PhantomData<P>,
}

impl<P> Clone for ReinforceConfig<P>
where
    P: SubModel1<Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    fn clone(&self) -> Self {
        Self {
            model_config: self.model_config.clone(),
            discount_factor: self.discount_factor,
            entropy_beta: self.entropy_beta,
            baseline_window: self.baseline_window,
            seed: self.seed,
            train: self.train,
            device: self.device.clone(),
            phantom: PhantomData,
        }
    }
}

impl<P> Default for ReinforceConfig<P>
where
    P: SubModel1<Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    fn default() -> Self {
        Self {
            model_config: Default::default(),
            discount_factor: 0.99,
            entropy_beta: 0.01,
            baseline_window: 30_000,
            seed: 42,
            train: false,
            device: None,
            phantom: PhantomData,
        }
    }
}

impl<P> ReinforceConfig<P>
where
    P: SubModel1<Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Weight of the entropy regularization term.
    pub fn entropy_beta(mut self, v: f64) -> Self {
        self.entropy_beta = v;
        self
    }

    /// Capacity of the baseline window over past returns.
    pub fn baseline_window(mut self, v: usize) -> Self {
        self.baseline_window = v;
        self
    }

    /// Seed of the random number generator used for action sampling.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the configuration of the model.
    pub fn model_config(mut self, model_config: PolicyModelConfig<P::Config>) -> Self {
        self.model_config = model_config;
        self
    }

    /// Sets the output dimension of the policy model.
    pub fn out_dim(mut self, out_dim: i64) -> Self {
        let model_config = self.model_config.clone();
        self.model_config = model_config.out_dim(out_dim);
        self
    }

    /// Device.
    pub fn device(mut self, device: candle_core::Device) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Loads [`ReinforceConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!(
            "Load config of REINFORCE agent from {}",
            path_.to_str().unwrap()
        );
        Ok(b)
    }

    /// Saves [`ReinforceConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!(
            "Save config of REINFORCE agent into {}",
            path_.to_str().unwrap()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mlp::{Mlp, MlpConfig};
    use tempdir::TempDir;

    #[test]
    fn test_serde_reinforce_config() -> Result<()> {
        let config = ReinforceConfig::<Mlp>::default()
            .discount_factor(0.99)
            .entropy_beta(0.01)
            .baseline_window(30_000)
            .model_config(
                PolicyModelConfig::default()
                    .policy_config(MlpConfig::new(4, vec![64], 2, false)),
            );

        let dir = TempDir::new("reinforce_config")?;
        let path = dir.path().join("config.yaml");
        config.save(&path)?;
        let config_ = ReinforceConfig::<Mlp>::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
