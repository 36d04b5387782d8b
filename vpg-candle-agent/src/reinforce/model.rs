use crate::{
    model::SubModel1,
    opt::{Optimizer, OptimizerConfig},
    util::OutDim,
};
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`PolicyModel`].
pub struct PolicyModelConfig<P>
where
    P: OutDim,
{
    pub(super) policy_config: Option<P>,
    pub(super) opt_config: OptimizerConfig,
}

impl<P> Default for PolicyModelConfig<P>
where
    P: OutDim,
{
    fn default() -> Self {
        Self {
            policy_config: None,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl<P> PolicyModelConfig<P>
where
    P: DeserializeOwned + Serialize + OutDim,
{
    /// Sets configurations for the policy network.
    pub fn policy_config(mut self, v: P) -> Self {
        self.policy_config = Some(v);
        self
    }

    /// Sets output dimension of the model.
    pub fn out_dim(mut self, v: i64) -> Self {
        match &mut self.policy_config {
            None => {}
            Some(policy_config) => policy_config.set_out_dim(v),
        };
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Constructs [`PolicyModelConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`PolicyModelConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Policy network with its parameters and optimizer.
pub struct PolicyModel<P>
where
    P: SubModel1<Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim,
{
    varmap: VarMap,

    // Policy network mapping observations to action logits.
    policy: P,

    // Optimizer
    opt: Optimizer,
}

impl<P> PolicyModel<P>
where
    P: SubModel1<Output = Tensor>,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Constructs [`PolicyModel`].
    pub fn build(config: PolicyModelConfig<P::Config>, device: Device) -> Result<Self> {
        let policy_config = config.policy_config.context("policy_config is not set.")?;
        let varmap = VarMap::new();
        let policy = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            P::build(vb, policy_config)
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            varmap,
            opt,
            policy,
        })
    }

    /// Outputs the action logits given observation(s).
    pub fn forward(&self, obs: &P::Input) -> Tensor {
        self.policy.forward(obs)
    }

    /// Resets gradients, back-propagates the loss and applies one
    /// optimizer step.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        self.opt.backward_step(loss)
    }

    /// Returns the variables of the model.
    pub fn get_varmap(&self) -> &VarMap {
        &self.varmap
    }

    /// Saves the parameters of the model.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save policy model to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads the parameters of the model.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load policy model from {:?}", path.as_ref());
        Ok(())
    }
}
