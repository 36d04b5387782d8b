//! REINFORCE (vanilla policy gradient) agent.
//!
//! The agent samples actions from the categorical distribution given by the
//! policy network and performs one optimization step per finished episode,
//! using the discounted return-to-go of every step, a running-mean baseline
//! shared across the whole run, and an entropy regularization term.
mod base;
mod config;
mod model;
pub use base::Reinforce;
pub use config::ReinforceConfig;
pub use model::{PolicyModel, PolicyModelConfig};
