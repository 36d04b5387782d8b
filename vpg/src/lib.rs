//! A REINFORCE (vanilla policy gradient) training library in Rust.
//!
//! The workspace consists of the following crates:
//!
//! * Core and utility
//!   * `vpg-core` provides basic traits and functions generic to
//!     environments and reinforcement learning agents, the episode buffer,
//!     the discounted-return and baseline computations, and the
//!     episode-driven training loop.
//!   * `vpg-tensorboard` has the `TensorboardRecorder` struct to write
//!     records which can be shown in Tensorboard. It is based on
//!     [tensorboard-rs](https://crates.io/crates/tensorboard-rs).
//! * Environment
//!   * `vpg-py-gym-env` is a wrapper of the
//!     [Gymnasium](https://gymnasium.farama.org) environments written in
//!     Python.
//! * Agent
//!   * `vpg-candle-agent` implements the REINFORCE agent based on
//!     [candle](https://crates.io/crates/candle-core).
//! * `vpg` is just a collection of examples; see the `examples` directory.
