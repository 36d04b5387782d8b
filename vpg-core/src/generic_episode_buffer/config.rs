//! Configuration of [`SimpleEpisodeBuffer`](super::SimpleEpisodeBuffer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`SimpleEpisodeBuffer`](super::SimpleEpisodeBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SimpleEpisodeBufferConfig {
    /// Maximum number of transitions of a single episode.
    ///
    /// Storage is pre-allocated for this many steps; pushing beyond it is
    /// an error. Set it to the time limit of the environment.
    pub capacity: usize,
}

impl Default for SimpleEpisodeBufferConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

impl SimpleEpisodeBufferConfig {
    /// Sets the capacity of the buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Constructs [`SimpleEpisodeBufferConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SimpleEpisodeBufferConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_episode_buffer_config() -> Result<()> {
        let config = SimpleEpisodeBufferConfig::default().capacity(500);
        let dir = TempDir::new("episode_buffer_config")?;
        let path = dir.path().join("config.yaml");
        config.save(&path)?;
        let config_ = SimpleEpisodeBufferConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
