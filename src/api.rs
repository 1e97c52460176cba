use crate::{config::Config, network::Network};

/// Collection of the APIs available to the scheduler and CLI.
pub struct Api {
    pub config: Config,
    pub network: Network,
}

impl Api {
    /// Instantiates APIs collection with the specified config and network.
    pub fn new(config: Config, network: Network) -> Self {
        Self { config, network }
    }
}

impl AsRef<Api> for Api {
    fn as_ref(&self) -> &Self {
        self
    }
}
