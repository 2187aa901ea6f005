use std::{sync::Arc, time::Duration};

use reqwest::Client;

use crate::{
    assessment::registry::SessionRegistry, client::generator_client::GeneratorClient,
    config::config::CONFIG, server::error::ServerError,
};

pub struct AppState {
    client: Client,
    generator: GeneratorClient,
    registry: SessionRegistry,
}

impl AppState {
    pub fn new() -> Result<Arc<Self>, ServerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(CONFIG.generator.timeout_secs))
            .build()?;
        let generator = GeneratorClient::new();
        let registry = SessionRegistry::new();

        let state = Arc::new(Self {
            client,
            generator,
            registry,
        });

        Ok(state)
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }

    pub fn get_generator(&self) -> &GeneratorClient {
        &self.generator
    }

    pub fn get_registry(&self) -> &SessionRegistry {
        &self.registry
    }
}
