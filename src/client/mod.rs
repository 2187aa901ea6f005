pub mod generator_client;
pub mod generator_error;
