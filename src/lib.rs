pub mod authorization;
pub mod bootstrap;
pub mod configuration;
pub mod domain;
pub mod encoding;
pub mod gmail_client;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
