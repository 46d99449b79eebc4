use std::net::TcpListener;
use std::sync::Arc;

use contact_relay::authorization::{Authorizer, UnattendedPrompt};
use contact_relay::configuration::get_configuration;
use contact_relay::startup::run;
use contact_relay::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("contact_relay".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = get_configuration().expect("Failed to read configuration");

    let gmail_client = config
        .gmail
        .client()
        .expect("Invalid sender or recipient found in configuration");
    // Serving requests never blocks on a human: tokens come from the `authorize` binary.
    let authorizer = Authorizer::new(
        config.storage.store(),
        config.gmail.oauth_client(),
        Arc::new(UnattendedPrompt),
    );

    let address = format!(
        "{address}:{port}",
        address = config.application.host,
        port = config.application.port
    );
    let listener = TcpListener::bind(address)?;
    tracing::info!(
        port = listener.local_addr()?.port(),
        "Your app is listening"
    );

    run(
        listener,
        authorizer,
        gmail_client,
        config.application.site_url,
        config.application.allowed_origin,
    )?
    .await
}
