use std::sync::Arc;

use driverdesk_shared::telemetry::init_tracing;
use driverdesk_shared::{AppState, Config};
use lambda_http::{run, service_fn, Error};

mod http_handler;
#[cfg(test)]
mod tests;

use http_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let sdk = aws_config::load_from_env().await;
    let state = Arc::new(AppState::aws(config, &sdk));
    tracing::info!(table = %state.config.table_name, bucket = %state.config.bucket_name, "api lambda ready");

    run(service_fn(move |event| {
        let state = state.clone();
        async move { function_handler(event, state).await }
    }))
    .await
}
