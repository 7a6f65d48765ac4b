use dotenvy::dotenv;
use env_logger::Env;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;
use serde_json::Value;

use playbot::app::App;
use playbot::config::Config;
use playbot::lambda::handle;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv().ok();

    let mut config = Config::from_env()?;
    // The sandbox is frozen once the reply is returned, so the response must be sent first.
    config.process_before_response = true;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .format_timestamp(None)
        .init();

    let app = App::new(&config);
    let app = &app;
    info!("✅ Slack app initialized, waiting for invocations");

    run(service_fn(move |event: LambdaEvent<Value>| handle(app, event))).await
}
