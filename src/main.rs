use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use environw_proxy::config::Config;
use environw_proxy::forward::WindyClient;
use environw_proxy::handler::forward_observation;
use lambda_http::{service_fn, Error, LambdaEvent};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(false)
        .without_time()
        .init();

    let windy = WindyClient::new(&config.windy_api_key)?;

    lambda_runtime::run(service_fn(|event: LambdaEvent<ApiGatewayProxyRequest>| {
        forward_observation(&config, &windy, event)
    }))
    .await
}
