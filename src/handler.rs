use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method};
use lambda_http::{Error, LambdaEvent};
use serde_json::json;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ProxyError;
use crate::forward::{DestinationReply, PostObservation};
use crate::observation::RawObservation;
use crate::windy::WindyObservation;

/// Entry point for one API Gateway invocation: route, authenticate, map,
/// forward, respond. Every failure becomes a structured HTTP response; the
/// Lambda runtime never sees an unhandled fault.
pub async fn forward_observation(
    config: &Config,
    destination: &impl PostObservation,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let request = event.payload;
    if !request.path.as_deref().is_some_and(|path| path.contains("weather")) {
        warn!(path = request.path.as_deref().unwrap_or(""), "no route for path");
        return Ok(json_response(
            404,
            json!({ "error": "not_found", "message": "no route for path" }),
        ));
    }
    if request.http_method != Method::POST {
        warn!(method = %request.http_method, "method not allowed");
        return Ok(json_response(
            405,
            json!({ "error": "method_not_allowed", "message": "only POST is accepted" }),
        ));
    }

    let raw = match RawObservation::from_request(&request) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "observation rejected");
            return Ok(error_response(&err));
        }
    };
    let station_id = raw.station_id.clone();

    match forward(config, destination, raw).await {
        Ok(reply) => {
            info!(
                station = %station_id,
                destination_status = reply.status,
                "observation forwarded"
            );
            Ok(json_response(
                200,
                json!({
                    "result": "forwarded",
                    "station": station_id,
                    "destination_status": reply.status,
                }),
            ))
        }
        Err(err) => {
            warn!(station = %station_id, kind = err.kind(), error = %err, "forwarding failed");
            Ok(error_response(&err))
        }
    }
}

/// Authenticates the station, validates the measurements and issues the
/// single outbound call. Stops at the first unmet precondition; nothing is
/// sent after a failure.
async fn forward(
    config: &Config,
    destination: &impl PostObservation,
    raw: RawObservation,
) -> Result<DestinationReply, ProxyError> {
    let credential = config.station(&raw.station_id).ok_or_else(|| {
        ProxyError::Authentication(format!("unknown station '{}'", raw.station_id))
    })?;
    if credential.key != raw.station_key {
        return Err(ProxyError::Authentication(format!(
            "key mismatch for station '{}'",
            raw.station_id
        )));
    }
    let windy_index = credential.windy_index;
    let observation = raw.into_observation()?;
    let record = WindyObservation::from_observation(&observation, windy_index);
    destination.post_observation(&record).await
}

fn json_response(status_code: i64, body: serde_json::Value) -> ApiGatewayProxyResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    ApiGatewayProxyResponse {
        status_code,
        headers,
        multi_value_headers: HeaderMap::default(),
        body: Some(lambda_http::Body::Text(body.to_string())),
        is_base64_encoded: false,
    }
}

fn error_response(err: &ProxyError) -> ApiGatewayProxyResponse {
    json_response(
        err.status_code(),
        json!({ "error": err.kind(), "message": err.to_string() }),
    )
}
