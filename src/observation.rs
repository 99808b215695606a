use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use aws_lambda_events::query_map::QueryMap;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::ProxyError;

const MPH_TO_MPS: f64 = 0.44704;
const INHG_TO_PA: f64 = 3386.39;
const INCH_TO_MM: f64 = 25.4;

/// Measurement block of the EnvironW JSON record. Unknown extra fields are
/// ignored during deserialization, so firmware sending additional telemetry
/// keeps working.
#[derive(Debug, Clone, Deserialize)]
pub struct Readings {
    pub pressure: f64,
    pub wind_speed: f64,
    pub rain: f64,
    pub wind_direction: f64,
    pub humidity: f64,
    pub temperature: f64,
    pub light: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct EnvironWRecord {
    #[allow(dead_code)]
    nickname: String,
    timestamp: Option<String>,
    readings: Readings,
}

#[derive(Debug, Clone)]
enum Source {
    Json(serde_json::Value),
    Query(QueryMap),
}

/// Stage-1 parse of an inbound request: station identity only. Measurements
/// stay unvalidated until the station has authenticated.
#[derive(Debug, Clone)]
pub struct RawObservation {
    pub station_id: String,
    pub station_key: String,
    source: Source,
}

impl RawObservation {
    /// Extracts station id and key from either a JSON body (EnvironW record
    /// convention) or flat PWS-style query parameters.
    pub fn from_request(request: &ApiGatewayProxyRequest) -> Result<Self, ProxyError> {
        match request.body.as_deref() {
            Some(body) if !body.trim().is_empty() => {
                let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
                    ProxyError::Validation(format!("request body is not valid JSON: {}", e))
                })?;
                let station_id = value
                    .get("nickname")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                if station_id.is_empty() {
                    return Err(ProxyError::Validation(String::from(
                        "missing station identifier field 'nickname'",
                    )));
                }
                let station_key = value
                    .get("station_key")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                Ok(RawObservation { station_id, station_key, source: Source::Json(value) })
            }
            _ => {
                let params = &request.query_string_parameters;
                let station_id = params
                    .first("station")
                    .or_else(|| params.first("si"))
                    .unwrap_or_default()
                    .to_string();
                if station_id.is_empty() {
                    return Err(ProxyError::Validation(String::from(
                        "missing station identifier parameter 'station'",
                    )));
                }
                let station_key = params.first("key").unwrap_or_default().to_string();
                Ok(RawObservation {
                    station_id,
                    station_key,
                    source: Source::Query(params.clone()),
                })
            }
        }
    }

    /// Stage-3 validation: parses the measurements into a canonical metric
    /// observation. Fails naming the missing or malformed field.
    pub fn into_observation(self) -> Result<Observation, ProxyError> {
        match self.source {
            Source::Json(value) => {
                let record: EnvironWRecord = serde_json::from_value(value).map_err(|e| {
                    ProxyError::Validation(format!("invalid observation record: {}", e))
                })?;
                let timestamp = match record.timestamp {
                    Some(timestamp) => timestamp,
                    None => default_timestamp(),
                };
                Ok(Observation {
                    station_id: self.station_id,
                    timestamp,
                    temperature: record.readings.temperature,
                    wind_speed: record.readings.wind_speed,
                    wind_direction: record.readings.wind_direction,
                    gust: 0.0,
                    humidity: record.readings.humidity,
                    dewpoint: 0.0,
                    pressure: record.readings.pressure,
                    rain: record.readings.rain,
                    uv: record.readings.light,
                })
            }
            Source::Query(params) => observation_from_query(self.station_id, &params),
        }
    }
}

/// One validated weather-station reading in metric units, ready for mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub station_id: String,
    /// ISO 8601 UTC.
    pub timestamp: String,
    /// °C
    pub temperature: f64,
    /// m/s
    pub wind_speed: f64,
    /// degrees
    pub wind_direction: f64,
    /// m/s
    pub gust: f64,
    /// %
    pub humidity: f64,
    /// °C
    pub dewpoint: f64,
    pub pressure: f64,
    /// mm over the past hour
    pub rain: f64,
    pub uv: f64,
}

/// PWS-style flat parameters: canonical metric names plus the imperial
/// alternates stations actually send (tempf, windspeedmph, baromin, rainin),
/// converted here. Parameters this proxy does not recognize are dropped.
fn observation_from_query(station_id: String, params: &QueryMap) -> Result<Observation, ProxyError> {
    let temperature = match numeric(params, "temp")? {
        Some(celsius) => celsius,
        None => match numeric(params, "tempf")? {
            Some(fahrenheit) => (fahrenheit - 32.0) * 5.0 / 9.0,
            None => return Err(missing_field("temp")),
        },
    };
    let wind_speed = match numeric(params, "wind")? {
        Some(mps) => mps,
        None => match numeric(params, "windspeedmph")? {
            Some(mph) => mph * MPH_TO_MPS,
            None => return Err(missing_field("wind")),
        },
    };
    let wind_direction = match numeric(params, "windir")?.or(numeric(params, "winddir")?) {
        Some(degrees) => degrees,
        None => return Err(missing_field("windir")),
    };
    let gust = match numeric(params, "gust")? {
        Some(mps) => mps,
        None => numeric(params, "windgustmph")?.map_or(0.0, |mph| mph * MPH_TO_MPS),
    };
    let humidity = match numeric(params, "humidity")?.or(numeric(params, "rh")?) {
        Some(percent) => percent,
        None => return Err(missing_field("humidity")),
    };
    let dewpoint = numeric(params, "dewpoint")?.unwrap_or(0.0);
    let pressure = match numeric(params, "pressure")?.or(numeric(params, "mbar")?) {
        Some(pressure) => pressure,
        None => match numeric(params, "baromin")? {
            Some(inhg) => inhg * INHG_TO_PA,
            None => return Err(missing_field("pressure")),
        },
    };
    let rain = match numeric(params, "precip")? {
        Some(mm) => mm,
        None => match numeric(params, "rainin")? {
            Some(inches) => inches * INCH_TO_MM,
            None => return Err(missing_field("precip")),
        },
    };
    let uv = numeric(params, "uv")?.unwrap_or(0.0);
    let timestamp = timestamp_from_query(params)?;

    Ok(Observation {
        station_id,
        timestamp,
        temperature,
        wind_speed,
        wind_direction,
        gust,
        humidity,
        dewpoint,
        pressure,
        rain,
        uv,
    })
}

fn numeric(params: &QueryMap, name: &str) -> Result<Option<f64>, ProxyError> {
    match params.first(name) {
        Some(raw) => raw.trim().parse::<f64>().map(Some).map_err(|_| {
            ProxyError::Validation(format!("field '{}' is not numeric: '{}'", name, raw))
        }),
        None => Ok(None),
    }
}

fn missing_field(name: &str) -> ProxyError {
    ProxyError::Validation(format!("missing required measurement field '{}'", name))
}

/// `ts` is epoch seconds, `dateutc` is `%Y-%m-%d %H:%M:%S`; both normalize
/// to ISO 8601 UTC. Absent both, the receipt time is used.
fn timestamp_from_query(params: &QueryMap) -> Result<String, ProxyError> {
    if let Some(raw) = params.first("ts") {
        let seconds = raw.trim().parse::<i64>().map_err(|_| {
            ProxyError::Validation(format!("field 'ts' is not an epoch timestamp: '{}'", raw))
        })?;
        let datetime = DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
            ProxyError::Validation(format!("field 'ts' is out of range: '{}'", raw))
        })?;
        return Ok(datetime.format("%Y-%m-%dT%H:%M:%S.000Z").to_string());
    }
    if let Some(raw) = params.first("dateutc") {
        let datetime = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map_err(|_| {
            ProxyError::Validation(format!("field 'dateutc' is not a UTC timestamp: '{}'", raw))
        })?;
        return Ok(datetime.format("%Y-%m-%dT%H:%M:%S.000Z").to_string());
    }
    Ok(default_timestamp())
}

fn default_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S.000Z").to_string()
}
