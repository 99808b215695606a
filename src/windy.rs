use serde::Serialize;

use crate::observation::Observation;

/// One observation in the Windy PWS update schema. Built fresh per request
/// and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindyObservation {
    pub station: u32,
    pub time: String,
    pub temp: f64,
    pub wind: f64,
    pub windir: f64,
    pub gust: f64,
    pub humidity: f64,
    pub dewpoint: f64,
    pub pressure: f64,
    pub precip: f64,
    pub uv: f64,
}

impl WindyObservation {
    /// Pure mapping from one validated observation to the destination
    /// schema. The EnvironW light reading feeds the Windy uv field.
    pub fn from_observation(observation: &Observation, station: u32) -> Self {
        WindyObservation {
            station,
            time: observation.timestamp.clone(),
            temp: observation.temperature,
            wind: observation.wind_speed,
            windir: observation.wind_direction,
            gust: observation.gust,
            humidity: observation.humidity,
            dewpoint: observation.dewpoint,
            pressure: observation.pressure,
            precip: observation.rain,
            uv: observation.uv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation() -> Observation {
        Observation {
            station_id: String::from("olliverhome"),
            timestamp: String::from("2024-05-01T12:00:00.000Z"),
            temperature: 17.3,
            wind_speed: 3.2,
            wind_direction: 180.0,
            gust: 0.0,
            humidity: 61.5,
            dewpoint: 0.0,
            pressure: 101325.0,
            rain: 0.4,
            uv: 2.0,
        }
    }

    #[test]
    fn maps_observation_to_windy_schema() {
        let record = WindyObservation::from_observation(&observation(), 0);
        assert_eq!(record.station, 0);
        assert_eq!(record.time, "2024-05-01T12:00:00.000Z");
        assert_eq!(record.temp, 17.3);
        assert_eq!(record.wind, 3.2);
        assert_eq!(record.windir, 180.0);
        assert_eq!(record.humidity, 61.5);
        assert_eq!(record.pressure, 101325.0);
        assert_eq!(record.precip, 0.4);
        assert_eq!(record.uv, 2.0);
    }

    #[test]
    fn mapping_is_deterministic() {
        let observation = observation();
        let first = WindyObservation::from_observation(&observation, 1);
        let second = WindyObservation::from_observation(&observation, 1);
        assert_eq!(first, second);
    }
}
