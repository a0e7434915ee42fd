use serde::{Deserialize, Serialize};
use shared::{Coordinate, DeliveryStage, PaymentMethod, SimulationResult, Tariff};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatePayload {
    pub pickup: String,
    pub dropoff: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fare: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_km_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_speed_kmh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_factor: Option<f64>,
    #[serde(default)]
    pub payment: PaymentMethod,
}

impl EstimatePayload {
    /// Fill omitted tariff fields from the server defaults.
    pub fn tariff(&self, defaults: Tariff) -> Tariff {
        Tariff {
            base_fare: self.base_fare.unwrap_or(defaults.base_fare),
            per_km_rate: self.per_km_rate.unwrap_or(defaults.per_km_rate),
            avg_speed_kmh: self.avg_speed_kmh.unwrap_or(defaults.avg_speed_kmh),
            traffic_factor: self.traffic_factor.unwrap_or(defaults.traffic_factor),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedEstimate {
    pub price: String,
    pub eta: String,
    pub distance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub result: SimulationResult,
    pub display: FormattedEstimate,
    pub stages: Vec<DeliveryStage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<SimulationResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityEntry {
    pub name: String,
    #[serde(flatten)]
    pub coord: Coordinate,
}
