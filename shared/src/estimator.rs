use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::geo::{Coordinate, haversine_km};
use crate::resolver::resolve_location;

pub const DEFAULT_SPEED_KMH: f64 = 30.0;
pub const DEFAULT_TRAFFIC_FACTOR: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub base_fare: f64,
    pub per_km_rate: f64,
    #[serde(default = "default_speed")]
    pub avg_speed_kmh: f64,
    #[serde(default = "default_traffic")]
    pub traffic_factor: f64,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            base_fare: 0.0,
            per_km_rate: 0.0,
            avg_speed_kmh: DEFAULT_SPEED_KMH,
            traffic_factor: DEFAULT_TRAFFIC_FACTOR,
        }
    }
}

impl Tariff {
    /// Replace out-of-domain values with their defaults instead of rejecting them.
    pub fn sanitized(self) -> Self {
        Self {
            base_fare: non_negative(self.base_fare),
            per_km_rate: non_negative(self.per_km_rate),
            avg_speed_kmh: positive_or(self.avg_speed_kmh, DEFAULT_SPEED_KMH),
            traffic_factor: positive_or(self.traffic_factor, DEFAULT_TRAFFIC_FACTOR),
        }
    }
}

pub fn default_speed() -> f64 {
    DEFAULT_SPEED_KMH
}

pub fn default_traffic() -> f64 {
    DEFAULT_TRAFFIC_FACTOR
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Pix,
    Card,
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Pix, PaymentMethod::Card, PaymentMethod::Cash];

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Pix => "Pix",
            PaymentMethod::Card => "Cartão",
            PaymentMethod::Cash => "Dinheiro",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceSource {
    Haversine,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub start_label: String,
    pub end_label: String,
    pub start: Option<Coordinate>,
    pub end: Option<Coordinate>,
    pub fallback_distance_km: f64,
    pub tariff: Tariff,
    #[serde(default)]
    pub payment: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub start_label: String,
    pub end_label: String,
    pub distance_km: f64,
    pub price: f64,
    pub time_minutes: f64,
    pub points: (Option<Coordinate>, Option<Coordinate>),
    pub source: DistanceSource,
    #[serde(default)]
    pub payment: PaymentMethod,
}

impl SimulationResult {
    /// Resolved endpoints in start, end order.
    pub fn resolved_points(&self) -> Vec<Coordinate> {
        [self.points.0, self.points.1].into_iter().flatten().collect()
    }
}

pub fn estimate(req: &EstimateRequest) -> SimulationResult {
    let tariff = req.tariff.sanitized();
    let (distance_km, source) = match (req.start, req.end) {
        (Some(a), Some(b)) => (haversine_km(a, b), DistanceSource::Haversine),
        _ => (non_negative(req.fallback_distance_km), DistanceSource::Fallback),
    };

    SimulationResult {
        start_label: req.start_label.clone(),
        end_label: req.end_label.clone(),
        distance_km,
        price: tariff.base_fare + distance_km * tariff.per_km_rate,
        time_minutes: (distance_km / tariff.avg_speed_kmh) * 60.0 * tariff.traffic_factor,
        points: (req.start, req.end),
        source,
        payment: req.payment,
    }
}

/// Raw text of the route simulation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteForm {
    pub pickup: String,
    pub dropoff: String,
    pub fallback_km: String,
    pub base_fare: String,
    pub per_km_rate: String,
    pub avg_speed_kmh: String,
    pub traffic_factor: String,
    pub payment: PaymentMethod,
}

impl RouteForm {
    pub fn to_request(&self) -> Result<EstimateRequest, FormError> {
        let tariff = Tariff {
            base_fare: coerce_number(&self.base_fare, 0.0),
            per_km_rate: coerce_number(&self.per_km_rate, 0.0),
            avg_speed_kmh: coerce_number(&self.avg_speed_kmh, DEFAULT_SPEED_KMH),
            traffic_factor: coerce_number(&self.traffic_factor, DEFAULT_TRAFFIC_FACTOR),
        };
        EstimateRequest::resolve(
            &self.pickup,
            &self.dropoff,
            coerce_number(&self.fallback_km, 0.0),
            tariff,
            self.payment,
        )
    }
}

impl EstimateRequest {
    /// Check the two required labels and run them through the resolver.
    pub fn resolve(
        pickup: &str,
        dropoff: &str,
        fallback_distance_km: f64,
        tariff: Tariff,
        payment: PaymentMethod,
    ) -> Result<Self, FormError> {
        let pickup = pickup.trim();
        let dropoff = dropoff.trim();
        if pickup.is_empty() {
            return Err(FormError::MissingField("o endereço de coleta"));
        }
        if dropoff.is_empty() {
            return Err(FormError::MissingField("o endereço de entrega"));
        }

        Ok(Self {
            start_label: pickup.to_string(),
            end_label: dropoff.to_string(),
            start: resolve_location(pickup),
            end: resolve_location(dropoff),
            fallback_distance_km,
            tariff,
            payment,
        })
    }
}

/// Lenient numeric read: accepts a comma decimal separator, falls back to `default`.
pub fn coerce_number(raw: &str, default: f64) -> f64 {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

fn positive_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { default }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback_request(distance: f64, tariff: Tariff) -> EstimateRequest {
        EstimateRequest {
            start_label: "A".into(),
            end_label: "B".into(),
            start: None,
            end: None,
            fallback_distance_km: distance,
            tariff,
            payment: PaymentMethod::Pix,
        }
    }

    #[test]
    fn price_is_linear_in_distance() {
        let tariff = Tariff {
            base_fare: 10.0,
            per_km_rate: 2.0,
            ..Tariff::default()
        };
        let result = estimate(&fallback_request(5.0, tariff));
        assert_eq!(result.price, 20.0);
    }

    #[test]
    fn time_uses_speed_and_traffic() {
        let tariff = Tariff {
            avg_speed_kmh: 25.0,
            traffic_factor: 1.0,
            ..Tariff::default()
        };
        let result = estimate(&fallback_request(5.0, tariff));
        assert!((result.time_minutes - 12.0).abs() < 1e-9);

        let heavy = Tariff { traffic_factor: 1.5, ..tariff };
        let result = estimate(&fallback_request(5.0, heavy));
        assert!((result.time_minutes - 18.0).abs() < 1e-9);
    }

    #[test]
    fn unresolved_endpoints_use_fallback_exactly() {
        let result = estimate(&fallback_request(7.25, Tariff::default()));
        assert_eq!(result.distance_km, 7.25);
        assert_eq!(result.source, DistanceSource::Fallback);
        assert!(result.resolved_points().is_empty());
    }

    #[test]
    fn one_resolved_endpoint_still_uses_fallback() {
        let mut req = fallback_request(3.0, Tariff::default());
        req.start = Some(Coordinate::new(-23.5505, -46.6333));
        let result = estimate(&req);
        assert_eq!(result.distance_km, 3.0);
        assert_eq!(result.resolved_points().len(), 1);
    }

    #[test]
    fn resolved_endpoints_use_haversine() {
        let form = RouteForm {
            pickup: "São Paulo".into(),
            dropoff: "rio de janeiro".into(),
            fallback_km: "5".into(),
            ..RouteForm::default()
        };
        let result = estimate(&form.to_request().unwrap());
        assert_eq!(result.source, DistanceSource::Haversine);
        assert!((360.0..=362.0).contains(&result.distance_km));
        assert_eq!(result.resolved_points().len(), 2);
    }

    #[test]
    fn invalid_speed_and_traffic_fall_back_to_defaults() {
        let tariff = Tariff {
            base_fare: -4.0,
            per_km_rate: f64::NAN,
            avg_speed_kmh: 0.0,
            traffic_factor: -2.0,
        };
        let result = estimate(&fallback_request(30.0, tariff));
        assert_eq!(result.price, 0.0);
        assert!((result.time_minutes - 60.0).abs() < 1e-9);
    }

    #[test]
    fn form_requires_both_addresses() {
        let form = RouteForm {
            pickup: "  ".into(),
            dropoff: "Recife".into(),
            ..RouteForm::default()
        };
        assert_eq!(
            form.to_request(),
            Err(FormError::MissingField("o endereço de coleta"))
        );

        let form = RouteForm {
            pickup: "Recife".into(),
            ..RouteForm::default()
        };
        assert_eq!(
            form.to_request(),
            Err(FormError::MissingField("o endereço de entrega"))
        );
    }

    #[test]
    fn form_coerces_numbers_leniently() {
        let form = RouteForm {
            pickup: "Rua A".into(),
            dropoff: "Rua B".into(),
            fallback_km: "4,5".into(),
            base_fare: "abc".into(),
            per_km_rate: " 2 ".into(),
            avg_speed_kmh: "".into(),
            traffic_factor: "1.2".into(),
            payment: PaymentMethod::Card,
        };
        let req = form.to_request().unwrap();
        assert_eq!(req.fallback_distance_km, 4.5);
        assert_eq!(req.tariff.base_fare, 0.0);
        assert_eq!(req.tariff.per_km_rate, 2.0);
        assert_eq!(req.tariff.avg_speed_kmh, DEFAULT_SPEED_KMH);
        assert_eq!(req.tariff.traffic_factor, 1.2);
        assert_eq!(req.payment, PaymentMethod::Card);
    }

    #[test]
    fn coerce_number_rejects_non_finite() {
        assert_eq!(coerce_number("inf", 3.0), 3.0);
        assert_eq!(coerce_number("NaN", 3.0), 3.0);
        assert_eq!(coerce_number("-1.5", 3.0), -1.5);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_fallback_distance_is_preserved(distance in 0.0f64..5_000.0) {
                let result = estimate(&fallback_request(distance, Tariff::default()));
                prop_assert_eq!(result.distance_km, distance);
            }

            #[test]
            fn prop_price_never_below_base(
                distance in 0.0f64..5_000.0,
                base in 0.0f64..100.0,
                rate in 0.0f64..20.0
            ) {
                let tariff = Tariff { base_fare: base, per_km_rate: rate, ..Tariff::default() };
                let result = estimate(&fallback_request(distance, tariff));
                prop_assert!(result.price >= base);
                prop_assert!(result.time_minutes >= 0.0);
            }
        }
    }
}
