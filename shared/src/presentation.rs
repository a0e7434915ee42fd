//! Ports the core writes into. The frontend backs them with the DOM and the map
//! widget; tests back them with plain collections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::estimator::SimulationResult;
use crate::format::{format_currency, format_distance, format_duration};
use crate::geo::{Coordinate, RouteBounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DisplayRegion {
    HeroPrice,
    HeroEta,
    DetailDistance,
    DetailPrice,
    DetailEta,
    SummaryRoute,
    SummaryTotal,
    SummaryPayment,
    Status,
    SessionBadge,
    FormFeedback,
}

pub trait DisplayPort {
    fn set_text(&mut self, region: DisplayRegion, text: String);
}

pub trait MapPort {
    /// Markers for every point plus a line joining them, in order.
    fn show_points(&mut self, points: &[Coordinate]);
}

/// How the map should frame a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapViewport {
    Fit(RouteBounds),
    Center(Coordinate),
    Unchanged,
}

impl MapViewport {
    pub fn for_points(points: &[Coordinate]) -> Self {
        match points {
            [] => MapViewport::Unchanged,
            [single] => MapViewport::Center(*single),
            _ => RouteBounds::from_points(points)
                .map(MapViewport::Fit)
                .unwrap_or(MapViewport::Unchanged),
        }
    }
}

/// In-memory display, keyed by region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayBuffer {
    regions: BTreeMap<DisplayRegion, String>,
}

impl DisplayBuffer {
    pub fn get(&self, region: DisplayRegion) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }
}

impl DisplayPort for DisplayBuffer {
    fn set_text(&mut self, region: DisplayRegion, text: String) {
        self.regions.insert(region, text);
    }
}

/// Map port that remembers the last point set it was given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingMap {
    pub points: Vec<Coordinate>,
    pub updates: usize,
}

impl MapPort for RecordingMap {
    fn show_points(&mut self, points: &[Coordinate]) {
        self.points = points.to_vec();
        self.updates += 1;
    }
}

pub fn render_simulation(
    result: &SimulationResult,
    display: &mut impl DisplayPort,
    map: &mut impl MapPort,
) {
    let price = format_currency(result.price);
    let eta = format_duration(result.time_minutes);
    let distance = format_distance(result.distance_km);

    display.set_text(DisplayRegion::HeroPrice, price.clone());
    display.set_text(DisplayRegion::HeroEta, eta.clone());
    display.set_text(DisplayRegion::DetailDistance, distance.clone());
    display.set_text(DisplayRegion::DetailPrice, price.clone());
    display.set_text(DisplayRegion::DetailEta, eta.clone());
    display.set_text(
        DisplayRegion::SummaryRoute,
        format!("{} → {}", result.start_label, result.end_label),
    );
    display.set_text(
        DisplayRegion::SummaryTotal,
        format!("{price} · {distance} · {eta}"),
    );
    display.set_text(
        DisplayRegion::SummaryPayment,
        result.payment.label().to_string(),
    );

    map.show_points(&result.resolved_points());
}
