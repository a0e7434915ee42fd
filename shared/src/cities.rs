//! Hardcoded coordinates for the cities the demo knows by name.

use crate::geo::Coordinate;

/// Lowercase city name → coordinate. Names keep their diacritics.
static CITY_TABLE: &[(&str, Coordinate)] = &[
    ("são paulo", Coordinate::new(-23.5505, -46.6333)),
    ("rio de janeiro", Coordinate::new(-22.9068, -43.1729)),
    ("belo horizonte", Coordinate::new(-19.9167, -43.9345)),
    ("brasília", Coordinate::new(-15.7939, -47.8828)),
    ("curitiba", Coordinate::new(-25.4284, -49.2733)),
    ("porto alegre", Coordinate::new(-30.0346, -51.2177)),
    ("florianópolis", Coordinate::new(-27.5954, -48.5480)),
    ("salvador", Coordinate::new(-12.9777, -38.5016)),
    ("recife", Coordinate::new(-8.0476, -34.8770)),
    ("fortaleza", Coordinate::new(-3.7319, -38.5267)),
    ("manaus", Coordinate::new(-3.1190, -60.0217)),
    ("belém", Coordinate::new(-1.4558, -48.4902)),
    ("goiânia", Coordinate::new(-16.6869, -49.2648)),
    ("campinas", Coordinate::new(-22.9099, -47.0626)),
    ("santos", Coordinate::new(-23.9608, -46.3336)),
    ("vitória", Coordinate::new(-20.3155, -40.3128)),
];

pub fn cities() -> impl Iterator<Item = (&'static str, Coordinate)> {
    CITY_TABLE.iter().copied()
}

/// Exact lookup; callers normalise the name first.
pub fn lookup_city(name: &str) -> Option<Coordinate> {
    CITY_TABLE
        .iter()
        .find(|(city, _)| *city == name)
        .map(|(_, coord)| *coord)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_keys_are_lowercase_and_trimmed() {
        for (name, _) in cities() {
            assert_eq!(name, name.trim());
            assert_eq!(name, name.to_lowercase());
        }
    }

    #[test]
    fn table_coordinates_are_valid() {
        assert!(cities().all(|(_, coord)| coord.is_valid()));
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(
            lookup_city("rio de janeiro"),
            Some(Coordinate::new(-22.9068, -43.1729))
        );
        assert_eq!(lookup_city("Rio de Janeiro"), None);
        assert_eq!(lookup_city("sao paulo"), None);
    }
}
