//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

/// WGS84 coordinate pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components lie in their valid WGS84 ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Format as `lat, lon` with four decimals
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// OpenStreetMap link centered on these coordinates
    #[must_use]
    pub fn map_link(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={:.4}&mlon={:.4}#map=11/{:.4}/{:.4}",
            self.latitude, self.longitude, self.latitude, self.longitude
        )
    }
}

/// A named place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    pub coordinates: Coordinates,
    /// Location name (city, region, etc.)
    pub name: String,
    /// Country name as reported by the geocoder
    pub country: Option<String>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            coordinates: Coordinates::new(latitude, longitude),
            name,
            country: None,
        }
    }

    /// Create location with country
    #[must_use]
    pub fn with_country(latitude: f64, longitude: f64, name: String, country: String) -> Self {
        Self {
            coordinates: Coordinates::new(latitude, longitude),
            name,
            country: Some(country),
        }
    }

    /// Unnamed location, labelled by its coordinates
    #[must_use]
    pub fn from_coordinates(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            name: coordinates.format(),
            country: None,
        }
    }

    /// Name with country appended when known
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates::new(46.8182, 8.2275).is_valid());
        assert!(Coordinates::new(-90.0, 180.0).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
    }

    #[test]
    fn test_location_from_coordinates() {
        let location = Location::from_coordinates(Coordinates::new(46.8182, 8.2275));
        assert_eq!(location.name, "46.8182, 8.2275");
        assert_eq!(location.display_name(), "46.8182, 8.2275");
    }

    #[test]
    fn test_display_name_with_country() {
        let location = Location::with_country(
            52.52,
            13.41,
            "Berlin".to_string(),
            "Germany".to_string(),
        );
        assert_eq!(location.display_name(), "Berlin, Germany");
    }

    #[test]
    fn test_map_link() {
        let link = Coordinates::new(52.52, 13.405).map_link();
        assert_eq!(
            link,
            "https://www.openstreetmap.org/?mlat=52.5200&mlon=13.4050#map=11/52.5200/13.4050"
        );
    }
}
