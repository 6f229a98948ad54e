//! Location registry — loads all forecast targets from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/locations/` is baked into the binary
//! at compile time via [`include_str!`]. Adding a new location is as simple as
//! creating a new TOML file and adding it to the list below.

use powdercast_forecast_models::Location;

/// TOML configs embedded at compile time.
const LOCATION_TOMLS: &[(&str, &str)] = &[
    (
        "palisades_tahoe",
        include_str!("../locations/palisades_tahoe.toml"),
    ),
    (
        "alpine_meadows",
        include_str!("../locations/alpine_meadows.toml"),
    ),
];

/// Total number of configured locations (used in tests).
#[cfg(test)]
const EXPECTED_LOCATION_COUNT: usize = 2;

/// Returns all configured forecast locations, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_locations() -> Vec<Location> {
    LOCATION_TOMLS
        .iter()
        .map(|(name, toml)| {
            toml::from_str(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_locations() {
        let locations = all_locations();
        assert_eq!(locations.len(), EXPECTED_LOCATION_COUNT);
    }

    #[test]
    fn location_slugs_are_unique() {
        let locations = all_locations();
        let mut slugs: Vec<&str> = locations.iter().map(|l| l.slug.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), EXPECTED_LOCATION_COUNT);
    }

    #[test]
    fn all_locations_have_required_fields() {
        for location in &all_locations() {
            assert!(!location.slug.is_empty(), "location slug is empty");
            assert!(!location.name.is_empty(), "location name is empty");
        }
    }
}
