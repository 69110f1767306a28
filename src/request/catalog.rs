//! Data providers the wizard consumes: fleet vehicles, issue categories,
//! the device's current location and photo capture.

use super::config::{LocationConfig, PhotoConfig};
use super::form::{Coordinates, LocationKind, ServiceLocation, Vehicle, VehicleStatus};

pub trait VehicleProvider {
    fn vehicles(&self) -> Vec<Vehicle>;
}

pub trait LocationProvider {
    fn current_location(&self) -> ServiceLocation;
}

/// Source of image references for the Photos step
pub trait PhotoProvider {
    /// Take a new photo given the photos already attached
    fn capture(&self, existing: &[String]) -> Option<String>;
    fn from_gallery(&self, existing: &[String]) -> Option<String>;
}

/// Service categories and the subcategories offered under each
pub const ISSUE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Tire Service",
        &[
            "Flat Tire",
            "Tire Rotation",
            "Tire Replacement",
            "Tire Pressure Check",
            "Wheel Alignment",
            "Wheel Balancing",
        ],
    ),
    (
        "Engine Service",
        &[
            "Oil Change",
            "Engine Diagnostic",
            "Engine Repair",
            "Coolant System",
            "Air Filter",
            "Spark Plugs",
        ],
    ),
    (
        "Brake Service",
        &[
            "Brake Inspection",
            "Brake Pad Replacement",
            "Brake Fluid",
            "Brake Rotor Service",
            "Emergency Brake",
        ],
    ),
    (
        "Electrical",
        &[
            "Battery Service",
            "Alternator",
            "Starter Motor",
            "Lighting Issues",
            "Fuse Replacement",
            "Wiring Issues",
        ],
    ),
    (
        "Body & Paint",
        &[
            "Dent Repair",
            "Scratch Repair",
            "Paint Touch-up",
            "Windshield Repair",
            "Mirror Replacement",
        ],
    ),
    (
        "Other",
        &[
            "AC/Heating",
            "Transmission",
            "Suspension",
            "Exhaust System",
            "General Inspection",
            "Custom Request",
        ],
    ),
];

pub fn issue_categories() -> Vec<String> {
    ISSUE_CATEGORIES.iter().map(|(name, _)| name.to_string()).collect()
}

pub fn issue_subcategories(category: &str) -> Vec<String> {
    ISSUE_CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, subs)| subs.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

/// Vehicle status filter on the Vehicle step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Maintenance,
}

impl StatusFilter {
    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Maintenance => "maintenance",
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Maintenance,
            StatusFilter::Maintenance => StatusFilter::All,
        }
    }

    pub fn allows(&self, status: VehicleStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == VehicleStatus::Active,
            StatusFilter::Maintenance => status == VehicleStatus::Maintenance,
        }
    }
}

/// Apply the status filter, then the search query
pub fn filter_vehicles<'a>(vehicles: &'a [Vehicle], query: &str, status: StatusFilter) -> Vec<&'a Vehicle> {
    vehicles
        .iter()
        .filter(|v| status.allows(v.status))
        .filter(|v| query.is_empty() || v.matches(query))
        .collect()
}

/// Vehicles from config, or the demo fleet when none are configured
pub struct ConfigVehicles {
    vehicles: Vec<Vehicle>,
}

impl ConfigVehicles {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        let vehicles = if vehicles.is_empty() { demo_fleet() } else { vehicles };
        Self { vehicles }
    }
}

impl VehicleProvider for ConfigVehicles {
    fn vehicles(&self) -> Vec<Vehicle> {
        self.vehicles.clone()
    }
}

/// Fixed "current location" from config
pub struct FixedLocation {
    location: ServiceLocation,
}

impl From<&LocationConfig> for FixedLocation {
    fn from(config: &LocationConfig) -> Self {
        Self {
            location: ServiceLocation {
                kind: LocationKind::Current,
                address: config.current_address.clone(),
                coordinates: Some(Coordinates {
                    latitude: config.latitude,
                    longitude: config.longitude,
                }),
            },
        }
    }
}

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> ServiceLocation {
        self.location.clone()
    }
}

/// Cycles through configured sample references
pub struct SamplePhotos {
    samples: Vec<String>,
}

impl From<&PhotoConfig> for SamplePhotos {
    fn from(config: &PhotoConfig) -> Self {
        Self {
            samples: config.samples.clone(),
        }
    }
}

impl SamplePhotos {
    fn pick(&self, idx: usize) -> Option<String> {
        if self.samples.is_empty() {
            return None;
        }
        self.samples.get(idx % self.samples.len()).cloned()
    }
}

impl PhotoProvider for SamplePhotos {
    fn capture(&self, existing: &[String]) -> Option<String> {
        self.pick(existing.len())
    }

    fn from_gallery(&self, existing: &[String]) -> Option<String> {
        self.pick(existing.len() + 1)
    }
}

fn demo_vehicle(
    id: &str,
    vin: &str,
    (make, model, year): (&str, &str, u16),
    license_plate: &str,
    mileage: u32,
    status: VehicleStatus,
    location: &str,
) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        vin: vin.to_string(),
        make: make.to_string(),
        model: model.to_string(),
        year,
        license_plate: license_plate.to_string(),
        mileage,
        status,
        location: location.to_string(),
    }
}

pub fn demo_fleet() -> Vec<Vehicle> {
    vec![
        demo_vehicle(
            "v1",
            "1HGBH41JXMN109186",
            ("Ford", "Transit 350", 2023),
            "FL-4521",
            28542,
            VehicleStatus::Active,
            "Tampa Depot",
        ),
        demo_vehicle(
            "v2",
            "1FTFW1ET5DFC98765",
            ("Ford", "F-150", 2022),
            "FL-7832",
            45231,
            VehicleStatus::Active,
            "Miami Office",
        ),
        demo_vehicle(
            "v3",
            "5NPE34AF4FH654321",
            ("Hyundai", "Sonata", 2024),
            "FL-9876",
            12450,
            VehicleStatus::Active,
            "Orlando Branch",
        ),
        demo_vehicle(
            "v4",
            "1C4RJFAG8FC123456",
            ("Jeep", "Grand Cherokee", 2023),
            "FL-5567",
            32100,
            VehicleStatus::Maintenance,
            "Jacksonville Facility",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_falls_back_to_demo_fleet() {
        let provider = ConfigVehicles::new(Vec::new());
        assert_eq!(provider.vehicles().len(), 4);
    }

    #[test]
    fn status_filter_then_search() {
        let fleet = demo_fleet();
        assert_eq!(filter_vehicles(&fleet, "", StatusFilter::All).len(), 4);
        assert_eq!(filter_vehicles(&fleet, "", StatusFilter::Maintenance).len(), 1);
        assert_eq!(filter_vehicles(&fleet, "ford", StatusFilter::Active).len(), 2);
        assert!(filter_vehicles(&fleet, "jeep", StatusFilter::Active).is_empty());
    }

    #[test]
    fn subcategories_belong_to_their_category() {
        assert_eq!(issue_categories().len(), 6);
        assert!(issue_subcategories("Brake Service").contains(&"Brake Fluid".to_string()));
        assert!(issue_subcategories("Billing").is_empty());
    }

    #[test]
    fn sample_photos_cycle_by_count() {
        let photos = SamplePhotos::from(&PhotoConfig {
            samples: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        });
        let existing = vec!["x".to_string(), "y".to_string()];
        assert_eq!(photos.capture(&existing).as_deref(), Some("c"));
        assert_eq!(photos.from_gallery(&existing).as_deref(), Some("a"));

        let none = SamplePhotos::from(&PhotoConfig { samples: Vec::new() });
        assert_eq!(none.capture(&existing), None);
    }

    #[test]
    fn current_location_uses_config_coordinates() {
        let location = FixedLocation::from(&LocationConfig::default()).current_location();
        assert_eq!(location.kind, LocationKind::Current);
        assert!(location.address.contains("Tampa"));
        assert!(location.coordinates.is_some());
    }
}
