use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::steps::StepId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Maintenance,
    Inactive,
}

impl VehicleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "active",
            VehicleStatus::Maintenance => "maintenance",
            VehicleStatus::Inactive => "inactive",
        }
    }
}

/// A fleet vehicle that can be picked on the Vehicle step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: u16,
    pub license_plate: String,
    #[serde(default)]
    pub mileage: u32,
    pub status: VehicleStatus,
    /// Depot or branch the vehicle is based at
    #[serde(default)]
    pub location: String,
}

impl Vehicle {
    /// "2023 Ford Transit 350"
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }

    /// Case-insensitive match on make, model, plate or VIN
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.make, &self.model, &self.license_plate, &self.vin]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    /// Next priority, wrapping from Urgent back to Low
    pub fn cycle(&self) -> Self {
        let idx = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Issue classification. Fields fill in one at a time while the user works the step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Issue {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub priority: Priority,
    pub description: String,
}

impl Issue {
    pub fn is_complete(&self) -> bool {
        self.category.is_some() && self.subcategory.is_some() && !self.description.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    #[default]
    Current,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Where the technician should meet the vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLocation {
    pub kind: LocationKind,
    pub address: String,
    pub coordinates: Option<Coordinates>,
}

impl ServiceLocation {
    pub fn custom(address: impl Into<String>) -> Self {
        Self {
            kind: LocationKind::Custom,
            address: address.into(),
            coordinates: None,
        }
    }
}

/// Accumulated answers across all wizard steps
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FormState {
    pub vehicle: Option<Vehicle>,
    pub issue: Option<Issue>,
    pub location: Option<ServiceLocation>,
    pub photos: Vec<String>,
    pub preferred_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Replacement value for exactly one `FormState` field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Vehicle(Option<Vehicle>),
    Issue(Option<Issue>),
    Location(Option<ServiceLocation>),
    Photos(Vec<String>),
    PreferredDate(Option<NaiveDate>),
    Notes(Option<String>),
}

impl FieldUpdate {
    /// The step whose completion depends on this field
    pub fn step(&self) -> StepId {
        match self {
            FieldUpdate::Vehicle(_) => StepId::Vehicle,
            FieldUpdate::Issue(_) => StepId::Issue,
            FieldUpdate::Location(_) => StepId::Location,
            FieldUpdate::Photos(_) => StepId::Photos,
            FieldUpdate::PreferredDate(_) | FieldUpdate::Notes(_) => StepId::Review,
        }
    }
}

impl FormState {
    /// Shallow merge: replaces the named field and leaves every other field untouched
    pub fn merge(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Vehicle(vehicle) => self.vehicle = vehicle,
            FieldUpdate::Issue(issue) => self.issue = issue,
            FieldUpdate::Location(location) => self.location = location,
            FieldUpdate::Photos(photos) => self.photos = photos,
            FieldUpdate::PreferredDate(date) => self.preferred_date = date,
            FieldUpdate::Notes(notes) => self.notes = notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transit() -> Vehicle {
        Vehicle {
            id: "v1".to_string(),
            vin: "1HGBH41JXMN109186".to_string(),
            make: "Ford".to_string(),
            model: "Transit 350".to_string(),
            year: 2023,
            license_plate: "FL-4521".to_string(),
            mileage: 28542,
            status: VehicleStatus::Active,
            location: "Tampa Depot".to_string(),
        }
    }

    #[test]
    fn merge_replaces_only_the_named_field() {
        let mut form = FormState::default();
        form.merge(FieldUpdate::Photos(vec!["a.jpg".to_string()]));
        form.merge(FieldUpdate::Vehicle(Some(transit())));

        assert_eq!(form.photos, vec!["a.jpg".to_string()]);
        assert_eq!(form.vehicle, Some(transit()));
        assert!(form.issue.is_none());

        form.merge(FieldUpdate::Vehicle(None));
        assert!(form.vehicle.is_none());
        assert_eq!(form.photos.len(), 1);
    }

    #[test]
    fn issue_needs_category_subcategory_and_description() {
        let mut issue = Issue {
            category: Some("Tire Service".to_string()),
            subcategory: Some("Flat Tire".to_string()),
            ..Issue::default()
        };
        assert!(!issue.is_complete());

        issue.description = "   ".to_string();
        assert!(!issue.is_complete());

        issue.description = "Rear left tire is flat".to_string();
        assert!(issue.is_complete());

        issue.subcategory = None;
        assert!(!issue.is_complete());
    }

    #[test]
    fn vehicle_search_is_case_insensitive() {
        let vehicle = transit();
        assert!(vehicle.matches("transit"));
        assert!(vehicle.matches("fl-45"));
        assert!(vehicle.matches("mn109"));
        assert!(!vehicle.matches("jeep"));
    }

    #[test]
    fn priority_cycles_through_all_levels() {
        let mut priority = Priority::default();
        assert_eq!(priority, Priority::Medium);
        priority = priority.cycle();
        assert_eq!(priority, Priority::High);
        priority = priority.cycle().cycle();
        assert_eq!(priority, Priority::Low);
    }

    #[test]
    fn field_updates_map_to_their_steps() {
        assert_eq!(FieldUpdate::Vehicle(None).step(), StepId::Vehicle);
        assert_eq!(FieldUpdate::Photos(Vec::new()).step(), StepId::Photos);
        assert_eq!(FieldUpdate::Notes(None).step(), StepId::Review);
        assert_eq!(FieldUpdate::PreferredDate(None).step(), StepId::Review);
    }
}
