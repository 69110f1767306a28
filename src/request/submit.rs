use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::error::{RequestError, Result};
use super::form::{FormState, Priority, ServiceLocation};
use super::steps::StepId;

/// Receives a finished form. Stands in for the fleet backend's service-request endpoint.
pub trait SubmissionSink {
    fn submit(&self, form: &FormState) -> Result<SubmissionReceipt>;
}

/// What the collaborator hands back after accepting a request
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub request_id: Uuid,
    /// Where the payload ended up, if it was written anywhere
    pub path: Option<PathBuf>,
}

/// Wire shape of a submitted service request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestPayload {
    pub id: Uuid,
    pub vehicle_id: String,
    #[serde(rename = "vehicleVIN")]
    pub vehicle_vin: String,
    pub issue_category: String,
    pub issue_subcategory: String,
    pub priority: Priority,
    pub description: String,
    pub location: ServiceLocation,
    pub photos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&FormState> for ServiceRequestPayload {
    type Error = RequestError;

    fn try_from(form: &FormState) -> Result<Self> {
        let vehicle = form.vehicle.as_ref().ok_or(RequestError::Incomplete(StepId::Vehicle))?;
        let issue = form
            .issue
            .as_ref()
            .filter(|issue| issue.is_complete())
            .ok_or(RequestError::Incomplete(StepId::Issue))?;
        let location = form.location.clone().ok_or(RequestError::Incomplete(StepId::Location))?;

        Ok(Self {
            id: Uuid::new_v4(),
            vehicle_id: vehicle.id.clone(),
            vehicle_vin: vehicle.vin.clone(),
            issue_category: issue.category.clone().unwrap_or_default(),
            issue_subcategory: issue.subcategory.clone().unwrap_or_default(),
            priority: issue.priority,
            description: issue.description.trim().to_string(),
            location,
            photos: form.photos.clone(),
            preferred_date: form.preferred_date,
            notes: form.notes.clone().filter(|n| !n.trim().is_empty()),
            status: "submitted",
            created_at: Utc::now(),
        })
    }
}

/// Writes each request as `<id>.json` into a directory
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl SubmissionSink for JsonFileSink {
    fn submit(&self, form: &FormState) -> Result<SubmissionReceipt> {
        let payload = ServiceRequestPayload::try_from(form)?;
        std::fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(format!("{}.json", payload.id));
        let json = serde_json::to_string_pretty(&payload)?;
        std::fs::write(&path, json)?;
        info!("Wrote service request {} to {:?}", payload.id, path);

        Ok(SubmissionReceipt {
            request_id: payload.id,
            path: Some(path),
        })
    }
}

/// Dry run: validates and logs the payload, writes nothing
pub struct DryRunSink;

impl SubmissionSink for DryRunSink {
    fn submit(&self, form: &FormState) -> Result<SubmissionReceipt> {
        let payload = ServiceRequestPayload::try_from(form)?;
        info!("[dryrun] Would submit service request: {}", serde_json::to_string(&payload)?);
        Ok(SubmissionReceipt {
            request_id: payload.id,
            path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::form::{Issue, Vehicle, VehicleStatus};

    fn complete_form() -> FormState {
        FormState {
            vehicle: Some(Vehicle {
                id: "v2".to_string(),
                vin: "1FTFW1ET5DFC98765".to_string(),
                make: "Ford".to_string(),
                model: "F-150".to_string(),
                year: 2022,
                license_plate: "FL-7832".to_string(),
                mileage: 45231,
                status: VehicleStatus::Active,
                location: "Miami Office".to_string(),
            }),
            issue: Some(Issue {
                category: Some("Brake Service".to_string()),
                subcategory: Some("Brake Inspection".to_string()),
                priority: Priority::High,
                description: "  Grinding noise when stopping ".to_string(),
            }),
            location: Some(ServiceLocation::custom("Miami Office")),
            photos: vec!["brake.jpg".to_string()],
            preferred_date: NaiveDate::from_ymd_opt(2026, 11, 2),
            notes: Some(String::new()),
        }
    }

    #[test]
    fn payload_carries_form_fields() {
        let payload = ServiceRequestPayload::try_from(&complete_form()).unwrap();
        assert_eq!(payload.vehicle_id, "v2");
        assert_eq!(payload.issue_subcategory, "Brake Inspection");
        assert_eq!(payload.description, "Grinding noise when stopping");
        assert_eq!(payload.status, "submitted");
        assert!(payload.notes.is_none());
    }

    #[test]
    fn payload_names_the_first_missing_step() {
        let mut form = complete_form();
        form.location = None;
        let err = ServiceRequestPayload::try_from(&form).unwrap_err();
        assert!(matches!(err, RequestError::Incomplete(StepId::Location)));

        form.issue.as_mut().unwrap().category = None;
        let err = ServiceRequestPayload::try_from(&form).unwrap_err();
        assert!(matches!(err, RequestError::Incomplete(StepId::Issue)));
    }

    #[test]
    fn payload_serializes_in_camel_case() {
        let payload = ServiceRequestPayload::try_from(&complete_form()).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["vehicleVIN"], "1FTFW1ET5DFC98765");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["preferredDate"], "2026-11-02");
        assert_eq!(value["location"]["kind"], "custom");
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn json_sink_writes_one_file_per_request() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path().join("requests"));

        let receipt = sink.submit(&complete_form()).unwrap();
        let path = receipt.path.unwrap();
        assert_eq!(path.file_name().unwrap().to_string_lossy(), format!("{}.json", receipt.request_id));

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["id"], receipt.request_id.to_string());
        assert_eq!(written["photos"][0], "brake.jpg");
    }

    #[test]
    fn dry_run_sink_writes_nothing() {
        let receipt = DryRunSink.submit(&complete_form()).unwrap();
        assert!(receipt.path.is_none());
        assert!(DryRunSink.submit(&FormState::default()).is_err());
    }
}
