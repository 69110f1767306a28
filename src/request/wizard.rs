//! Step/validation state machine behind the service request screen.
//!
//! The controller owns the active step and the accumulated form. Forward
//! navigation is gated on the active step's completion predicate, jumps may
//! reach any earlier step or the immediate next one, and every rejected
//! transition leaves the state exactly as it was.

use thiserror::Error;
use tracing::{debug, info};

use super::error::RequestError;
use super::form::{FieldUpdate, FormState};
use super::steps::{StepId, StepStatus};
use super::submit::{SubmissionReceipt, SubmissionSink};

/// A navigation request the controller refused. Never fatal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavError {
    #[error("Complete the {0} step first")]
    Incomplete(StepId),

    #[error("Already at the last step")]
    AtLastStep,

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("Cannot jump from {current} to {target}")]
    OutOfReach { current: StepId, target: StepId },

    #[error("Requests can only be submitted from the Review step")]
    NotAtReview,
}

/// Why `submit` did not go through
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Navigation(#[from] NavError),

    #[error(transparent)]
    Rejected(#[from] RequestError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardController {
    active: StepId,
    form: FormState,
}

impl WizardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_step(&self) -> StepId {
        self.active
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn is_complete(&self, step: StepId) -> bool {
        step.predicate()(&self.form)
    }

    pub fn can_advance(&self) -> bool {
        self.active.next().is_some() && self.is_complete(self.active)
    }

    pub fn can_retreat(&self) -> bool {
        self.active.prev().is_some()
    }

    /// Index rule only: completion of the current or target step is not consulted
    pub fn can_jump_to(&self, step: StepId) -> bool {
        step.index() <= self.active.index() + 1
    }

    pub fn can_submit(&self) -> bool {
        self.active == StepId::last() && self.is_complete(self.active)
    }

    pub fn advance(&mut self) -> Result<StepId, NavError> {
        let next = self.active.next().ok_or(NavError::AtLastStep)?;
        if !self.is_complete(self.active) {
            return Err(NavError::Incomplete(self.active));
        }
        self.move_to(next);
        Ok(next)
    }

    pub fn retreat(&mut self) -> Result<StepId, NavError> {
        let prev = self.active.prev().ok_or(NavError::AtFirstStep)?;
        self.move_to(prev);
        Ok(prev)
    }

    pub fn jump_to(&mut self, step: StepId) -> Result<StepId, NavError> {
        if !self.can_jump_to(step) {
            return Err(NavError::OutOfReach {
                current: self.active,
                target: step,
            });
        }
        if step != self.active {
            self.move_to(step);
        }
        Ok(step)
    }

    /// Replace one form field. Returns the step whose completion the field feeds.
    pub fn update_field(&mut self, update: FieldUpdate) -> StepId {
        let step = update.step();
        let was_complete = self.is_complete(step);
        self.form.merge(update);
        let now_complete = self.is_complete(step);
        if was_complete != now_complete {
            debug!("{} step complete: {}", step, now_complete);
        }
        step
    }

    /// Apply several field updates in order
    pub fn update_fields<I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = FieldUpdate>,
    {
        for update in updates {
            self.update_field(update);
        }
    }

    pub fn step_statuses(&self) -> Vec<StepStatus> {
        StepId::ALL
            .iter()
            .map(|&step| StepStatus {
                step,
                complete: self.is_complete(step),
                active: step == self.active,
                reachable: self.can_jump_to(step),
            })
            .collect()
    }

    /// Fraction of the wizard reached, counting the active step
    pub fn progress(&self) -> f64 {
        (self.active.index() + 1) as f64 / StepId::COUNT as f64
    }

    /// Hand the form to `sink`. The wizard resets only if the sink accepts it.
    pub fn submit<S>(&mut self, sink: &S) -> Result<SubmissionReceipt, SubmitError>
    where
        S: SubmissionSink + ?Sized,
    {
        if !self.can_submit() {
            return Err(NavError::NotAtReview.into());
        }
        let receipt = sink.submit(&self.form)?;
        info!("Service request {} submitted", receipt.request_id);
        self.reset();
        Ok(receipt)
    }

    /// Discard all answers and return to the first step
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn move_to(&mut self, step: StepId) {
        debug!("Wizard step {} -> {}", self.active, step);
        self.active = step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::error::Result;
    use crate::request::form::{Issue, ServiceLocation, Vehicle, VehicleStatus};
    use std::cell::RefCell;
    use uuid::Uuid;

    fn sonata() -> Vehicle {
        Vehicle {
            id: "v3".to_string(),
            vin: "5NPE34AF4FH654321".to_string(),
            make: "Hyundai".to_string(),
            model: "Sonata".to_string(),
            year: 2024,
            license_plate: "FL-9876".to_string(),
            mileage: 12450,
            status: VehicleStatus::Active,
            location: "Orlando Branch".to_string(),
        }
    }

    fn flat_tire() -> Issue {
        Issue {
            category: Some("Tire Service".to_string()),
            subcategory: Some("Flat Tire".to_string()),
            description: "Front right is flat".to_string(),
            ..Issue::default()
        }
    }

    fn at_review() -> WizardController {
        let mut wizard = WizardController::new();
        wizard.update_field(FieldUpdate::Vehicle(Some(sonata())));
        wizard.advance().unwrap();
        wizard.update_field(FieldUpdate::Issue(Some(flat_tire())));
        wizard.advance().unwrap();
        wizard.update_field(FieldUpdate::Location(Some(ServiceLocation::custom("Orlando Branch"))));
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.active_step(), StepId::Review);
        wizard
    }

    #[derive(Default)]
    struct RecordingSink {
        seen: RefCell<Vec<FormState>>,
        fail: bool,
    }

    impl SubmissionSink for RecordingSink {
        fn submit(&self, form: &FormState) -> Result<SubmissionReceipt> {
            if self.fail {
                return Err(RequestError::Submission("backend unavailable".to_string()));
            }
            self.seen.borrow_mut().push(form.clone());
            Ok(SubmissionReceipt {
                request_id: Uuid::new_v4(),
                path: None,
            })
        }
    }

    #[test]
    fn advance_is_blocked_without_a_vehicle() {
        let mut wizard = WizardController::new();
        assert_eq!(wizard.advance(), Err(NavError::Incomplete(StepId::Vehicle)));
        assert_eq!(wizard.active_step(), StepId::Vehicle);
    }

    #[test]
    fn selecting_a_vehicle_unlocks_issue() {
        let mut wizard = WizardController::new();
        wizard.update_field(FieldUpdate::Vehicle(Some(sonata())));
        assert_eq!(wizard.advance(), Ok(StepId::Issue));
        assert_eq!(wizard.active_step(), StepId::Issue);
    }

    #[test]
    fn partial_issue_does_not_advance() {
        let mut wizard = WizardController::new();
        wizard.update_field(FieldUpdate::Vehicle(Some(sonata())));
        wizard.advance().unwrap();

        let mut issue = flat_tire();
        issue.description.clear();
        wizard.update_field(FieldUpdate::Issue(Some(issue)));
        assert!(!wizard.can_advance());
        assert_eq!(wizard.advance(), Err(NavError::Incomplete(StepId::Issue)));
        assert_eq!(wizard.active_step(), StepId::Issue);
    }

    #[test]
    fn retreat_from_review_lands_on_photos() {
        let mut wizard = at_review();
        assert_eq!(wizard.retreat(), Ok(StepId::Photos));
    }

    #[test]
    fn retreat_at_first_step_is_rejected() {
        let mut wizard = WizardController::new();
        assert_eq!(wizard.retreat(), Err(NavError::AtFirstStep));
        assert_eq!(wizard, WizardController::new());
    }

    #[test]
    fn advance_at_last_step_is_rejected() {
        let mut wizard = at_review();
        let before = wizard.clone();
        assert_eq!(wizard.advance(), Err(NavError::AtLastStep));
        assert_eq!(wizard, before);
    }

    #[test]
    fn jump_allows_the_next_step_even_when_incomplete() {
        let mut wizard = WizardController::new();
        assert!(wizard.can_jump_to(StepId::Issue));
        assert_eq!(wizard.jump_to(StepId::Issue), Ok(StepId::Issue));
        assert!(!wizard.is_complete(StepId::Issue));
        assert_eq!(wizard.jump_to(StepId::Location), Ok(StepId::Location));
    }

    #[test]
    fn jump_past_the_next_step_is_rejected() {
        let mut wizard = WizardController::new();
        wizard.update_field(FieldUpdate::Vehicle(Some(sonata())));
        let before = wizard.clone();
        assert_eq!(
            wizard.jump_to(StepId::Location),
            Err(NavError::OutOfReach {
                current: StepId::Vehicle,
                target: StepId::Location,
            })
        );
        assert_eq!(wizard, before);
    }

    #[test]
    fn jump_back_to_any_earlier_step() {
        let mut wizard = at_review();
        assert_eq!(wizard.jump_to(StepId::Vehicle), Ok(StepId::Vehicle));
        assert_eq!(wizard.form().vehicle, Some(sonata()));
    }

    #[test]
    fn jump_to_active_step_changes_nothing() {
        let mut wizard = at_review();
        wizard.retreat().unwrap();
        let before = wizard.clone();
        assert_eq!(wizard.jump_to(StepId::Photos), Ok(StepId::Photos));
        assert_eq!(wizard, before);
    }

    #[test]
    fn updates_fold_in_order() {
        let mut wizard = WizardController::new();
        let updates = vec![
            FieldUpdate::Photos(vec!["a.jpg".to_string()]),
            FieldUpdate::Notes(Some("gate code 4411".to_string())),
            FieldUpdate::Photos(vec!["a.jpg".to_string(), "b.jpg".to_string()]),
            FieldUpdate::Notes(None),
            FieldUpdate::Vehicle(Some(sonata())),
        ];

        let mut expected = FormState::default();
        for update in updates.clone() {
            expected.merge(update);
        }

        wizard.update_fields(updates);
        assert_eq!(wizard.form(), &expected);
        assert_eq!(wizard.form().photos.len(), 2);
        assert!(wizard.form().notes.is_none());
        assert_eq!(wizard.active_step(), StepId::Vehicle);
    }

    #[test]
    fn update_field_reports_the_affected_step() {
        let mut wizard = WizardController::new();
        assert_eq!(wizard.update_field(FieldUpdate::Issue(Some(flat_tire()))), StepId::Issue);
        assert!(wizard.is_complete(StepId::Issue));
        assert_eq!(wizard.update_field(FieldUpdate::Location(None)), StepId::Location);
    }

    #[test]
    fn step_statuses_mark_active_and_reachable() {
        let mut wizard = WizardController::new();
        wizard.update_field(FieldUpdate::Vehicle(Some(sonata())));
        let statuses = wizard.step_statuses();

        assert_eq!(statuses.len(), StepId::COUNT);
        assert!(statuses[0].active && statuses[0].complete);
        assert!(statuses[1].reachable && !statuses[1].complete);
        assert!(!statuses[2].reachable);
        assert!(statuses[3].complete && !statuses[3].reachable);
        assert_eq!(statuses[0].marker(), "[>]");
        assert_eq!(statuses[1].marker(), "[ ]");
        assert_eq!(statuses[2].marker(), "[#]");
    }

    #[test]
    fn progress_counts_the_active_step() {
        let mut wizard = WizardController::new();
        assert!((wizard.progress() - 0.2).abs() < f64::EPSILON);
        wizard.jump_to(StepId::Issue).unwrap();
        assert!((wizard.progress() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn submit_is_rejected_before_review() {
        let mut wizard = at_review();
        wizard.retreat().unwrap();
        let sink = RecordingSink::default();

        let err = wizard.submit(&sink).unwrap_err();
        assert!(matches!(err, SubmitError::Navigation(NavError::NotAtReview)));
        assert!(sink.seen.borrow().is_empty());
        assert_eq!(wizard.active_step(), StepId::Photos);
    }

    #[test]
    fn submit_hands_off_the_form_and_resets() {
        let mut wizard = at_review();
        let expected = wizard.form().clone();
        let sink = RecordingSink::default();

        wizard.submit(&sink).unwrap();
        assert_eq!(sink.seen.borrow().as_slice(), &[expected]);
        assert_eq!(wizard, WizardController::new());
    }

    #[test]
    fn failed_submission_keeps_the_form() {
        let mut wizard = at_review();
        let before = wizard.clone();
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };

        let err = wizard.submit(&sink).unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(RequestError::Submission(_))));
        assert_eq!(wizard, before);
    }
}
