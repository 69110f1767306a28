mod catalog;
mod config;
mod error;
mod form;
mod steps;
mod submit;
pub mod ui;
mod widgets;
mod wizard;

pub use catalog::{
    ConfigVehicles, FixedLocation, LocationProvider, PhotoProvider, SamplePhotos, StatusFilter,
    VehicleProvider, demo_fleet, filter_vehicles, issue_categories, issue_subcategories,
};
pub use config::{GeneralConfig, LocationConfig, PhotoConfig, RequestConfig, SubmissionConfig};
pub use error::{RequestError, Result};
pub use form::{
    Coordinates, FieldUpdate, FormState, Issue, LocationKind, Priority, ServiceLocation, Vehicle,
    VehicleStatus,
};
pub use steps::{CompletionPredicate, StepId, StepStatus};
pub use submit::{DryRunSink, JsonFileSink, ServiceRequestPayload, SubmissionReceipt, SubmissionSink};
pub use widgets::StatusBarState;
pub use wizard::{NavError, SubmitError, WizardController};

use crate::ui::Theme;
use crate::vim::{Command, InputBuffer, ModeAction, VimMode, parse_command};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

/// Info messages disappear after this many ticks
const MESSAGE_TTL_TICKS: u8 = 12;

/// Actions the event loop carries out on behalf of the app
#[derive(Debug, PartialEq, Eq)]
pub enum RequestAction {
    /// Hand the finished request to the submission sink
    Submit,
    /// Leave the program
    Exit,
}

/// Which panel is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Step list on the left
    Sidebar,
    /// Fields of the active step
    Content,
}

/// Focusable fields, per step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    VehicleSearch,
    VehicleList,
    Category,
    Subcategory,
    Priority,
    Description,
    LocationKind,
    Address,
    PhotoList,
    Notes,
    PreferredDate,
    SubmitButton,
}

impl Field {
    pub fn for_step(step: StepId) -> &'static [Field] {
        match step {
            StepId::Vehicle => &[Field::VehicleSearch, Field::VehicleList],
            StepId::Issue => &[Field::Category, Field::Subcategory, Field::Priority, Field::Description],
            StepId::Location => &[Field::LocationKind, Field::Address],
            StepId::Photos => &[Field::PhotoList],
            StepId::Review => &[Field::Notes, Field::PreferredDate, Field::SubmitButton],
        }
    }

    /// Fields edited through an `InputBuffer` in insert mode
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Field::VehicleSearch | Field::Description | Field::Address | Field::Notes | Field::PreferredDate
        )
    }

    fn is_list(&self) -> bool {
        matches!(
            self,
            Field::VehicleList | Field::Category | Field::Subcategory | Field::PhotoList
        )
    }
}

/// Confirm dialog state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Submit,
    /// Throw away the request in progress and start over
    Discard,
    Quit,
}

/// Message displayed to the user
pub struct Message {
    pub text: String,
    pub is_error: bool,
    ticks_left: u8,
}

/// The service request screen. Owns the wizard and all per-field drafts.
pub struct ServiceRequestApp {
    pub config: RequestConfig,
    pub theme: Theme,
    pub wizard: WizardController,

    // Vim mode state
    pub vim_mode: VimMode,
    pub command_buffer: InputBuffer,

    // Panel navigation
    pub panel_focus: PanelFocus,
    pub sidebar_cursor: usize,
    pub field_idx: usize,

    // Vehicle step
    pub fleet: Vec<Vehicle>,
    pub vehicle_query: InputBuffer,
    pub status_filter: StatusFilter,
    pub vehicle_cursor: usize,

    // Issue step
    pub category_cursor: usize,
    pub subcategory_cursor: usize,
    pub issue_category: Option<String>,
    pub issue_subcategory: Option<String>,
    pub issue_priority: Priority,
    pub description: InputBuffer,

    // Location step
    pub location_kind: LocationKind,
    pub custom_address: InputBuffer,

    // Photos step
    pub photo_cursor: usize,

    // Review step
    pub notes: InputBuffer,
    pub preferred_date: InputBuffer,

    // UI state
    pub message: Option<Message>,
    pub confirm_action: Option<ConfirmAction>,
    pub show_help: bool,
    pub should_exit: bool,
    pub last_receipt: Option<SubmissionReceipt>,
    pub status_bar: StatusBarState,

    location_provider: Box<dyn LocationProvider>,
    photo_provider: Box<dyn PhotoProvider>,
    sink: Box<dyn SubmissionSink>,
}

impl ServiceRequestApp {
    /// Build the app with providers and sink derived from config
    pub fn new(config: RequestConfig) -> Self {
        let vehicles = ConfigVehicles::new(config.vehicles.clone());
        let location = Box::new(FixedLocation::from(&config.location));
        let photos = Box::new(SamplePhotos::from(&config.photos));
        let sink: Box<dyn SubmissionSink> = if config.general.dryrun {
            Box::new(DryRunSink)
        } else {
            Box::new(JsonFileSink::new(&config.submission.output_dir))
        };
        Self::with_providers(config, &vehicles, location, photos, sink)
    }

    pub fn with_providers(
        config: RequestConfig,
        vehicles: &dyn VehicleProvider,
        location_provider: Box<dyn LocationProvider>,
        photo_provider: Box<dyn PhotoProvider>,
        sink: Box<dyn SubmissionSink>,
    ) -> Self {
        let fleet = vehicles.vehicles();
        info!("Loaded {} fleet vehicles", fleet.len());

        let mut app = Self {
            config,
            theme: Theme::default(),
            wizard: WizardController::new(),
            vim_mode: VimMode::Normal,
            command_buffer: InputBuffer::new(),
            panel_focus: PanelFocus::Content,
            sidebar_cursor: 0,
            field_idx: 0,
            fleet,
            vehicle_query: InputBuffer::new(),
            status_filter: StatusFilter::All,
            vehicle_cursor: 0,
            category_cursor: 0,
            subcategory_cursor: 0,
            issue_category: None,
            issue_subcategory: None,
            issue_priority: Priority::default(),
            description: InputBuffer::new(),
            location_kind: LocationKind::Current,
            custom_address: InputBuffer::new(),
            photo_cursor: 0,
            notes: InputBuffer::new(),
            preferred_date: InputBuffer::new(),
            message: None,
            confirm_action: None,
            show_help: false,
            should_exit: false,
            last_receipt: None,
            status_bar: StatusBarState::default(),
            location_provider,
            photo_provider,
            sink,
        };
        app.update_status_bar();
        app
    }

    pub fn is_dryrun(&self) -> bool {
        self.config.general.dryrun
    }

    pub fn active_step(&self) -> StepId {
        self.wizard.active_step()
    }

    pub fn current_field(&self) -> Field {
        let fields = Field::for_step(self.active_step());
        fields[self.field_idx.min(fields.len() - 1)]
    }

    pub fn filtered_vehicles(&self) -> Vec<&Vehicle> {
        filter_vehicles(&self.fleet, self.vehicle_query.content(), self.status_filter)
    }

    pub fn subcategories(&self) -> Vec<String> {
        self.issue_category
            .as_deref()
            .map(issue_subcategories)
            .unwrap_or_default()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<RequestAction> {
        // Errors stay until the next key, info messages also expire on tick
        if self.message.is_some() {
            self.message = None;
        }

        if let Some(action) = self.confirm_action {
            let result = self.handle_confirm_key(key, action);
            self.update_status_bar();
            return result;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                self.show_help = false;
            }
            self.update_status_bar();
            return None;
        }

        let result = match self.vim_mode {
            VimMode::Normal => self.handle_normal_mode(key),
            VimMode::Insert => self.handle_insert_mode(key),
            VimMode::Command => self.handle_command_mode(key),
        };

        self.update_status_bar();
        result
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<RequestAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('h') => self.focus_sidebar(),
                KeyCode::Char('l') => self.focus_content(),
                KeyCode::Char('n') => self.advance(),
                KeyCode::Char('p') => self.retreat(),
                KeyCode::Char('c') => self.confirm_action = Some(ConfirmAction::Quit),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char(':') => {
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterCommand);
                self.command_buffer.clear();
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = true;
            }
            KeyCode::Char(']') => self.advance(),
            KeyCode::Char('[') => self.retreat(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let num = c.to_digit(10).unwrap_or(0) as usize;
                if let Some(step) = num.checked_sub(1).and_then(StepId::from_index) {
                    self.jump_to(step);
                }
            }
            _ => match self.panel_focus {
                PanelFocus::Sidebar => self.handle_sidebar_key(key),
                PanelFocus::Content => return self.handle_content_key(key),
            },
        }
        None
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.sidebar_cursor < StepId::COUNT - 1 {
                    self.sidebar_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if let Some(step) = StepId::from_index(self.sidebar_cursor) {
                    if step == self.active_step() {
                        self.focus_content();
                    } else {
                        self.jump_to(step);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_content_key(&mut self, key: KeyEvent) -> Option<RequestAction> {
        let field = self.current_field();

        match key.code {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => self.focus_sidebar(),
            KeyCode::Tab => self.next_field(),
            KeyCode::BackTab => self.prev_field(),
            KeyCode::Char('j') | KeyCode::Down => {
                if field.is_list() {
                    self.move_list_cursor(field, 1);
                } else {
                    self.next_field();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if field.is_list() {
                    self.move_list_cursor(field, -1);
                } else {
                    self.prev_field();
                }
            }
            KeyCode::Char('i') | KeyCode::Char('a') if field.is_text() => {
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
            }
            KeyCode::Char('/') if self.active_step() == StepId::Vehicle => {
                self.field_idx = 0;
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
            }
            KeyCode::Char('f') if self.active_step() == StepId::Vehicle => {
                self.status_filter = self.status_filter.cycle();
                self.vehicle_cursor = 0;
            }
            KeyCode::Char('r') if field == Field::LocationKind => {
                self.set_location_kind(LocationKind::Current);
            }
            KeyCode::Char('c') if field == Field::PhotoList => self.capture_photo(false),
            KeyCode::Char('g') if field == Field::PhotoList => self.capture_photo(true),
            KeyCode::Char('d') | KeyCode::Char('x') if field == Field::PhotoList => self.delete_photo(),
            KeyCode::Char(' ') => match field {
                Field::Priority => self.cycle_priority(),
                Field::LocationKind => self.toggle_location_kind(),
                _ => {}
            },
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => return self.activate_field(field),
            _ => {}
        }
        None
    }

    /// Enter on a field in normal mode
    fn activate_field(&mut self, field: Field) -> Option<RequestAction> {
        match field {
            _ if field.is_text() => {
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
            }
            Field::VehicleList => self.select_vehicle(),
            Field::Category => self.select_category(),
            Field::Subcategory => self.select_subcategory(),
            Field::Priority => self.cycle_priority(),
            Field::LocationKind => match self.location_kind {
                LocationKind::Current => self.set_location_kind(LocationKind::Current),
                LocationKind::Custom => self.next_field(),
            },
            Field::PhotoList => self.advance(),
            Field::SubmitButton => {
                if self.ready_to_submit() {
                    self.confirm_action = Some(ConfirmAction::Submit);
                } else if !self.wizard.can_submit() {
                    self.set_error(NavError::NotAtReview.to_string());
                } else if let Some(step) = self.first_incomplete_step() {
                    self.set_error(RequestError::Incomplete(step).to_string());
                }
            }
            _ => {}
        }
        None
    }

    fn handle_insert_mode(&mut self, key: KeyEvent) -> Option<RequestAction> {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
            }
            KeyCode::Enter => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                self.commit_text_field();
            }
            KeyCode::Tab => {
                self.next_field();
                let text = self.current_field().is_text();
                self.vim_mode = self.vim_mode.transition(ModeAction::FocusField { text });
            }
            KeyCode::BackTab => {
                self.prev_field();
                let text = self.current_field().is_text();
                self.vim_mode = self.vim_mode.transition(ModeAction::FocusField { text });
            }
            KeyCode::Backspace => self.edit_text(|buffer| {
                buffer.delete_back();
            }),
            KeyCode::Delete => self.edit_text(|buffer| {
                buffer.delete_forward();
            }),
            KeyCode::Left => self.edit_text(InputBuffer::move_left),
            KeyCode::Right => self.edit_text(InputBuffer::move_right),
            KeyCode::Home => self.edit_text(InputBuffer::move_start),
            KeyCode::End => self.edit_text(InputBuffer::move_end),
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    match c {
                        'u' => self.edit_text(InputBuffer::clear),
                        'w' => self.edit_text(InputBuffer::delete_word_back),
                        'a' => self.edit_text(InputBuffer::move_start),
                        'e' => self.edit_text(InputBuffer::move_end),
                        'h' => {
                            self.vim_mode = self.vim_mode.transition(ModeAction::Reset);
                            self.focus_sidebar();
                        }
                        _ => {}
                    }
                } else {
                    self.edit_text(|buffer| buffer.insert(c));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<RequestAction> {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                self.command_buffer.clear();
            }
            KeyCode::Enter => {
                let cmd = self.command_buffer.content().to_string();
                self.vim_mode = self.vim_mode.transition(ModeAction::Execute);
                self.command_buffer.clear();
                return self.execute_command(&cmd);
            }
            KeyCode::Backspace => {
                if self.command_buffer.is_empty() {
                    self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                } else {
                    self.command_buffer.delete_back();
                }
            }
            KeyCode::Char(c) => {
                self.command_buffer.insert(c);
            }
            _ => {}
        }
        None
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, action: ConfirmAction) -> Option<RequestAction> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.confirm_action = None;
                match action {
                    ConfirmAction::Submit => return Some(RequestAction::Submit),
                    ConfirmAction::Discard => {
                        self.reset();
                        self.set_info("Request discarded".to_string());
                    }
                    ConfirmAction::Quit => {
                        self.should_exit = true;
                        return Some(RequestAction::Exit);
                    }
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_action = None;
            }
            _ => {}
        }
        None
    }

    fn execute_command(&mut self, cmd: &str) -> Option<RequestAction> {
        let command = match parse_command(cmd) {
            Ok(command) => command,
            Err(e) => {
                self.set_error(e.to_string());
                return None;
            }
        };

        match command {
            Command::Next => self.advance(),
            Command::Prev => self.retreat(),
            Command::Jump(step) => self.jump_to(step),
            Command::Submit => return Some(RequestAction::Submit),
            Command::Photo(reference) => self.attach_photo(reference),
            Command::Date(value) => {
                self.preferred_date.set(value.as_deref().unwrap_or(""));
                self.sync_preferred_date();
            }
            Command::Notes(value) => {
                self.notes.set(value.as_deref().unwrap_or(""));
                self.sync_notes();
            }
            Command::Cancel => self.confirm_action = Some(ConfirmAction::Discard),
            Command::Quit => self.confirm_action = Some(ConfirmAction::Quit),
            Command::Help => self.show_help = true,
        }
        None
    }

    // Navigation

    pub fn advance(&mut self) {
        let result = self.wizard.advance();
        self.after_navigation(result);
    }

    pub fn retreat(&mut self) {
        let result = self.wizard.retreat();
        self.after_navigation(result);
    }

    pub fn jump_to(&mut self, step: StepId) {
        let was = self.active_step();
        let result = self.wizard.jump_to(step);
        if result.is_ok() && step == was {
            self.focus_content();
            return;
        }
        self.after_navigation(result);
    }

    fn after_navigation(&mut self, result: std::result::Result<StepId, NavError>) {
        match result {
            Ok(step) => {
                self.field_idx = 0;
                self.sidebar_cursor = step.index();
                self.vim_mode = self.vim_mode.transition(ModeAction::Reset);
                self.focus_content();
            }
            Err(e) => {
                self.sidebar_cursor = self.active_step().index();
                self.set_error(e.to_string());
            }
        }
    }

    fn focus_sidebar(&mut self) {
        self.panel_focus = PanelFocus::Sidebar;
        self.sidebar_cursor = self.active_step().index();
    }

    fn focus_content(&mut self) {
        self.panel_focus = PanelFocus::Content;
    }

    fn next_field(&mut self) {
        let count = Field::for_step(self.active_step()).len();
        if self.field_idx + 1 < count {
            self.field_idx += 1;
        }
    }

    fn prev_field(&mut self) {
        self.field_idx = self.field_idx.saturating_sub(1);
    }

    fn move_list_cursor(&mut self, field: Field, delta: isize) {
        let (cursor, len) = match field {
            Field::VehicleList => {
                let len = self.filtered_vehicles().len();
                (&mut self.vehicle_cursor, len)
            }
            Field::Category => (&mut self.category_cursor, catalog::ISSUE_CATEGORIES.len()),
            Field::Subcategory => {
                let len = self.subcategories().len();
                (&mut self.subcategory_cursor, len)
            }
            Field::PhotoList => {
                let len = self.wizard.form().photos.len();
                (&mut self.photo_cursor, len)
            }
            _ => return,
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
    }

    // Field edits. Every edit flows into the wizard as one field update.

    fn edit_text<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut InputBuffer),
    {
        let field = self.current_field();
        let buffer = match field {
            Field::VehicleSearch => &mut self.vehicle_query,
            Field::Description => &mut self.description,
            Field::Address => &mut self.custom_address,
            Field::Notes => &mut self.notes,
            Field::PreferredDate => &mut self.preferred_date,
            _ => return,
        };
        let before = buffer.content().to_string();
        edit(buffer);
        if buffer.content() == before {
            return;
        }

        match field {
            Field::VehicleSearch => self.vehicle_cursor = 0,
            Field::Description => self.sync_issue(),
            Field::Address => {
                if self.location_kind == LocationKind::Custom {
                    self.sync_location();
                }
            }
            Field::Notes => self.sync_notes(),
            Field::PreferredDate => self.sync_preferred_date(),
            _ => {}
        }
    }

    /// Enter in insert mode
    fn commit_text_field(&mut self) {
        match self.current_field() {
            Field::VehicleSearch => self.field_idx = 1,
            Field::Address if self.location_kind == LocationKind::Custom => {
                if self.custom_address.content().trim().is_empty() {
                    self.set_error("Enter an address for the technician".to_string());
                }
            }
            Field::PreferredDate if !self.preferred_date.is_empty() => {
                match NaiveDate::parse_from_str(self.preferred_date.content().trim(), "%Y-%m-%d") {
                    Ok(date) => self.set_info(format!("Preferred date: {}", date.format("%A, %B %-d %Y"))),
                    Err(_) => self.set_error("Dates use the form YYYY-MM-DD".to_string()),
                }
            }
            Field::Notes => self.next_field(),
            _ => {}
        }
    }

    fn select_vehicle(&mut self) {
        let selected = self
            .filtered_vehicles()
            .get(self.vehicle_cursor)
            .map(|vehicle| (*vehicle).clone());
        let vehicle = match selected {
            Some(vehicle) => vehicle,
            None => {
                self.set_error("No vehicle matches the filter".to_string());
                return;
            }
        };
        let name = format!("{} ({})", vehicle.display_name(), vehicle.license_plate);
        if vehicle.status != VehicleStatus::Active {
            warn!("Selected vehicle {} is {}", vehicle.id, vehicle.status.label());
        }
        self.wizard.update_field(FieldUpdate::Vehicle(Some(vehicle)));
        self.advance();
        self.set_info(format!("Vehicle selected: {name}"));
    }

    fn select_category(&mut self) {
        let Some(category) = issue_categories().get(self.category_cursor).cloned() else {
            return;
        };
        if self.issue_category.as_deref() != Some(category.as_str()) {
            self.issue_subcategory = None;
            self.subcategory_cursor = 0;
        }
        self.issue_category = Some(category);
        self.sync_issue();
        self.field_idx = 1;
    }

    fn select_subcategory(&mut self) {
        let Some(subcategory) = self.subcategories().get(self.subcategory_cursor).cloned() else {
            self.set_error("Pick a service category first".to_string());
            return;
        };
        self.issue_subcategory = Some(subcategory);
        self.sync_issue();
        self.field_idx = 2;
    }

    fn cycle_priority(&mut self) {
        self.issue_priority = self.issue_priority.cycle();
        self.sync_issue();
    }

    fn sync_issue(&mut self) {
        let issue = Issue {
            category: self.issue_category.clone(),
            subcategory: self.issue_subcategory.clone(),
            priority: self.issue_priority,
            description: self.description.content().to_string(),
        };
        self.wizard.update_field(FieldUpdate::Issue(Some(issue)));
    }

    fn toggle_location_kind(&mut self) {
        let kind = match self.location_kind {
            LocationKind::Current => LocationKind::Custom,
            LocationKind::Custom => LocationKind::Current,
        };
        self.set_location_kind(kind);
    }

    fn set_location_kind(&mut self, kind: LocationKind) {
        self.location_kind = kind;
        self.sync_location();
        if kind == LocationKind::Custom {
            self.field_idx = 1;
        }
    }

    fn sync_location(&mut self) {
        let location = match self.location_kind {
            LocationKind::Current => Some(self.location_provider.current_location()),
            LocationKind::Custom => {
                let address = self.custom_address.content().trim();
                (!address.is_empty()).then(|| ServiceLocation::custom(address))
            }
        };
        self.wizard.update_field(FieldUpdate::Location(location));
    }

    fn capture_photo(&mut self, from_gallery: bool) {
        let existing = &self.wizard.form().photos;
        let photo = if from_gallery {
            self.photo_provider.from_gallery(existing)
        } else {
            self.photo_provider.capture(existing)
        };
        match photo {
            Some(reference) => self.attach_photo(reference),
            None => self.set_error("No photo source available".to_string()),
        }
    }

    fn attach_photo(&mut self, reference: String) {
        let mut photos = self.wizard.form().photos.clone();
        photos.push(reference);
        self.photo_cursor = photos.len() - 1;
        let count = photos.len();
        self.wizard.update_field(FieldUpdate::Photos(photos));
        self.set_info(format!("{count} photo{} attached", if count == 1 { "" } else { "s" }));
    }

    fn delete_photo(&mut self) {
        let mut photos = self.wizard.form().photos.clone();
        if self.photo_cursor >= photos.len() {
            return;
        }
        photos.remove(self.photo_cursor);
        self.photo_cursor = self.photo_cursor.min(photos.len().saturating_sub(1));
        self.wizard.update_field(FieldUpdate::Photos(photos));
    }

    fn sync_notes(&mut self) {
        let notes = self.notes.content();
        let value = (!notes.trim().is_empty()).then(|| notes.to_string());
        self.wizard.update_field(FieldUpdate::Notes(value));
    }

    fn sync_preferred_date(&mut self) {
        let date = NaiveDate::parse_from_str(self.preferred_date.content().trim(), "%Y-%m-%d").ok();
        self.wizard.update_field(FieldUpdate::PreferredDate(date));
    }

    /// At Review with every required step filled in
    pub fn ready_to_submit(&self) -> bool {
        self.wizard.can_submit() && self.first_incomplete_step().is_none()
    }

    fn first_incomplete_step(&self) -> Option<StepId> {
        StepId::ALL.iter().copied().find(|&step| !self.wizard.is_complete(step))
    }

    /// Whether the typed preferred date is empty or parses
    pub fn preferred_date_valid(&self) -> bool {
        self.preferred_date.is_empty() || self.wizard.form().preferred_date.is_some()
    }

    // Submission

    /// Hand the request to the sink. On success the wizard starts over.
    pub fn submit(&mut self) {
        match self.wizard.submit(self.sink.as_ref()) {
            Ok(receipt) => {
                let text = match &receipt.path {
                    Some(path) => format!("Service request {} saved to {}", receipt.request_id, path.display()),
                    None => format!("Service request {} submitted (dry run)", receipt.request_id),
                };
                self.reset_drafts();
                self.after_navigation(Ok(self.wizard.active_step()));
                self.set_info(text);
                self.last_receipt = Some(receipt);
            }
            Err(e) => {
                warn!("Submission rejected: {e}");
                self.set_error(e.to_string());
            }
        }
        self.update_status_bar();
    }

    /// Discard the request in progress
    pub fn reset(&mut self) {
        self.wizard.reset();
        self.reset_drafts();
        self.after_navigation(Ok(self.wizard.active_step()));
    }

    fn reset_drafts(&mut self) {
        self.vehicle_query.clear();
        self.status_filter = StatusFilter::All;
        self.vehicle_cursor = 0;
        self.category_cursor = 0;
        self.subcategory_cursor = 0;
        self.issue_category = None;
        self.issue_subcategory = None;
        self.issue_priority = Priority::default();
        self.description.clear();
        self.location_kind = LocationKind::Current;
        self.custom_address.clear();
        self.photo_cursor = 0;
        self.notes.clear();
        self.preferred_date.clear();
    }

    // Messages and status

    pub fn set_error(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: true,
            ticks_left: MESSAGE_TTL_TICKS,
        });
    }

    pub fn set_info(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: false,
            ticks_left: MESSAGE_TTL_TICKS,
        });
    }

    pub fn tick(&mut self) {
        if let Some(msg) = self.message.as_mut() {
            if !msg.is_error {
                msg.ticks_left = msg.ticks_left.saturating_sub(1);
                if msg.ticks_left == 0 {
                    self.message = None;
                }
            }
        }
    }

    pub fn update_status_bar(&mut self) {
        if self.confirm_action.is_some() {
            self.status_bar = StatusBarState::confirm();
            return;
        }

        if self.vim_mode == VimMode::Command {
            self.status_bar = StatusBarState::command_mode();
            return;
        }

        self.status_bar = match self.panel_focus {
            PanelFocus::Sidebar => StatusBarState::sidebar(),
            PanelFocus::Content => self.content_status_bar(),
        };
    }

    fn content_status_bar(&self) -> StatusBarState {
        let field = self.current_field();
        match field {
            _ if field.is_text() && self.vim_mode == VimMode::Insert => StatusBarState::text_insert(),
            _ if field.is_text() => StatusBarState::text_normal(),
            Field::VehicleList => StatusBarState::vehicle_list(),
            Field::PhotoList => StatusBarState::photos(),
            Field::Priority | Field::LocationKind => StatusBarState::toggle(),
            Field::SubmitButton => StatusBarState::submit(self.ready_to_submit()),
            _ => StatusBarState::list(),
        }
    }
}
