use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fleet_request::request::{
    FieldUpdate, Issue, NavError, Priority, RequestAction, RequestConfig, ServiceLocation, ServiceRequestApp,
    StepId, WizardController, demo_fleet, ui,
};
use ratatui::{Terminal, backend::TestBackend};

fn press(app: &mut ServiceRequestApp, code: KeyCode) -> Option<RequestAction> {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut ServiceRequestApp, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn screen_text(app: &ServiceRequestApp) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
    terminal.draw(|frame| ui::draw(frame, app)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}

fn app_writing_to(dir: &std::path::Path) -> ServiceRequestApp {
    let mut config = RequestConfig::default();
    config.submission.output_dir = dir.to_path_buf();
    ServiceRequestApp::new(config)
}

#[test]
fn wizard_walks_all_steps_with_field_updates() {
    let mut wizard = WizardController::new();
    assert_eq!(wizard.advance(), Err(NavError::Incomplete(StepId::Vehicle)));

    wizard.update_field(FieldUpdate::Vehicle(demo_fleet().into_iter().next()));
    wizard.advance().unwrap();
    wizard.update_field(FieldUpdate::Issue(Some(Issue {
        category: Some("Electrical".to_string()),
        subcategory: Some("Battery Service".to_string()),
        priority: Priority::Urgent,
        description: "Will not start".to_string(),
    })));
    wizard.advance().unwrap();
    wizard.update_field(FieldUpdate::Location(Some(ServiceLocation::custom("Tampa Depot, Bay 4"))));
    wizard.advance().unwrap();
    assert_eq!(wizard.advance(), Ok(StepId::Review));
    assert!(wizard.can_submit());

    // Going back and clearing a required field leaves Review reachable but the form incomplete
    wizard.jump_to(StepId::Vehicle).unwrap();
    wizard.update_field(FieldUpdate::Vehicle(None));
    assert!(!wizard.can_advance());
    assert!(wizard.can_jump_to(StepId::Issue));
    assert!(!wizard.can_jump_to(StepId::Location));
}

#[test]
fn keyboard_flow_writes_a_json_request() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_writing_to(dir.path());

    // Vehicle: first demo vehicle
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.active_step(), StepId::Issue);

    // Issue: Brake Service / Brake Inspection, High, description
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Char('i'));
    type_text(&mut app, "Squealing on stop");
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char(']'));
    assert_eq!(app.active_step(), StepId::Location);

    // Location: custom address
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Char('i'));
    type_text(&mut app, "500 Harbour Island Blvd");
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char(']'));

    // Photos: one from the camera
    press(&mut app, KeyCode::Char('c'));
    press(&mut app, KeyCode::Char(']'));
    assert_eq!(app.active_step(), StepId::Review);

    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Enter);
    assert_eq!(press(&mut app, KeyCode::Char('y')), Some(RequestAction::Submit));
    app.submit();

    let receipt = app.last_receipt.clone().unwrap();
    let path = receipt.path.unwrap();
    assert_eq!(path, dir.path().join(format!("{}.json", receipt.request_id)));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["vehicleId"], "v1");
    assert_eq!(json["vehicleVIN"], "1HGBH41JXMN109186");
    assert_eq!(json["issueCategory"], "Brake Service");
    assert_eq!(json["issueSubcategory"], "Brake Inspection");
    assert_eq!(json["priority"], "high");
    assert_eq!(json["description"], "Squealing on stop");
    assert_eq!(json["location"]["kind"], "custom");
    assert_eq!(json["location"]["address"], "500 Harbour Island Blvd");
    assert_eq!(json["photos"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["status"], "submitted");
    assert!(json.get("notes").is_none());

    assert_eq!(app.active_step(), StepId::Vehicle);
    assert!(app.wizard.form().vehicle.is_none());
}

#[test]
fn rejected_submission_keeps_the_answers() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_writing_to(dir.path());

    // Jump straight to Review through the permissive jump rule
    for step in ["2", "3", "4", "5"] {
        press(&mut app, KeyCode::Char(':'));
        type_text(&mut app, &format!("jump {step}"));
        press(&mut app, KeyCode::Enter);
    }
    assert_eq!(app.active_step(), StepId::Review);

    press(&mut app, KeyCode::Char(':'));
    type_text(&mut app, "notes gate code 4411");
    press(&mut app, KeyCode::Enter);

    app.submit();
    assert!(app.message.as_ref().is_some_and(|m| m.is_error && m.text.contains("Vehicle")));
    assert_eq!(app.active_step(), StepId::Review);
    assert_eq!(app.wizard.form().notes.as_deref(), Some("gate code 4411"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn screen_shows_progress_and_steps() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_writing_to(dir.path());

    let text = screen_text(&app);
    assert!(text.contains("New Service Request"));
    assert!(text.contains("Step 1 of 5: Vehicle"));
    assert!(text.contains("[>] Vehicle"));
    assert!(text.contains("[#] Location"));
    assert!(text.contains("Transit 350"));

    press(&mut app, KeyCode::Char('?'));
    assert!(screen_text(&app).contains("Help"));
    press(&mut app, KeyCode::Esc);

    press(&mut app, KeyCode::Char('2'));
    let text = screen_text(&app);
    assert!(text.contains("Step 2 of 5: Issue"));
    assert!(text.contains("Tire Service"));
}

#[test]
fn dryrun_header_is_marked() {
    let mut config = RequestConfig::default();
    config.general.dryrun = true;
    let app = ServiceRequestApp::new(config);
    assert!(screen_text(&app).contains("[DRYRUN]"));
}
