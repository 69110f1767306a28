use ratatui::{prelude::*, widgets::Paragraph};

use super::super::{Field, ServiceRequestApp, StepId};
use super::{draw_button, draw_input, draw_label, draw_step_title, input_rect, is_field_focused};

pub fn draw_review_step(frame: &mut Frame, area: Rect, app: &ServiceRequestApp) {
    if area.height < 16 || area.width < 40 {
        return;
    }

    let mut y = draw_step_title(frame, area, app, "Review & Submit");
    let form = app.wizard.form();

    let missing = "(missing)";
    let vehicle = form
        .vehicle
        .as_ref()
        .map(|v| format!("{} ({})", v.display_name(), v.license_plate));
    let issue = form.issue.as_ref().filter(|i| i.is_complete()).map(|i| {
        format!(
            "{} / {}",
            i.category.as_deref().unwrap_or_default(),
            i.subcategory.as_deref().unwrap_or_default()
        )
    });
    let location = form.location.as_ref().map(|l| l.address.clone());

    let rows = [
        ("Vehicle", vehicle, StepId::Vehicle),
        ("Issue", issue, StepId::Issue),
        ("Location", location, StepId::Location),
    ];

    for (label, value, step) in rows {
        let (text, style) = match value {
            Some(text) => (text, app.theme.secondary_style()),
            None => (format!("{missing}  :jump {}", step.index() + 1), app.theme.error_style()),
        };
        frame.render_widget(
            Paragraph::new(format!("  {label}: {text}")).style(style),
            Rect::new(area.x + 2, y, area.width.saturating_sub(4), 1),
        );
        y += 1;
    }

    if let Some(issue) = form.issue.as_ref().filter(|i| i.is_complete()) {
        let line = Line::from(vec![
            Span::styled("  Priority: ", app.theme.style()),
            Span::styled(issue.priority.label(), app.theme.priority_style(issue.priority)),
            Span::styled(format!("  \"{}\"", issue.description.trim()), app.theme.muted_style()),
        ]);
        frame.render_widget(
            Paragraph::new(line),
            Rect::new(area.x + 2, y, area.width.saturating_sub(4), 1),
        );
        y += 1;
    }

    frame.render_widget(
        Paragraph::new(format!("  Photos: {}", form.photos.len())).style(app.theme.style()),
        Rect::new(area.x + 2, y, area.width.saturating_sub(4), 1),
    );
    y += 2;

    draw_label(frame, area, y, app, "Notes", is_field_focused(app, Field::Notes));
    draw_input(
        frame,
        input_rect(area, y),
        app,
        &app.notes,
        Field::Notes,
        "(optional instructions for the technician)",
    );
    y += 2;

    let date_focused = is_field_focused(app, Field::PreferredDate);
    draw_label(frame, area, y, app, "Preferred date", date_focused);
    draw_input(
        frame,
        input_rect(area, y),
        app,
        &app.preferred_date,
        Field::PreferredDate,
        "(YYYY-MM-DD, optional)",
    );
    if !app.preferred_date_valid() && !date_focused {
        frame.render_widget(
            Paragraph::new("  not a valid date").style(app.theme.error_style()),
            Rect::new(area.x + 16, y + 1, area.width.saturating_sub(18), 1),
        );
    }

    let ready = app.ready_to_submit();
    let button_focused = is_field_focused(app, Field::SubmitButton);
    let text = if app.is_dryrun() {
        " [Enter] Submit (dry run) "
    } else {
        " [Enter] Submit Request "
    };
    draw_button(frame, area, app, text, ready && button_focused);
}
