use ratatui::{prelude::*, widgets::Paragraph};

use super::super::{Field, LocationKind, ServiceRequestApp, StepId};
use super::{draw_input, draw_label, draw_step_title, input_rect, is_field_focused};

pub fn draw_location_step(frame: &mut Frame, area: Rect, app: &ServiceRequestApp) {
    if area.height < 10 || area.width < 30 {
        return;
    }

    let mut y = draw_step_title(frame, area, app, "Service Location");

    let kind_focused = is_field_focused(app, Field::LocationKind);
    draw_label(frame, area, y, app, "Meet at", kind_focused);

    let option = |kind: LocationKind, text: &'static str| {
        let style = if app.location_kind == kind {
            app.theme.secondary_style().add_modifier(Modifier::REVERSED)
        } else {
            app.theme.muted_style()
        };
        Span::styled(text, style)
    };
    let choices = Line::from(vec![
        option(LocationKind::Current, " Current location "),
        Span::raw("  "),
        option(LocationKind::Custom, " Other address "),
    ]);
    frame.render_widget(Paragraph::new(choices), input_rect(area, y));
    y += 2;

    match app.location_kind {
        LocationKind::Current => {
            let text = match &app.wizard.form().location {
                Some(location) if location.kind == LocationKind::Current => {
                    let mut lines = vec![Line::from(Span::styled(location.address.clone(), app.theme.style()))];
                    if let Some(coords) = location.coordinates {
                        lines.push(Line::from(Span::styled(
                            format!("{:.4}, {:.4}", coords.latitude, coords.longitude),
                            app.theme.muted_style(),
                        )));
                    }
                    Text::from(lines)
                }
                _ => Text::from(Span::styled(
                    "Press Enter or r to use your current location",
                    app.theme.muted_style(),
                )),
            };
            draw_label(frame, area, y, app, "Address", false);
            frame.render_widget(Paragraph::new(text), Rect::new(area.x + 16, y, area.width.saturating_sub(18), 2));
        }
        LocationKind::Custom => {
            draw_label(frame, area, y, app, "Address", is_field_focused(app, Field::Address));
            draw_input(
                frame,
                input_rect(area, y),
                app,
                &app.custom_address,
                Field::Address,
                "(street, city, state)",
            );
        }
    }
    y += 3;

    let (status, style) = if app.wizard.is_complete(StepId::Location) {
        ("Location set", app.theme.success_style())
    } else {
        ("A service location is required", app.theme.error_style())
    };
    frame.render_widget(
        Paragraph::new(status).style(style),
        Rect::new(area.x + 2, y, area.width.saturating_sub(4), 1),
    );
}
