use ratatui::{
    prelude::*,
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use super::super::{Field, ServiceRequestApp, VehicleStatus};
use super::{draw_button, draw_input, draw_label, draw_step_title, input_rect, is_field_focused, scroll_offset};

pub fn draw_vehicle_step(frame: &mut Frame, area: Rect, app: &ServiceRequestApp) {
    if area.height < 10 || area.width < 30 {
        return;
    }

    let mut y = draw_step_title(frame, area, app, "Select Vehicle");

    // Search input
    let search_focused = is_field_focused(app, Field::VehicleSearch);
    draw_label(frame, area, y, app, "Search", search_focused);
    draw_input(
        frame,
        input_rect(area, y),
        app,
        &app.vehicle_query,
        Field::VehicleSearch,
        "(make, model, plate or VIN)",
    );
    y += 1;

    frame.render_widget(
        Paragraph::new(format!("Status: {}  (f to change)", app.status_filter.label()))
            .style(app.theme.muted_style()),
        Rect::new(area.x + 2, y, area.width.saturating_sub(4), 1),
    );
    y += 2;

    // Vehicle list, two rows per vehicle
    let list_focused = is_field_focused(app, Field::VehicleList);
    let filtered = app.filtered_vehicles();
    let selected_id = app.wizard.form().vehicle.as_ref().map(|v| v.id.as_str());

    if filtered.is_empty() {
        frame.render_widget(
            Paragraph::new("No vehicles match").style(app.theme.muted_style()),
            Rect::new(area.x + 2, y, area.width.saturating_sub(4), 1),
        );
        return;
    }

    let button_y = area.y + area.height.saturating_sub(2);
    let visible = (button_y.saturating_sub(y + 1) / 2) as usize;
    let offset = scroll_offset(app.vehicle_cursor, visible);

    for (i, vehicle) in filtered.iter().skip(offset).take(visible).enumerate() {
        let idx = i + offset;
        let is_cursor = idx == app.vehicle_cursor;
        let is_chosen = selected_id == Some(vehicle.id.as_str());

        let prefix = if is_cursor { ">" } else { " " };
        let check = if is_chosen { "*" } else { " " };
        let title = format!("{prefix}{check} {}  {}", vehicle.display_name(), vehicle.license_plate);

        let style = if is_cursor && list_focused {
            app.theme.primary_style().add_modifier(Modifier::BOLD)
        } else if is_cursor {
            app.theme.secondary_style()
        } else {
            app.theme.style()
        };

        let status_style = match vehicle.status {
            VehicleStatus::Active => app.theme.success_style(),
            VehicleStatus::Maintenance => Style::default().fg(app.theme.warning),
            VehicleStatus::Inactive => app.theme.muted_style(),
        };

        let row_y = y + (i as u16) * 2;
        frame.render_widget(
            Paragraph::new(title).style(style),
            Rect::new(area.x + 2, row_y, area.width.saturating_sub(4), 1),
        );

        let detail = Line::from(vec![
            Span::styled(
                format!("    VIN {}  {} mi  {}  ", vehicle.vin, vehicle.mileage, vehicle.location),
                app.theme.muted_style(),
            ),
            Span::styled(vehicle.status.label(), status_style),
        ]);
        frame.render_widget(
            Paragraph::new(detail),
            Rect::new(area.x + 2, row_y + 1, area.width.saturating_sub(4), 1),
        );
    }

    if filtered.len() > visible {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));
        let mut scrollbar_state = ScrollbarState::new(filtered.len()).position(app.vehicle_cursor);
        frame.render_stateful_widget(
            scrollbar,
            Rect::new(area.x + area.width - 1, y, 1, (visible * 2) as u16),
            &mut scrollbar_state,
        );
    }

    draw_button(frame, area, app, " [Enter] Select & Next ", list_focused);
}
