use ratatui::{prelude::*, widgets::Paragraph};

use super::super::{Field, ServiceRequestApp};
use super::{draw_button, draw_step_title, is_field_focused, scroll_offset};

pub fn draw_photos_step(frame: &mut Frame, area: Rect, app: &ServiceRequestApp) {
    if area.height < 8 || area.width < 30 {
        return;
    }

    let mut y = draw_step_title(frame, area, app, "Add Photos (optional)");
    let focused = is_field_focused(app, Field::PhotoList);
    let photos = &app.wizard.form().photos;

    frame.render_widget(
        Paragraph::new(format!("{} attached", photos.len())).style(app.theme.muted_style()),
        Rect::new(area.x + 2, y, area.width.saturating_sub(4), 1),
    );
    y += 2;

    if photos.is_empty() {
        frame.render_widget(
            Paragraph::new("No photos yet. c: take photo  g: choose from gallery").style(app.theme.muted_style()),
            Rect::new(area.x + 2, y, area.width.saturating_sub(4), 1),
        );
    } else {
        let bottom = area.y + area.height.saturating_sub(3);
        let visible = bottom.saturating_sub(y) as usize;
        let offset = scroll_offset(app.photo_cursor, visible);

        for (i, photo) in photos.iter().skip(offset).take(visible).enumerate() {
            let idx = i + offset;
            let is_cursor = idx == app.photo_cursor;
            let prefix = if is_cursor { ">" } else { " " };

            let style = if is_cursor && focused {
                app.theme.primary_style().add_modifier(Modifier::BOLD)
            } else if is_cursor {
                app.theme.secondary_style()
            } else {
                app.theme.style()
            };

            frame.render_widget(
                Paragraph::new(format!("{prefix} {}. {photo}", idx + 1)).style(style),
                Rect::new(area.x + 2, y + i as u16, area.width.saturating_sub(4), 1),
            );
        }
    }

    draw_button(frame, area, app, " [Enter] Continue to Review ", focused);
}
