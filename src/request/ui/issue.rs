use ratatui::{prelude::*, widgets::Paragraph};

use super::super::{Field, Priority, ServiceRequestApp, issue_categories};
use super::{draw_input, draw_label, draw_step_title, input_rect, is_field_focused, scroll_offset};

pub fn draw_issue_step(frame: &mut Frame, area: Rect, app: &ServiceRequestApp) {
    if area.height < 14 || area.width < 40 {
        return;
    }

    let mut y = draw_step_title(frame, area, app, "Describe the Issue");

    // Category and subcategory lists side by side
    let list_height = area.height.saturating_sub(12).min(6);
    let half = area.width.saturating_sub(4) / 2;
    let left = Rect::new(area.x + 2, y, half, list_height + 1);
    let right = Rect::new(area.x + 2 + half, y, half, list_height + 1);

    let categories = issue_categories();
    draw_choice_list(
        frame,
        left,
        app,
        "Category",
        &categories,
        app.category_cursor,
        app.issue_category.as_deref(),
        Field::Category,
    );

    let subcategories = app.subcategories();
    if subcategories.is_empty() {
        draw_list_label(frame, right, app, "Type", is_field_focused(app, Field::Subcategory));
        frame.render_widget(
            Paragraph::new("(pick a category)").style(app.theme.muted_style()),
            Rect::new(right.x + 2, right.y + 1, right.width.saturating_sub(2), 1),
        );
    } else {
        draw_choice_list(
            frame,
            right,
            app,
            "Type",
            &subcategories,
            app.subcategory_cursor,
            app.issue_subcategory.as_deref(),
            Field::Subcategory,
        );
    }
    y += list_height + 2;

    // Priority
    let priority_focused = is_field_focused(app, Field::Priority);
    draw_label(frame, area, y, app, "Priority", priority_focused);
    let spans: Vec<Span> = Priority::ALL
        .iter()
        .flat_map(|&p| {
            let style = if p == app.issue_priority {
                app.theme.priority_style(p).add_modifier(Modifier::REVERSED)
            } else {
                app.theme.muted_style()
            };
            [Span::styled(format!(" {} ", p.label()), style), Span::raw(" ")]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), input_rect(area, y));
    y += 2;

    // Description
    draw_label(frame, area, y, app, "Description", is_field_focused(app, Field::Description));
    draw_input(
        frame,
        input_rect(area, y),
        app,
        &app.description,
        Field::Description,
        "(what is wrong with the vehicle?)",
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_choice_list(
    frame: &mut Frame,
    area: Rect,
    app: &ServiceRequestApp,
    label: &str,
    items: &[String],
    cursor: usize,
    chosen: Option<&str>,
    field: Field,
) {
    let focused = is_field_focused(app, field);
    draw_list_label(frame, area, app, label, focused);

    let height = area.height.saturating_sub(1) as usize;
    let offset = scroll_offset(cursor, height);

    for (i, item) in items.iter().skip(offset).take(height).enumerate() {
        let idx = i + offset;
        let is_cursor = idx == cursor;
        let prefix = if is_cursor && focused { ">" } else { " " };
        let check = if chosen == Some(item.as_str()) { "*" } else { " " };

        let style = if is_cursor && focused {
            app.theme.primary_style().add_modifier(Modifier::BOLD)
        } else if chosen == Some(item.as_str()) {
            app.theme.secondary_style()
        } else {
            app.theme.style()
        };

        frame.render_widget(
            Paragraph::new(format!("{prefix}{check} {item}")).style(style),
            Rect::new(area.x, area.y + 1 + i as u16, area.width, 1),
        );
    }
}

fn draw_list_label(frame: &mut Frame, area: Rect, app: &ServiceRequestApp, label: &str, focused: bool) {
    let style = if focused {
        app.theme.primary_style()
    } else {
        app.theme.style()
    };
    frame.render_widget(
        Paragraph::new(label.to_string()).style(style),
        Rect::new(area.x, area.y, area.width, 1),
    );
}
