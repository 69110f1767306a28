mod issue;
mod location;
mod photos;
mod review;
mod vehicle;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, LineGauge, Paragraph, Wrap},
};

use super::{ConfirmAction, Field, PanelFocus, ServiceRequestApp, StepId};
use crate::ui::Layout as Regions;
use crate::vim::{InputBuffer, VimMode};

/// Draw the whole service request screen
pub fn draw(frame: &mut Frame, app: &ServiceRequestApp) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    let regions = Regions::new(area);
    draw_header(frame, regions.header, app);
    draw_progress(frame, regions.progress, app);
    draw_sidebar(frame, regions.sidebar, app);
    draw_main_content(frame, regions.content, app);
    draw_message(frame, regions.message, app);
    draw_status_bar(frame, regions.status, app);

    // Overlays
    if let Some(action) = app.confirm_action {
        draw_confirm_dialog(frame, action, app);
    }

    if app.show_help {
        draw_help(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &ServiceRequestApp) {
    frame.render_widget(Clear, area);

    let title = format!(" {} (v{}) ", app.config.general.title, env!("CARGO_PKG_VERSION"));
    frame.render_widget(
        Paragraph::new(title).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );

    let right = if app.is_dryrun() {
        "[DRYRUN] ".to_string()
    } else {
        format!("{} ", app.config.general.subtitle)
    };
    frame.render_widget(
        Paragraph::new(right)
            .style(if app.is_dryrun() {
                app.theme.error_style().add_modifier(Modifier::BOLD)
            } else {
                app.theme.muted_style()
            })
            .alignment(Alignment::Right),
        area,
    );
}

fn draw_progress(frame: &mut Frame, area: Rect, app: &ServiceRequestApp) {
    let step = app.active_step();
    let label = format!(" Step {} of {}: {} ", step.index() + 1, StepId::COUNT, step.title());

    let gauge = LineGauge::default()
        .label(label)
        .ratio(app.wizard.progress())
        .filled_style(app.theme.primary_style())
        .unfilled_style(app.theme.border_style());

    frame.render_widget(gauge, area);
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &ServiceRequestApp) {
    let is_focused = app.panel_focus == PanelFocus::Sidebar;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.primary_style()
        } else {
            app.theme.border_style()
        })
        .title(" Steps ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    for (idx, status) in app.wizard.step_statuses().iter().enumerate() {
        if idx as u16 >= inner.height {
            break;
        }

        let is_cursor = is_focused && idx == app.sidebar_cursor;
        let line_text = format!(" {} {}", status.marker(), status.step.title());

        let style = if is_cursor {
            app.theme.selected_style(true)
        } else if status.active {
            app.theme.secondary_style().add_modifier(Modifier::REVERSED)
        } else if !status.reachable {
            app.theme.muted_style()
        } else if status.complete {
            app.theme.success_style()
        } else {
            app.theme.style()
        };

        let line_area = Rect::new(inner.x, inner.y + idx as u16, inner.width, 1);
        if is_cursor || status.active {
            frame.render_widget(Clear, line_area);
        }
        frame.render_widget(Paragraph::new(line_text).style(style), line_area);
    }

    if is_focused && inner.height > StepId::COUNT as u16 + 2 {
        let hint = "j/k:nav Enter:open";
        frame.render_widget(
            Paragraph::new(hint).style(app.theme.muted_style()),
            Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
        );
    }
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &ServiceRequestApp) {
    let is_focused = app.panel_focus == PanelFocus::Content;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.primary_style()
        } else {
            app.theme.border_style()
        });

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    match app.active_step() {
        StepId::Vehicle => vehicle::draw_vehicle_step(frame, inner, app),
        StepId::Issue => issue::draw_issue_step(frame, inner, app),
        StepId::Location => location::draw_location_step(frame, inner, app),
        StepId::Photos => photos::draw_photos_step(frame, inner, app),
        StepId::Review => review::draw_review_step(frame, inner, app),
    }
}

fn draw_message(frame: &mut Frame, area: Rect, app: &ServiceRequestApp) {
    let Some(msg) = &app.message else {
        return;
    };

    let (title, border_style, text_style) = if msg.is_error {
        (" Error ", app.theme.error_style(), app.theme.error_style())
    } else {
        (" Info ", app.theme.secondary_style(), app.theme.style())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_style(border_style.add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(Line::from(Span::styled(msg.text.as_str(), text_style)))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &ServiceRequestApp) {
    frame.render_widget(Clear, area);

    let mode_name = app.vim_mode.display_name();
    let mode_span = Span::styled(format!(" {mode_name} "), app.theme.mode_style(mode_name));

    let after_mode = if app.vim_mode == VimMode::Command {
        Span::styled(format!(":{}", app.command_buffer.content()), app.theme.style())
    } else {
        Span::styled(app.status_bar.left_hint.clone(), app.theme.muted_style())
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![mode_span, Span::raw(" "), after_mode])),
        Rect::new(area.x, area.y, area.width * 2 / 3, 1),
    );

    let completed = app
        .wizard
        .step_statuses()
        .iter()
        .filter(|s| s.complete && s.step != StepId::Review)
        .count();
    let right_text = format!("{completed}/{} required  {}", StepId::COUNT - 1, app.status_bar.right_hint);

    frame.render_widget(
        Paragraph::new(right_text)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        Rect::new(area.x + area.width / 3, area.y, area.width - area.width / 3, 1),
    );
}

fn draw_confirm_dialog(frame: &mut Frame, action: ConfirmAction, app: &ServiceRequestApp) {
    let (title, message) = match action {
        ConfirmAction::Submit => ("Submit", "Send this service request?"),
        ConfirmAction::Discard => ("Discard", "Throw away this request and start over?"),
        ConfirmAction::Quit => ("Quit", "Quit without submitting?"),
    };

    let width = 48.min(frame.area().width.saturating_sub(4));
    let area = Regions::centered_box(frame.area(), width, 7);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.primary_style())
        .title(format!(" {title} "));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    if inner.height < 4 {
        return;
    }

    frame.render_widget(
        Paragraph::new(message)
            .style(app.theme.style().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 1, inner.width, 1),
    );

    let hints = Line::from(vec![
        Span::styled("[", app.theme.style()),
        Span::styled("Y", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled("]es / [", app.theme.style()),
        Span::styled("N", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled("]o", app.theme.style()),
    ]);

    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 3, inner.width, 1),
    );
}

fn draw_help(frame: &mut Frame, app: &ServiceRequestApp) {
    let width = 60.min(frame.area().width.saturating_sub(4));
    let height = 24.min(frame.area().height.saturating_sub(4));
    let area = Regions::centered_box(frame.area(), width, height);

    let help_text = [
        "",
        "Navigation:",
        "",
        "  ] / Ctrl+n     Next step",
        "  [ / Ctrl+p     Previous step",
        "  1-5            Jump to step",
        "  Ctrl+h/l       Focus steps / content",
        "  j/k  Tab       Move in list / between fields",
        "  Enter          Select / Edit",
        "",
        "Vim Modes:",
        "",
        "  i              Edit text field",
        "  Esc            Return to normal",
        "  :              Command mode",
        "",
        "Commands: :next :prev :jump <step> :photo <ref>",
        "          :date <YYYY-MM-DD> :notes <text>",
        "          :submit :cancel :q",
        "",
        "Press q or Esc to close",
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Help ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    for (i, line) in help_text.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        frame.render_widget(
            Paragraph::new(*line).style(app.theme.style()),
            Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
        );
    }
}

// Shared pieces for the step screens

fn is_field_focused(app: &ServiceRequestApp, field: Field) -> bool {
    app.panel_focus == PanelFocus::Content && app.current_field() == field
}

fn draw_step_title(frame: &mut Frame, area: Rect, app: &ServiceRequestApp, title: &str) -> u16 {
    frame.render_widget(
        Paragraph::new(title).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, area.y + 1, area.width.saturating_sub(4), 1),
    );
    area.y + 3
}

fn draw_label(frame: &mut Frame, area: Rect, y: u16, app: &ServiceRequestApp, label: &str, focused: bool) {
    frame.render_widget(
        Paragraph::new(label.to_string()).style(if focused {
            app.theme.primary_style()
        } else {
            app.theme.style()
        }),
        Rect::new(area.x + 2, y, 14.min(area.width.saturating_sub(2)), 1),
    );
}

/// Render a text input: `|` cursor in insert mode, block cursor when focused
fn draw_input(
    frame: &mut Frame,
    rect: Rect,
    app: &ServiceRequestApp,
    buffer: &InputBuffer,
    field: Field,
    placeholder: &str,
) {
    let focused = is_field_focused(app, field);
    let content = buffer.content();
    let cursor_pos = buffer.cursor();

    if focused && app.vim_mode == VimMode::Insert {
        let before: String = content.chars().take(cursor_pos).collect();
        let after: String = content.chars().skip(cursor_pos).collect();

        let line = Line::from(vec![
            Span::styled(before, app.theme.style()),
            Span::styled("|", app.theme.primary_style().add_modifier(Modifier::BOLD)),
            Span::styled(after, app.theme.style()),
        ]);
        frame.render_widget(Paragraph::new(line), rect);
    } else if focused {
        let chars: Vec<char> = content.chars().collect();
        let mut spans: Vec<Span> = chars
            .iter()
            .enumerate()
            .map(|(i, ch)| {
                let style = if i == cursor_pos {
                    app.theme.style().add_modifier(Modifier::REVERSED)
                } else {
                    app.theme.style()
                };
                Span::styled(ch.to_string(), style)
            })
            .collect();
        if cursor_pos >= chars.len() {
            spans.push(Span::styled(" ", app.theme.style().add_modifier(Modifier::REVERSED)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rect);
    } else {
        let (display, style) = if content.is_empty() {
            (placeholder, app.theme.muted_style())
        } else {
            (content, app.theme.style())
        };
        frame.render_widget(Paragraph::new(display.to_string()).style(style), rect);
    }
}

fn input_rect(area: Rect, y: u16) -> Rect {
    Rect::new(area.x + 16, y, area.width.saturating_sub(18), 1)
}

fn draw_button(frame: &mut Frame, area: Rect, app: &ServiceRequestApp, text: &str, active: bool) {
    let button_y = area.y + area.height.saturating_sub(2);
    let button_style = if active {
        app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        app.theme.muted_style().add_modifier(Modifier::REVERSED)
    };

    frame.render_widget(
        Paragraph::new(text.to_string()).style(button_style),
        Rect::new(area.x + 2, button_y, (text.len() as u16).min(area.width.saturating_sub(2)), 1),
    );
}

/// Offset that keeps `selected` inside a window of `height` rows
fn scroll_offset(selected: usize, height: usize) -> usize {
    if height > 0 && selected >= height {
        selected - height + 1
    } else {
        0
    }
}
