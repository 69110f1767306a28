use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Screen regions shared by every wizard screen
pub struct Layout {
    pub header: Rect,
    pub progress: Rect,
    pub sidebar: Rect,
    pub content: Rect,
    pub message: Rect,
    pub status: Rect,
}

impl Layout {
    pub fn new(area: Rect) -> Self {
        // Message panel space is always reserved so the content doesn't jump
        let rows = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),  // Header
                Constraint::Length(1),  // Progress gauge
                Constraint::Min(10),    // Sidebar + content
                Constraint::Length(3),  // Message panel
                Constraint::Length(1),  // Status bar
            ])
            .split(area);

        let columns = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(22), Constraint::Min(30)])
            .split(rows[2]);

        Self {
            header: rows[0],
            progress: rows[1],
            sidebar: columns[0],
            content: columns[1],
            message: rows[3],
            status: rows[4],
        }
    }

    pub fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
        let horizontal = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(width),
                Constraint::Fill(1),
            ])
            .split(area);

        let vertical = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(height),
                Constraint::Fill(1),
            ])
            .split(horizontal[1]);

        vertical[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_stack_to_full_height() {
        let layout = Layout::new(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.progress.y, 1);
        assert_eq!(layout.message.height, 3);
        assert_eq!(layout.status.y, 39);
        assert_eq!(layout.sidebar.width, 22);
        assert_eq!(layout.content.x, 22);
        assert_eq!(layout.content.height, 40 - 1 - 1 - 3 - 1);
    }

    #[test]
    fn centered_box_is_centered() {
        let rect = Layout::centered_box(Rect::new(0, 0, 100, 40), 40, 10);
        assert_eq!(rect, Rect::new(30, 15, 40, 10));
    }
}
