//! Screen layout calculations

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of the in-game screen
pub struct AppLayout {
    pub title_area: Rect,
    pub question_area: Rect,
    pub sidebar_area: Rect,
    pub status_bar: Rect,
    pub hotkey_bar: Rect,
}

impl AppLayout {
    /// Question on the left (70%), wallet on the right (30%)
    pub fn calculate(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(10),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(rows[1]);

        Self {
            title_area: rows[0],
            question_area: columns[0],
            sidebar_area: columns[1],
            status_bar: rows[2],
            hotkey_bar: rows[3],
        }
    }
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect_fixed(50, 20, area);
        assert_eq!(popup, Rect::new(25, 10, 50, 20));

        let tiny = centered_rect_fixed(50, 20, Rect::new(0, 0, 30, 10));
        assert_eq!(tiny, Rect::new(0, 0, 30, 10));
    }

    #[test]
    fn test_layout_split() {
        let layout = AppLayout::calculate(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.title_area.height, 1);
        assert_eq!(layout.status_bar.height, 3);
        assert_eq!(layout.question_area.width, 70);
        assert_eq!(layout.sidebar_area.width, 30);
    }
}
