//! # Menu projection into draw commands.
//!
//! [`render`] is a pure query: it reads a [`UiState`], the program list and
//! the [`Styles`], and returns a [`Frame`]. Display backends decide how the
//! commands reach the screen.
//!
//! ## Row layout
//! ```text
//! y = screen_padding + k * line_height              (k = visible row number)
//!
//! ┌─────────────────────────────────────────────┐
//! │ gutter │ text at (screen_left_padding, y)   │  ← cursor row: full-width Rect
//! │  ○/●   │                                    │    ○ cursor icon, ● selected icon
//! └─────────────────────────────────────────────┘
//! ```

use crate::config::DaemonConfig;
use crate::ui::state::{ProcessHealth, UiState};
use crate::ui::styles::{Rgb, Styles};

/// One drawing primitive. Coordinates are pixels, `x1`/`y1` exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    /// Paint the whole screen.
    Fill { color: Rgb },
    /// Filled rectangle.
    Rect {
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
        fill: Rgb,
    },
    /// Ellipse inscribed in the box; outlined unless `filled`.
    Ellipse {
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
        color: Rgb,
        filled: bool,
    },
    /// Single line of text with its top-left corner at `(x, y)`.
    Text {
        x: u32,
        y: u32,
        text: String,
        color: Rgb,
    },
}

/// Ordered draw commands for one screen refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame(pub Vec<DrawCommand>);

impl Frame {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.0
    }

    /// Text commands in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Rgb)> {
        self.0.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, color, .. } => Some((text.as_str(), *color)),
            _ => None,
        })
    }
}

/// Projects the menu into a [`Frame`].
///
/// Rows from `scroll_index` are drawn until the screen is full or the list ends.
pub fn render(state: &UiState, programs: &[DaemonConfig], styles: &Styles) -> Frame {
    let line_height = styles.line_height();
    let visible = programs
        .iter()
        .enumerate()
        .skip(state.scroll_index())
        .take(styles.num_lines());

    let mut cmds = vec![DrawCommand::Fill {
        color: styles.background_color,
    }];

    for (k, (index, program)) in visible.enumerate() {
        let y = styles.screen_padding + k as u32 * line_height;
        let is_cursor = index == state.cursor_index();
        let is_selected = state.selected_index() == Some(index);

        let (ix0, iy0) = (
            styles.screen_left_padding.saturating_sub(styles.icon_size) / 2,
            y + line_height.saturating_sub(styles.icon_size) / 2,
        );
        let (ix1, iy1) = (ix0 + styles.icon_size, iy0 + styles.icon_size);
        // icons share the row's text color, health included
        let color = row_color(state, is_cursor, is_selected, styles);

        if is_cursor {
            cmds.push(DrawCommand::Rect {
                x0: 0,
                y0: y,
                x1: styles.screen_width,
                y1: y + line_height,
                fill: styles.cursor_bg_color,
            });
            cmds.push(DrawCommand::Ellipse {
                x0: ix0,
                y0: iy0,
                x1: ix1,
                y1: iy1,
                color,
                filled: false,
            });
        }
        if is_selected {
            cmds.push(DrawCommand::Ellipse {
                x0: ix0,
                y0: iy0,
                x1: ix1,
                y1: iy1,
                color,
                filled: true,
            });
        }

        cmds.push(DrawCommand::Text {
            x: styles.screen_left_padding,
            y,
            text: program.name().to_string(),
            color,
        });
    }

    Frame(cmds)
}

fn row_color(state: &UiState, is_cursor: bool, is_selected: bool, styles: &Styles) -> Rgb {
    match (is_selected, state.health()) {
        (true, ProcessHealth::Exited) => styles.text_exited_color,
        (true, ProcessHealth::Failed) => styles.text_failed_color,
        _ if is_cursor => styles.text_default_highlighted,
        _ => styles.text_default_color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgramConfig;

    fn programs(n: usize) -> Vec<DaemonConfig> {
        (0..n)
            .map(|i| DaemonConfig::new(ProgramConfig::new(format!("app{i}"), "/bin/true", Vec::<String>::new())))
            .collect()
    }

    fn names(frame: &Frame) -> Vec<&str> {
        frame.texts().map(|(t, _)| t).collect()
    }

    #[test]
    fn starts_with_background_fill() {
        let styles = Styles::default();
        let frame = render(&UiState::new(), &programs(0), &styles);
        assert_eq!(
            frame.commands(),
            &[DrawCommand::Fill {
                color: styles.background_color
            }]
        );
    }

    #[test]
    fn draws_only_the_visible_window() {
        let styles = Styles::new(240, 100, 24); // (100 - 30) / 30 = 2 rows
        assert_eq!(styles.num_lines(), 2);

        let state = UiState::new().on_press_next(5, 2).on_press_next(5, 2);
        assert_eq!(state.scroll_index(), 1);

        let frame = render(&state, &programs(5), &styles);
        assert_eq!(names(&frame), ["app1", "app2"]);

        let ys: Vec<u32> = frame
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { x, y, .. } => {
                    assert_eq!(*x, styles.screen_left_padding);
                    Some(*y)
                }
                _ => None,
            })
            .collect();
        assert_eq!(ys, [15, 45]);
    }

    #[test]
    fn cursor_row_gets_rect_and_outline_icon() {
        let styles = Styles::default();
        let frame = render(&UiState::new(), &programs(3), &styles);

        assert!(frame.commands().contains(&DrawCommand::Rect {
            x0: 0,
            y0: 15,
            x1: 240,
            y1: 45,
            fill: styles.cursor_bg_color,
        }));
        assert!(frame.commands().contains(&DrawCommand::Ellipse {
            x0: 7,
            y0: 26,
            x1: 15,
            y1: 34,
            color: styles.text_default_highlighted,
            filled: false,
        }));
        let filled = frame
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Ellipse { filled: true, .. }))
            .count();
        assert_eq!(filled, 0);
    }

    #[test]
    fn selected_row_gets_filled_icon() {
        let styles = Styles::default();
        let state = UiState::new().on_press_select().on_press_next(3, 7);
        let frame = render(&state, &programs(3), &styles);

        assert!(frame.commands().contains(&DrawCommand::Ellipse {
            x0: 7,
            y0: 26,
            x1: 15,
            y1: 34,
            color: styles.text_default_color,
            filled: true,
        }));
    }

    #[test]
    fn text_colors_follow_cursor_and_health() {
        let styles = Styles::default();
        let list = programs(3);
        // selected row 0, cursor on row 1
        let base = UiState::new().on_press_select().on_press_next(3, 7);

        let colors = |s: UiState| -> Vec<Rgb> { render(&s, &list, &styles).texts().map(|(_, c)| c).collect() };

        assert_eq!(
            colors(base),
            [
                styles.text_default_color,
                styles.text_default_highlighted,
                styles.text_default_color
            ]
        );
        assert_eq!(colors(base.on_app_failed())[0], styles.text_failed_color);
        assert_eq!(colors(base.on_app_exited())[0], styles.text_exited_color);
        // health never colors rows other than the selected one
        assert_eq!(colors(base.on_app_failed())[1], styles.text_default_highlighted);
    }

    #[test]
    fn icons_take_the_health_color_of_the_selected_row() {
        let styles = Styles::default();
        // cursor and selection both on row 0
        let state = UiState::new().on_press_select().on_app_failed();
        let frame = render(&state, &programs(3), &styles);

        let icons: Vec<_> = frame
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Ellipse { color, filled, .. } => Some((*filled, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(
            icons,
            [(false, styles.text_failed_color), (true, styles.text_failed_color)]
        );

        let exited = render(&state.on_app_exited(), &programs(3), &styles);
        assert!(exited.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Ellipse { filled: true, color, .. } if *color == styles.text_exited_color
        )));
    }

    #[test]
    fn rendering_is_a_pure_query() {
        let styles = Styles::default();
        let list = programs(4);
        let state = UiState::new().on_press_next(4, 7).on_press_select().on_app_failed();

        let a = render(&state, &list, &styles);
        let b = render(&state, &list, &styles);
        assert_eq!(a, b);
        assert_eq!(state.health(), ProcessHealth::Failed);
    }
}
