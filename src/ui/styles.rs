//! # Menu geometry and colors.

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GREY: Rgb = Rgb(128, 128, 128);
    pub const RED: Rgb = Rgb(255, 0, 0);
}

/// Screen layout and palette used by [`render`](crate::render).
///
/// `line_height` and `num_lines` are derived from the other fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styles {
    pub screen_width: u32,
    pub screen_height: u32,
    pub font_size: u32,

    pub line_padding: u32,
    pub screen_padding: u32,
    pub screen_left_padding: u32,
    pub icon_size: u32,

    pub background_color: Rgb,
    pub cursor_bg_color: Rgb,

    pub text_default_color: Rgb,
    pub text_default_highlighted: Rgb,
    pub text_exited_color: Rgb,
    pub text_failed_color: Rgb,
}

impl Styles {
    /// Styles for a screen of the given size, with default paddings and palette.
    pub fn new(screen_width: u32, screen_height: u32, font_size: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            font_size,
            line_padding: 3,
            screen_padding: 15,
            screen_left_padding: 22,
            icon_size: 8,
            background_color: Rgb::BLACK,
            cursor_bg_color: Rgb::WHITE,
            text_default_color: Rgb::WHITE,
            text_default_highlighted: Rgb::BLACK,
            text_exited_color: Rgb::GREY,
            text_failed_color: Rgb::RED,
        }
    }

    /// Height of one menu row in pixels.
    #[inline]
    pub fn line_height(&self) -> u32 {
        self.font_size + self.line_padding * 2
    }

    /// Number of rows that fit between the top and bottom padding (at least 1).
    pub fn num_lines(&self) -> usize {
        let usable = self.screen_height.saturating_sub(self.screen_padding * 2);
        let rows = usable.checked_div(self.line_height()).unwrap_or(0);
        (rows as usize).max(1)
    }
}

impl Default for Styles {
    /// 240x240 panel with a 24px font.
    fn default() -> Self {
        Self::new(240, 240, 24)
    }
}
