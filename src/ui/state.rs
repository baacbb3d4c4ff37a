//! # Immutable menu state machine.
//!
//! [`UiState`] is a small `Copy` value. Every transition takes the current
//! state by value and returns a new one; nothing is mutated in place, so the
//! renderer can never observe a half-applied transition.
//!
//! ## Transitions
//! ```text
//! on_press_select   selected = cursor, health = OK
//! on_press_next     cursor = (cursor + 1) mod len, scroll = minimal shift keeping cursor visible
//! on_app_started    health = OK
//! on_app_exited     health = Exited
//! on_app_failed     health = Failed
//! on_display_task   no change
//! ```
//!
//! ## Invariants
//! - `cursor_index < len` (for a non-empty menu)
//! - `scroll_index <= cursor_index < scroll_index + num_visible_lines`
//! - `scroll_index` is the smallest shift satisfying the bound above, given the previous scroll

/// Last known lifecycle classification of the selected program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProcessHealth {
    /// Running, or about to be started.
    #[default]
    Ok,
    /// Exited with code 0.
    Exited,
    /// Failed, or supervision gave up.
    Failed,
}

/// Menu state: cursor, scroll window, selection and health of the selected program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    cursor_index: usize,
    scroll_index: usize,
    selected_index: Option<usize>,
    health: ProcessHealth,
}

impl UiState {
    /// Initial state: cursor and scroll at 0, nothing selected, health OK.
    pub const fn new() -> Self {
        Self {
            cursor_index: 0,
            scroll_index: 0,
            selected_index: None,
            health: ProcessHealth::Ok,
        }
    }

    /// Row under the cursor.
    #[inline]
    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    /// First visible row.
    #[inline]
    pub fn scroll_index(&self) -> usize {
        self.scroll_index
    }

    /// Selected row, if any.
    #[inline]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Health of the selected program.
    #[inline]
    pub fn health(&self) -> ProcessHealth {
        self.health
    }

    /// Selects the row under the cursor and resets health to OK.
    #[must_use]
    pub fn on_press_select(self) -> Self {
        Self {
            selected_index: Some(self.cursor_index),
            health: ProcessHealth::Ok,
            ..self
        }
    }

    /// Moves the cursor to the next row (wrapping) and scrolls minimally to keep it visible.
    ///
    /// `len` is the number of menu rows; an empty menu leaves the state unchanged.
    ///
    /// # Example
    /// ```
    /// use tasker::UiState;
    ///
    /// let s = UiState::new().on_press_next(3, 2).on_press_next(3, 2);
    /// assert_eq!((s.cursor_index(), s.scroll_index()), (2, 1));
    ///
    /// let s = s.on_press_next(3, 2);
    /// assert_eq!((s.cursor_index(), s.scroll_index()), (0, 0));
    /// ```
    #[must_use]
    pub fn on_press_next(self, len: usize, num_visible_lines: usize) -> Self {
        if len == 0 {
            return self;
        }
        let num_lines = num_visible_lines.max(1);
        let cursor_index = (self.cursor_index + 1) % len;

        let scroll_index = if cursor_index >= self.scroll_index + num_lines {
            cursor_index + 1 - num_lines
        } else if cursor_index < self.scroll_index {
            cursor_index
        } else {
            self.scroll_index
        };

        Self {
            cursor_index,
            scroll_index,
            ..self
        }
    }

    /// The selected program was started.
    #[must_use]
    pub fn on_app_started(self) -> Self {
        self.with_health(ProcessHealth::Ok)
    }

    /// The selected program exited successfully.
    #[must_use]
    pub fn on_app_exited(self) -> Self {
        self.with_health(ProcessHealth::Exited)
    }

    /// The selected program failed or supervision gave up.
    #[must_use]
    pub fn on_app_failed(self) -> Self {
        self.with_health(ProcessHealth::Failed)
    }

    /// A one-shot task finished. Task results are not surfaced yet.
    #[must_use]
    pub fn on_display_task(self, _code: Option<i32>, _output: &str) -> Self {
        self
    }

    fn with_health(self, health: ProcessHealth) -> Self {
        Self { health, ..self }
    }
}
