//! Color theme system for duprev.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI
//! surface duprev renders. Two built-in themes are provided:
//!
//! - `dark` — uses ANSI 16 colors (`Color::Reset`, `Color::DarkGray`, etc.)
//!   so it works on any terminal including 256-color SSH sessions with no
//!   truecolor support.
//! - `catppuccin_mocha` — Catppuccin Mocha palette in RGB; requires truecolor.

use ratatui::style::Color;

/// All color values used across duprev's UI surfaces.
///
/// Every field is a `ratatui::style::Color`. Callers use `theme.field`
/// directly inside `Style::default().fg(theme.border_active)`.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the currently focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // File rows
    /// Mark for files being kept.
    pub mark_keep: Color,
    /// Mark for files selected for deletion.
    pub mark_delete: Color,
    /// Badge for the backend-suggested keep.
    pub badge_suggested: Color,
    /// Secondary file metadata: path, modified date, mime.
    pub file_meta: Color,

    // Scan strip
    /// Scan in progress (counter and progress line).
    pub scan_running: Color,
    /// Scan finished cleanly.
    pub scan_complete: Color,
    /// Scan failed.
    pub scan_error: Color,

    // Numbers worth noticing
    /// Reclaimable sizes and selection byte totals.
    pub size_accent: Color,

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground (general text).
    pub status_bar_fg: Color,
    /// Mode indicator color in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator color while typing a filter.
    pub status_mode_input: Color,
    /// Transient success messages.
    pub status_success: Color,
    /// Transient error messages.
    pub status_error: Color,

    // General
    /// Application background (used for clearing areas).
    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    ///
    /// Works on all terminals: 16-color, 256-color, and truecolor. Suitable
    /// as the default when no config is present or color capability is
    /// unknown.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            mark_keep: Color::Green,
            mark_delete: Color::Red,
            badge_suggested: Color::Yellow,
            file_meta: Color::DarkGray,

            scan_running: Color::Cyan,
            scan_complete: Color::Green,
            scan_error: Color::Red,

            size_accent: Color::Magenta,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_input: Color::Green,
            status_success: Color::Green,
            status_error: Color::Red,

            background: Color::Reset,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Requires a truecolor terminal. Colors degrade to the nearest ANSI
    /// 256-color approximation on non-truecolor terms, but visual fidelity
    /// is reduced. Use `dark()` on SSH or 256-color terminals.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        // Catppuccin Mocha palette (selected subset)
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let teal = Color::Rgb(148, 226, 213); // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387
        let mauve = Color::Rgb(203, 166, 247); // #cba6f7

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            mark_keep: green,
            mark_delete: red,
            badge_suggested: yellow,
            file_meta: overlay1,

            scan_running: teal,
            scan_complete: green,
            scan_error: red,

            size_accent: mauve,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_input: green,
            status_success: green,
            status_error: peach,

            background: base,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never
    /// prevents startup. The fallback is logged to stderr (not a hard
    /// error).
    ///
    /// # Arguments
    ///
    /// * `name` — theme name from config, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                eprintln!("duprev: unknown theme '{}', falling back to 'dark'", other);
                Self::dark()
            }
        }
    }
}
