//! Read-only colour palettes handed to the renderer

use palette::{LinSrgb, Mix, Srgb};
use ratatui::style::{Color, Modifier, Style};

/// Complete theme definition
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
    pub styles: ThemeStyles,
}

#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub bg_primary: Color,
    pub fg_primary: Color,
    pub fg_muted: Color,

    /// Title bar background
    pub accent: Color,
    pub border: Color,

    // Gauge gradient stops
    pub gradient_start: Srgb<u8>,
    pub gradient_end: Srgb<u8>,
}

#[derive(Debug, Clone)]
pub struct ThemeStyles {
    pub title: Style,
    pub info: Style,
    pub panel_border: Style,
    pub panel_label: Style,
    pub gauge_empty: Style,
    pub gauge_percent: Style,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "tokyo-night" | "tokyonight" => Self::tokyo_night(),
            "nord" => Self::nord(),
            _ => Self::ocean(), // Default
        }
    }

    /// Blue on the terminal's own background (default)
    pub fn ocean() -> Self {
        let colors = ThemeColors {
            bg_primary: Color::Reset,
            fg_primary: Color::Rgb(255, 255, 255),
            fg_muted: Color::Rgb(96, 96, 96),

            accent: Color::Rgb(0, 122, 204),
            border: Color::Rgb(0, 122, 204),

            gradient_start: Srgb::new(0x60, 0xbf, 0xff),
            gradient_end: Srgb::new(0xbf, 0xe5, 0xff),
        };

        Self::from_colors("Ocean", colors)
    }

    /// Tokyo Night theme
    pub fn tokyo_night() -> Self {
        let colors = ThemeColors {
            bg_primary: Color::Rgb(26, 27, 38),
            fg_primary: Color::Rgb(192, 202, 245),
            fg_muted: Color::Rgb(86, 95, 137),

            accent: Color::Rgb(122, 162, 247),
            border: Color::Rgb(41, 46, 66),

            gradient_start: Srgb::new(122, 162, 247),
            gradient_end: Srgb::new(187, 154, 247),
        };

        Self::from_colors("Tokyo Night", colors)
    }

    /// Nord theme
    pub fn nord() -> Self {
        let colors = ThemeColors {
            bg_primary: Color::Rgb(46, 52, 64),
            fg_primary: Color::Rgb(236, 239, 244),
            fg_muted: Color::Rgb(76, 86, 106),

            accent: Color::Rgb(94, 129, 172),
            border: Color::Rgb(67, 76, 94),

            gradient_start: Srgb::new(136, 192, 208),
            gradient_end: Srgb::new(163, 190, 140),
        };

        Self::from_colors("Nord", colors)
    }

    fn from_colors(name: &str, colors: ThemeColors) -> Self {
        let styles = ThemeStyles {
            title: Style::default()
                .fg(colors.fg_primary)
                .bg(colors.accent)
                .add_modifier(Modifier::BOLD),
            info: Style::default().fg(colors.fg_primary),
            panel_border: Style::default().fg(colors.border),
            panel_label: Style::default().fg(colors.fg_primary),
            gauge_empty: Style::default().fg(colors.fg_muted),
            gauge_percent: Style::default().fg(colors.fg_primary),
        };

        Self {
            name: name.to_string(),
            colors,
            styles,
        }
    }

    /// Colour at position `t` (0..=1) along the gauge gradient.
    pub fn gradient_at(&self, t: f64) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };

        let start: LinSrgb = self.colors.gradient_start.into_format::<f32>().into_linear();
        let end: LinSrgb = self.colors.gradient_end.into_format::<f32>().into_linear();
        let mixed: Srgb<u8> = Srgb::<f32>::from_linear(start.mix(end, t)).into_format();

        Color::Rgb(mixed.red, mixed.green, mixed.blue)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::ocean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_ocean() {
        assert_eq!(Theme::from_name("does-not-exist").name, "Ocean");
        assert_eq!(Theme::from_name("NORD").name, "Nord");
        assert_eq!(Theme::from_name("tokyo-night").name, "Tokyo Night");
    }

    #[test]
    fn gradient_hits_both_stops() {
        let theme = Theme::ocean();

        assert_eq!(theme.gradient_at(0.0), Color::Rgb(0x60, 0xbf, 0xff));
        assert_eq!(theme.gradient_at(1.0), Color::Rgb(0xbf, 0xe5, 0xff));
        assert_eq!(theme.gradient_at(-3.0), theme.gradient_at(0.0));
        assert_eq!(theme.gradient_at(f64::NAN), theme.gradient_at(0.0));
    }

    #[test]
    fn gradient_midpoint_is_between_stops() {
        let Color::Rgb(r, g, b) = Theme::ocean().gradient_at(0.5) else {
            panic!("expected an RGB colour");
        };

        assert!((0x60..=0xbf).contains(&r));
        assert!((0xbf..=0xe5).contains(&g));
        assert_eq!(b, 0xff);
    }
}
