//! Colour theme: defaults and `theme.conf` persistence.

use ratatui::style::Color;

/// Colour palette for the portal screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub focus_border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

const KEYS: [&str; 13] = [
    "text",
    "muted",
    "title",
    "border",
    "focus_border",
    "header_bg",
    "header_fg",
    "status_bg",
    "status_fg",
    "highlight_fg",
    "highlight_bg",
    "success",
    "error",
];

impl Default for Theme {
    fn default() -> Self {
        Self::portal()
    }
}

impl Theme {
    /// Default palette: portal blue chrome on a dark background.
    pub fn portal() -> Self {
        Self {
            text: Color::Rgb(0xe5, 0xe7, 0xeb),
            muted: Color::Rgb(0x9c, 0xa3, 0xaf),
            title: Color::Rgb(0x0d, 0x6e, 0xfd), // bootstrap primary
            border: Color::Rgb(0x4b, 0x55, 0x63),
            focus_border: Color::Rgb(0x0d, 0x6e, 0xfd),
            header_bg: Color::Rgb(0x0d, 0x6e, 0xfd),
            header_fg: Color::Rgb(0xff, 0xff, 0xff),
            status_bg: Color::Rgb(0x1f, 0x29, 0x37),
            status_fg: Color::Rgb(0xe5, 0xe7, 0xeb),
            highlight_fg: Color::Rgb(0xff, 0xc1, 0x07),
            highlight_bg: Color::Rgb(0x37, 0x41, 0x51),
            success: Color::Rgb(0x19, 0x87, 0x54),
            error: Color::Rgb(0xdc, 0x35, 0x45),
        }
    }

    /// Plain 16-colour palette for terminals without truecolor.
    pub fn basic() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            focus_border: Color::Cyan,
            header_bg: Color::Blue,
            header_fg: Color::White,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Pick a built-in palette by name.
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "portal" | "default" => Some(Self::portal()),
            "basic" | "16" => Some(Self::basic()),
            _ => None,
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "focus_border" => &mut self.focus_border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "success" => &mut self.success,
            "error" => &mut self.error,
            _ => return None,
        })
    }

    fn get(&self, key: &str) -> Option<Color> {
        let mut copy = *self;
        copy.slot(key).map(|c| *c)
    }

    /// Load from a `key = value` file; unknown keys and bad colours are skipped.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::portal();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            if let (Some(slot), Some(color)) = (theme.slot(key.trim()), parse_color(val)) {
                *slot = color;
            }
        }
        Some(theme)
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# usermgmt-portal theme\n");
        buf.push_str("# Colors: #RRGGBB or 'reset'\n\n");
        for key in KEYS {
            if let Some(c) = self.get(key) {
                let _ = writeln!(&mut buf, "{key} = {}", color_to_str(c));
            }
        }
        std::fs::write(path, buf)
    }

    /// Load `path`, or write the default palette there and return it.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let t = Self::default();
        if let Err(e) = t.write_file(path) {
            tracing::debug!(%e, path, "could not write default theme");
        }
        t
    }
}

fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(byte(0)?, byte(2)?, byte(4)?))
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{r:02X}{g:02X}{b:02X}"),
        Color::Black => "#000000".into(),
        Color::Red => "#CC0000".into(),
        Color::Green => "#00AA00".into(),
        Color::Yellow => "#CCCC00".into(),
        Color::Blue => "#0000CC".into(),
        Color::Cyan => "#00CCCC".into(),
        Color::Gray => "#B3B3B3".into(),
        Color::DarkGray => "#4D4D4D".into(),
        Color::White => "#FFFFFF".into(),
        _ => "reset".into(),
    }
}
