use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses `#RGB` or `#RRGGBB` hex notation, the form host color props use.
    pub fn from_hex(hex: &str) -> ChartResult<Self> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ChartError::InvalidColor(hex.to_owned()))?;
        let channel = |byte: u8| f64::from(byte) / 255.0;
        match digits.len() {
            3 => {
                let mut channels = [0.0; 3];
                for (slot, ch) in channels.iter_mut().zip(digits.chars()) {
                    let nibble = ch
                        .to_digit(16)
                        .ok_or_else(|| ChartError::InvalidColor(hex.to_owned()))?
                        as u8;
                    *slot = channel(nibble * 16 + nibble);
                }
                Ok(Self::rgb(channels[0], channels[1], channels[2]))
            }
            6 => {
                let mut channels = [0.0; 3];
                for (slot, pair) in channels.iter_mut().zip(digits.as_bytes().chunks(2)) {
                    let text = std::str::from_utf8(pair)
                        .map_err(|_| ChartError::InvalidColor(hex.to_owned()))?;
                    let byte = u8::from_str_radix(text, 16)
                        .map_err(|_| ChartError::InvalidColor(hex.to_owned()))?;
                    *slot = channel(byte);
                }
                Ok(Self::rgb(channels[0], channels[1], channels[2]))
            }
            _ => Err(ChartError::InvalidColor(hex.to_owned())),
        }
    }

    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Stroke pattern for line primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineStrokeStyle {
    Solid,
    Dashed { dash_px: f64, gap_px: f64 },
}

/// Draw command for one line segment in pixel space.
///
/// Coordinates are intentionally not validated for finiteness: malformed
/// measures surface as degenerate geometry, and backends are expected to
/// skip what they cannot draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub stroke_style: LineStrokeStyle,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            stroke_style: LineStrokeStyle::Solid,
            color,
        }
    }

    #[must_use]
    pub const fn with_stroke_style(mut self, stroke_style: LineStrokeStyle) -> Self {
        self.stroke_style = stroke_style;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Draw command for one filled rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        self.color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}
