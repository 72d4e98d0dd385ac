use serde::{Deserialize, Serialize};

/// Narrow formatting capability injected into the engine so it never
/// implements host-facing number formatting itself.
pub trait ValueFormatter {
    fn format(&self, value: f64) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
    Raw,
    Currency,
    #[default]
    Thousands,
}

/// Declarative number-format configuration carried by chart config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NumberFormatSpec {
    pub mode: FormatMode,
    #[serde(default)]
    pub symbol: String,
}

/// Concrete formatter for bar labels, popup values and axis ticks.
///
/// `si` switches to SI-scaled notation (k/M/G/T), used for axis ticks where
/// space is tight.
#[derive(Debug, Clone)]
pub struct NumberFormat {
    mode: FormatMode,
    symbol: String,
    si: bool,
}

impl NumberFormat {
    #[must_use]
    pub fn new(spec: NumberFormatSpec, si: bool) -> Self {
        Self {
            mode: spec.mode,
            symbol: spec.symbol,
            si,
        }
    }
}

impl ValueFormatter for NumberFormat {
    fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let body = if self.si {
            let (scaled, suffix) = si_scale(value);
            format!("{}{suffix}", format_decimal(scaled, 1))
        } else {
            match self.mode {
                FormatMode::Raw => format_decimal(value, 2),
                FormatMode::Currency | FormatMode::Thousands => {
                    group_thousands(&format_decimal(value, 2))
                }
            }
        };

        match self.mode {
            FormatMode::Currency => format!("{}{body}", self.symbol),
            FormatMode::Raw | FormatMode::Thousands => body,
        }
    }
}

/// Uppercases the first character, the way legend and popup captions render.
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn si_scale(value: f64) -> (f64, &'static str) {
    let abs = value.abs();
    if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "G")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "k")
    } else {
        (value, "")
    }
}

/// Fixed-precision rendering with trailing zeros (and a bare trailing
/// separator) trimmed.
fn format_decimal(value: f64, precision: usize) -> String {
    let mut text = format!("{value:.precision$}");
    if let Some(index) = text.find('.') {
        let mut trim_start = text.len();
        for (idx, ch) in text.char_indices().rev() {
            if idx <= index || ch != '0' {
                break;
            }
            trim_start = idx;
        }
        if trim_start < text.len() {
            text.truncate(trim_start);
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" { "0".to_owned() } else { text }
}

fn group_thousands(text: &str) -> String {
    let (sign, digits_and_fraction) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (integer, fraction) = match digits_and_fraction.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits_and_fraction, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, ch) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}
