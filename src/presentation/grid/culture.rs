use chrono::NaiveDateTime;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Culture {
    #[default]
    EnUs,
    EnGb,
    LtLt,
}

impl Culture {
    pub const ALL: [Culture; 3] = [Culture::EnUs, Culture::EnGb, Culture::LtLt];

    pub fn name(self) -> &'static str {
        match self {
            Culture::EnUs => "en-US",
            Culture::EnGb => "en-GB",
            Culture::LtLt => "lt-LT",
        }
    }

    /// Short date pattern, e.g. `M/d/yyyy`.
    pub fn short_date_pattern(self) -> &'static str {
        match self {
            Culture::EnUs => "M/d/yyyy",
            Culture::EnGb => "dd/MM/yyyy",
            Culture::LtLt => "yyyy-MM-dd",
        }
    }

    pub fn no_data_found(self) -> &'static str {
        match self {
            Culture::EnUs | Culture::EnGb => "No data found",
            Culture::LtLt => "Duomenų nerasta",
        }
    }

    pub fn format_short_date(self, value: NaiveDateTime) -> String {
        format_with_pattern(value, self.short_date_pattern())
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Culture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Culture::ALL
            .into_iter()
            .find(|culture| culture.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported culture '{s}'"))
    }
}

pub fn format_with_pattern(value: NaiveDateTime, pattern: &str) -> String {
    value.format(&strftime_pattern(pattern)).to_string()
}

/// Translates a culture date pattern (`yyyy`, `MM`, `d`, `HH`, `mm`, `ss`)
/// to a chrono format string. Other characters are copied literally.
pub fn strftime_pattern(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&next| next == c).count();
        let piece = match (c, run) {
            ('y', 1 | 2) => Some("%y"),
            ('y', _) => Some("%Y"),
            ('M', 1) => Some("%-m"),
            ('M', 2) => Some("%m"),
            ('M', 3) => Some("%b"),
            ('M', _) => Some("%B"),
            ('d', 1) => Some("%-d"),
            ('d', 2) => Some("%d"),
            ('d', 3) => Some("%a"),
            ('d', _) => Some("%A"),
            ('H', 1) => Some("%-H"),
            ('H', _) => Some("%H"),
            ('h', 1) => Some("%-I"),
            ('h', _) => Some("%I"),
            ('m', 1) => Some("%-M"),
            ('m', _) => Some("%M"),
            ('s', 1) => Some("%-S"),
            ('s', _) => Some("%S"),
            ('t', _) => Some("%p"),
            _ => None,
        };

        match piece {
            Some(piece) => out.push_str(piece),
            None => {
                for _ in 0..run {
                    if c == '%' {
                        out.push_str("%%");
                    } else {
                        out.push(c);
                    }
                }
            }
        }
        i += run;
    }

    out
}
