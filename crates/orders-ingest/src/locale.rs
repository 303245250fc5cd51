//! Locale resources: date parsing, date and number formatting, UI strings.
//!
//! A [`LocaleContext`] is built explicitly for one language tag and passed to
//! whatever needs it; nothing here is process-wide. Two locales ship with the
//! crate, `en-US` and `es-ES`, each with an embedded message catalog.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::{IngestError, ParseError, Result};

const EN_US_MESSAGES: &str = include_str!("../resources/en-US.json");
const ES_ES_MESSAGES: &str = include_str!("../resources/es-ES.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    EnUs,
    EsEs,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::EnUs, Locale::EsEs];

    /// Full language tag, e.g. `en-US`.
    pub fn language(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::EsEs => "es-ES",
        }
    }

    /// Formatting locale, e.g. `en`.
    pub fn short(&self) -> &'static str {
        match self {
            Locale::EnUs => "en",
            Locale::EsEs => "es",
        }
    }

    fn catalog(&self) -> &'static str {
        match self {
            Locale::EnUs => EN_US_MESSAGES,
            Locale::EsEs => ES_ES_MESSAGES,
        }
    }

    fn symbols(&self) -> &'static Symbols {
        match self {
            Locale::EnUs => &EN_SYMBOLS,
            Locale::EsEs => &ES_SYMBOLS,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.language())
    }
}

impl FromStr for Locale {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace('_', "-").to_ascii_lowercase();
        Locale::ALL
            .into_iter()
            .find(|locale| {
                normalized == locale.language().to_ascii_lowercase() || normalized == locale.short()
            })
            .ok_or_else(|| IngestError::UnknownLocale(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `{0:d}`
    Short,
    /// `{0:D}`
    Long,
}

struct Symbols {
    decimal: char,
    group: char,
    /// Integer digits required before grouping kicks in, CLDR style.
    min_grouping_digits: usize,
    months: [&'static str; 12],
    weekdays: [&'static str; 7],
}

const EN_SYMBOLS: Symbols = Symbols {
    decimal: '.',
    group: ',',
    min_grouping_digits: 1,
    months: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    weekdays: [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ],
};

const ES_SYMBOLS: Symbols = Symbols {
    decimal: ',',
    group: '.',
    min_grouping_digits: 2,
    months: [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ],
    weekdays: [
        "lunes",
        "martes",
        "miércoles",
        "jueves",
        "viernes",
        "sábado",
        "domingo",
    ],
};

#[derive(Debug, Clone)]
pub struct LocaleContext {
    locale: Locale,
    messages: BTreeMap<String, String>,
    fallback: BTreeMap<String, String>,
}

impl LocaleContext {
    /// Build the context for a language tag (`en-US`, `es-ES`, `en`, `es`).
    pub fn new(tag: &str) -> Result<Self> {
        Self::for_locale(Locale::from_str(tag)?)
    }

    pub fn for_locale(locale: Locale) -> Result<Self> {
        Ok(Self {
            locale,
            messages: load_catalog(locale)?,
            fallback: load_catalog(Locale::EnUs)?,
        })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn language(&self) -> &'static str {
        self.locale.language()
    }

    /// Parse `value` with a chrono format string.
    ///
    /// Formats without a time component yield midnight of the parsed day.
    pub fn parse_date(
        &self,
        value: &str,
        format: &str,
    ) -> std::result::Result<NaiveDateTime, ParseError> {
        let trimmed = value.trim();
        NaiveDateTime::parse_from_str(trimmed, format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(trimmed, format)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| ParseError::Date {
                value: value.to_string(),
                format: format.to_string(),
            })
    }

    /// Parse a number written with this locale's separators.
    pub fn parse_number(&self, value: &str) -> std::result::Result<f64, ParseError> {
        let symbols = self.locale.symbols();
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| *ch != symbols.group)
            .map(|ch| if ch == symbols.decimal { '.' } else { ch })
            .collect();
        normalized.parse().map_err(|_| ParseError::Number {
            value: value.to_string(),
        })
    }

    pub fn format_date(&self, value: NaiveDateTime, style: DateStyle) -> String {
        let symbols = self.locale.symbols();
        let month = symbols.months[value.month0() as usize];
        let weekday = symbols.weekdays[value.weekday().num_days_from_monday() as usize];
        match (self.locale, style) {
            (Locale::EnUs, DateStyle::Short) => {
                format!("{}/{}/{}", value.month(), value.day(), value.year())
            }
            (Locale::EnUs, DateStyle::Long) => {
                format!("{weekday}, {month} {}, {}", value.day(), value.year())
            }
            (Locale::EsEs, DateStyle::Short) => {
                format!("{}/{}/{}", value.day(), value.month(), value.year())
            }
            (Locale::EsEs, DateStyle::Long) => {
                format!("{weekday}, {} de {month} de {}", value.day(), value.year())
            }
        }
    }

    pub fn decimal_separator(&self) -> char {
        self.locale.symbols().decimal
    }

    pub fn format_number(&self, value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let symbols = self.locale.symbols();
        let fixed = format!("{:.*}", decimals, value.abs());
        let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
        let mut out = String::with_capacity(fixed.len() + 4);
        if value < 0.0 && fixed.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
            out.push('-');
        }
        out.push_str(&group_digits(integer, symbols.group, symbols.min_grouping_digits));
        if !fraction.is_empty() {
            out.push(symbols.decimal);
            out.push_str(fraction);
        }
        out
    }

    /// Translated UI string, falling back to English and then to the key.
    pub fn message<'a>(&'a self, key: &'a str) -> &'a str {
        self.messages
            .get(key)
            .or_else(|| self.fallback.get(key))
            .map_or(key, String::as_str)
    }

    /// Translated UI string with `{0}`, `{1}`... placeholders filled in.
    pub fn format_message(&self, key: &str, args: &[&str]) -> String {
        let mut text = self.message(key).to_string();
        for (index, arg) in args.iter().enumerate() {
            text = text.replace(&format!("{{{index}}}"), arg);
        }
        text
    }
}

fn load_catalog(locale: Locale) -> Result<BTreeMap<String, String>> {
    serde_json::from_str(locale.catalog()).map_err(|source| IngestError::Messages {
        locale: locale.language().to_string(),
        source,
    })
}

fn group_digits(integer: &str, separator: char, min_grouping_digits: usize) -> String {
    if integer.len() < 3 + min_grouping_digits {
        return integer.to_string();
    }
    let mut out = String::with_capacity(integer.len() + integer.len() / 3);
    for (pos, ch) in integer.chars().enumerate() {
        if pos > 0 && (integer.len() - pos) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
