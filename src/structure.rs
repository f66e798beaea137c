//! Symbolic password structures.
//!
//! [`date_structure`] is date-aware: characters covered by a recognised date
//! become `N`, the rest `L` (letter), `D` (digit) or `S` (anything else).
//! [`char_class_pattern`] ignores dates and maps each character to `L`
//! (lowercase), `U` (uppercase), `D` or `S`.

/// Character class used by the plain profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Lower,
    Upper,
    Digit,
    Symbol,
}

impl CharClass {
    pub fn of(c: char) -> Self {
        if c.is_numeric() {
            CharClass::Digit
        } else if c.is_lowercase() {
            CharClass::Lower
        } else if c.is_uppercase() {
            CharClass::Upper
        } else {
            CharClass::Symbol
        }
    }

    pub fn code(&self) -> char {
        match self {
            CharClass::Lower => 'L',
            CharClass::Upper => 'U',
            CharClass::Digit => 'D',
            CharClass::Symbol => 'S',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharClass::Lower => "Lowercase",
            CharClass::Upper => "Uppercase",
            CharClass::Digit => "Digit",
            CharClass::Symbol => "Symbol",
        }
    }
}

/// One class code per character, e.g. `Pass12!` -> `ULLLDDS`.
pub fn char_class_pattern(password: &str) -> String {
    password.chars().map(|c| CharClass::of(c).code()).collect()
}

/// Encode `password` left to right. At each position the longest date that
/// starts there is consumed as a run of `N`; otherwise a single character is
/// classified. The result has one symbol per character of `password`.
pub fn date_structure(password: &str, dates: &[String]) -> String {
    let mut by_length: Vec<&str> = dates.iter().map(String::as_str).collect();
    by_length.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut out = String::with_capacity(password.len());
    let mut pos = 0;
    while pos < password.len() {
        let rest = &password[pos..];
        if let Some(date) = by_length
            .iter()
            .find(|d| !d.is_empty() && rest.starts_with(**d))
        {
            out.extend(std::iter::repeat_n('N', date.chars().count()));
            pos += date.len();
            continue;
        }
        let Some(c) = rest.chars().next() else {
            break;
        };
        out.push(if c.is_alphabetic() {
            'L'
        } else if c.is_numeric() {
            'D'
        } else {
            'S'
        });
        pos += c.len_utf8();
    }
    out
}
