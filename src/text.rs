use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ImportError, Result};
use crate::models::Currency;

const POSITIVE_WORDS: &[&str] = &["positive", "credit", "deposit", "gain", "increase", "bij"];
const NEGATIVE_WORDS: &[&str] = &["negative", "debit", "withdrawal", "loss", "decrease", "af"];

pub const ELLIPSIS: &str = "...";

/// `-1` as a maximum length means "do not shorten".
pub const UNLIMITED: i64 = -1;

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Parse a bank-formatted number into a decimal.
///
/// Any non-digit character after the optional leading sign counts as a
/// separator. The last one becomes the decimal point and every other one is
/// dropped, so `1.234,56`, `1,234.56` and `1 234,56` all parse the same way.
pub fn convert_text_to_decimal(text: &str) -> Result<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let (sign, body) = match text.chars().next() {
        Some(c @ ('+' | '-')) => (Some(c), text[1..].trim()),
        _ => (None, text),
    };

    let last_separator = body.char_indices().filter(|(_, c)| !c.is_ascii_digit()).last();
    let mut number = String::with_capacity(body.len() + 1);
    if let Some(c) = sign {
        number.push(c);
    }
    for (i, c) in body.char_indices() {
        if c.is_ascii_digit() {
            number.push(c);
        } else if last_separator.map(|(idx, _)| idx) == Some(i) {
            number.push('.');
        }
    }

    if !number.chars().any(|c| c.is_ascii_digit()) {
        return Err(ImportError::InvalidDecimal(text.to_string()));
    }
    Decimal::from_str(&number).map_err(|_| ImportError::InvalidDecimal(text.to_string()))
}

/// Numeric spreadsheet cells arrive as floats; keep cents, ties to even.
pub fn convert_number_to_decimal(value: f64) -> Result<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .ok_or_else(|| ImportError::InvalidDecimal(value.to_string()))
}

pub fn convert_text_to_sign(text: &str) -> Result<i8> {
    let word = text.to_lowercase();
    if POSITIVE_WORDS.contains(&word.as_str()) {
        Ok(1)
    } else if NEGATIVE_WORDS.contains(&word.as_str()) {
        Ok(-1)
    } else {
        Err(ImportError::UnknownSign(word))
    }
}

pub fn convert_text_to_currency(text: &str) -> Result<Currency> {
    let code: String = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect::<String>()
        .to_uppercase();
    code.parse()
}

// ---------------------------------------------------------------------------
// Free text
// ---------------------------------------------------------------------------

/// Drop everything but ASCII letters, digits and whitespace, then lowercase.
pub fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

pub fn reduce_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shorten `text` to at most `max_length` characters without cutting a word
/// in half, appending [`ELLIPSIS`] when anything was removed.
pub fn shorten_text(text: &str, max_length: i64) -> Result<String> {
    if max_length < UNLIMITED {
        return Err(ImportError::InvalidMaxLength(max_length));
    }
    if max_length == UNLIMITED {
        return Ok(text.to_string());
    }

    let limit = max_length as usize;
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= limit {
        return Ok(text.to_string());
    }

    // chars[limit] exists here, so a break right after the limit counts too.
    let cut = (0..=limit).rev().find(|&i| chars[i].is_whitespace()).unwrap_or(0);
    let kept: String = chars[..cut].iter().collect();
    Ok(format!("{}{ELLIPSIS}", kept.trim_end()))
}

// ---------------------------------------------------------------------------
// File names
// ---------------------------------------------------------------------------

/// Compile a filename pattern. Patterns match from the start of the basename
/// but do not need to consume all of it.
pub fn compile_filename_pattern(pattern: &str) -> Result<Regex> {
    if pattern.is_empty() {
        return Err(ImportError::EmptyPattern);
    }
    Ok(Regex::new(&format!("^(?:{pattern})"))?)
}

pub fn basename(filepath: &Path) -> String {
    filepath
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn require_path(filepath: &Path) -> Result<()> {
    if filepath.as_os_str().is_empty() {
        return Err(ImportError::EmptyPath);
    }
    Ok(())
}

pub fn match_filepath_extension(filepath: &Path, extension: &str) -> Result<bool> {
    require_path(filepath)?;
    Ok(filepath.to_string_lossy().ends_with(extension))
}

pub fn match_filepath_pattern(filepath: &Path, pattern: &Regex) -> Result<bool> {
    require_path(filepath)?;
    Ok(pattern.is_match(&basename(filepath)))
}

/// Pull the `date` capture group out of the basename and parse it.
pub fn extract_date_from_filename(filepath: &Path, pattern: &Regex, date_format: &str) -> Result<NaiveDate> {
    let filename = basename(filepath);
    let date_str = pattern
        .captures(&filename)
        .and_then(|caps| caps.name("date"))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ImportError::FilenameMismatch {
            filename: filename.clone(),
            pattern: pattern.as_str().to_string(),
        })?;
    NaiveDate::parse_from_str(&date_str, date_format).map_err(|_| ImportError::InvalidDate {
        key: filename,
        value: date_str,
        format: date_format.to_string(),
    })
}

/// Inclusive range check on the filename date. Open bounds always pass.
pub fn match_filepath_date(
    filepath: &Path,
    pattern: &Regex,
    date_format: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<bool> {
    require_path(filepath)?;
    let file_date = extract_date_from_filename(filepath, pattern, date_format)?;
    if start_date.is_some_and(|start| file_date < start) {
        return Ok(false);
    }
    if end_date.is_some_and(|end| file_date > end) {
        return Ok(false);
    }
    Ok(true)
}
