//! Request input validation for the proxy endpoints
//!
//! Shared so the browser can reject bad input before it leaves the page.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use validator::Validate;

use crate::types::Coordinates;

/// Longest accepted search query, in characters
pub const MAX_QUERY_LENGTH: usize = 100;

/// Input rejected before any provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Latitude (lat) and longitude (lon) are required")]
    MissingCoordinates,

    #[error("Latitude and longitude must be valid numbers within range")]
    InvalidCoordinates,

    #[error("Search query (q) is required")]
    MissingQuery,

    #[error("Invalid search query format")]
    InvalidQueryFormat,
}

impl InputError {
    /// Wire error code
    pub fn code(&self) -> &'static str {
        match self {
            InputError::MissingCoordinates | InputError::MissingQuery => "INVALID_PARAMS",
            InputError::InvalidCoordinates => "INVALID_COORDS",
            InputError::InvalidQueryFormat => "INVALID_QUERY_FORMAT",
        }
    }
}

// ============================================================================
// Coordinates
// ============================================================================

/// Parse and range-check raw `lat`/`lon` query values.
///
/// Absent or empty values are `MissingCoordinates`; anything that is not a
/// finite number in range is `InvalidCoordinates`.
pub fn validate_coordinates(
    lat: Option<&str>,
    lon: Option<&str>,
) -> Result<Coordinates, InputError> {
    let (lat, lon) = match (non_empty(lat), non_empty(lon)) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(InputError::MissingCoordinates),
    };

    let coords = Coordinates::new(parse_finite(lat)?, parse_finite(lon)?);
    coords
        .validate()
        .map_err(|_| InputError::InvalidCoordinates)?;
    Ok(coords)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_finite(value: &str) -> Result<f64, InputError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(InputError::InvalidCoordinates)
}

// ============================================================================
// Search queries
// ============================================================================

static SQL_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?-u:\b)(SELECT|INSERT|UPDATE|DELETE|DROP|CREATE|ALTER|EXEC|UNION)(?-u:\b)")
        .expect("static pattern")
});

static SQL_COMMENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(--|/\*|\*/|;)").expect("static pattern"));

static SQL_TAUTOLOGY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?-u:\b)(OR|AND)\s+\d+\s*=\s*\d+").expect("static pattern"));

/// Accept a place-name query: non-blank, at most [`MAX_QUERY_LENGTH`]
/// characters and free of SQL-injection shapes
pub fn is_valid_search_query(query: &str) -> bool {
    if query.trim().is_empty() {
        return false;
    }
    if query.chars().count() > MAX_QUERY_LENGTH {
        return false;
    }
    ![&*SQL_KEYWORDS, &*SQL_COMMENTS, &*SQL_TAUTOLOGY]
        .iter()
        .any(|pattern| pattern.is_match(query))
}

/// Check a raw `q` parameter and return the sanitized query
pub fn validate_search_query(query: Option<&str>) -> Result<String, InputError> {
    let query = query
        .filter(|q| !q.is_empty())
        .ok_or(InputError::MissingQuery)?;
    if !is_valid_search_query(query) {
        return Err(InputError::InvalidQueryFormat);
    }
    Ok(sanitize_input(query))
}

/// Trim, drop angle brackets, cap at [`MAX_QUERY_LENGTH`] characters
pub fn sanitize_input(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(MAX_QUERY_LENGTH)
        .collect()
}

/// Escape the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
