//! Field checks for admin forms and public submissions.
//!
//! JSON decoding already enforces shapes and types; this layer covers the
//! rules serde can't express. All failures for one payload are collected so the
//! dashboard can highlight every bad field at once.

use base64::Engine as _;
use bigdecimal::BigDecimal;
use regex::Regex;
use serde::Serialize;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::normalization::phone::is_valid_whatsapp_number;

/// Largest decoded image accepted inline as a data URI.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Image MIME types the dashboard uploader produces.
pub const ALLOWED_IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Announcement banner styles.
pub const ANNOUNCEMENT_KINDS: &[&str] = &["info", "warning", "success"];

pub const MIN_ADMIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Implemented by every create/patch input.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Accumulates field errors for one payload.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
        self
    }

    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.error(field, message);
        }
        self
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(field, !value.trim().is_empty(), "is required")
    }

    /// Like `required`, but only when the patch carries the field.
    pub fn required_opt(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.required(field, v);
        }
        self
    }

    pub fn price(&mut self, field: &str, raw: &str) -> &mut Self {
        if let Err(message) = parse_price(raw) {
            self.error(field, message);
        }
        self
    }

    pub fn image(&mut self, field: &str, raw: &str) -> &mut Self {
        if let Err(err) = validate_image(raw) {
            self.error(field, err.message());
        }
        self
    }

    pub fn http_url(&mut self, field: &str, raw: &str) -> &mut Self {
        self.check(field, is_http_url(raw), "must be a valid http(s) URL")
    }

    pub fn email(&mut self, field: &str, raw: Option<&str>) -> &mut Self {
        if let Some(v) = raw.filter(|v| !v.trim().is_empty()) {
            self.check(field, is_plausible_email(v), "must be a valid email address");
        }
        self
    }

    pub fn rating(&mut self, field: &str, rating: i32) -> &mut Self {
        self.check(field, (1..=5).contains(&rating), "must be between 1 and 5")
    }

    pub fn positive(&mut self, field: &str, value: i32) -> &mut Self {
        self.check(field, value > 0, "must be greater than zero")
    }

    pub fn announcement_kind(&mut self, field: &str, kind: &str) -> &mut Self {
        self.check(
            field,
            ANNOUNCEMENT_KINDS.contains(&kind),
            "must be one of info, warning, success",
        )
    }

    pub fn whatsapp_number(&mut self, field: &str, raw: &str) -> &mut Self {
        self.check(
            field,
            is_valid_whatsapp_number(raw),
            "must be a valid WhatsApp number (e.g. +201000000000)",
        )
    }

    /// Folds errors from a nested input under `prefix[index]`.
    pub fn nested(&mut self, prefix: &str, index: usize, nested: Result<(), Vec<FieldError>>) -> &mut Self {
        if let Err(errors) = nested {
            for e in errors {
                self.error(format!("{prefix}[{index}].{}", e.field), e.message);
            }
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

fn price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // decimal(10,2): up to 8 integer digits, up to 2 fractional digits
    PATTERN.get_or_init(|| Regex::new(r"^\d{1,8}(\.\d{1,2})?$").expect("static regex"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"))
}

/// Parses a tier price as entered in the dashboard ("9.99", "120").
pub fn parse_price(raw: &str) -> Result<BigDecimal, &'static str> {
    let trimmed = raw.trim();
    if !price_pattern().is_match(trimmed) {
        return Err("must be a non-negative amount with at most 2 decimals");
    }
    BigDecimal::from_str(trimmed).map_err(|_| "must be a valid amount")
}

pub fn is_plausible_email(raw: &str) -> bool {
    email_pattern().is_match(raw.trim())
}

pub fn is_http_url(raw: &str) -> bool {
    match url::Url::parse(raw.trim()) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some(),
        Err(_) => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    Empty,
    InvalidFormat,
    UnsupportedType,
    TooLarge,
}

impl ImageError {
    pub fn message(self) -> &'static str {
        match self {
            ImageError::Empty => "is required",
            ImageError::InvalidFormat => "must be an http(s) URL or a base64 image data URI",
            ImageError::UnsupportedType => "must be a JPG, PNG or WebP image",
            ImageError::TooLarge => "image must be less than 2MB",
        }
    }
}

/// Accepts an http(s) URL or a `data:image/<type>;base64,<payload>` URI.
pub fn validate_image(raw: &str) -> Result<(), ImageError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ImageError::Empty);
    }
    if is_http_url(raw) {
        return Ok(());
    }

    let rest = raw.strip_prefix("data:").ok_or(ImageError::InvalidFormat)?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or(ImageError::InvalidFormat)?;
    if !mime.starts_with("image/") {
        return Err(ImageError::InvalidFormat);
    }
    if !ALLOWED_IMAGE_MIME_TYPES.contains(&mime) {
        return Err(ImageError::UnsupportedType);
    }

    // Cheap bound before decoding: 4 base64 chars carry 3 bytes.
    if payload.len() / 4 * 3 > MAX_IMAGE_BYTES + 3 {
        return Err(ImageError::TooLarge);
    }
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| ImageError::InvalidFormat)?;
    if decoded.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge);
    }
    Ok(())
}
