//! Core data models for the profile card generator.
//! Wire types are camelCase JSON, matching the profile API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every field of a profile except its id. This is also the create payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDetails {
    pub name: String,
    /// Absolute URL of the uploaded image; empty if the upload never finished.
    pub image_url: String,
    pub birth_year: String,
    /// Two-digit, zero-padded.
    pub birth_month: String,
    /// Two-digit, zero-padded.
    pub birth_day: String,
    pub career: String,
    /// An [`Mbti`] code or empty.
    pub mbti: String,
    pub hobbies: String,
    pub remarks: String,
}

/// A stored profile as returned by the API. Never mutated client side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub details: ProfileDetails,
}

impl Profile {
    /// `YYYY/MM/DD`, only when all three parts are present.
    pub fn birth_date(&self) -> Option<String> {
        let d = &self.details;
        if d.birth_year.is_empty() || d.birth_month.is_empty() || d.birth_day.is_empty() {
            return None;
        }
        Some(format!("{}/{}/{}", d.birth_year, d.birth_month, d.birth_day))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mbti {
    Intj,
    Intp,
    Entj,
    Entp,
    Infj,
    Infp,
    Enfj,
    Enfp,
    Istj,
    Isfj,
    Estj,
    Esfj,
    Istp,
    Isfp,
    Estp,
    Esfp,
}

impl Mbti {
    /// Display order of the selector grid (four per row).
    pub const ALL: [Mbti; 16] = [
        Mbti::Intj, Mbti::Intp, Mbti::Entj, Mbti::Entp, Mbti::Infj, Mbti::Infp, Mbti::Enfj,
        Mbti::Enfp, Mbti::Istj, Mbti::Isfj, Mbti::Estj, Mbti::Esfj, Mbti::Istp, Mbti::Isfp,
        Mbti::Estp, Mbti::Esfp,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Mbti::Intj => "INTJ",
            Mbti::Intp => "INTP",
            Mbti::Entj => "ENTJ",
            Mbti::Entp => "ENTP",
            Mbti::Infj => "INFJ",
            Mbti::Infp => "INFP",
            Mbti::Enfj => "ENFJ",
            Mbti::Enfp => "ENFP",
            Mbti::Istj => "ISTJ",
            Mbti::Isfj => "ISFJ",
            Mbti::Estj => "ESTJ",
            Mbti::Esfj => "ESFJ",
            Mbti::Istp => "ISTP",
            Mbti::Isfp => "ISFP",
            Mbti::Estp => "ESTP",
            Mbti::Esfp => "ESFP",
        }
    }
}

impl fmt::Display for Mbti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Mbti {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Mbti::ALL
            .into_iter()
            .find(|m| m.code() == upper)
            .ok_or_else(|| format!("unknown MBTI code: {s}"))
    }
}

/// Percentage-based crop region. Every component lies in `[0, 100]` and the
/// region never extends past the right or bottom edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for CropRect {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, width: 100.0, height: 100.0 }
    }
}

impl CropRect {
    pub fn clamped(self) -> Self {
        let pct = |v: f64| if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 };
        let x = pct(self.x);
        let y = pct(self.y);
        Self {
            x,
            y,
            width: pct(self.width).min(100.0 - x),
            height: pct(self.height).min(100.0 - y),
        }
    }

    /// Largest square centred on a `width` x `height` image.
    pub fn centered_square(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return Self::default();
        }
        let side = width.min(height) as f64;
        let w = side / width as f64 * 100.0;
        let h = side / height as f64 * 100.0;
        Self { x: (100.0 - w) / 2.0, y: (100.0 - h) / 2.0, width: w, height: h }
    }

    /// Keeps the origin and `width`, and derives `height` so the region
    /// covers a square of pixels on a `width` x `height` image. The square
    /// shrinks until it fits inside the image.
    pub fn square_on(self, width: u32, height: u32) -> Self {
        let c = self.clamped();
        if width == 0 || height == 0 {
            return c;
        }
        // height% per width%
        let ratio = width as f64 / height as f64;
        let side = c.width.min((100.0 - c.y) / ratio);
        Self { width: side, height: (side * ratio).min(100.0 - c.y), ..c }
    }
}

/// Fields that carry a soft character limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitedField {
    Name,
    Career,
    Hobbies,
    Remarks,
}

impl LimitedField {
    pub fn limit(self) -> usize {
        match self {
            LimitedField::Name => 30,
            LimitedField::Career => 300,
            LimitedField::Hobbies | LimitedField::Remarks => 1000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LimitedField::Name => "Name",
            LimitedField::Career => "Career",
            LimitedField::Hobbies => "Hobbies & skills",
            LimitedField::Remarks => "Remarks",
        }
    }

    /// Warns once the value reaches the limit. Never blocks submission.
    pub fn warning(self, value: &str) -> Option<String> {
        if value.chars().count() >= self.limit() {
            Some(format!(
                "{} must be {} characters or fewer.",
                self.label(),
                self.limit()
            ))
        } else {
            None
        }
    }
}

pub const FIRST_BIRTH_YEAR: u32 = 1900;

pub fn birth_years(last: u32) -> Vec<String> {
    (FIRST_BIRTH_YEAR..=last.max(FIRST_BIRTH_YEAR)).map(|y| y.to_string()).collect()
}

pub fn birth_months() -> Vec<String> {
    (1..=12).map(|m| format!("{:02}", m)).collect()
}

pub fn birth_days() -> Vec<String> {
    (1..=31).map(|d| format!("{:02}", d)).collect()
}
