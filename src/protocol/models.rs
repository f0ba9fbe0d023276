use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Successful response wrapper: `{status: "success", data}`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// Catalog content kind, as the upstream encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubjectType {
    #[default]
    All,
    Movie,
    TvSeries,
    Music,
    /// A code this gateway has no name for; passed through as-is.
    Other(i64),
}

impl SubjectType {
    pub fn code(self) -> i64 {
        match self {
            Self::All => 0,
            Self::Movie => 1,
            Self::TvSeries => 2,
            Self::Music => 6,
            Self::Other(code) => code,
        }
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::All,
            1 => Self::Movie,
            2 => Self::TvSeries,
            6 => Self::Music,
            other => Self::Other(other),
        }
    }

    /// Reads the `subjectType` field of a catalog item, which the upstream
    /// sends either as a number or a numeric string.
    pub fn of_item(item: &Value) -> Option<Self> {
        match item.get("subjectType")? {
            Value::Number(n) => n.as_i64().map(Self::from_code),
            Value::String(s) => s.trim().parse().ok().map(Self::from_code),
            _ => None,
        }
    }
}

impl FromStr for SubjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return Ok(Self::from_code(code));
        }
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "MOVIE" | "MOVIES" => Ok(Self::Movie),
            "TV_SERIES" | "TV" | "SERIES" => Ok(Self::TvSeries),
            "MUSIC" => Ok(Self::Music),
            _ => Err(format!("unknown subject type '{}'", s)),
        }
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "ALL"),
            Self::Movie => write!(f, "MOVIE"),
            Self::TvSeries => write!(f, "TV_SERIES"),
            Self::Music => write!(f, "MUSIC"),
            Self::Other(code) => write!(f, "{}", code),
        }
    }
}

/// One downloadable file, as emitted under `processedSources`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub id: Value,
    pub quality: String,
    pub direct_url: String,
    /// `direct_url` mounted under this gateway's download route.
    pub proxy_url: String,
    pub size: Value,
    pub format: String,
}

fn parse_or<T: FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

/// Request parameters for `/api/trending`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl TrendingQuery {
    pub fn page(&self) -> u32 {
        parse_or(self.page.as_deref(), 0)
    }

    pub fn per_page(&self) -> u32 {
        parse_or(self.per_page.as_deref(), 18)
    }
}

/// Request parameters for `/api/search/{query}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    #[serde(rename = "type")]
    pub subject_type: Option<String>,
}

impl SearchQuery {
    pub fn page(&self) -> u32 {
        parse_or(self.page.as_deref(), 1)
    }

    pub fn per_page(&self) -> u32 {
        parse_or(self.per_page.as_deref(), 24)
    }

    /// Unrecognised values search everything.
    pub fn subject_type(&self) -> SubjectType {
        parse_or(self.subject_type.as_deref(), SubjectType::All)
    }
}

/// Request parameters for `/api/sources/{movieId}`. `0/0` means "the movie
/// itself". Values are forwarded to the upstream as given; only a missing
/// or blank value becomes `0`.
#[derive(Debug, Default, Deserialize)]
pub struct SourcesQuery {
    pub season: Option<String>,
    pub episode: Option<String>,
}

fn raw_or_zero(raw: Option<&str>) -> &str {
    raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or("0")
}

impl SourcesQuery {
    pub fn season(&self) -> &str {
        raw_or_zero(self.season.as_deref())
    }

    pub fn episode(&self) -> &str {
        raw_or_zero(self.episode.as_deref())
    }
}
