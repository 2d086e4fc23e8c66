use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Platform {
    Instagram,
    Facebook,
    LinkedIn,
    Twitter,
    TikTok,
    /// A platform name the calendar doesn't know about, kept verbatim
    Other(String),
}

impl Platform {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::LinkedIn => "linkedin",
            Platform::Twitter => "twitter",
            Platform::TikTok => "tiktok",
            Platform::Other(s) => s,
        }
    }

    /// Two-letter tag used in the narrow calendar cells
    pub(crate) fn abbrev(&self) -> String {
        match self {
            Platform::Instagram => String::from("IG"),
            Platform::Facebook => String::from("FB"),
            Platform::LinkedIn => String::from("LI"),
            Platform::Twitter => String::from("TW"),
            Platform::TikTok => String::from("TT"),
            Platform::Other(s) => {
                let tag = s.chars().take(2).collect::<String>().to_uppercase();
                if tag.is_empty() {
                    String::from("??")
                } else {
                    tag
                }
            }
        }
    }
}

impl From<String> for Platform {
    fn from(s: String) -> Platform {
        match s.as_str() {
            "instagram" => Platform::Instagram,
            "facebook" => Platform::Facebook,
            "linkedin" => Platform::LinkedIn,
            "twitter" => Platform::Twitter,
            "tiktok" => Platform::TikTok,
            _ => Platform::Other(s),
        }
    }
}

impl From<&str> for Platform {
    fn from(s: &str) -> Platform {
        Platform::from(s.to_owned())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Status {
    Draft,
    Scheduled,
    Published,
    Failed,
    Other(String),
}

impl Status {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Status::Draft => "draft",
            Status::Scheduled => "scheduled",
            Status::Published => "published",
            Status::Failed => "failed",
            Status::Other(s) => s,
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Status {
        match s.as_str() {
            "draft" => Status::Draft,
            "scheduled" => Status::Scheduled,
            "published" => Status::Published,
            "failed" => Status::Failed,
            _ => Status::Other(s),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct CampaignRef {
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) workspace_id: Option<String>,
}

/// A single schedulable piece of social content, as exported from the
/// content store.  Only `id` and `platform` are required.
///
/// Fields that only describe the item are carried through untouched.  A
/// `scheduled_date` or `status` that isn't a string is read as missing, and
/// a null `platform` becomes an empty `Platform::Other`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct ContentItem {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) title: String,
    /// Body text of the post
    #[serde(default)]
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) content_type: Option<String>,
    #[serde(deserialize_with = "platform_or_blank")]
    pub(crate) platform: Platform,
    #[serde(default, deserialize_with = "string_or_none")]
    pub(crate) scheduled_date: Option<String>,
    /// `None` when the export carries no usable status; such items are
    /// counted in the month's total only
    #[serde(default, deserialize_with = "string_or_none")]
    pub(crate) status: Option<Status>,
    #[serde(default)]
    pub(crate) campaign_id: Option<String>,
    #[serde(default, rename = "campaigns")]
    pub(crate) campaign: Option<CampaignRef>,
}

impl ContentItem {
    /// Returns the calendar day the item is scheduled on, or `None` if it is
    /// unscheduled or its date cannot be parsed
    pub(crate) fn scheduled_day(&self) -> Option<Date> {
        self.scheduled_date.as_deref().and_then(parse_day)
    }

    pub(crate) fn campaign_name(&self) -> Option<&str> {
        self.campaign
            .as_ref()
            .map(|c| c.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Label for the item's campaign: its name when the join supplied one,
    /// otherwise the bare campaign ID
    pub(crate) fn campaign_label(&self) -> Option<&str> {
        self.campaign_name()
            .or_else(|| self.campaign_id.as_deref().filter(|id| !id.is_empty()))
    }

    pub(crate) fn workspace_id(&self) -> Option<&str> {
        self.campaign.as_ref()?.workspace_id.as_deref()
    }

    pub(crate) fn status_str(&self) -> &str {
        self.status.as_ref().map_or("-", Status::as_str)
    }
}

fn string_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(T::from(s)),
        _ => None,
    })
}

fn platform_or_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Platform, D::Error> {
    let platform: Option<Platform> = string_or_none(deserializer)?;
    Ok(platform.unwrap_or_else(|| Platform::Other(String::new())))
}

// The date is taken as written in the timestamp; no conversion to local time
// is performed.
pub(crate) fn parse_day(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    OffsetDateTime::parse(raw, &Rfc3339)
        .map(OffsetDateTime::date)
        .or_else(|_| {
            PrimitiveDateTime::parse(
                raw,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
            )
            .map(PrimitiveDateTime::date)
        })
        .or_else(|_| {
            PrimitiveDateTime::parse(
                raw,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
            )
            .map(PrimitiveDateTime::date)
        })
        .or_else(|_| Date::parse(raw, format_description!("[year]-[month]-[day]")))
        .ok()
}

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum PlatformFilter {
    #[default]
    All,
    Only(Platform),
}

impl PlatformFilter {
    pub(crate) fn matches(&self, platform: &Platform) -> bool {
        match self {
            PlatformFilter::All => true,
            PlatformFilter::Only(p) => p == platform,
        }
    }

    /// Step to the next choice of the platform selector, wrapping around to
    /// `All`
    pub(crate) fn cycle(&self) -> PlatformFilter {
        match self {
            PlatformFilter::All => PlatformFilter::Only(Platform::Instagram),
            PlatformFilter::Only(Platform::Instagram) => PlatformFilter::Only(Platform::Facebook),
            PlatformFilter::Only(Platform::Facebook) => PlatformFilter::Only(Platform::LinkedIn),
            PlatformFilter::Only(Platform::LinkedIn) => PlatformFilter::Only(Platform::Twitter),
            PlatformFilter::Only(Platform::Twitter) => PlatformFilter::Only(Platform::TikTok),
            PlatformFilter::Only(Platform::TikTok | Platform::Other(_)) => PlatformFilter::All,
        }
    }
}

impl From<Option<&str>> for PlatformFilter {
    fn from(value: Option<&str>) -> PlatformFilter {
        match value {
            None | Some("all") => PlatformFilter::All,
            Some(s) => PlatformFilter::Only(Platform::from(s)),
        }
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFilter::All => f.write_str("all"),
            PlatformFilter::Only(p) => write!(f, "{p}"),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum LoadError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse content items in {}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read a JSON array of content items exported from the content store.
///
/// Only a file that can't be read or isn't a JSON array is an error.  An
/// entry that can't be understood as a content item is logged and skipped.
pub(crate) fn load_items(path: &Path) -> Result<Vec<ContentItem>, LoadError> {
    let src = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })?;
    let entries = serde_json::from_str::<Vec<serde_json::Value>>(&src).map_err(|source| {
        LoadError::Parse {
            path: path.to_owned(),
            source,
        }
    })?;
    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<ContentItem>(entry) {
            Ok(item) => items.push(item),
            Err(e) => tracing::warn!(index, error = %e, "skipping malformed content item"),
        }
    }
    tracing::info!(path = %path.display(), count = items.len(), "loaded content items");
    Ok(items)
}

/// Keep only the items whose campaign belongs to the given workspace
pub(crate) fn retain_workspace(items: &mut Vec<ContentItem>, workspace_id: &str) {
    let before = items.len();
    items.retain(|item| item.workspace_id() == Some(workspace_id));
    tracing::debug!(
        workspace_id,
        kept = items.len(),
        dropped = before - items.len(),
        "scoped content items to workspace"
    );
}

#[cfg(test)]
pub(crate) fn test_item(id: &str, platform: &str, scheduled: Option<&str>) -> ContentItem {
    ContentItem {
        id: id.to_owned(),
        title: format!("Post {id}"),
        content: String::new(),
        content_type: None,
        platform: Platform::from(platform),
        scheduled_date: scheduled.map(str::to_owned),
        status: Some(Status::Scheduled),
        campaign_id: None,
        campaign: None,
    }
}
