use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Industry profile a company is analyzed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndustryTag {
    #[default]
    Generic,
    Retail,
    SaaS,
    Marketplace,
}

impl IndustryTag {
    pub fn all() -> &'static [Self] {
        &[Self::Generic, Self::Retail, Self::SaaS, Self::Marketplace]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Generic => "Generic",
            Self::Retail => "Retail",
            Self::SaaS => "SaaS",
            Self::Marketplace => "Marketplace",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Generic => "General business analysis for any industry",
            Self::Retail => "Store sales, basket size and product mix",
            Self::SaaS => "Subscriptions, churn and recurring revenue",
            Self::Marketplace => "Buyers, sellers and transaction volume",
        }
    }

    /// Parses the display name back into a tag, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|tag| tag.display_name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Tenant-like grouping under which uploaded files are organized.
///
/// One company is active per session. The `id` is a v4 UUID generated by the
/// store and never changes; `industry_tag` may be edited later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub id: String, // UUID
    pub name: String,
    #[serde(default)]
    pub industry_tag: IndustryTag,
    pub created_at: DateTime<Utc>,
}
