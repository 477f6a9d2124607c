//! Résumé data model.
//!
//! The JSON file on disk uses snake_case keys throughout; these types map it
//! one-to-one. Everything here is immutable after load.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Root of the résumé tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub personal: Personal,
    pub summary: String,
    /// Reverse chronological: index 0 is the current role.
    pub experience: Vec<ExperienceEntry>,
    pub skills: SkillCatalog,
    pub education: Vec<Education>,
    #[serde(default)]
    pub ai_experience: AiExperience,
    #[serde(default)]
    pub key_metrics: KeyMetrics,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unique_value_props: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personal {
    pub name: String,
    pub linkedin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// One role held at one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    /// Free-text date range, e.g. `"01/2022 - present"`.
    pub duration: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Achievement {
    pub description: String,
    #[serde(default)]
    pub metrics: Vec<String>,
    /// Topical tags such as `"AI/ML"` or `"automation"`.
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub years: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiExperience {
    #[serde(default)]
    pub models_built: Vec<String>,
    #[serde(default)]
    pub tools_used: Vec<String>,
    #[serde(default)]
    pub initiatives_led: Vec<String>,
    #[serde(default)]
    pub design_patterns: Vec<String>,
}

/// Quantified impact. Extra metric groups beyond the two well-known ones
/// are kept verbatim in `other`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyMetrics {
    #[serde(default)]
    pub revenue_impact: Vec<String>,
    #[serde(default)]
    pub efficiency_gains: Vec<String>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl KeyMetrics {
    pub fn is_empty(&self) -> bool {
        self.revenue_impact.is_empty() && self.efficiency_gains.is_empty() && self.other.is_empty()
    }
}

/// Skills grouped by category, in document order.
///
/// Serialized as a plain JSON object. Category order matters for skill
/// search, which reports matches in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillCatalog(Vec<(String, Vec<String>)>);

impl SkillCatalog {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace a category, keeping its first-seen position.
    pub fn insert(&mut self, category: impl Into<String>, skills: Vec<String>) {
        let category = category.into();
        match self.0.iter_mut().find(|(c, _)| *c == category) {
            Some(slot) => slot.1 = skills,
            None => self.0.push((category, skills)),
        }
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, s)| s.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(c, s)| (c.as_str(), s.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for SkillCatalog {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (category, skills) in iter {
            catalog.insert(category, skills);
        }
        catalog
    }
}

impl Serialize for SkillCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, skills) in &self.0 {
            map.serialize_entry(category, skills)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SkillCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = SkillCatalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of skill category to a list of skills")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut catalog = SkillCatalog::new();
                while let Some((category, skills)) = access.next_entry::<String, Vec<String>>()? {
                    catalog.insert(category, skills);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}
