//! Read-only text projections of the résumé, addressed by `resume://` URIs.
//!
//! | URI | Content |
//! |-----|---------|
//! | `resume://summary` | Professional summary |
//! | `resume://experience` | Every role with achievements and metrics |
//! | `resume://skills/{category}` | One skill category as bullets |
//! | `resume://education` | Degrees |
//! | `resume://contact` | Name, LinkedIn, website |
//!
//! An unknown skill category is not an error: the projection is a message
//! listing the valid categories.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::Serialize;

use resume_harness_core::ResumeDocument;

use crate::config::Config;
use crate::store::load_document;

pub const SCHEME: &str = "resume://";

/// A parsed resource address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    Summary,
    Experience,
    Skills(String),
    Education,
    Contact,
}

impl FromStr for ResourceUri {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some(path) = s.strip_prefix(SCHEME) else {
            bail!("resource not found: {} (expected a {} URI)", s, SCHEME);
        };
        match path {
            "summary" => Ok(Self::Summary),
            "experience" => Ok(Self::Experience),
            "education" => Ok(Self::Education),
            "contact" => Ok(Self::Contact),
            _ => match path.strip_prefix("skills/") {
                Some(category) if !category.is_empty() => Ok(Self::Skills(category.to_string())),
                _ => bail!("resource not found: {}", s),
            },
        }
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary => write!(f, "{}summary", SCHEME),
            Self::Experience => write!(f, "{}experience", SCHEME),
            Self::Skills(category) => write!(f, "{}skills/{}", SCHEME, category),
            Self::Education => write!(f, "{}education", SCHEME),
            Self::Contact => write!(f, "{}contact", SCHEME),
        }
    }
}

/// Listing entry for `GET /resources/list` and MCP `resources/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceInfo {
    pub uri: String,
    pub name: String,
    pub description: String,
}

/// Every concrete resource for this document, one skills entry per category.
pub fn list_resources(doc: &ResumeDocument) -> Vec<ResourceInfo> {
    let entry = |uri: ResourceUri, name: &str, description: String| ResourceInfo {
        uri: uri.to_string(),
        name: name.to_string(),
        description,
    };

    let mut out = vec![
        entry(ResourceUri::Summary, "summary", "Professional summary".to_string()),
        entry(
            ResourceUri::Experience,
            "experience",
            "Complete work experience with achievements".to_string(),
        ),
    ];
    for category in doc.skills.categories() {
        out.push(entry(
            ResourceUri::Skills(category.to_string()),
            &format!("skills/{}", category),
            format!("{} skills", title_case(category)),
        ));
    }
    out.push(entry(ResourceUri::Education, "education", "Education background".to_string()));
    out.push(entry(ResourceUri::Contact, "contact", "Contact information".to_string()));
    out
}

/// Resolve a URI to its text. Fails only for URIs outside the table above.
pub fn read_resource(doc: &ResumeDocument, uri: &str) -> Result<String> {
    let parsed: ResourceUri = uri.parse()?;
    Ok(render(doc, &parsed))
}

pub fn render(doc: &ResumeDocument, uri: &ResourceUri) -> String {
    match uri {
        ResourceUri::Summary => doc.summary.clone(),
        ResourceUri::Experience => experience(doc),
        ResourceUri::Skills(category) => skills(doc, category),
        ResourceUri::Education => education(doc),
        ResourceUri::Contact => contact(doc),
    }
}

fn experience(doc: &ResumeDocument) -> String {
    doc.experience
        .iter()
        .map(|exp| {
            let mut text = format!(
                "**{}** at {} ({})\nLocation: {}\n",
                exp.title, exp.company, exp.duration, exp.location
            );
            if !exp.achievements.is_empty() {
                text.push_str("Key Achievements:\n");
                for a in &exp.achievements {
                    text.push_str(&format!("• {}\n", a.description));
                    if !a.metrics.is_empty() {
                        text.push_str(&format!("  Metrics: {}\n", a.metrics.join(", ")));
                    }
                }
            }
            text
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn skills(doc: &ResumeDocument, category: &str) -> String {
    match doc.skills.get(category) {
        Some(list) => {
            let bullets: Vec<String> = list.iter().map(|s| format!("• {}", s)).collect();
            format!("**{} Skills:**\n{}", title_case(category), bullets.join("\n"))
        }
        None => {
            let valid: Vec<&str> = doc.skills.categories().collect();
            format!(
                "No skills found for category: {}. Available categories: {}",
                category,
                valid.join(", ")
            )
        }
    }
}

fn education(doc: &ResumeDocument) -> String {
    let lines: Vec<String> = doc
        .education
        .iter()
        .map(|e| format!("• {} - {} ({})", e.degree, e.institution, e.years))
        .collect();
    format!("**Education:**\n{}", lines.join("\n"))
}

fn contact(doc: &ResumeDocument) -> String {
    let p = &doc.personal;
    format!(
        "**Contact Information:**\nName: {}\nLinkedIn: {}\nWebsite: {}",
        p.name,
        p.linkedin,
        p.website.as_deref().unwrap_or("")
    )
}

/// `"product_strategy"` → `"Product Strategy"`.
fn title_case(category: &str) -> String {
    category
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// `resume show <section> [category]`. Without a category, `skills` prints
/// every category.
pub fn run_show(config: &Config, section: &str, category: Option<&str>) -> Result<()> {
    let doc = load_document(config)?;

    let text = match (section, category) {
        ("skills", None) => doc
            .skills
            .categories()
            .map(|c| skills(&doc, c))
            .collect::<Vec<_>>()
            .join("\n\n"),
        ("skills", Some(c)) => render(&doc, &ResourceUri::Skills(c.to_string())),
        (other, _) => read_resource(&doc, &format!("{}{}", SCHEME, other))?,
    };

    println!("{}", text);
    Ok(())
}
