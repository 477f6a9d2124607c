//! Shared fixtures for unit tests.

use crate::models::ResumeDocument;

pub const SAMPLE_JSON: &str = r#"{
  "personal": {
    "name": "Jordan Avery",
    "linkedin": "linkedin.com/in/jordan-avery",
    "website": "jordanavery.dev"
  },
  "summary": "Product manager with a decade in fintech and insurance, shipping ML-powered products in regulated industries.",
  "experience": [
    {
      "company": "Justworks",
      "title": "Senior Product Manager",
      "duration": "01/2022 - present",
      "location": "New York, NY",
      "achievements": [
        {
          "description": "Built ML-powered underwriting model with 92% accuracy for automated risk assessment",
          "metrics": ["92% accuracy", "85% reduction in manual review"],
          "tags": ["AI/ML", "automation", "risk"]
        },
        {
          "description": "Led compliance platform migration for 1.5M users with zero disruption",
          "metrics": ["1.5M users", "92% accounts migrated"],
          "tags": ["platform", "compliance"]
        }
      ]
    },
    {
      "company": "Stash",
      "title": "Product Manager",
      "duration": "03/2019 - 12/2021",
      "location": "New York, NY",
      "achievements": [
        {
          "description": "Launched retirement accounts generating $5M new revenue",
          "metrics": ["$5M new revenue"],
          "tags": ["fintech", "growth"]
        }
      ]
    },
    {
      "company": "Beander",
      "title": "Co-founder",
      "duration": "06/2018 - 02/2019",
      "location": "Remote",
      "achievements": []
    },
    {
      "company": "Casper",
      "title": "Technical Product Manager",
      "duration": "06/2015 - 05/2018",
      "location": "New York, NY",
      "achievements": [
        {
          "description": "Launched iOS and Android apps reaching 300K users and $20M in mobile payments",
          "metrics": ["300K users", "$20M mobile payments"],
          "tags": ["mobile", "ML"]
        }
      ]
    }
  ],
  "skills": {
    "product_strategy": ["Roadmapping", "0 to 1 launches"],
    "ai_ml": ["LLM applications", "ML-powered automation", "Prompt design"],
    "technical": ["SQL", "Python", "API design"],
    "domain": ["Fintech", "Insurance", "Compliance"],
    "analytics": ["Mixpanel", "A/B testing"],
    "leadership": ["Cross-functional leadership", "Coaching PMs"]
  },
  "education": [
    {
      "degree": "M.S. Information Systems",
      "institution": "University of Cincinnati",
      "years": "2013 - 2015"
    },
    {
      "degree": "B.S. Computer Science",
      "institution": "University of Cincinnati",
      "years": "2009 - 2013"
    }
  ],
  "ai_experience": {
    "models_built": ["ML-powered underwriting model with 92% accuracy"],
    "tools_used": ["Claude Code", "Cursor"],
    "initiatives_led": ["AI adoption champion", "Training PMs on AI-assisted prototyping", "Human-in-loop review design"],
    "design_patterns": ["Human-in-loop review"]
  },
  "key_metrics": {
    "revenue_impact": ["$5M new revenue", "$4M incremental retail", "$20M mobile payments", "$800K upsell"],
    "efficiency_gains": ["85% workload reduction", "90% overhead reduction", "60% faster onboarding"]
  }
}"#;

pub fn sample_document() -> ResumeDocument {
    ResumeDocument::from_json_str(SAMPLE_JSON).expect("sample fixture must parse")
}
