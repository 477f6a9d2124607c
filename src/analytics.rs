//! Append-only query log for usage analytics.
//!
//! The log is owned by whoever builds the tool context and shared by
//! handle; nothing here is process-global. Entries live for the life of
//! the process.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Topic buckets, checked in order; the first that matches wins.
const TOPICS: &[(&str, &[&str])] = &[
    ("ai_ml", &["ai", "ml", "machine learning", "model"]),
    ("experience", &["experience", "work", "role", "company"]),
    ("skills", &["skill"]),
    ("metrics", &["metric", "impact", "revenue", "number"]),
    ("contact", &["contact"]),
];

#[derive(Debug, Clone, Serialize)]
pub struct QueryEntry {
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub response_time_ms: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogReceipt {
    pub logged: bool,
    pub total_queries: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TopicCounts {
    pub ai_ml: usize,
    pub experience: usize,
    pub skills: usize,
    pub metrics: usize,
    pub contact: usize,
    pub other: usize,
}

impl TopicCounts {
    fn bump(&mut self, topic: &str) {
        match topic {
            "ai_ml" => self.ai_ml += 1,
            "experience" => self.experience += 1,
            "skills" => self.skills += 1,
            "metrics" => self.metrics += 1,
            "contact" => self.contact += 1,
            _ => self.other += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalyticsSummary {
    Empty {
        message: String,
    },
    Report {
        total_queries: usize,
        query_topics: TopicCounts,
        average_response_time_ms: f64,
        first_query: DateTime<Utc>,
        last_query: DateTime<Utc>,
    },
}

/// Which topic bucket a query falls in.
pub fn topic_of(query: &str) -> &'static str {
    let q = query.to_lowercase();
    TOPICS
        .iter()
        .find(|(_, terms)| terms.iter().any(|t| q.contains(t)))
        .map(|(topic, _)| *topic)
        .unwrap_or("other")
}

#[derive(Debug, Default)]
pub struct QueryLog {
    entries: Mutex<Vec<QueryEntry>>,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self, query: &str, response_time_ms: Option<f64>) -> LogReceipt {
        let mut entries = self.entries.lock();
        entries.push(QueryEntry {
            query: query.to_string(),
            timestamp: Utc::now(),
            response_time_ms,
        });
        let total = entries.len();
        drop(entries);

        tracing::debug!(total_queries = total, "query logged");
        LogReceipt {
            logged: true,
            total_queries: total,
            message: "Query logged for analytics".to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn summary(&self) -> AnalyticsSummary {
        let entries = self.entries.lock();
        let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
            return AnalyticsSummary::Empty {
                message: "No queries logged yet".to_string(),
            };
        };

        let mut topics = TopicCounts::default();
        for e in entries.iter() {
            topics.bump(topic_of(&e.query));
        }

        let times: Vec<f64> = entries
            .iter()
            .filter_map(|e| e.response_time_ms)
            .filter(|t| *t > 0.0)
            .collect();
        let average_response_time_ms = if times.is_empty() {
            0.0
        } else {
            times.iter().sum::<f64>() / times.len() as f64
        };

        AnalyticsSummary::Report {
            total_queries: entries.len(),
            query_topics: topics,
            average_response_time_ms,
            first_query: first.timestamp,
            last_query: last.timestamp,
        }
    }
}
