use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::spaced::{ReviewSeries, SeriesTag};
use crate::task::{StudyTask, Subject, TaskType};

pub const ERROR_REVIEW_OFFSETS: [u32; 2] = [1, 3];

pub const MAX_ERROR_TOPICS: usize = 5;

const ERROR_REVIEW_MINUTES: u32 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEntry {
    pub id: String,
    pub subject: Subject,
    pub subtopic: String,
    #[serde(default)]
    pub source: String,
    pub rule: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub key_facts: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_count(count: usize) -> Priority {
        if count >= 3 {
            Priority::High
        } else if count >= 2 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPattern {
    pub topic: String,
    pub count: usize,
    pub priority: Priority,
    pub subject: Subject,
}

/// Groups errors by subtopic, most frequent first. Topics with equal counts
/// stay in the order they were first seen.
pub fn analyze(errors: &[ErrorEntry]) -> Vec<ErrorPattern> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut patterns: Vec<ErrorPattern> = Vec::new();

    for error in errors {
        match index.get(error.subtopic.as_str()) {
            Some(&i) => patterns[i].count += 1,
            None => {
                index.insert(error.subtopic.as_str(), patterns.len());
                patterns.push(ErrorPattern {
                    topic: error.subtopic.clone(),
                    count: 1,
                    priority: Priority::Low,
                    subject: error.subject,
                });
            }
        }
    }

    for pattern in &mut patterns {
        pattern.priority = Priority::from_count(pattern.count);
    }
    // sort_by is stable, so ties keep first-seen order
    patterns.sort_by(|a, b| b.count.cmp(&a.count));
    patterns
}

pub fn create_error_review_tasks(
    patterns: &[ErrorPattern],
    start: NaiveDate,
    subject: Option<Subject>,
    schedule_end: NaiveDate,
) -> Vec<StudyTask> {
    patterns
        .iter()
        .filter(|p| p.priority == Priority::High)
        .take(MAX_ERROR_TOPICS)
        .enumerate()
        .flat_map(|(idx, pattern)| {
            let prefix = format!("error-review-{idx}");
            let description = format!(
                "[Error Analysis] {}: write key rules from memory (appeared {}x in errors)",
                pattern.topic, pattern.count
            );
            let tag = format!("error-{}", pattern.priority);
            ReviewSeries::new(&prefix, start, subject.unwrap_or(pattern.subject), &description)
                .kind(TaskType::ErrorAnalysis)
                .minutes(ERROR_REVIEW_MINUTES)
                .tag(SeriesTag::Fixed(&tag))
                .schedule(&ERROR_REVIEW_OFFSETS, schedule_end)
        })
        .collect()
}
