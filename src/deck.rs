use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::patterns::{self, ErrorEntry, Priority};
use crate::task::{StudyTask, Subject};

pub const RECALL_THRESHOLD: u8 = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCard {
    pub id: String,
    pub subject: Subject,
    pub rule_text: String,
    pub priority: Priority,
    pub created_date: NaiveDate,
    pub next_review_date: NaiveDate,
    pub review_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<NaiveDate>,
}

impl RuleCard {
    pub fn from_error(error: &ErrorEntry, priority: Priority, today: NaiveDate) -> Self {
        Self {
            id: card_id(error),
            subject: error.subject,
            rule_text: error.rule.clone(),
            priority,
            created_date: today,
            next_review_date: calendar::add_days(today, 1),
            review_count: 0,
            last_review_date: None,
        }
    }

    pub fn is_due(&self, as_of: NaiveDate) -> bool {
        self.next_review_date <= as_of
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.next_review_date < today
    }
}

fn card_id(error: &ErrorEntry) -> String {
    format!("rule-{}", error.id)
}

/// Days until the next review.
///
/// | priority | score > 80 | score <= 80 |
/// |----------|------------|-------------|
/// | high     | 3          | 1           |
/// | medium   | 5          | 2           |
/// | low      | 7          | 3           |
pub fn days_until_next(priority: Priority, score: u8) -> u32 {
    let recalled = score > RECALL_THRESHOLD;
    match (priority, recalled) {
        (Priority::High, true) => 3,
        (Priority::High, false) => 1,
        (Priority::Medium, true) => 5,
        (Priority::Medium, false) => 2,
        (Priority::Low, true) => 7,
        (Priority::Low, false) => 3,
    }
}

pub fn update_card(card: &RuleCard, score: u8, today: NaiveDate) -> RuleCard {
    let score = score.min(100);
    let days = days_until_next(card.priority, score);
    RuleCard {
        next_review_date: calendar::add_days(today, i64::from(days)),
        last_review_date: Some(today),
        review_count: card.review_count + 1,
        ..card.clone()
    }
}

pub fn due_cards(deck: &[RuleCard], as_of: NaiveDate) -> Vec<&RuleCard> {
    deck.iter().filter(|card| card.is_due(as_of)).collect()
}

pub fn cards_from_errors(deck: &[RuleCard], errors: &[ErrorEntry], today: NaiveDate) -> Vec<RuleCard> {
    let existing: HashSet<&str> = deck.iter().map(|c| c.id.as_str()).collect();
    let priorities: std::collections::HashMap<String, Priority> = patterns::analyze(errors)
        .into_iter()
        .map(|p| (p.topic, p.priority))
        .collect();

    errors
        .iter()
        .filter(|e| !existing.contains(card_id(e).as_str()))
        .map(|e| {
            let priority = priorities.get(&e.subtopic).copied().unwrap_or(Priority::Low);
            RuleCard::from_error(e, priority, today)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub total_rules_in_deck: usize,
    pub overdue_rules: usize,
    pub review_coverage_percentage: u32,
    pub active_recall_time_percent: u32,
}

fn percent(part: f64, whole: f64) -> u32 {
    if whole <= 0.0 {
        return 0;
    }
    (part / whole * 100.0).round().max(0.0) as u32
}

pub fn compute_stats(
    deck: &[RuleCard],
    tasks: &[StudyTask],
    total_study_minutes: u32,
    today: NaiveDate,
) -> MemoryStats {
    let overdue = deck.iter().filter(|c| c.is_overdue(today)).count();
    let covered = deck.len().saturating_sub(overdue);

    let recall_minutes: u32 = tasks
        .iter()
        .filter(|t| t.is_active_recall())
        .map(|t| t.estimated_minutes)
        .sum();

    MemoryStats {
        total_rules_in_deck: deck.len(),
        overdue_rules: overdue,
        review_coverage_percentage: percent(covered as f64, deck.len() as f64),
        active_recall_time_percent: percent(f64::from(recall_minutes), f64::from(total_study_minutes)),
    }
}

pub struct SubjectSummary {
    pub subject: Subject,
    pub total: usize,
    pub due: usize,
}

pub fn subject_summaries(deck: &[RuleCard], today: NaiveDate) -> Vec<SubjectSummary> {
    let mut subjects: BTreeMap<Subject, (usize, usize)> = BTreeMap::new();
    for card in deck {
        let entry = subjects.entry(card.subject).or_insert((0, 0));
        entry.0 += 1;
        if card.is_due(today) {
            entry.1 += 1;
        }
    }
    subjects
        .into_iter()
        .map(|(subject, (total, due))| SubjectSummary { subject, total, due })
        .collect()
}
