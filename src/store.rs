use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;

use crate::calendar;
use crate::deck::RuleCard;
use crate::error::{PlanError, Result};
use crate::patterns::{ErrorEntry, Priority};
use crate::task::{StudyTask, Subject};

const ERROR_LOG_HEADER: [&str; 8] = [
    "id",
    "subject",
    "subtopic",
    "source",
    "rule",
    "reason",
    "keyFacts",
    "createdAt",
];

const DECK_HEADER: [&str; 8] = [
    "id",
    "subject",
    "ruleText",
    "priority",
    "createdDate",
    "nextReviewDate",
    "reviewCount",
    "lastReviewDate",
];

pub fn load_tasks(path: &Path) -> Result<Vec<StudyTask>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&text)?;

    let mut tasks = Vec::with_capacity(records.len());
    for (i, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<StudyTask>(record) {
            Ok(task) => tasks.push(task),
            Err(e) => warn!("skipping task #{} in {}: {}", i, path.display(), e),
        }
    }
    Ok(tasks)
}

pub fn save_tasks(path: &Path, tasks: &[StudyTask]) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(tasks)?)?;
    Ok(())
}

fn get_field(record: &csv::StringRecord, index: usize) -> String {
    record.get(index).unwrap_or("").trim().to_string()
}

fn record_line(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

fn invalid(record: &csv::StringRecord, reason: impl Into<String>) -> PlanError {
    PlanError::InvalidRecord {
        line: record_line(record),
        reason: reason.into(),
    }
}

fn parse_subject(record: &csv::StringRecord, index: usize) -> Result<Subject> {
    let raw = get_field(record, index);
    Subject::parse(&raw).ok_or_else(|| invalid(record, format!("unknown subject {raw:?}")))
}

fn parse_date(record: &csv::StringRecord, index: usize) -> Result<NaiveDate> {
    calendar::parse_iso_date(&get_field(record, index)).map_err(|e| invalid(record, e.to_string()))
}

fn parse_optional_date(record: &csv::StringRecord, index: usize) -> Result<Option<NaiveDate>> {
    if get_field(record, index).is_empty() {
        Ok(None)
    } else {
        parse_date(record, index).map(Some)
    }
}

fn parse_timestamp(record: &csv::StringRecord, index: usize) -> Result<DateTime<Utc>> {
    let raw = get_field(record, index);
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = calendar::parse_iso_date(&raw).map_err(|e| invalid(record, e.to_string()))?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
}

/// Row-level failures (bad UTF-8, wrong field count) skip the row; I/O
/// failures still end the read.
fn readable(result: csv::Result<csv::StringRecord>, path: &Path) -> Result<Option<csv::StringRecord>> {
    match result {
        Ok(record) => Ok(Some(record)),
        Err(e) if e.is_io_error() => Err(e.into()),
        Err(e) => {
            warn!("skipping unreadable row in {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

fn error_from_record(record: &csv::StringRecord) -> Result<ErrorEntry> {
    let id_raw = get_field(record, 0);
    let id = if id_raw.is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        id_raw
    };

    let subtopic = get_field(record, 2);
    if subtopic.is_empty() {
        return Err(invalid(record, "missing subtopic"));
    }

    Ok(ErrorEntry {
        id,
        subject: parse_subject(record, 1)?,
        subtopic,
        source: get_field(record, 3),
        rule: get_field(record, 4),
        reason: get_field(record, 5),
        key_facts: get_field(record, 6),
        created_at: parse_timestamp(record, 7)?,
    })
}

pub fn load_errors(path: &Path) -> Result<Vec<ErrorEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let mut errors = Vec::new();
    for result in reader.records() {
        let Some(record) = readable(result, path)? else {
            continue;
        };
        match error_from_record(&record) {
            Ok(entry) => errors.push(entry),
            Err(e) => warn!("skipping error entry in {}: {}", path.display(), e),
        }
    }
    Ok(errors)
}

pub fn save_errors(path: &Path, errors: &[ErrorEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(ERROR_LOG_HEADER)?;
    for e in errors {
        writer.write_record([
            e.id.as_str(),
            e.subject.label(),
            e.subtopic.as_str(),
            e.source.as_str(),
            e.rule.as_str(),
            e.reason.as_str(),
            e.key_facts.as_str(),
            e.created_at.to_rfc3339().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn card_from_record(record: &csv::StringRecord) -> Result<RuleCard> {
    let id = get_field(record, 0);
    if id.is_empty() {
        return Err(invalid(record, "missing id"));
    }
    let priority_raw = get_field(record, 3);
    let priority = Priority::parse(&priority_raw)
        .ok_or_else(|| invalid(record, format!("unknown priority {priority_raw:?}")))?;
    let review_count_raw = get_field(record, 6);
    let review_count = if review_count_raw.is_empty() {
        0
    } else {
        review_count_raw
            .parse()
            .map_err(|_| invalid(record, format!("bad review count {review_count_raw:?}")))?
    };

    Ok(RuleCard {
        id,
        subject: parse_subject(record, 1)?,
        rule_text: get_field(record, 2),
        priority,
        created_date: parse_date(record, 4)?,
        next_review_date: parse_date(record, 5)?,
        review_count,
        last_review_date: parse_optional_date(record, 7)?,
    })
}

pub fn load_deck(path: &Path) -> Result<Vec<RuleCard>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let mut deck = Vec::new();
    for result in reader.records() {
        let Some(record) = readable(result, path)? else {
            continue;
        };
        match card_from_record(&record) {
            Ok(card) => deck.push(card),
            Err(e) => warn!("skipping rule card in {}: {}", path.display(), e),
        }
    }
    Ok(deck)
}

pub fn save_deck(path: &Path, deck: &[RuleCard]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(DECK_HEADER)?;
    for card in deck {
        writer.write_record([
            card.id.clone(),
            card.subject.label().to_string(),
            card.rule_text.clone(),
            card.priority.to_string(),
            calendar::format_iso_date(card.created_date),
            calendar::format_iso_date(card.next_review_date),
            card.review_count.to_string(),
            card.last_review_date.map_or(String::new(), calendar::format_iso_date),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
