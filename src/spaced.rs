use chrono::NaiveDate;

use crate::calendar;
use crate::task::{StudyTask, Subject, TaskType};

pub const DEFAULT_OFFSETS: [u32; 4] = [1, 3, 7, 14];

pub const EXTENDED_OFFSETS: [u32; 5] = [1, 3, 7, 14, 30];

const REVIEW_MINUTES: u32 = 20;

#[derive(Debug, Clone, Copy)]
pub enum SeriesTag<'a> {
    PerOffset(&'a str),
    Fixed(&'a str),
}

#[derive(Debug, Clone)]
pub struct ReviewSeries<'a> {
    pub id_prefix: &'a str,
    pub origin: NaiveDate,
    pub subject: Subject,
    pub description: &'a str,
    pub kind: TaskType,
    pub estimated_minutes: u32,
    pub tag: SeriesTag<'a>,
    pub linked_task_id: Option<&'a str>,
}

impl<'a> ReviewSeries<'a> {
    pub fn new(id_prefix: &'a str, origin: NaiveDate, subject: Subject, description: &'a str) -> Self {
        Self {
            id_prefix,
            origin,
            subject,
            description,
            kind: TaskType::Review,
            estimated_minutes: REVIEW_MINUTES,
            tag: SeriesTag::PerOffset("spaced-rep"),
            linked_task_id: None,
        }
    }

    pub fn kind(mut self, kind: TaskType) -> Self {
        self.kind = kind;
        self
    }

    pub fn minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes = minutes;
        self
    }

    pub fn tag(mut self, tag: SeriesTag<'a>) -> Self {
        self.tag = tag;
        self
    }

    pub fn linked(mut self, task_id: &'a str) -> Self {
        self.linked_task_id = Some(task_id);
        self
    }

    /// One task per offset whose review date falls on or before
    /// `schedule_end`. Later offsets are dropped, not clamped.
    pub fn schedule(&self, offsets: &[u32], schedule_end: NaiveDate) -> Vec<StudyTask> {
        let origin_iso = calendar::format_iso_date(self.origin);
        offsets
            .iter()
            .enumerate()
            .filter_map(|(i, &offset)| {
                let review_date = calendar::add_days(self.origin, i64::from(offset));
                if review_date > schedule_end {
                    return None;
                }
                let id = format!("{}-{offset}-{origin_iso}", self.id_prefix);
                let description = format!(
                    "[Spaced Rep] {} review #{} (+{offset}d) of {origin_iso} study: {}",
                    self.subject,
                    i + 1,
                    self.description,
                );
                let tag = match self.tag {
                    SeriesTag::PerOffset(family) => format!("{family}-{offset}"),
                    SeriesTag::Fixed(tag) => tag.to_string(),
                };
                let mut task = StudyTask::new(
                    id,
                    review_date,
                    self.kind,
                    self.subject,
                    description,
                    self.estimated_minutes,
                )
                .tagged(tag);
                if let Some(linked) = self.linked_task_id {
                    task = task.linked_to(linked);
                }
                Some(task)
            })
            .collect()
    }
}

pub fn schedule_reviews(
    origin: NaiveDate,
    subject: Subject,
    base_description: &str,
    offsets: &[u32],
    schedule_end: NaiveDate,
) -> Vec<StudyTask> {
    let prefix = format!("spaced-{}", subject.slug());
    ReviewSeries::new(&prefix, origin, subject, base_description).schedule(offsets, schedule_end)
}
