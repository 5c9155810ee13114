use std::collections::HashSet;

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::Result;
use crate::patterns::{self, ErrorEntry};
use crate::phase::{DayContext, PhaseIndexing, PhaseTable, PlanStyle};
use crate::spaced::{DEFAULT_OFFSETS, EXTENDED_OFFSETS};
use crate::task::StudyTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CarryOver {
    #[default]
    Drop,
    Reschedule,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanConfig {
    pub style: PlanStyle,
    pub indexing: PhaseIndexing,
    pub spaced_offsets: Option<Vec<u32>>,
    pub carry_over: CarryOver,
}

impl PlanConfig {
    pub fn offsets(&self) -> &[u32] {
        match (&self.spaced_offsets, self.style) {
            (Some(offsets), _) => offsets,
            (None, PlanStyle::Phased) => &DEFAULT_OFFSETS,
            (None, PlanStyle::Rolling) => &EXTENDED_OFFSETS,
        }
    }
}

pub struct Planner {
    table: PhaseTable,
    config: PlanConfig,
}

impl Planner {
    pub fn new(config: PlanConfig) -> Self {
        Self {
            table: PhaseTable::for_style(config.style),
            config,
        }
    }

    pub fn with_table(table: PhaseTable, config: PlanConfig) -> Self {
        Self { table, config }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn generate_range(&self, start: NaiveDate, end: NaiveDate, errors: &[ErrorEntry]) -> Vec<StudyTask> {
        let offsets = self.config.offsets();
        let mut generated = Vec::new();
        for day in calendar::each_day(start, end) {
            let ctx = DayContext::new(day, start, end, self.config.indexing, offsets);
            generated.extend(
                self.table
                    .tasks_for_day(&ctx)
                    .into_iter()
                    .filter(|t| t.date <= end),
            );
        }

        if !errors.is_empty() {
            let error_patterns = patterns::analyze(errors);
            generated.extend(patterns::create_error_review_tasks(&error_patterns, start, None, end));
        }
        generated
    }

    pub fn generate(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        existing: &[StudyTask],
        errors: &[ErrorEntry],
    ) -> Vec<StudyTask> {
        let (preserved, displaced): (Vec<&StudyTask>, Vec<&StudyTask>) =
            existing.iter().partition(|t| t.date < start);

        if end < start {
            warn!(
                "plan end {} is before start {}; keeping {} earlier tasks and generating nothing",
                end,
                start,
                preserved.len()
            );
            return preserved.into_iter().cloned().collect();
        }

        let generated = self.generate_range(start, end, errors);
        let generated_count = generated.len();

        let mut tasks: Vec<StudyTask> = preserved.iter().map(|t| (*t).clone()).collect();
        tasks.extend(generated);

        let mut carried = 0usize;
        if self.config.carry_over == CarryOver::Reschedule {
            let taken: HashSet<String> = tasks.iter().map(|t| t.id.clone()).collect();
            for task in displaced.iter().filter(|t| !t.completed) {
                if taken.contains(&task.id) {
                    debug!("not carrying over {}: the new plan reuses its id", task.id);
                    continue;
                }
                tasks.push((*task).clone().on(end));
                carried += 1;
            }
        }

        info!(
            "plan {}..={}: {} preserved, {} generated, {} carried over, {} displaced",
            start,
            end,
            preserved.len(),
            generated_count,
            carried,
            displaced.len()
        );
        dedupe_ids(tasks)
    }
}

/// Keeps the first task for each id.
fn dedupe_ids(tasks: Vec<StudyTask>) -> Vec<StudyTask> {
    let mut seen = HashSet::new();
    tasks
        .into_iter()
        .filter(|t| {
            let fresh = seen.insert(t.id.clone());
            if !fresh {
                warn!("dropping task with duplicate id {}", t.id);
            }
            fresh
        })
        .collect()
}

pub fn generate_plan(
    start: &str,
    end: &str,
    existing: &[StudyTask],
    config: &PlanConfig,
) -> Result<Vec<StudyTask>> {
    let start = calendar::parse_iso_date(start)?;
    let end = calendar::parse_iso_date(end)?;
    Ok(Planner::new(config.clone()).generate(start, end, existing, &[]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::task::{Subject, TaskType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn manual(id: &str, day: NaiveDate, completed: bool) -> StudyTask {
        let mut task = StudyTask::new(id, day, TaskType::Outline, Subject::Torts, "manual", 30);
        task.completed = completed;
        task
    }

    #[test]
    fn three_weekdays_three_tasks_each() {
        let tasks = generate_plan("2026-01-14", "2026-01-16", &[], &PlanConfig::default()).unwrap();
        assert_eq!(tasks.len(), 9);
        for day in 14..=16 {
            assert_eq!(tasks.iter().filter(|t| t.date == date(2026, 1, day)).count(), 3);
        }
    }

    #[test]
    fn invalid_dates_fail_before_generation() {
        let config = PlanConfig::default();
        assert!(matches!(
            generate_plan("2026-13-01", "2026-07-28", &[], &config),
            Err(PlanError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            generate_plan("2026-01-14", "soon", &[], &config),
            Err(PlanError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn reversed_range_keeps_only_history() {
        let existing = vec![
            manual("old", date(2026, 1, 2), true),
            manual("new", date(2026, 3, 2), false),
        ];
        let tasks = generate_plan("2026-02-01", "2026-01-20", &existing, &PlanConfig::default()).unwrap();
        assert_eq!(tasks, vec![existing[0].clone()]);
    }

    #[test]
    fn generated_tasks_never_pass_the_end() {
        let planner = Planner::new(PlanConfig::default());
        // the day-24 mock schedules its review for the following Sunday
        let end = date(2026, 1, 24);
        let tasks = planner.generate(date(2026, 1, 1), end, &[], &[]);
        assert!(tasks.iter().all(|t| t.date <= end));
        assert!(tasks.iter().any(|t| t.id == "foundation-mock-2026-01-24"));
        assert!(!tasks.iter().any(|t| t.id == "foundation-mock-review-2026-01-24"));
    }

    #[test]
    fn reschedule_moves_incomplete_displaced_tasks() {
        let existing = vec![
            manual("before", date(2026, 2, 1), false),
            manual("open", date(2026, 2, 20), false),
            manual("done", date(2026, 2, 21), true),
        ];
        let config = PlanConfig {
            carry_over: CarryOver::Reschedule,
            ..PlanConfig::default()
        };
        let end = date(2026, 3, 15);
        let tasks = Planner::new(config).generate(date(2026, 2, 10), end, &existing, &[]);

        assert_eq!(tasks[0], existing[0]);
        let open = tasks.iter().find(|t| t.id == "open").unwrap();
        assert_eq!(open.date, end);
        assert!(!tasks.iter().any(|t| t.id == "done"));
    }

    #[test]
    fn drop_policy_discards_displaced_tasks() {
        let existing = vec![manual("open", date(2026, 2, 20), false)];
        let tasks = Planner::new(PlanConfig::default()).generate(date(2026, 2, 10), date(2026, 3, 15), &existing, &[]);
        assert!(!tasks.iter().any(|t| t.id == "open"));
    }

    #[test]
    fn carried_task_yields_to_regenerated_id() {
        let start = date(2026, 1, 14);
        let end = date(2026, 1, 16);
        let planner = Planner::new(PlanConfig {
            carry_over: CarryOver::Reschedule,
            ..PlanConfig::default()
        });
        let first = planner.generate(start, end, &[], &[]);
        let second = planner.generate(start, end, &first, &[]);
        assert_eq!(second, first);
    }

    #[test]
    fn duplicate_history_ids_are_collapsed() {
        let existing = vec![
            manual("same", date(2026, 1, 2), true),
            manual("same", date(2026, 1, 3), false),
        ];
        let tasks = Planner::new(PlanConfig::default()).generate(date(2026, 1, 14), date(2026, 1, 14), &existing, &[]);
        assert_eq!(tasks.iter().filter(|t| t.id == "same").count(), 1);
        assert_eq!(tasks[0].date, date(2026, 1, 2));
    }

    #[test]
    fn error_reviews_are_merged_from_start() {
        let created_at = chrono::DateTime::from_timestamp(1_767_225_600, 0).unwrap();
        let errors: Vec<ErrorEntry> = (0..3)
            .map(|i| ErrorEntry {
                id: i.to_string(),
                subject: Subject::Evidence,
                subtopic: "hearsay".into(),
                source: String::new(),
                rule: "out-of-court statement".into(),
                reason: String::new(),
                key_facts: String::new(),
                created_at,
            })
            .collect();
        let start = date(2026, 1, 14);
        let tasks = Planner::new(PlanConfig::default()).generate_range(start, date(2026, 1, 31), &errors);
        let reviews: Vec<_> = tasks.iter().filter(|t| t.kind == TaskType::ErrorAnalysis).collect();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].date, date(2026, 1, 15));
        assert_eq!(reviews[1].date, date(2026, 1, 17));
    }

    #[test]
    fn calendar_indexing_starts_mid_phase() {
        let config = PlanConfig {
            indexing: PhaseIndexing::CalendarMonth,
            ..PlanConfig::default()
        };
        let tasks = Planner::new(config).generate_range(date(2026, 2, 16), date(2026, 2, 16), &[]);
        assert!(tasks.iter().all(|t| t.id.starts_with("second-round-")));

        let elapsed = Planner::new(PlanConfig::default()).generate_range(date(2026, 2, 16), date(2026, 2, 16), &[]);
        assert!(elapsed.iter().all(|t| t.id.starts_with("kickoff-")));
    }

    #[test]
    fn offsets_follow_style() {
        let rolling = PlanConfig {
            style: PlanStyle::Rolling,
            ..PlanConfig::default()
        };
        assert_eq!(rolling.offsets(), &EXTENDED_OFFSETS);
        assert_eq!(PlanConfig::default().offsets(), &DEFAULT_OFFSETS);
        let custom = PlanConfig {
            spaced_offsets: Some(vec![2, 5]),
            ..PlanConfig::default()
        };
        assert_eq!(custom.offsets(), &[2, 5]);
    }

    #[test]
    fn config_reads_kebab_case_values() {
        let config: PlanConfig =
            serde_json::from_str(r#"{"style":"rolling","indexing":"calendar-month","carryOver":"reschedule"}"#).unwrap();
        assert_eq!(config.style, PlanStyle::Rolling);
        assert_eq!(config.indexing, PhaseIndexing::CalendarMonth);
        assert_eq!(config.carry_over, CarryOver::Reschedule);
        assert_eq!(config.spaced_offsets, None);
    }
}
