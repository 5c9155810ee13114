use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::strategy;
use crate::task::{self, StudyTask, Subject, TaskType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseIndexing {
    #[default]
    Elapsed,
    CalendarMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanStyle {
    #[default]
    Phased,
    Rolling,
}

#[derive(Debug, Clone)]
pub struct DayContext<'a> {
    pub date: NaiveDate,
    pub days_since_start: i64,
    pub phase_index: usize,
    pub day_of_phase: u32,
    pub week_of_phase: u32,
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub schedule_end: NaiveDate,
    pub spaced_offsets: &'a [u32],
}

impl<'a> DayContext<'a> {
    pub fn new(
        date: NaiveDate,
        plan_start: NaiveDate,
        schedule_end: NaiveDate,
        indexing: PhaseIndexing,
        spaced_offsets: &'a [u32],
    ) -> Self {
        let (phase_index, day_of_phase) = match indexing {
            PhaseIndexing::Elapsed => {
                let k = elapsed_months(plan_start, date);
                let phase_start = calendar::add_months(plan_start, k);
                let day = calendar::days_between(phase_start, date) + 1;
                (k as usize, u32::try_from(day.max(1)).unwrap_or(1))
            }
            PhaseIndexing::CalendarMonth => (date.month0() as usize, date.day()),
        };

        Self {
            date,
            days_since_start: calendar::days_between(plan_start, date),
            phase_index,
            day_of_phase,
            week_of_phase: (day_of_phase - 1) / 7,
            day_of_week: calendar::day_of_week(date),
            is_weekend: calendar::is_weekend(date),
            schedule_end,
            spaced_offsets,
        }
    }

    pub fn days_later(&self, n: i64) -> NaiveDate {
        calendar::add_days(self.date, n)
    }

    pub fn task(
        &self,
        phase: &str,
        subtype: &str,
        kind: TaskType,
        subject: Subject,
        minutes: u32,
        description: impl Into<String>,
    ) -> StudyTask {
        StudyTask::new(
            task::task_id(phase, subtype, self.date),
            self.date,
            kind,
            subject,
            description,
            minutes,
        )
    }
}

fn elapsed_months(start: NaiveDate, date: NaiveDate) -> u32 {
    if date <= start {
        return 0;
    }
    let raw = (date.year() - start.year()) * 12 + date.month() as i32 - start.month() as i32;
    let mut k = raw.max(0) as u32;
    while k > 0 && calendar::add_months(start, k) > date {
        k -= 1;
    }
    k
}

#[derive(Debug, Clone, Copy)]
pub enum RotationBasis {
    WeekOfPhase,
    DayOfPhase,
    Window(u32),
}

#[derive(Debug, Clone, Copy)]
pub struct Rotation {
    pub subjects: &'static [Subject],
    pub basis: RotationBasis,
}

impl Rotation {
    pub const fn weekly(subjects: &'static [Subject]) -> Self {
        Self {
            subjects,
            basis: RotationBasis::WeekOfPhase,
        }
    }

    pub const fn daily(subjects: &'static [Subject]) -> Self {
        Self {
            subjects,
            basis: RotationBasis::DayOfPhase,
        }
    }

    pub const fn every(days: u32, subjects: &'static [Subject]) -> Self {
        Self {
            subjects,
            basis: RotationBasis::Window(days),
        }
    }

    fn slot(&self, ctx: &DayContext) -> i64 {
        match self.basis {
            RotationBasis::WeekOfPhase => i64::from(ctx.week_of_phase),
            RotationBasis::DayOfPhase => i64::from(ctx.day_of_phase) - 1,
            RotationBasis::Window(n) => ctx.days_since_start.div_euclid(i64::from(n.max(1))),
        }
    }

    pub fn pick(&self, ctx: &DayContext) -> Subject {
        self.shifted(ctx, 0)
    }

    pub fn shifted(&self, ctx: &DayContext, delta: i64) -> Subject {
        let len = self.subjects.len() as i64;
        let idx = (self.slot(ctx) + delta).rem_euclid(len);
        self.subjects[idx as usize]
    }
}

pub trait PhaseStrategy {
    fn name(&self) -> &'static str;

    fn weekday_tasks(&self, ctx: &DayContext) -> Vec<StudyTask>;

    fn weekend_tasks(&self, ctx: &DayContext) -> Vec<StudyTask>;

    fn tasks_for(&self, ctx: &DayContext) -> Vec<StudyTask> {
        if ctx.is_weekend {
            self.weekend_tasks(ctx)
        } else {
            self.weekday_tasks(ctx)
        }
    }
}

pub struct DayOverride {
    pub days: RangeInclusive<u32>,
    pub strategy: Box<dyn PhaseStrategy>,
}

pub struct Phase {
    strategy: Box<dyn PhaseStrategy>,
    overrides: Vec<DayOverride>,
}

impl Phase {
    pub fn new(strategy: impl PhaseStrategy + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
            overrides: Vec::new(),
        }
    }

    pub fn with_override(mut self, days: RangeInclusive<u32>, strategy: impl PhaseStrategy + 'static) -> Self {
        self.overrides.push(DayOverride {
            days,
            strategy: Box::new(strategy),
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn strategy_for(&self, day_of_phase: u32) -> &dyn PhaseStrategy {
        self.overrides
            .iter()
            .find(|o| o.days.contains(&day_of_phase))
            .map(|o| o.strategy.as_ref())
            .unwrap_or(self.strategy.as_ref())
    }
}

pub struct PhaseTable {
    phases: Vec<Phase>,
}

impl PhaseTable {
    pub fn new(phases: Vec<Phase>) -> Self {
        Self { phases }
    }

    pub fn standard() -> Self {
        strategy::standard_table()
    }

    pub fn rolling() -> Self {
        strategy::rolling_table()
    }

    pub fn for_style(style: PlanStyle) -> Self {
        match style {
            PlanStyle::Phased => Self::standard(),
            PlanStyle::Rolling => Self::rolling(),
        }
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Phase indices past the end of the table reuse the last phase.
    pub fn phase(&self, phase_index: usize) -> Option<&Phase> {
        let last = self.phases.len().checked_sub(1)?;
        self.phases.get(phase_index.min(last))
    }

    pub fn tasks_for_day(&self, ctx: &DayContext) -> Vec<StudyTask> {
        match self.phase(ctx.phase_index) {
            Some(phase) => phase.strategy_for(ctx.day_of_phase).tasks_for(ctx),
            None => Vec::new(),
        }
    }
}
