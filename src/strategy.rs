use crate::phase::{DayContext, Phase, PhaseStrategy, PhaseTable, Rotation};
use crate::spaced::ReviewSeries;
use crate::task::{StudyTask, Subject, TaskType};

const ESSAY_SUBJECTS: [Subject; 4] = [
    Subject::Contracts,
    Subject::Torts,
    Subject::Evidence,
    Subject::CriminalLaw,
];

const KICKOFF_SUBJECTS: [Subject; 2] = [Subject::Torts, Subject::Contracts];

const MPT_FORMATS: [&str; 4] = ["memo", "brief", "client-letter", "demand-letter"];

const MBE_WEEKLY: Rotation = Rotation::weekly(&Subject::MBE);
const ESSAY_WEEKLY: Rotation = Rotation::weekly(&ESSAY_SUBJECTS);

const MONDAY: u32 = 1;
const WEDNESDAY: u32 = 3;
const FRIDAY: u32 = 5;

pub fn standard_table() -> PhaseTable {
    PhaseTable::new(vec![
        Phase::new(Foundation).with_override(1..=3, Kickoff),
        Phase::new(SecondRound),
        Phase::new(EssayFoundation),
        Phase::new(EssayVolume),
        Phase::new(Simulation),
        Phase::new(Polish),
    ])
}

pub fn rolling_table() -> PhaseTable {
    PhaseTable::new(vec![Phase::new(Rolling)])
}

fn is_even(n: u32) -> bool {
    n % 2 == 0
}

// -- Foundation --

fn foundation_block(phase: &str, ctx: &DayContext, subject: Subject) -> Vec<StudyTask> {
    vec![
        ctx.task(
            phase,
            "outline",
            TaskType::Outline,
            subject,
            40,
            format!("Read and simplify {subject} rules - identify 5 key elements"),
        )
        .tagged("foundation"),
        ctx.task(
            phase,
            "mbe",
            TaskType::Mbe,
            subject,
            50,
            format!("{subject}: solve 15 practice questions"),
        )
        .with_count(15)
        .tagged("practice"),
        ctx.task(
            phase,
            "recall",
            TaskType::ActiveRecall,
            subject,
            25,
            format!(
                "[Active Recall] Write out {subject} rule elements on blank paper (3-5 rules), then check against outline"
            ),
        )
        .tagged("active-recall"),
    ]
}

fn catch_up_block(phase: &str, ctx: &DayContext, subject: Subject) -> Vec<StudyTask> {
    vec![
        ctx.task(
            phase,
            "catchup",
            TaskType::Outline,
            subject,
            120,
            "Catch up on missed outlines and solve 10 extra questions",
        ),
        ctx.task(
            phase,
            "recall-wknd",
            TaskType::ActiveRecall,
            subject,
            60,
            format!("[Active Recall] Oral review - explain {subject} key rules out loud"),
        )
        .tagged("active-recall"),
    ]
}

pub struct Kickoff;

impl PhaseStrategy for Kickoff {
    fn name(&self) -> &'static str {
        "kickoff"
    }

    fn weekday_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = Rotation::daily(&KICKOFF_SUBJECTS).pick(ctx);
        foundation_block(self.name(), ctx, subject)
    }

    fn weekend_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = Rotation::daily(&KICKOFF_SUBJECTS).pick(ctx);
        catch_up_block(self.name(), ctx, subject)
    }
}

pub struct Foundation;

impl PhaseStrategy for Foundation {
    fn name(&self) -> &'static str {
        "foundation"
    }

    fn weekday_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        foundation_block(self.name(), ctx, MBE_WEEKLY.pick(ctx))
    }

    fn weekend_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = MBE_WEEKLY.pick(ctx);
        if ctx.day_of_phase < 24 {
            return catch_up_block(self.name(), ctx, subject);
        }

        let mock = ctx
            .task(
                self.name(),
                "mock",
                TaskType::MockExam,
                subject,
                90,
                "50-question mixed MBE mock exam (timed)",
            )
            .with_count(50);
        let review = ctx
            .task(
                self.name(),
                "mock-review",
                TaskType::MockReview,
                subject,
                120,
                "Review mock errors and patch outline with missed rules",
            )
            .on(ctx.days_later(1))
            .tagged("error-analysis")
            .linked_to(mock.id.clone());
        vec![mock, review]
    }
}

// -- Second round --

pub struct SecondRound;

impl PhaseStrategy for SecondRound {
    fn name(&self) -> &'static str {
        "second-round"
    }

    fn weekday_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = MBE_WEEKLY.pick(ctx);
        let outline = ctx.task(
            self.name(),
            "outline",
            TaskType::Outline,
            subject,
            40,
            format!("Deepen {subject} outline - add case examples"),
        );
        let spaced_prefix = format!("{}-spaced", self.name());
        let reviews = ReviewSeries::new(&spaced_prefix, ctx.date, subject, "rewrite the outlined rules without notes")
            .linked(&outline.id)
            .schedule(ctx.spaced_offsets, ctx.schedule_end);

        let mut tasks = vec![
            outline.clone(),
            ctx.task(
                self.name(),
                "mbe",
                TaskType::Mbe,
                subject,
                60,
                format!("{subject}: 20 questions on latest concepts"),
            )
            .with_count(20)
            .tagged("practice"),
            ctx.task(
                self.name(),
                "recall",
                TaskType::ActiveRecall,
                subject,
                20,
                format!("[Active Recall] Write 4-5 key {subject} rules on blank paper, compare with notes"),
            )
            .tagged("active-recall"),
        ];
        if ctx.day_of_phase % 7 == 0 {
            tasks.push(
                ctx.task(
                    self.name(),
                    "weekly-review",
                    TaskType::Review,
                    subject,
                    25,
                    format!("[Spaced Rep] Week-long review - {subject} rules from the start of the week"),
                )
                .tagged("weekly-review"),
            );
        }
        tasks.extend(reviews);
        tasks
    }

    fn weekend_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = MBE_WEEKLY.pick(ctx);
        let mock_weekend = is_even((ctx.day_of_phase - 1) / 14);
        if !mock_weekend {
            return vec![
                ctx.task(
                    self.name(),
                    "reinforce",
                    TaskType::Review,
                    subject,
                    120,
                    "Review past week errors and reinforce weak areas",
                )
                .tagged("reinforcement"),
            ];
        }

        let mock = ctx
            .task(
                self.name(),
                "mock",
                TaskType::MockExam,
                subject,
                90,
                "50-question mixed MBE mock (timed, 60 min)",
            )
            .with_count(50);
        let review = ctx
            .task(
                self.name(),
                "error-review",
                TaskType::ErrorAnalysis,
                subject,
                30,
                "[Targeted Spaced Rep] Review mock error topics - write rules for missed concepts without looking at questions",
            )
            .on(ctx.days_later(2))
            .tagged("error-spaced-rep")
            .linked_to(mock.id.clone());
        vec![mock, review]
    }
}

// -- Essay foundation --

pub struct EssayFoundation;

impl PhaseStrategy for EssayFoundation {
    fn name(&self) -> &'static str {
        "essay-foundation"
    }

    fn weekday_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = ESSAY_WEEKLY.pick(ctx);
        match ctx.day_of_week {
            MONDAY => vec![
                ctx.task(
                    self.name(),
                    "rules",
                    TaskType::RuleWriting,
                    subject,
                    30,
                    format!("[Active Recall] Write 5 common {subject} essay rules on blank paper"),
                )
                .tagged("active-recall-rules"),
                ctx.task(
                    self.name(),
                    "practice",
                    TaskType::Mbe,
                    subject,
                    45,
                    format!("MBE practice: 20 {subject} questions"),
                )
                .with_count(20),
            ],
            WEDNESDAY => {
                let prior = ESSAY_WEEKLY.shifted(ctx, -1);
                vec![
                    ctx.task(
                        self.name(),
                        "delayed",
                        TaskType::ActiveRecall,
                        prior,
                        30,
                        format!("[Delayed Recall] Write {prior} rules from last week without notes, then check"),
                    )
                    .tagged("delayed-recall"),
                    ctx.task(
                        self.name(),
                        "outline",
                        TaskType::Outline,
                        subject,
                        40,
                        format!("Study this week's {subject} outline"),
                    ),
                ]
            }
            FRIDAY => vec![
                ctx.task(
                    self.name(),
                    "template",
                    TaskType::TemplateReview,
                    subject,
                    40,
                    format!(
                        "[Template Practice] Rewrite a {subject} MEE issue (issue headings + short rules only, no full answers)"
                    ),
                )
                .tagged("template-recall"),
                ctx.task(
                    self.name(),
                    "mbe",
                    TaskType::Mbe,
                    subject,
                    30,
                    format!("Timed {subject} MCQ: 15 questions in 18 minutes"),
                )
                .with_count(15),
            ],
            _ => vec![ctx.task(
                self.name(),
                "general",
                TaskType::Outline,
                subject,
                60,
                "Outline review and case reading",
            )],
        }
    }

    fn weekend_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = ESSAY_WEEKLY.pick(ctx);
        let mee = ctx.task(
            self.name(),
            "mee",
            TaskType::Mee,
            subject,
            40,
            format!("Timed MEE essay ({subject}): 30 minutes"),
        );
        let review = ctx
            .task(
                self.name(),
                "mee-review",
                TaskType::MockReview,
                subject,
                25,
                "[Format Retrieval Practice] Rewrite MEE format skeleton (headings, structure) from memory",
            )
            .on(ctx.days_later(1))
            .tagged("format-recall")
            .linked_to(mee.id.clone());

        let mut tasks = vec![mee, review];
        if is_even(ctx.week_of_phase) {
            tasks.push(
                ctx.task(
                    self.name(),
                    "mpt",
                    TaskType::Review,
                    Subject::CivPro,
                    45,
                    "Introduction to MPT format - study instructions and task types",
                )
                .on(ctx.days_later(1)),
            );
        }
        tasks
    }
}

// -- Essay volume --

pub struct EssayVolume;

impl PhaseStrategy for EssayVolume {
    fn name(&self) -> &'static str {
        "essay-volume"
    }

    fn weekday_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = ESSAY_WEEKLY.pick(ctx);
        let mut tasks = vec![
            ctx.task(
                self.name(),
                "rewrite",
                TaskType::Mee,
                subject,
                30,
                format!("[Rewriting] Rewrite an old {subject} MEE: sketch the issue structure from memory only"),
            )
            .tagged("rewrite-phase-1"),
            ctx.task(
                self.name(),
                "condense",
                TaskType::Review,
                subject,
                20,
                "[Rewriting] Shorten rules and integrate facts more tightly",
            )
            .tagged("rewrite-phase-2"),
        ];
        if is_even(ctx.day_of_phase) {
            tasks.push(
                ctx.task(
                    self.name(),
                    "spaced-mee",
                    TaskType::ActiveRecall,
                    subject,
                    25,
                    format!("[Spaced Rep] View only the {subject} MEE prompt, rewrite the issue structure"),
                )
                .tagged("mee-spaced-rep"),
            );
        }
        tasks
    }

    fn weekend_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        if is_even(ctx.week_of_phase) {
            let mut tasks: Vec<StudyTask> = ESSAY_SUBJECTS[..3]
                .iter()
                .enumerate()
                .map(|(i, &subject)| {
                    ctx.task(
                        self.name(),
                        &format!("mee-{}", i + 1),
                        TaskType::Mee,
                        subject,
                        40,
                        format!("{subject} MEE essay - 30 minutes"),
                    )
                    .on(ctx.days_later(i as i64))
                })
                .collect();
            let first = tasks[0].id.clone();
            tasks.push(
                ctx.task(
                    self.name(),
                    "recall-essays",
                    TaskType::ActiveRecall,
                    ESSAY_SUBJECTS[0],
                    30,
                    "[Spaced Rep] View only essay topics, rewrite issue list + key rules (no full answers)",
                )
                .on(ctx.days_later(2))
                .tagged("essay-spaced-rep")
                .linked_to(first),
            );
            return tasks;
        }

        let mpt = ctx.task(
            self.name(),
            "mpt",
            TaskType::Review,
            Subject::CivPro,
            120,
            "Timed MPT task - 90 minutes",
        );
        let recall = ctx
            .task(
                self.name(),
                "case-recall",
                TaskType::ActiveRecall,
                Subject::CivPro,
                20,
                "[Case Rule Recall] Pick 2-3 key cases from the MPT library, write case name + core rules from memory",
            )
            .on(ctx.days_later(2))
            .tagged("case-recall")
            .linked_to(mpt.id.clone());
        vec![mpt, recall]
    }
}

// -- Simulation --

pub struct Simulation;

impl PhaseStrategy for Simulation {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn weekday_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = ESSAY_WEEKLY.pick(ctx);
        if matches!(ctx.day_of_week, MONDAY | WEDNESDAY) {
            return vec![
                ctx.task(
                    self.name(),
                    "deck",
                    TaskType::RuleWriting,
                    subject,
                    20,
                    format!(
                        "[Rule Deck] Review due {subject} rules - write 3-5 rules on blank paper, score yourself, adjust next review date"
                    ),
                )
                .tagged("rule-deck-adaptive"),
                ctx.task(
                    self.name(),
                    "practice",
                    TaskType::Mbe,
                    subject,
                    30,
                    format!("{subject} MBE: 15 questions"),
                )
                .with_count(15),
            ];
        }

        let mut tasks = vec![ctx.task(
            self.name(),
            "mee",
            TaskType::Mee,
            subject,
            40,
            format!("{subject} MEE - timed 30 min"),
        )];
        if ctx.day_of_phase % 4 == 0 {
            tasks.push(
                ctx.task(
                    self.name(),
                    "spaced-mee",
                    TaskType::ActiveRecall,
                    subject,
                    20,
                    "[Spaced Rep] Rewrite a past MEE outline (issue list only, no answers)",
                )
                .tagged("mee-spaced"),
            );
        }
        tasks
    }

    fn weekend_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        if is_even(ctx.week_of_phase) {
            let mut tasks: Vec<StudyTask> = ESSAY_SUBJECTS[..3]
                .iter()
                .enumerate()
                .map(|(i, &subject)| {
                    ctx.task(
                        self.name(),
                        &format!("mee-{}", i + 1),
                        TaskType::Mee,
                        subject,
                        40,
                        format!("MEE session {}: {subject} - 30 minutes", i + 1),
                    )
                    .on(ctx.days_later(i as i64))
                })
                .collect();
            tasks.push(
                ctx.task(
                    self.name(),
                    "error-cards",
                    TaskType::RuleWriting,
                    ESSAY_SUBJECTS[0],
                    30,
                    "[Rule Deck Update] Create high-priority cards for rules missed in the essays; plan 2+ reviews in the next 5 days",
                )
                .on(ctx.days_later(3))
                .tagged("rule-deck-update"),
            );
            return tasks;
        }

        let mpt = ctx.task(
            self.name(),
            "mpt",
            TaskType::Review,
            Subject::CivPro,
            120,
            "Full MPT task - 90 minutes",
        );
        let template = ctx
            .task(
                self.name(),
                "mpt-template",
                TaskType::TemplateReview,
                Subject::CivPro,
                25,
                "[Template Recall] Write the task format template + 3 main issues + missed bonus issues from memory",
            )
            .on(ctx.days_later(2))
            .tagged("template-spaced")
            .linked_to(mpt.id.clone());
        vec![mpt, template]
    }
}

// -- Polish --

pub struct Polish;

impl PhaseStrategy for Polish {
    fn name(&self) -> &'static str {
        "polish"
    }

    fn weekday_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = ESSAY_WEEKLY.pick(ctx);
        if ctx.day_of_phase >= 15 {
            return vec![
                ctx.task(
                    self.name(),
                    "deck",
                    TaskType::RuleWriting,
                    subject,
                    25,
                    "[Rule Deck Priority] Write overdue high-priority rules from blank paper",
                )
                .tagged("rule-deck-final"),
                ctx.task(
                    self.name(),
                    "old-mee",
                    TaskType::ActiveRecall,
                    subject,
                    25,
                    "[Spaced Rep] Rewrite an old MEE outline (issue headings only, no answers)",
                )
                .tagged("old-mee-final"),
                ctx.task(
                    self.name(),
                    "light-practice",
                    TaskType::Mbe,
                    subject,
                    15,
                    "Light MBE: 5-10 current-week-topic questions",
                )
                .with_count(8),
            ];
        }

        vec![
            ctx.task(
                self.name(),
                "template",
                TaskType::TemplateReview,
                subject,
                20,
                "[Template Maintenance] Sketch MEE template + MPT format from memory",
            )
            .tagged("template-maintain"),
            ctx.task(
                self.name(),
                "deck",
                TaskType::RuleWriting,
                subject,
                25,
                "[Rule Deck] Review scheduled rules",
            )
            .tagged("rule-deck"),
            ctx.task(
                self.name(),
                "new",
                TaskType::Mee,
                subject,
                30,
                "New MEE or light practice",
            ),
        ]
    }

    fn weekend_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = ESSAY_WEEKLY.pick(ctx);
        let format = MPT_FORMATS[ctx.week_of_phase as usize % MPT_FORMATS.len()];
        vec![
            ctx.task(
                self.name(),
                "format",
                TaskType::TemplateReview,
                Subject::CivPro,
                30,
                format!("[Format Template Review] Sketch {format} format structure from memory, compare with sample"),
            )
            .tagged("format-recall"),
            ctx.task(
                self.name(),
                "review",
                TaskType::Review,
                subject,
                90,
                "Light review session - past errors and weak areas",
            )
            .tagged("final-review"),
        ]
    }
}

// -- Rolling --

pub struct Rolling;

impl PhaseStrategy for Rolling {
    fn name(&self) -> &'static str {
        "rolling"
    }

    fn weekday_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = Rotation::every(10, &Subject::MBE).pick(ctx);
        let outline = ctx.task(
            self.name(),
            "outline",
            TaskType::Outline,
            subject,
            45,
            format!("[Progress] {subject} - summarize and close-read"),
        );
        let spaced_prefix = format!("{}-spaced", self.name());
        let description = format!("{subject} material");
        let reviews = ReviewSeries::new(&spaced_prefix, ctx.date, subject, &description)
            .linked(&outline.id)
            .schedule(ctx.spaced_offsets, ctx.schedule_end);

        let mut tasks = vec![
            outline.clone(),
            ctx.task(
                self.name(),
                "mbe",
                TaskType::Mbe,
                subject,
                60,
                format!("[Practice] {subject} MCQ 20 questions and error log"),
            )
            .with_count(20)
            .tagged("practice"),
        ];
        tasks.extend(reviews);
        tasks
    }

    fn weekend_tasks(&self, ctx: &DayContext) -> Vec<StudyTask> {
        let subject = Rotation::every(10, &Subject::MBE).pick(ctx);
        vec![
            ctx.task(
                self.name(),
                "mock",
                TaskType::MockExam,
                subject,
                100,
                "[Mock] Mixed MBE 50 questions (timed)",
            )
            .with_count(50),
            ctx.task(
                self.name(),
                "error-log",
                TaskType::Review,
                subject,
                120,
                "[Weekly Review] Work through the error log's weak spots",
            )
            .tagged("error-review"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::PhaseIndexing;
    use crate::spaced::{DEFAULT_OFFSETS, EXTENDED_OFFSETS};
    use chrono::{Datelike, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx_with<'a>(day: NaiveDate, end: NaiveDate, offsets: &'a [u32]) -> DayContext<'a> {
        let start = day.with_day0(0).unwrap();
        DayContext::new(day, start, end, PhaseIndexing::CalendarMonth, offsets)
    }

    fn ctx(day: NaiveDate) -> DayContext<'static> {
        ctx_with(day, date(2026, 7, 28), &[])
    }

    #[test]
    fn foundation_weekday_has_three_slots() {
        // Wednesday in the second week of the month
        let tasks = Foundation.tasks_for(&ctx(date(2026, 1, 14)));
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "foundation-outline-2026-01-14",
                "foundation-mbe-2026-01-14",
                "foundation-recall-2026-01-14",
            ]
        );
        assert!(tasks.iter().all(|t| t.subject == Subject::Contracts));
        assert_eq!(tasks[1].count, Some(15));
        assert_eq!(tasks[2].memory_tag.as_deref(), Some("active-recall"));
        assert_eq!(tasks.iter().map(|t| t.estimated_minutes).sum::<u32>(), 115);
    }

    #[test]
    fn kickoff_alternates_daily() {
        let day1 = Kickoff.tasks_for(&ctx(date(2026, 1, 1)));
        let day2 = Kickoff.tasks_for(&ctx(date(2026, 1, 2)));
        assert!(day1.iter().all(|t| t.subject == Subject::Torts));
        assert!(day2.iter().all(|t| t.subject == Subject::Contracts));
        assert!(day1[0].id.starts_with("kickoff-"));
    }

    #[test]
    fn foundation_last_weekend_is_a_mock() {
        let early = Foundation.tasks_for(&ctx(date(2026, 1, 17)));
        assert_eq!(early[0].id, "foundation-catchup-2026-01-17");

        let late = Foundation.tasks_for(&ctx(date(2026, 1, 24)));
        assert_eq!(late.len(), 2);
        assert_eq!(late[0].kind, TaskType::MockExam);
        assert_eq!(late[1].date, date(2026, 1, 25));
        assert_eq!(late[1].id, "foundation-mock-review-2026-01-24");
        assert_eq!(late[1].linked_task_id.as_deref(), Some("foundation-mock-2026-01-24"));
    }

    #[test]
    fn second_round_injects_clipped_reviews() {
        let day = date(2026, 2, 2);
        let c = ctx_with(day, date(2026, 2, 10), &DEFAULT_OFFSETS);
        let tasks = SecondRound.tasks_for(&c);
        let reviews: Vec<_> = tasks.iter().filter(|t| t.kind == TaskType::Review).collect();
        assert_eq!(reviews.len(), 3);
        assert!(reviews.iter().all(|t| t.date <= date(2026, 2, 10)));
        assert!(reviews.iter().all(|t| t.linked_task_id.as_deref() == Some("second-round-outline-2026-02-02")));
        assert_eq!(reviews[2].memory_tag.as_deref(), Some("spaced-rep-7"));
    }

    #[test]
    fn second_round_weekly_review_on_seventh_day() {
        let tasks = SecondRound.tasks_for(&ctx(date(2026, 2, 16)));
        assert!(!tasks.iter().any(|t| t.id.contains("weekly-review")));
        // day 14 of the phase, a Tuesday
        let tasks = SecondRound.tasks_for(&ctx(date(2026, 4, 14)));
        assert!(tasks.iter().any(|t| t.id == "second-round-weekly-review-2026-04-14"));
    }

    #[test]
    fn second_round_weekends_alternate_by_fortnight() {
        let mock = SecondRound.tasks_for(&ctx(date(2026, 2, 7)));
        assert_eq!(mock[0].kind, TaskType::MockExam);
        assert_eq!(mock[1].date, date(2026, 2, 9));
        let reinforce = SecondRound.tasks_for(&ctx(date(2026, 2, 21)));
        assert_eq!(reinforce.len(), 1);
        assert_eq!(reinforce[0].memory_tag.as_deref(), Some("reinforcement"));
    }

    #[test]
    fn essay_foundation_weekday_schedule() {
        let monday = EssayFoundation.tasks_for(&ctx(date(2026, 3, 2)));
        assert_eq!(monday[0].kind, TaskType::RuleWriting);
        assert_eq!(monday[0].subject, Subject::Contracts);

        // first week: last week's subject wraps around to the end of the rotation
        let wednesday = EssayFoundation.tasks_for(&ctx(date(2026, 3, 4)));
        assert_eq!(wednesday[0].subject, Subject::CriminalLaw);
        assert_eq!(wednesday[0].memory_tag.as_deref(), Some("delayed-recall"));

        let friday = EssayFoundation.tasks_for(&ctx(date(2026, 3, 6)));
        assert_eq!(friday[0].kind, TaskType::TemplateReview);

        let thursday = EssayFoundation.tasks_for(&ctx(date(2026, 3, 5)));
        assert_eq!(thursday.len(), 1);
        assert_eq!(thursday[0].id, "essay-foundation-general-2026-03-05");
    }

    #[test]
    fn essay_volume_three_day_session() {
        // Saturday in week 0 of April
        let tasks = EssayVolume.tasks_for(&ctx(date(2026, 4, 4)));
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].date, date(2026, 4, 4));
        assert_eq!(tasks[1].date, date(2026, 4, 5));
        assert_eq!(tasks[2].date, date(2026, 4, 6));
        assert_eq!(tasks[3].linked_task_id.as_deref(), Some("essay-volume-mee-1-2026-04-04"));

        // Saturday in week 1
        let mpt = EssayVolume.tasks_for(&ctx(date(2026, 4, 11)));
        assert_eq!(mpt[1].date, date(2026, 4, 13));
        assert_eq!(mpt[1].memory_tag.as_deref(), Some("case-recall"));
    }

    #[test]
    fn polish_shifts_to_review_in_final_weeks() {
        let early = Polish.tasks_for(&ctx(date(2026, 6, 2)));
        assert_eq!(early[0].memory_tag.as_deref(), Some("template-maintain"));
        let late = Polish.tasks_for(&ctx(date(2026, 6, 15)));
        assert_eq!(late[0].memory_tag.as_deref(), Some("rule-deck-final"));
        assert_eq!(late[2].count, Some(8));
    }

    #[test]
    fn rolling_seeds_extended_series() {
        let day = date(2026, 1, 14);
        let c = DayContext::new(day, day, date(2026, 7, 28), PhaseIndexing::Elapsed, &EXTENDED_OFFSETS);
        let tasks = Rolling.tasks_for(&c);
        assert_eq!(tasks.len(), 2 + EXTENDED_OFFSETS.len());
        assert_eq!(tasks.last().unwrap().date, date(2026, 2, 13));
        assert_eq!(tasks.last().unwrap().memory_tag.as_deref(), Some("spaced-rep-30"));
    }

    #[test]
    fn recall_tasks_always_carry_a_memory_tag() {
        let table = standard_table();
        let start = date(2026, 1, 1);
        let end = date(2026, 6, 30);
        for day in crate::calendar::each_day(start, end) {
            let c = DayContext::new(day, start, end, PhaseIndexing::CalendarMonth, &DEFAULT_OFFSETS);
            for task in table.tasks_for_day(&c) {
                if task.kind.is_recall() {
                    assert!(task.memory_tag.is_some(), "{} has no memory tag", task.id);
                }
            }
        }
    }
}
