use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "Torts")]
    Torts,
    #[serde(rename = "Contracts")]
    Contracts,
    #[serde(rename = "Evidence")]
    Evidence,
    #[serde(rename = "Crim Law & Pro")]
    CriminalLaw,
    #[serde(rename = "Con Law")]
    ConLaw,
    #[serde(rename = "Real Property")]
    RealProperty,
    #[serde(rename = "Civ Pro")]
    CivPro,
    #[serde(rename = "Business Associations (Agency, Partnership, Corp, LLC)")]
    BusinessAssociations,
}

impl Subject {
    pub const ALL: [Subject; 8] = [
        Subject::Torts,
        Subject::Contracts,
        Subject::Evidence,
        Subject::CriminalLaw,
        Subject::ConLaw,
        Subject::RealProperty,
        Subject::CivPro,
        Subject::BusinessAssociations,
    ];

    pub const MBE: [Subject; 7] = [
        Subject::Torts,
        Subject::Contracts,
        Subject::Evidence,
        Subject::CriminalLaw,
        Subject::ConLaw,
        Subject::RealProperty,
        Subject::CivPro,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Subject::Torts => "Torts",
            Subject::Contracts => "Contracts",
            Subject::Evidence => "Evidence",
            Subject::CriminalLaw => "Crim Law & Pro",
            Subject::ConLaw => "Con Law",
            Subject::RealProperty => "Real Property",
            Subject::CivPro => "Civ Pro",
            Subject::BusinessAssociations => "Business Associations (Agency, Partnership, Corp, LLC)",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Subject::Torts => "torts",
            Subject::Contracts => "contracts",
            Subject::Evidence => "evidence",
            Subject::CriminalLaw => "crim",
            Subject::ConLaw => "conlaw",
            Subject::RealProperty => "property",
            Subject::CivPro => "civpro",
            Subject::BusinessAssociations => "business",
        }
    }

    pub fn parse(s: &str) -> Option<Subject> {
        let s = s.trim();
        Subject::ALL
            .into_iter()
            .find(|sub| sub.label().eq_ignore_ascii_case(s) || sub.slug().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    Outline,
    #[serde(rename = "MBE")]
    Mbe,
    #[serde(rename = "MEE")]
    Mee,
    Review,
    ActiveRecall,
    RuleWriting,
    MockExam,
    MockReview,
    ErrorAnalysis,
    TemplateReview,
    Flashcard,
}

impl TaskType {
    pub fn is_recall(self) -> bool {
        match self {
            TaskType::ActiveRecall | TaskType::RuleWriting => true,
            TaskType::Outline
            | TaskType::Mbe
            | TaskType::Mee
            | TaskType::Review
            | TaskType::MockExam
            | TaskType::MockReview
            | TaskType::ErrorAnalysis
            | TaskType::TemplateReview
            | TaskType::Flashcard => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTask {
    pub id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TaskType,
    pub subject: Subject,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default)]
    pub completed: bool,
    pub estimated_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_task_id: Option<String>,
}

impl StudyTask {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        kind: TaskType,
        subject: Subject,
        description: impl Into<String>,
        estimated_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            kind,
            subject,
            description: description.into(),
            count: None,
            completed: false,
            estimated_minutes,
            memory_tag: None,
            linked_task_id: None,
        }
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.memory_tag = Some(tag.into());
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn linked_to(mut self, task_id: impl Into<String>) -> Self {
        self.linked_task_id = Some(task_id.into());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn is_active_recall(&self) -> bool {
        let tagged = self.memory_tag.as_deref().is_some_and(|tag| {
            tag.contains("recall") || tag.contains("rule-writing")
        });
        tagged || self.kind.is_recall()
    }
}

pub fn task_id(prefix: &str, subtype: &str, origin: NaiveDate) -> String {
    format!("{prefix}-{subtype}-{}", calendar::format_iso_date(origin))
}

pub fn roll_over_incomplete(tasks: &[StudyTask], today: NaiveDate) -> Vec<StudyTask> {
    tasks
        .iter()
        .map(|task| {
            if !task.completed && task.date < today {
                task.clone().on(today)
            } else {
                task.clone()
            }
        })
        .collect()
}
