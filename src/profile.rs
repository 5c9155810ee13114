use std::path::Path;

use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::Result;
use crate::plan::PlanConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub exam_date: NaiveDate,
    pub mbe_goal: u32,
    pub target_score: u32,
    pub daily_hours_weekday: f64,
    pub daily_hours_weekend: f64,
    pub plan: PlanConfig,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            exam_date: NaiveDate::from_ymd_opt(2026, 7, 28).unwrap_or_default(),
            mbe_goal: 2000,
            target_score: 270,
            daily_hours_weekday: 2.0,
            daily_hours_weekend: 5.0,
            plan: PlanConfig::default(),
        }
    }
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("no profile at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn days_until_exam(&self, today: NaiveDate) -> i64 {
        calendar::days_between(today, self.exam_date)
    }

    pub fn minutes_available(&self, date: NaiveDate) -> u32 {
        let hours = if calendar::is_weekend(date) {
            self.daily_hours_weekend
        } else {
            self.daily_hours_weekday
        };
        (hours.max(0.0) * 60.0).round() as u32
    }

    pub fn minutes_between(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        calendar::each_day(start, end)
            .map(|d| self.minutes_available(d))
            .sum()
    }
}
