// CounselDesk - app/state.rs
//
// Dashboard state: the loaded tables plus the settings that shape each view.
// Each view method borrows from the loaded data and returns a plain struct
// that the CLI renders; nothing here prints.

use crate::app::cache::SheetCache;
use crate::app::journal::{self, CsvFileSink, LogSink, NewSession, SaveOutcome};
use crate::app::source::{self, DataSource};
use crate::core::keywords::{self, KeywordCounts};
use crate::core::model::{CounselLog, Dataset, Scholarship, Student};
use crate::core::query;
use crate::platform::config::AppConfig;
use crate::util::constants;
use crate::util::error::{CounselDeskError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Top-level dashboard state.
#[derive(Debug)]
pub struct Dashboard {
    pub config: AppConfig,
    pub source: DataSource,
    pub data: Dataset,
    cache: Option<SheetCache>,
}

/// A student's profile, sessions, and note keywords.
#[derive(Debug)]
pub struct HistoryView<'a> {
    pub student: &'a Student,
    /// Newest first.
    pub logs: Vec<&'a CounselLog>,
    pub keywords: KeywordCounts,
}

/// Keyword overview of one calendar month.
#[derive(Debug)]
pub struct SummaryView<'a> {
    pub year: i32,
    pub month: u32,
    /// Years that have data, newest first.
    pub years: Vec<i32>,
    pub logs: Vec<&'a CounselLog>,
    pub keywords: KeywordCounts,
}

impl SummaryView<'_> {
    /// Keywords drawn in the bar chart.
    pub fn chart_items(&self) -> &[(String, usize)] {
        &self.keywords[..self.keywords.len().min(constants::SUMMARY_CHART_ITEMS)]
    }

    /// Keywords shown as chips.
    pub fn chip_items(&self) -> &[(String, usize)] {
        &self.keywords[..self.keywords.len().min(constants::SUMMARY_CHIP_ITEMS)]
    }
}

/// Scholarships at or above a minimum annual amount.
#[derive(Debug)]
pub struct ScholarshipView<'a> {
    pub min_amount: u64,
    pub matches: Vec<&'a Scholarship>,
}

impl Dashboard {
    /// Load all tables from `source`.
    pub fn load(config: AppConfig, source: DataSource, cache: Option<SheetCache>) -> Result<Self> {
        let data = source::load_dataset(&source, cache.as_ref())?;
        for warning in &data.warnings {
            tracing::warn!(warning = %warning, "Data warning");
        }
        Ok(Self::from_parts(config, source, data, cache))
    }

    /// Assemble a dashboard from already loaded data.
    pub fn from_parts(
        config: AppConfig,
        source: DataSource,
        data: Dataset,
        cache: Option<SheetCache>,
    ) -> Self {
        Self {
            config,
            source,
            data,
            cache,
        }
    }

    /// Whether new sessions can be saved.
    pub fn is_writable(&self) -> bool {
        self.source.is_writable()
    }

    /// Sessions and top keywords for one student.
    pub fn history(&self, name: &str) -> Result<HistoryView<'_>> {
        let name = name.trim();
        let student = query::find_student(&self.data.students, name).ok_or_else(|| {
            CounselDeskError::InvalidArgument {
                name: "name",
                reason: format!("'{name}' is not on the student roster"),
            }
        })?;

        let logs = query::logs_for_student(&self.data.logs, name);
        let notes = query::combined_notes(logs.iter().copied());
        let keywords = keywords::extract_keywords(Some(&notes), self.config.history_top_k);

        Ok(HistoryView {
            student,
            logs,
            keywords,
        })
    }

    /// Keyword summary for a month.
    ///
    /// `year` defaults to the newest year with data (or `today`'s year when
    /// the journal has no dated sessions); `month` defaults to `today`'s.
    pub fn summary(
        &self,
        year: Option<i32>,
        month: Option<u32>,
        today: NaiveDate,
    ) -> Result<SummaryView<'_>> {
        let month = month.unwrap_or_else(|| today.month());
        if !(1..=12).contains(&month) {
            return Err(CounselDeskError::InvalidArgument {
                name: "month",
                reason: format!("{month} is not between 1 and 12"),
            });
        }

        let years = query::log_years(&self.data.logs);
        let year = year
            .or_else(|| years.first().copied())
            .unwrap_or_else(|| today.year());

        let logs = query::logs_in_month(&self.data.logs, year, month);
        let notes = query::combined_notes(logs.iter().copied());
        let keywords = keywords::extract_keywords(Some(&notes), self.config.summary_top_k);
        tracing::debug!(year, month, sessions = logs.len(), "Summary computed");

        Ok(SummaryView {
            year,
            month,
            years,
            logs,
            keywords,
        })
    }

    /// Scholarships whose estimated annual maximum is at least `min_amount` 만원.
    pub fn scholarships(&self, min_amount: u64) -> Result<ScholarshipView<'_>> {
        if min_amount > constants::MAX_MIN_AMOUNT {
            return Err(CounselDeskError::InvalidArgument {
                name: "min-amount",
                reason: format!("{min_amount} exceeds {}", constants::MAX_MIN_AMOUNT),
            });
        }
        Ok(ScholarshipView {
            min_amount,
            matches: query::filter_scholarships(&self.data.scholarships, min_amount),
        })
    }

    /// Record a session. Saved sessions are added to the loaded journal and
    /// the sheet cache is cleared.
    pub fn record(&mut self, session: &NewSession, now: NaiveDateTime) -> Result<SaveOutcome> {
        let mut sink = match &self.source {
            DataSource::Local { dir } => Some(CsvFileSink::new(dir.join(constants::LOCAL_LOGS_FILE))),
            DataSource::Sheet(_) => None,
        };

        let outcome = journal::record_session(
            &self.data.students,
            session,
            now,
            sink.as_mut().map(|s| s as &mut dyn LogSink),
        )?;

        if let SaveOutcome::Saved(ref log) = outcome {
            self.data.logs.push(log.clone());
            if let Some(cache) = &self.cache {
                cache.clear();
            }
        }
        Ok(outcome)
    }
}
