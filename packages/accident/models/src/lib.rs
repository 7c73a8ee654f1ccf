#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident record types and the column layout of a loaded dataset.
//!
//! A [`Dataset`] keeps every column of the source file in source order.
//! The six columns every accident report must carry are parsed into typed
//! fields on [`AccidentRecord`]; any other column is kept verbatim as an
//! extra so that previews and exports reproduce the file faithfully.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Format used when writing `dateCommitted` values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The only accepted format for `timeCommitted` values.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A column every accident dataset must provide.
///
/// The string form is the exact CSV header name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum RecordField {
    /// Calendar date the accident happened.
    DateCommitted,
    /// Time of day the accident happened.
    TimeCommitted,
    /// Barangay (village/district) where the accident happened.
    Barangay,
    /// Incident classification.
    IncidentType,
    /// Offense recorded for the incident.
    Offense,
    /// Broader grouping of the offense.
    OffenseType,
}

impl RecordField {
    /// Returns all variants of this enum, in canonical column order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::DateCommitted,
            Self::TimeCommitted,
            Self::Barangay,
            Self::IncidentType,
            Self::Offense,
            Self::OffenseType,
        ]
    }

    /// Whether this field holds free-form categorical text (as opposed to a
    /// temporal value).
    #[must_use]
    pub const fn is_categorical(self) -> bool {
        !matches!(self, Self::DateCommitted | Self::TimeCommitted)
    }
}

/// Value kind inferred for a column when the dataset was loaded.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColumnKind {
    /// Every present value parses as a signed integer.
    Integer,
    /// Every present value parses as a floating point number.
    Float,
    /// Every present value is `true` or `false`.
    Boolean,
    /// Anything else.
    Text,
    /// Calendar date (`dateCommitted`).
    Date,
    /// Time of day (`timeCommitted`).
    Time,
}

impl ColumnKind {
    /// Whether cells of this kind carry a magnitude.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

/// Where a column's values live on an [`AccidentRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnSlot {
    /// One of the typed required fields.
    Field(RecordField),
    /// Index into [`AccidentRecord::extras`].
    Extra(usize),
}

/// One column of a loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header name as it appeared in the source file.
    pub name: String,
    /// Inferred value kind.
    pub kind: ColumnKind,
    /// Where the values are stored.
    pub slot: ColumnSlot,
}

/// One accident report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccidentRecord {
    /// Date the accident happened.
    pub date_committed: NaiveDate,
    /// Time of day the accident happened.
    pub time_committed: NaiveTime,
    /// Location name.
    pub barangay: String,
    /// Incident classification.
    pub incident_type: String,
    /// Offense recorded for the incident.
    pub offense: String,
    /// Broader grouping of the offense.
    pub offense_type: String,
    /// Raw text of the non-required columns, indexed by [`ColumnSlot::Extra`].
    pub extras: Vec<String>,
}

impl AccidentRecord {
    /// Returns the text of a categorical field, or `None` for the temporal
    /// fields.
    #[must_use]
    pub fn category(&self, field: RecordField) -> Option<&str> {
        match field {
            RecordField::Barangay => Some(&self.barangay),
            RecordField::IncidentType => Some(&self.incident_type),
            RecordField::Offense => Some(&self.offense),
            RecordField::OffenseType => Some(&self.offense_type),
            RecordField::DateCommitted | RecordField::TimeCommitted => None,
        }
    }

    /// Returns the cell text for a column, formatting the temporal fields
    /// with [`DATE_FORMAT`] and [`TIME_FORMAT`].
    #[must_use]
    pub fn cell(&self, slot: ColumnSlot) -> Cow<'_, str> {
        match slot {
            ColumnSlot::Field(RecordField::DateCommitted) => {
                Cow::Owned(self.date_committed.format(DATE_FORMAT).to_string())
            }
            ColumnSlot::Field(RecordField::TimeCommitted) => {
                Cow::Owned(self.time_committed.format(TIME_FORMAT).to_string())
            }
            ColumnSlot::Field(field) => Cow::Borrowed(self.category(field).unwrap_or_default()),
            ColumnSlot::Extra(idx) => {
                Cow::Borrowed(self.extras.get(idx).map_or("", String::as_str))
            }
        }
    }
}

/// An ordered collection of accident records sharing one column layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    records: Vec<AccidentRecord>,
}

impl Dataset {
    /// Creates a dataset from a column layout and its records.
    #[must_use]
    pub const fn new(columns: Vec<Column>, records: Vec<AccidentRecord>) -> Self {
        Self { columns, records }
    }

    /// Creates a dataset with the same column layout as `self` holding
    /// `records` instead.
    #[must_use]
    pub fn with_records(&self, records: Vec<AccidentRecord>) -> Self {
        Self {
            columns: self.columns.clone(),
            records,
        }
    }

    /// Column layout in source order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Records in source order.
    #[must_use]
    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header names in source order.
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Earliest and latest `dateCommitted`, or `None` when empty.
    #[must_use]
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date_committed).min()?;
        let max = self.records.iter().map(|r| r.date_committed).max()?;
        Some((min, max))
    }

    /// Distinct values of a categorical field in order of first appearance.
    #[must_use]
    pub fn distinct(&self, field: RecordField) -> Vec<String> {
        let mut seen = std::collections::BTreeSet::new();
        self.records
            .iter()
            .filter_map(|r| r.category(field))
            .filter(|value| seen.insert(*value))
            .map(str::to_owned)
            .collect()
    }
}
