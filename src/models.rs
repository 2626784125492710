//! Data models for the medical-centre scheduling engine.
//!
//! This module defines the core data structures used throughout the system:
//! - Patient: patient identity attached to a booking
//! - Slot: a fixed time interval on a date in a doctor's calendar
//! - AppointmentStatus: the reception lifecycle of a booking
//! - Appointment: a patient booked into a slot
//! - Doctor: identity, speciality, calendar and appointment index

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::ScheduleError;

/// Unique, monotonically assigned appointment identifier.
///
/// Ids are handed out by the owning [`crate::MedicalCenter`] and are never
/// reused within its lifetime.
pub type AppointmentId = u64;

/// Parse a time of day given as `"H:MM"` or `"HH:MM"`.
pub fn parse_time(text: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .map_err(|_| ScheduleError::InvalidTime(text.to_string()))
}

/// Render a time of day in the canonical zero-padded `"HH:MM"` form.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Minutes since midnight, the comparable form of a time of day.
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Identity of a patient as recorded on a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub fiscal_code: String,
    pub name: String,
    pub surname: String,
}

/// A bookable time interval on a date, owned by one doctor's calendar.
///
/// Immutable after creation. Slots for the same doctor and date are
/// generated back to back and never overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub doctor_id: String,
}

impl Slot {
    /// Create a new slot with validation.
    pub fn new(
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        doctor_id: String,
    ) -> Result<Self, ScheduleError> {
        if end <= start {
            return Err(ScheduleError::InvalidTimeRange {
                start: format_time(start),
                end: format_time(end),
            });
        }

        Ok(Slot {
            date,
            start,
            end,
            doctor_id,
        })
    }

    /// The `"HH:MM-HH:MM"` label used as the booking key for this slot.
    pub fn label(&self) -> String {
        format!("{}-{}", format_time(self.start), format_time(self.end))
    }

    pub fn start_minute(&self) -> u32 {
        minute_of_day(self.start)
    }

    pub fn duration_minutes(&self) -> u32 {
        minute_of_day(self.end) - minute_of_day(self.start)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Reception lifecycle of an appointment.
///
/// Transitions are strictly forward: `Booked -> Accepted -> Completed`,
/// with `Completed` terminal. Completion implies prior acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Booked,
    Accepted,
    Completed,
}

impl AppointmentStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AppointmentStatus::Accepted | AppointmentStatus::Completed)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, AppointmentStatus::Completed)
    }
}

/// A patient's booking into one slot of a doctor's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient: Patient,
    pub doctor_id: String,
    pub date: NaiveDate,
    /// Slot label in `"HH:MM-HH:MM"` form, as listed in the calendar.
    pub slot: String,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// The `"HH:MM"` start of the booked slot.
    pub fn start_label(&self) -> &str {
        self.slot.split('-').next().unwrap_or(&self.slot)
    }

    pub fn is_accepted(&self) -> bool {
        self.status.is_accepted()
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}

/// A doctor of the centre: identity, speciality, calendar and the index
/// of appointments booked against them.
///
/// The calendar maps each date to the slots generated for it, in
/// chronological generation order. The appointment index holds ids only;
/// the authoritative appointment store lives in the centre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub speciality: String,
    calendar: BTreeMap<NaiveDate, Vec<Slot>>,
    appointment_ids: BTreeSet<AppointmentId>,
}

impl Doctor {
    pub fn new(id: String, name: String, surname: String, speciality: String) -> Self {
        Doctor {
            id,
            name,
            surname,
            speciality,
            calendar: BTreeMap::new(),
            appointment_ids: BTreeSet::new(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    /// Append a slot to the calendar bucket for its date.
    pub fn add_slot(&mut self, slot: Slot) {
        self.calendar.entry(slot.date).or_default().push(slot);
    }

    /// The slots scheduled on a date, if any were generated for it.
    pub fn slots_on(&self, date: NaiveDate) -> Option<&[Slot]> {
        self.calendar.get(&date).map(Vec::as_slice)
    }

    pub fn has_schedule_on(&self, date: NaiveDate) -> bool {
        self.calendar.contains_key(&date)
    }

    /// Total number of slots across the whole calendar.
    pub fn slot_count(&self) -> usize {
        self.calendar.values().map(Vec::len).sum()
    }

    /// Ids of the appointments booked with this doctor, in booking order.
    pub fn appointment_ids(&self) -> impl Iterator<Item = AppointmentId> + '_ {
        self.appointment_ids.iter().copied()
    }

    pub fn appointment_count(&self) -> usize {
        self.appointment_ids.len()
    }

    pub(crate) fn index_appointment(&mut self, id: AppointmentId) {
        self.appointment_ids.insert(id);
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Doctor({}, {}, slots={}, appointments={})",
            self.id,
            self.speciality,
            self.slot_count(),
            self.appointment_ids.len()
        )
    }
}
