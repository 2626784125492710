//! Error taxonomy for the scheduling engine.
//!
//! Every validation failure surfaces synchronously as a distinct variant
//! of [`ScheduleError`]; a failed multi-step operation leaves the centre
//! state untouched.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::AppointmentId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("doctor id already registered: {0}")]
    DuplicateId(String),

    #[error("speciality not offered by the centre: {0}")]
    UnknownSpeciality(String),

    #[error("no doctor registered with id: {0}")]
    UnknownDoctor(String),

    #[error("doctor {doctor_id} has no schedule on {date}")]
    UnknownDate { doctor_id: String, date: NaiveDate },

    #[error("slot {slot} is not in the schedule of doctor {doctor_id} on {date}")]
    UnknownSlot {
        doctor_id: String,
        date: NaiveDate,
        slot: String,
    },

    #[error("no appointment with id: {0}")]
    UnknownAppointment(AppointmentId),

    #[error("appointment {appointment_id} is not with doctor {doctor_id}")]
    InvalidDoctor {
        doctor_id: String,
        appointment_id: AppointmentId,
    },

    #[error("patient of appointment {0} has not been accepted at reception")]
    NotAccepted(AppointmentId),

    #[error("appointment {appointment_id} is scheduled for {date}, not the current date")]
    WrongDate {
        appointment_id: AppointmentId,
        date: NaiveDate,
    },

    #[error("appointment {0} has already been completed")]
    AlreadyCompleted(AppointmentId),

    #[error("invalid time of day: {0:?}")]
    InvalidTime(String),

    #[error("slot duration must be positive")]
    InvalidDuration,

    #[error("end time {end} must be after start time {start}")]
    InvalidTimeRange { start: String, end: String },
}
