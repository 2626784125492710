//! The medical centre orchestrator.
//!
//! [`MedicalCenter`] owns the speciality catalog, the doctor registry, the
//! authoritative appointment store and the reception "current date"
//! context. All public operations of the engine live here: schedule
//! definition, slot lookup, booking, the reception workflow and the
//! derived metrics.
//!
//! The centre is a plain owned value with `&mut self` mutators and no
//! interior mutability. A concurrent host must serialize access to one
//! centre behind a single lock or an equivalent boundary; independent
//! centres are fully isolated from each other.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::error::ScheduleError;
use crate::models::{
    format_time, parse_time, Appointment, AppointmentId, AppointmentStatus, Doctor, Patient, Slot,
};

/// In-memory scheduling engine for one medical centre.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicalCenter {
    specialities: BTreeSet<String>,
    doctors: BTreeMap<String, Doctor>,
    appointments: BTreeMap<AppointmentId, Appointment>,
    next_id: AppointmentId,
    current_date: Option<NaiveDate>,
}

impl MedicalCenter {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Speciality catalog -------------------------------------------------

    /// Add specialities to the catalog offered by the centre.
    ///
    /// May be invoked multiple times; duplicates are ignored.
    pub fn add_specialities<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.specialities.insert(name.into());
        }
    }

    /// The specialities offered by the centre, in lexical order.
    pub fn specialities(&self) -> impl Iterator<Item = &str> {
        self.specialities.iter().map(String::as_str)
    }

    // --- Doctor registry ----------------------------------------------------

    /// Register a doctor with an empty calendar.
    pub fn add_doctor(
        &mut self,
        id: &str,
        name: &str,
        surname: &str,
        speciality: &str,
    ) -> Result<(), ScheduleError> {
        if self.doctors.contains_key(id) {
            return Err(ScheduleError::DuplicateId(id.to_string()));
        }
        if !self.specialities.contains(speciality) {
            return Err(ScheduleError::UnknownSpeciality(speciality.to_string()));
        }

        debug!(doctor_id = id, speciality, "registering doctor");
        self.doctors.insert(
            id.to_string(),
            Doctor::new(
                id.to_string(),
                name.to_string(),
                surname.to_string(),
                speciality.to_string(),
            ),
        );
        Ok(())
    }

    /// Ids of the doctors with the given speciality, ordered by id.
    pub fn specialists(&self, speciality: &str) -> Vec<&str> {
        self.doctors
            .values()
            .filter(|d| d.speciality == speciality)
            .map(|d| d.id.as_str())
            .collect()
    }

    /// Look up a doctor by id.
    pub fn doctor(&self, id: &str) -> Result<&Doctor, ScheduleError> {
        self.doctors
            .get(id)
            .ok_or_else(|| ScheduleError::UnknownDoctor(id.to_string()))
    }

    pub fn doctor_name(&self, id: &str) -> Result<&str, ScheduleError> {
        Ok(self.doctor(id)?.name.as_str())
    }

    pub fn doctor_surname(&self, id: &str) -> Result<&str, ScheduleError> {
        Ok(self.doctor(id)?.surname.as_str())
    }

    // --- Slot generation ----------------------------------------------------

    /// Define a day of schedule for a doctor.
    ///
    /// Slots of exactly `duration_minutes` are generated back to back from
    /// `start`, as many as fit before `end`; a trailing remainder shorter
    /// than the duration is dropped. Repeated calls for the same doctor and
    /// date accumulate slots without any overlap check, which is the
    /// caller's responsibility.
    ///
    /// Returns the number of slots created.
    pub fn add_daily_schedule(
        &mut self,
        doctor_id: &str,
        date: NaiveDate,
        start: &str,
        end: &str,
        duration_minutes: u32,
    ) -> Result<usize, ScheduleError> {
        if !self.doctors.contains_key(doctor_id) {
            return Err(ScheduleError::UnknownDoctor(doctor_id.to_string()));
        }
        let start = parse_time(start)?;
        let end = parse_time(end)?;
        if duration_minutes == 0 {
            return Err(ScheduleError::InvalidDuration);
        }
        if end <= start {
            return Err(ScheduleError::InvalidTimeRange {
                start: format_time(start),
                end: format_time(end),
            });
        }

        let range_minutes = (end - start).num_minutes() as u32;
        let count = (range_minutes / duration_minutes) as usize;
        let step = Duration::minutes(i64::from(duration_minutes));

        let doctor = self
            .doctors
            .get_mut(doctor_id)
            .ok_or_else(|| ScheduleError::UnknownDoctor(doctor_id.to_string()))?;

        let mut slot_start = start;
        for _ in 0..count {
            let slot_end = slot_start + step;
            doctor.add_slot(Slot::new(date, slot_start, slot_end, doctor_id.to_string())?);
            slot_start = slot_end;
        }

        debug!(doctor_id, %date, count, "daily schedule added");
        Ok(count)
    }

    /// Slots available on a date for a speciality.
    ///
    /// The map has an entry for each doctor of that speciality with at
    /// least one slot on the date, keyed by doctor id; slot labels keep
    /// their calendar order.
    pub fn find_slots(&self, date: NaiveDate, speciality: &str) -> BTreeMap<String, Vec<String>> {
        self.doctors
            .values()
            .filter(|d| d.speciality == speciality)
            .filter_map(|d| {
                let slots = d.slots_on(date)?;
                if slots.is_empty() {
                    return None;
                }
                Some((d.id.clone(), slots.iter().map(Slot::label).collect()))
            })
            .collect()
    }

    // --- Booking ------------------------------------------------------------

    /// Book a patient into an existing slot of a doctor's schedule.
    ///
    /// Validation is fail-fast: the doctor must exist, the doctor must
    /// have a schedule on the date, and `slot` must match one of that
    /// day's slot labels exactly. On failure no state changes. On success
    /// the appointment is stored and indexed under the doctor, and its
    /// freshly assigned id is returned.
    ///
    /// Booking does not mark the slot as taken: slot labels are
    /// descriptive keys, not reservation locks.
    pub fn set_appointment(
        &mut self,
        fiscal_code: &str,
        name: &str,
        surname: &str,
        doctor_id: &str,
        date: NaiveDate,
        slot: &str,
    ) -> Result<AppointmentId, ScheduleError> {
        let doctor = self
            .doctors
            .get(doctor_id)
            .ok_or_else(|| ScheduleError::UnknownDoctor(doctor_id.to_string()))?;
        let slots = doctor
            .slots_on(date)
            .ok_or_else(|| ScheduleError::UnknownDate {
                doctor_id: doctor_id.to_string(),
                date,
            })?;
        if !slots.iter().any(|s| s.label() == slot) {
            return Err(ScheduleError::UnknownSlot {
                doctor_id: doctor_id.to_string(),
                date,
                slot: slot.to_string(),
            });
        }

        let id = self.next_id();
        let appointment = Appointment {
            id,
            patient: Patient {
                fiscal_code: fiscal_code.to_string(),
                name: name.to_string(),
                surname: surname.to_string(),
            },
            doctor_id: doctor_id.to_string(),
            date,
            slot: slot.to_string(),
            status: AppointmentStatus::Booked,
        };
        self.appointments.insert(id, appointment);
        if let Some(doctor) = self.doctors.get_mut(doctor_id) {
            doctor.index_appointment(id);
        }

        debug!(appointment_id = id, doctor_id, %date, slot, "appointment booked");
        Ok(id)
    }

    fn next_id(&mut self) -> AppointmentId {
        self.next_id += 1;
        self.next_id
    }

    // --- Appointment lookup -------------------------------------------------

    /// Look up an appointment by id.
    pub fn appointment(&self, id: AppointmentId) -> Result<&Appointment, ScheduleError> {
        self.appointments
            .get(&id)
            .ok_or(ScheduleError::UnknownAppointment(id))
    }

    pub fn appointment_doctor(&self, id: AppointmentId) -> Result<&str, ScheduleError> {
        Ok(self.appointment(id)?.doctor_id.as_str())
    }

    /// Fiscal code of the patient holding the appointment.
    pub fn appointment_patient(&self, id: AppointmentId) -> Result<&str, ScheduleError> {
        Ok(self.appointment(id)?.patient.fiscal_code.as_str())
    }

    /// Start time of the appointment, as `"HH:MM"`.
    pub fn appointment_time(&self, id: AppointmentId) -> Result<&str, ScheduleError> {
        Ok(self.appointment(id)?.start_label())
    }

    pub fn appointment_date(&self, id: AppointmentId) -> Result<NaiveDate, ScheduleError> {
        Ok(self.appointment(id)?.date)
    }

    /// A doctor's appointments on a date, each as `"HH:MM=fiscalcode"`,
    /// in booking order.
    pub fn list_appointments(&self, doctor_id: &str, date: NaiveDate) -> Vec<String> {
        self.appointments
            .values()
            .filter(|a| a.doctor_id == doctor_id && a.date == date)
            .map(|a| format!("{}={}", a.start_label(), a.patient.fiscal_code))
            .collect()
    }

    // --- Reception workflow -------------------------------------------------

    /// Set the current date used to scope reception operations.
    ///
    /// Returns the total number of appointments scheduled on that date.
    pub fn set_current_date(&mut self, date: NaiveDate) -> usize {
        self.current_date = Some(date);
        let total = self
            .appointments
            .values()
            .filter(|a| a.date == date)
            .count();
        debug!(%date, total, "current date set");
        total
    }

    pub fn current_date(&self) -> Option<NaiveDate> {
        self.current_date
    }

    /// Mark a patient as accepted at the reception desk.
    ///
    /// Every booked appointment of the patient on the current date moves
    /// to `Accepted`; appointments on other dates or already past
    /// `Booked` are untouched. Returns the number of appointments marked.
    pub fn accept(&mut self, fiscal_code: &str) -> usize {
        let Some(today) = self.current_date else {
            warn!(fiscal_code, "accept called with no current date set");
            return 0;
        };

        let mut marked = 0;
        for appointment in self.appointments.values_mut() {
            if appointment.patient.fiscal_code == fiscal_code
                && appointment.date == today
                && appointment.status == AppointmentStatus::Booked
            {
                appointment.status = AppointmentStatus::Accepted;
                marked += 1;
            }
        }

        if marked == 0 {
            warn!(fiscal_code, %today, "accept matched no booked appointment");
        } else {
            debug!(fiscal_code, %today, marked, "patient accepted");
        }
        marked
    }

    /// The next appointment a doctor should see.
    ///
    /// Among the doctor's accepted, not yet completed appointments on the
    /// current date, returns the id of the one with the earliest start
    /// time; ties are broken by booking id. Returns `None` when there is
    /// no such appointment, the doctor is unknown, or no current date has
    /// been set.
    pub fn next_appointment(&self, doctor_id: &str) -> Option<AppointmentId> {
        let today = self.current_date?;
        let doctor = self.doctors.get(doctor_id)?;

        doctor
            .appointment_ids()
            .filter_map(|id| self.appointments.get(&id))
            .filter(|a| a.date == today && a.status == AppointmentStatus::Accepted)
            // Labels are zero-padded, so lexical order is chronological.
            .min_by(|a, b| a.start_label().cmp(b.start_label()).then(a.id.cmp(&b.id)))
            .map(|a| a.id)
    }

    /// Mark an appointment as completed.
    ///
    /// The appointment must exist, be with the given doctor, not already
    /// be completed, have an accepted patient, and be scheduled on the
    /// current date.
    pub fn complete_appointment(
        &mut self,
        doctor_id: &str,
        appointment_id: AppointmentId,
    ) -> Result<(), ScheduleError> {
        let appointment = self.appointment(appointment_id)?;
        if appointment.doctor_id != doctor_id {
            warn!(appointment_id, doctor_id, "completion with the wrong doctor");
            return Err(ScheduleError::InvalidDoctor {
                doctor_id: doctor_id.to_string(),
                appointment_id,
            });
        }
        if appointment.is_completed() {
            return Err(ScheduleError::AlreadyCompleted(appointment_id));
        }
        if !appointment.is_accepted() {
            return Err(ScheduleError::NotAccepted(appointment_id));
        }
        if self.current_date != Some(appointment.date) {
            return Err(ScheduleError::WrongDate {
                appointment_id,
                date: appointment.date,
            });
        }

        if let Some(appointment) = self.appointments.get_mut(&appointment_id) {
            appointment.status = AppointmentStatus::Completed;
        }
        debug!(appointment_id, doctor_id, "appointment completed");
        Ok(())
    }

    // --- Metrics ------------------------------------------------------------

    /// Appointments booked over slots scheduled for a doctor, in [0, 1].
    ///
    /// Defined as 0 when the doctor has no slots or no appointments.
    pub fn completeness_rate(&self, doctor_id: &str) -> Result<f64, ScheduleError> {
        Ok(Self::completeness_of(self.doctor(doctor_id)?))
    }

    fn completeness_of(doctor: &Doctor) -> f64 {
        let slots = doctor.slot_count();
        let appointments = doctor.appointment_count();
        if slots == 0 || appointments == 0 {
            return 0.0;
        }
        appointments as f64 / slots as f64
    }

    /// Accepted appointments over total appointments for a doctor on a
    /// date, in [0, 1]. Defined as 0 when there are no appointments.
    pub fn show_rate(&self, doctor_id: &str, date: NaiveDate) -> Result<f64, ScheduleError> {
        self.doctor(doctor_id)?;

        let mut total = 0usize;
        let mut accepted = 0usize;
        for appointment in self.appointments.values() {
            if appointment.doctor_id == doctor_id && appointment.date == date {
                total += 1;
                if appointment.is_accepted() {
                    accepted += 1;
                }
            }
        }

        if total == 0 {
            return Ok(0.0);
        }
        Ok(accepted as f64 / total as f64)
    }

    /// Schedule completeness of every doctor of the centre, keyed by id.
    pub fn schedule_completeness(&self) -> BTreeMap<String, f64> {
        self.doctors
            .values()
            .map(|d| (d.id.clone(), Self::completeness_of(d)))
            .collect()
    }
}
