//! In-memory appointment scheduling engine for a medical centre.
//!
//! The engine manages doctors, their daily slot calendars and the
//! appointments booked into those slots, plus the reception-desk workflow
//! (patient acceptance, visit completion) and derived metrics (schedule
//! completeness, show rate).
//!
//! All state lives inside a [`MedicalCenter`] value; persistence,
//! transport and user interfaces are external collaborators that call
//! into it. The engine is synchronous and single-threaded by design.
//!
//! ```
//! use chrono::NaiveDate;
//! use medsched::MedicalCenter;
//!
//! # fn main() -> Result<(), medsched::ScheduleError> {
//! let mut center = MedicalCenter::new();
//! center.add_specialities(["Cardiology"]);
//! center.add_doctor("D01", "Jane", "Smith", "Cardiology")?;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
//! let slots = center.add_daily_schedule("D01", date, "9:00", "10:00", 30)?;
//! assert_eq!(slots, 2);
//!
//! let id = center.set_appointment("FC001", "Mario", "Rossi", "D01", date, "09:00-09:30")?;
//! center.set_current_date(date);
//! center.accept("FC001");
//! assert_eq!(center.next_appointment("D01"), Some(id));
//! center.complete_appointment("D01", id)?;
//! # Ok(())
//! # }
//! ```

pub mod center;
pub mod error;
pub mod models;

pub use center::MedicalCenter;
pub use error::ScheduleError;
pub use models::{Appointment, AppointmentId, AppointmentStatus, Doctor, Patient, Slot};
