// Integration tests for the reception workflow: current date context,
// patient acceptance, next-appointment selection, completion and the
// show-rate metric.

use assert_matches::assert_matches;
use chrono::NaiveDate;

use medsched::{AppointmentId, AppointmentStatus, MedicalCenter, ScheduleError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A centre with one cardiologist scheduled from 09:00 to 12:00 on the
/// sixth and the seventh of May.
fn center_with_schedule() -> MedicalCenter {
    let mut center = MedicalCenter::new();
    center.add_specialities(["Cardiology"]);
    center.add_doctor("D01", "Jane", "Smith", "Cardiology").unwrap();
    for day in [date(2024, 5, 6), date(2024, 5, 7)] {
        center.add_daily_schedule("D01", day, "09:00", "12:00", 30).unwrap();
    }
    center
}

fn book(
    center: &mut MedicalCenter,
    fiscal_code: &str,
    day: NaiveDate,
    slot: &str,
) -> AppointmentId {
    center
        .set_appointment(fiscal_code, "Mario", "Rossi", "D01", day, slot)
        .unwrap()
}

#[test]
fn set_current_date_counts_appointments_of_the_day() {
    let mut center = center_with_schedule();
    let today = date(2024, 5, 6);
    book(&mut center, "FC001", today, "09:00-09:30");
    book(&mut center, "FC002", today, "09:30-10:00");
    book(&mut center, "FC003", date(2024, 5, 7), "09:00-09:30");

    assert_eq!(center.set_current_date(today), 2);
    assert_eq!(center.current_date(), Some(today));
    assert_eq!(center.set_current_date(date(2024, 5, 8)), 0);
}

#[test]
fn accept_marks_all_booked_appointments_of_the_day() {
    let mut center = center_with_schedule();
    let today = date(2024, 5, 6);
    let first = book(&mut center, "FC001", today, "09:00-09:30");
    let second = book(&mut center, "FC001", today, "10:00-10:30");
    let other_day = book(&mut center, "FC001", date(2024, 5, 7), "09:00-09:30");

    center.set_current_date(today);
    assert_eq!(center.accept("FC001"), 2);

    assert!(center.appointment(first).unwrap().is_accepted());
    assert!(center.appointment(second).unwrap().is_accepted());
    assert!(!center.appointment(other_day).unwrap().is_accepted());

    // Already accepted appointments are not marked again.
    assert_eq!(center.accept("FC001"), 0);
}

#[test]
fn accept_without_current_date_is_a_no_op() {
    let mut center = center_with_schedule();
    let id = book(&mut center, "FC001", date(2024, 5, 6), "09:00-09:30");

    assert_eq!(center.accept("FC001"), 0);
    assert!(!center.appointment(id).unwrap().is_accepted());
}

#[test]
fn next_appointment_picks_earliest_accepted() {
    let mut center = center_with_schedule();
    let today = date(2024, 5, 6);
    let late = book(&mut center, "FC001", today, "10:00-10:30");
    let early = book(&mut center, "FC002", today, "09:00-09:30");

    center.set_current_date(today);
    assert_eq!(center.next_appointment("D01"), None);

    center.accept("FC001");
    assert_eq!(center.next_appointment("D01"), Some(late));

    // An earlier accepted appointment takes precedence.
    center.accept("FC002");
    assert_eq!(center.next_appointment("D01"), Some(early));
}

#[test]
fn next_appointment_breaks_start_time_ties_by_booking_id() {
    let mut center = center_with_schedule();
    let today = date(2024, 5, 6);
    // Slot labels are descriptive keys, so the same slot can be booked
    // twice; the earlier booking wins the tie.
    let first = book(&mut center, "FC001", today, "09:00-09:30");
    let second = book(&mut center, "FC002", today, "09:00-09:30");
    assert!(first < second);

    center.set_current_date(today);
    center.accept("FC001");
    center.accept("FC002");
    assert_eq!(center.next_appointment("D01"), Some(first));
}

#[test]
fn next_appointment_excludes_completed_and_unknown_contexts() {
    let mut center = center_with_schedule();
    let today = date(2024, 5, 6);
    let first = book(&mut center, "FC001", today, "09:00-09:30");
    let second = book(&mut center, "FC002", today, "09:30-10:00");

    // No current date set yet.
    assert_eq!(center.next_appointment("D01"), None);

    center.set_current_date(today);
    center.accept("FC001");
    center.accept("FC002");
    center.complete_appointment("D01", first).unwrap();

    assert_eq!(center.next_appointment("D01"), Some(second));
    assert_eq!(center.next_appointment("D99"), None);
}

#[test]
fn complete_requires_acceptance_first() {
    let mut center = center_with_schedule();
    let today = date(2024, 5, 6);
    let id = book(&mut center, "FC001", today, "09:00-09:30");
    center.set_current_date(today);

    assert_matches!(
        center.complete_appointment("D01", id),
        Err(ScheduleError::NotAccepted(got)) if got == id
    );
    assert_eq!(center.appointment(id).unwrap().status, AppointmentStatus::Booked);

    center.accept("FC001");
    center.complete_appointment("D01", id).unwrap();
    assert!(center.appointment(id).unwrap().is_completed());
}

#[test]
fn complete_rejects_wrong_doctor_and_unknown_id() {
    let mut center = center_with_schedule();
    center.add_specialities(["Dermatology"]);
    center.add_doctor("D02", "John", "Brown", "Dermatology").unwrap();
    let today = date(2024, 5, 6);
    let id = book(&mut center, "FC001", today, "09:00-09:30");
    center.set_current_date(today);
    center.accept("FC001");

    assert_matches!(
        center.complete_appointment("D02", id),
        Err(ScheduleError::InvalidDoctor { .. })
    );
    assert_matches!(
        center.complete_appointment("D01", 999),
        Err(ScheduleError::UnknownAppointment(999))
    );
}

#[test]
fn complete_on_another_date_leaves_status_untouched() {
    let mut center = center_with_schedule();
    let today = date(2024, 5, 6);
    let id = book(&mut center, "FC001", today, "09:00-09:30");
    center.set_current_date(today);
    center.accept("FC001");

    center.set_current_date(date(2024, 5, 7));
    assert_matches!(
        center.complete_appointment("D01", id),
        Err(ScheduleError::WrongDate { .. })
    );
    let appointment = center.appointment(id).unwrap();
    assert!(appointment.is_accepted());
    assert!(!appointment.is_completed());
}

#[test]
fn complete_is_not_repeatable() {
    let mut center = center_with_schedule();
    let today = date(2024, 5, 6);
    let id = book(&mut center, "FC001", today, "09:00-09:30");
    center.set_current_date(today);
    center.accept("FC001");
    center.complete_appointment("D01", id).unwrap();

    assert_matches!(
        center.complete_appointment("D01", id),
        Err(ScheduleError::AlreadyCompleted(got)) if got == id
    );
}

#[test]
fn show_rate_is_accepted_over_total() {
    let mut center = center_with_schedule();
    let today = date(2024, 5, 6);
    book(&mut center, "FC001", today, "09:00-09:30");
    book(&mut center, "FC002", today, "09:30-10:00");

    // No appointments on this date at all.
    assert_eq!(center.show_rate("D01", date(2024, 5, 8)).unwrap(), 0.0);

    center.set_current_date(today);
    assert_eq!(center.show_rate("D01", today).unwrap(), 0.0);

    center.accept("FC001");
    assert_eq!(center.show_rate("D01", today).unwrap(), 0.5);

    center.accept("FC002");
    assert_eq!(center.show_rate("D01", today).unwrap(), 1.0);

    assert_matches!(center.show_rate("D99", today), Err(ScheduleError::UnknownDoctor(_)));
}

#[test]
fn completed_appointments_still_count_as_shown() {
    let mut center = center_with_schedule();
    let today = date(2024, 5, 6);
    let id = book(&mut center, "FC001", today, "09:00-09:30");
    center.set_current_date(today);
    center.accept("FC001");
    center.complete_appointment("D01", id).unwrap();

    assert_eq!(center.show_rate("D01", today).unwrap(), 1.0);
}
