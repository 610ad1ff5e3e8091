#[cfg(test)]
mod tests {
    use crate::logic::{
        check_appointment_conflicts, check_booking_window, check_cancellation_cutoff,
        check_holiday_blocking, check_shift_window, check_simultaneous_limit, minutes_of_day,
        overlaps,
    };
    use crate::models::{
        Appointment, AppointmentStatus, BlockingRule, BookingPolicy, CancellationInitiator,
        Holiday, HolidayKind, RejectionReason, Shift,
    };
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
    use uuid::Uuid;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn monday_shift() -> Shift {
        // Monday 08:00-18:00, lunch 12:00-13:00
        Shift {
            employee_id: Uuid::new_v4(),
            weekday: Weekday::Mon,
            start_time: time(8, 0),
            end_time: time(18, 0),
            lunch_break_start: Some(time(12, 0)),
            lunch_break_end: Some(time(13, 0)),
        }
    }

    fn holiday(name: &str, blocking: BlockingRule) -> Holiday {
        Holiday {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            name: name.to_string(),
            kind: HolidayKind::National,
            is_active: true,
            blocking,
            custom_start: None,
            custom_end: None,
        }
    }

    fn appointment(
        employee_id: Uuid,
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
        status: AppointmentStatus,
    ) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            employee_id,
            client_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            start: Utc
                .with_ymd_and_hms(2025, 5, 5, start_hour, start_minute, 0)
                .unwrap(),
            end: Utc
                .with_ymd_and_hms(2025, 5, 5, end_hour, end_minute, 0)
                .unwrap(),
            status,
        }
    }

    #[test]
    fn test_overlaps_is_symmetric() {
        let cases = [
            (0, 10, 5, 15),
            (5, 15, 0, 10),
            (0, 10, 10, 20),
            (0, 10, 20, 30),
        ];
        for (a_start, a_end, b_start, b_end) in cases {
            assert_eq!(
                overlaps(a_start, a_end, b_start, b_end),
                overlaps(b_start, b_end, a_start, a_end),
                "overlaps should be symmetric for ({a_start},{a_end}) vs ({b_start},{b_end})"
            );
        }
    }

    #[test]
    fn test_overlaps_self_positive_duration() {
        assert!(overlaps(10, 20, 10, 20));
    }

    #[test]
    fn test_overlaps_zero_duration_never_overlaps() {
        assert!(!overlaps(10, 10, 10, 10));
        // A zero-duration range strictly inside another range, on either side
        assert!(!overlaps(10, 10, 0, 20));
        assert!(!overlaps(0, 20, 10, 10));
    }

    #[test]
    fn test_overlaps_touching_endpoints_do_not_overlap() {
        // Half-open semantics: [0, 10) and [10, 20) are back to back
        assert!(!overlaps(0, 10, 10, 20));
        assert!(!overlaps(10, 20, 0, 10));
    }

    #[test]
    fn test_minutes_of_day_ignores_seconds() {
        assert_eq!(
            minutes_of_day(NaiveTime::from_hms_opt(10, 30, 59).unwrap()),
            630
        );
        assert_eq!(minutes_of_day(time(0, 0)), 0);
    }

    #[test]
    fn test_shift_window_exact_boundaries_accepted() {
        let shift = Shift {
            lunch_break_start: None,
            lunch_break_end: None,
            ..monday_shift()
        };
        assert_eq!(check_shift_window(&[shift], time(8, 0), time(18, 0)), None);
    }

    #[test]
    fn test_shift_window_one_minute_out_rejected() {
        let shift = Shift {
            lunch_break_start: None,
            lunch_break_end: None,
            ..monday_shift()
        };
        let early = check_shift_window(std::slice::from_ref(&shift), time(7, 59), time(9, 0));
        assert!(matches!(early, Some(RejectionReason::OutsideShift { .. })));

        let late = check_shift_window(&[shift], time(17, 0), time(18, 1));
        assert!(matches!(late, Some(RejectionReason::OutsideShift { .. })));
    }

    #[test]
    fn test_shift_window_no_rows_means_employee_off() {
        assert_eq!(
            check_shift_window(&[], time(9, 0), time(10, 0)),
            Some(RejectionReason::EmployeeOff)
        );
    }

    #[test]
    fn test_shift_window_lunch_break_rejected() {
        // Monday 08:00-18:00 with lunch 12:00-13:00; 12:15-12:45 must be rejected
        let reason = check_shift_window(&[monday_shift()], time(12, 15), time(12, 45));
        match reason {
            Some(RejectionReason::LunchBreak {
                break_start,
                break_end,
            }) => {
                assert_eq!(break_start, time(12, 0));
                assert_eq!(break_end, time(13, 0));
            }
            other => panic!("expected lunch break rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_shift_window_ending_at_lunch_start_accepted() {
        // Half-open: a slot ending exactly when lunch starts does not overlap it
        assert_eq!(
            check_shift_window(&[monday_shift()], time(11, 30), time(12, 0)),
            None
        );
        assert_eq!(
            check_shift_window(&[monday_shift()], time(13, 0), time(13, 30)),
            None
        );
    }

    #[test]
    fn test_shift_window_uses_first_row_only() {
        let mut second = monday_shift();
        second.start_time = time(19, 0);
        second.end_time = time(22, 0);
        let shifts = vec![monday_shift(), second];
        // 19:00-20:00 sits in the second row's window but the first row wins
        let reason = check_shift_window(&shifts, time(19, 0), time(20, 0));
        assert!(matches!(reason, Some(RejectionReason::OutsideShift { .. })));
    }

    #[test]
    fn test_holiday_full_day_blocks_any_time() {
        let holidays = vec![holiday("New Year's Day", BlockingRule::FullDay)];
        for (start, end) in [(time(0, 0), time(0, 30)), (time(9, 0), time(10, 0)), (time(23, 0), time(23, 30))] {
            let reason = check_holiday_blocking(&holidays, start, end).unwrap();
            match reason {
                Some(RejectionReason::HolidayBlocked { name }) => {
                    assert_eq!(name, "New Year's Day");
                }
                other => panic!("expected holiday rejection, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_holiday_inactive_never_blocks() {
        let mut rule = holiday("Carnival", BlockingRule::FullDay);
        rule.is_active = false;
        assert_eq!(
            check_holiday_blocking(&[rule], time(9, 0), time(10, 0)).unwrap(),
            None
        );
    }

    #[test]
    fn test_holiday_morning_blocks_before_noon_only() {
        let holidays = vec![holiday("Election morning", BlockingRule::Morning)];
        assert!(check_holiday_blocking(&holidays, time(11, 59), time(12, 30))
            .unwrap()
            .is_some());
        assert_eq!(
            check_holiday_blocking(&holidays, time(12, 0), time(13, 0)).unwrap(),
            None
        );
    }

    #[test]
    fn test_holiday_afternoon_blocks_from_noon() {
        let holidays = vec![holiday("Parade", BlockingRule::Afternoon)];
        assert!(check_holiday_blocking(&holidays, time(12, 0), time(12, 30))
            .unwrap()
            .is_some());
        assert_eq!(
            check_holiday_blocking(&holidays, time(11, 0), time(11, 45)).unwrap(),
            None
        );
    }

    #[test]
    fn test_holiday_custom_half_open_boundaries() {
        let mut rule = holiday("Staff meeting", BlockingRule::Custom);
        rule.custom_start = Some(time(14, 0));
        rule.custom_end = Some(time(16, 0));
        let holidays = vec![rule];

        // Ending exactly at custom_start is NOT blocked
        assert_eq!(
            check_holiday_blocking(&holidays, time(13, 0), time(14, 0)).unwrap(),
            None
        );
        // Starting one minute before custom_end IS blocked
        assert!(check_holiday_blocking(&holidays, time(15, 59), time(16, 30))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_holiday_custom_without_window_is_an_error() {
        let rule = holiday("Broken rule", BlockingRule::Custom);
        let result = check_holiday_blocking(&[rule], time(9, 0), time(10, 0));
        assert!(result.is_err(), "missing custom window must not pass silently");
    }

    #[test]
    fn test_holiday_first_matching_rule_wins() {
        let holidays = vec![
            holiday("First holiday", BlockingRule::FullDay),
            holiday("Second holiday", BlockingRule::FullDay),
        ];
        let reason = check_holiday_blocking(&holidays, time(9, 0), time(10, 0)).unwrap();
        assert_eq!(
            reason,
            Some(RejectionReason::HolidayBlocked {
                name: "First holiday".to_string()
            })
        );
    }

    #[test]
    fn test_conflict_overlapping_confirmed_appointment() {
        let employee_id = Uuid::new_v4();
        // Existing confirmed 10:00-10:30; proposed 10:15-10:45 conflicts
        let existing = vec![appointment(
            employee_id,
            10,
            0,
            10,
            30,
            AppointmentStatus::Confirmed,
        )];
        let report = check_appointment_conflicts(
            &existing,
            Utc.with_ymd_and_hms(2025, 5, 5, 10, 15, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 5, 10, 45, 0).unwrap(),
            None,
        );
        assert!(report.has_conflict);
        assert_eq!(report.conflicting.len(), 1);
    }

    #[test]
    fn test_conflict_back_to_back_accepted() {
        let employee_id = Uuid::new_v4();
        let existing = vec![appointment(
            employee_id,
            10,
            0,
            10,
            30,
            AppointmentStatus::Confirmed,
        )];
        // 10:30-11:00 touches but does not overlap
        let report = check_appointment_conflicts(
            &existing,
            Utc.with_ymd_and_hms(2025, 5, 5, 10, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 5, 11, 0, 0).unwrap(),
            None,
        );
        assert!(!report.has_conflict);
    }

    #[test]
    fn test_conflict_canceled_and_no_show_do_not_block() {
        let employee_id = Uuid::new_v4();
        let existing = vec![
            appointment(employee_id, 10, 0, 10, 30, AppointmentStatus::Canceled),
            appointment(employee_id, 10, 0, 10, 30, AppointmentStatus::NoShow),
        ];
        let report = check_appointment_conflicts(
            &existing,
            Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 5, 10, 30, 0).unwrap(),
            None,
        );
        assert!(!report.has_conflict);
    }

    #[test]
    fn test_conflict_collects_all_collisions() {
        let employee_id = Uuid::new_v4();
        let existing = vec![
            appointment(employee_id, 10, 0, 10, 30, AppointmentStatus::Confirmed),
            appointment(employee_id, 10, 30, 11, 0, AppointmentStatus::Scheduled),
            appointment(employee_id, 11, 30, 12, 0, AppointmentStatus::Scheduled),
        ];
        let report = check_appointment_conflicts(
            &existing,
            Utc.with_ymd_and_hms(2025, 5, 5, 10, 15, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 5, 11, 0, 0).unwrap(),
            None,
        );
        assert!(report.has_conflict);
        assert_eq!(report.conflicting.len(), 2, "both collisions are reported");
    }

    #[test]
    fn test_conflict_excluded_appointment_skipped() {
        let employee_id = Uuid::new_v4();
        let existing = vec![appointment(
            employee_id,
            10,
            0,
            10,
            30,
            AppointmentStatus::Confirmed,
        )];
        let report = check_appointment_conflicts(
            &existing,
            Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 5, 10, 30, 0).unwrap(),
            Some(existing[0].id),
        );
        assert!(!report.has_conflict, "a reschedule never conflicts with itself");
    }

    #[test]
    fn test_booking_window_advance_notice() {
        let policy = BookingPolicy {
            min_advance_hours: 2,
            ..BookingPolicy::default()
        };
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 8, 0, 0).unwrap();

        let too_soon = Utc.with_ymd_and_hms(2025, 5, 5, 9, 0, 0).unwrap();
        assert!(matches!(
            check_booking_window(&policy, too_soon, now),
            Some(RejectionReason::TooSoon { .. })
        ));

        let ok = Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap();
        assert_eq!(check_booking_window(&policy, ok, now), None);
    }

    #[test]
    fn test_booking_window_future_limit() {
        let policy = BookingPolicy {
            future_limit_days: 30,
            ..BookingPolicy::default()
        };
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 8, 0, 0).unwrap();

        let beyond = Utc.with_ymd_and_hms(2025, 6, 5, 8, 0, 0).unwrap();
        assert!(matches!(
            check_booking_window(&policy, beyond, now),
            Some(RejectionReason::TooFarAhead { .. })
        ));

        // The last day inside the horizon is still bookable
        let edge = Utc.with_ymd_and_hms(2025, 6, 4, 8, 0, 0).unwrap();
        assert_eq!(check_booking_window(&policy, edge, now), None);
    }

    #[test]
    fn test_simultaneous_limit_boundary() {
        let policy = BookingPolicy {
            simultaneous_limit: 3,
            ..BookingPolicy::default()
        };
        assert_eq!(check_simultaneous_limit(&policy, 2), None);
        assert!(matches!(
            check_simultaneous_limit(&policy, 3),
            Some(RejectionReason::SimultaneousLimit { limit: 3 })
        ));
    }

    #[test]
    fn test_cancellation_cutoff_for_clients() {
        let policy = BookingPolicy {
            cancel_min_hours: 24,
            ..BookingPolicy::default()
        };
        let start = Utc.with_ymd_and_hms(2025, 5, 6, 10, 0, 0).unwrap();

        let too_late = Utc.with_ymd_and_hms(2025, 5, 5, 12, 0, 0).unwrap();
        assert!(matches!(
            check_cancellation_cutoff(&policy, start, too_late, CancellationInitiator::Client),
            Some(RejectionReason::CancellationCutoff { .. })
        ));

        let in_time = Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap();
        assert_eq!(
            check_cancellation_cutoff(&policy, start, in_time, CancellationInitiator::Client),
            None
        );
    }

    #[test]
    fn test_cancellation_cutoff_bypassed_by_business() {
        let policy = BookingPolicy {
            cancel_min_hours: 24,
            ..BookingPolicy::default()
        };
        let start = Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap();
        let five_minutes_before = Utc.with_ymd_and_hms(2025, 5, 5, 9, 55, 0).unwrap();
        assert_eq!(
            check_cancellation_cutoff(
                &policy,
                start,
                five_minutes_before,
                CancellationInitiator::Business
            ),
            None
        );
    }
}
