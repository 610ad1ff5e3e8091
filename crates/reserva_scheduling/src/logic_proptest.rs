#[cfg(test)]
mod tests {
    use crate::logic::{check_holiday_blocking, check_shift_window, minutes_of_day, overlaps};
    use crate::models::{BlockingRule, Holiday, HolidayKind, Shift};
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn minute_time(minute: i64) -> NaiveTime {
        NaiveTime::from_hms_opt((minute / 60) as u32, (minute % 60) as u32, 0).unwrap()
    }

    proptest! {
        // Symmetry: overlaps(A, B) == overlaps(B, A) for all ranges
        #[test]
        fn prop_overlap_symmetry(
            a_start in 0i64..1440,
            a_len in 0i64..240,
            b_start in 0i64..1440,
            b_len in 0i64..240,
        ) {
            let (a_end, b_end) = (a_start + a_len, b_start + b_len);
            prop_assert_eq!(
                overlaps(a_start, a_end, b_start, b_end),
                overlaps(b_start, b_end, a_start, a_end)
            );
        }

        // A range with positive duration overlaps itself; zero duration never does
        #[test]
        fn prop_overlap_self(start in 0i64..1440, len in 0i64..240) {
            let end = start + len;
            prop_assert_eq!(overlaps(start, end, start, end), len > 0);
        }

        // A slot fully inside the shift window and clear of the lunch break is accepted
        #[test]
        fn prop_shift_containment(
            slot_start in 480i64..600,
            slot_len in 1i64..60,
        ) {
            let shift = Shift {
                employee_id: Uuid::new_v4(),
                weekday: Weekday::Mon,
                start_time: minute_time(480),  // 08:00
                end_time: minute_time(1080),   // 18:00
                lunch_break_start: None,
                lunch_break_end: None,
            };
            let start = minute_time(slot_start);
            let end = minute_time(slot_start + slot_len);
            prop_assert_eq!(check_shift_window(&[shift], start, end), None);
        }

        // A full-day holiday blocks every possible range on its date
        #[test]
        fn prop_full_day_holiday_blocks_everything(
            slot_start in 0i64..1380,
            slot_len in 1i64..60,
        ) {
            let holiday = Holiday {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                name: "Ano Novo".to_string(),
                kind: HolidayKind::National,
                is_active: true,
                blocking: BlockingRule::FullDay,
                custom_start: None,
                custom_end: None,
            };
            let start = minute_time(slot_start);
            let end = minute_time(slot_start + slot_len);
            let reason = check_holiday_blocking(&[holiday], start, end).unwrap();
            prop_assert!(reason.is_some());
        }

        // minutes_of_day round-trips through minute_time
        #[test]
        fn prop_minutes_of_day_roundtrip(minute in 0i64..1440) {
            prop_assert_eq!(minutes_of_day(minute_time(minute)), minute);
        }
    }
}
