#[cfg(test)]
mod tests {
    use crate::models::{
        Appointment, AppointmentStatus, BlockingRule, BookingPolicy, Holiday, HolidayKind, Shift,
    };
    use crate::service::{InMemoryScheduleStore, ScheduleStoreError};
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
    use reserva_common::services::{
        AppointmentSource, HolidaySource, PolicySource, SchedulingSources, ShiftSource,
    };
    use std::sync::Arc;
    use uuid::Uuid;

    const TENANT: &str = "bella-hair-studio";

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn appointment(employee_id: Uuid, start_hour: u32, end_hour: u32) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            employee_id,
            client_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            start: Utc.with_ymd_and_hms(2025, 5, 5, start_hour, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 5, 5, end_hour, 0, 0).unwrap(),
            status: AppointmentStatus::Scheduled,
        }
    }

    #[tokio::test]
    async fn test_shifts_are_filtered_by_weekday() {
        let store = InMemoryScheduleStore::new(BookingPolicy::default());
        let employee_id = Uuid::new_v4();
        store
            .add_shift(Shift {
                employee_id,
                weekday: Weekday::Mon,
                start_time: time(8, 0),
                end_time: time(18, 0),
                lunch_break_start: None,
                lunch_break_end: None,
            })
            .unwrap();

        let monday = store.shifts_for(employee_id, Weekday::Mon).await.unwrap();
        assert_eq!(monday.len(), 1);

        let tuesday = store.shifts_for(employee_id, Weekday::Tue).await.unwrap();
        assert!(tuesday.is_empty());
    }

    #[tokio::test]
    async fn test_holidays_are_filtered_by_date_and_active_flag() {
        let store = InMemoryScheduleStore::new(BookingPolicy::default());
        let date = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        for (name, is_active) in [("Active rule", true), ("Disabled rule", false)] {
            store
                .add_holiday(
                    TENANT,
                    Holiday {
                        date,
                        name: name.to_string(),
                        kind: HolidayKind::Custom,
                        is_active,
                        blocking: BlockingRule::FullDay,
                        custom_start: None,
                        custom_end: None,
                    },
                )
                .unwrap();
        }

        let holidays = store.active_holidays_on(TENANT, date).await.unwrap();
        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].name, "Active rule");

        let other_day = store
            .active_holidays_on(TENANT, date.succ_opt().unwrap())
            .await
            .unwrap();
        assert!(other_day.is_empty());
    }

    #[tokio::test]
    async fn test_appointments_for_excludes_terminal_statuses_at_the_source() {
        let store = InMemoryScheduleStore::new(BookingPolicy::default());
        let employee_id = Uuid::new_v4();
        store
            .insert_appointment(TENANT, appointment(employee_id, 9, 10))
            .unwrap();
        let canceled_id = {
            let stored = store
                .insert_appointment(TENANT, appointment(employee_id, 11, 12))
                .unwrap();
            store.cancel_appointment(TENANT, stored.id).unwrap();
            stored.id
        };

        let rows = store
            .appointments_for(TENANT, employee_id, None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|row| row.id != canceled_id));
    }

    #[tokio::test]
    async fn test_insert_appointment_rechecks_conflicts_under_the_write_lock() {
        let store = InMemoryScheduleStore::new(BookingPolicy::default());
        let employee_id = Uuid::new_v4();
        store
            .insert_appointment(TENANT, appointment(employee_id, 10, 11))
            .unwrap();

        // Same slot again: the write is the serialization point
        let lost_race = store.insert_appointment(TENANT, appointment(employee_id, 10, 11));
        assert!(matches!(lost_race, Err(ScheduleStoreError::Conflict)));

        // A canceled appointment frees the slot
        let stored = store
            .insert_appointment(TENANT, appointment(employee_id, 14, 15))
            .unwrap();
        store.cancel_appointment(TENANT, stored.id).unwrap();
        assert!(store
            .insert_appointment(TENANT, appointment(employee_id, 14, 15))
            .is_ok());
    }

    #[tokio::test]
    async fn test_client_open_appointments_counts_scheduled_and_confirmed_only() {
        let store = InMemoryScheduleStore::new(BookingPolicy::default());
        let client_id = Uuid::new_v4();
        let mut statuses = vec![
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::NoShow,
        ];
        let mut day = 5;
        while let Some(status) = statuses.pop() {
            let mut row = appointment(Uuid::new_v4(), 9, 10);
            row.client_id = client_id;
            row.status = status;
            row.start = Utc.with_ymd_and_hms(2025, 5, day, 9, 0, 0).unwrap();
            row.end = Utc.with_ymd_and_hms(2025, 5, day, 10, 0, 0).unwrap();
            store.insert_appointment(TENANT, row).unwrap();
            day += 1;
        }

        let count = store
            .client_open_appointments(TENANT, client_id)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_booking_policy_falls_back_to_the_default() {
        let store = InMemoryScheduleStore::new(BookingPolicy {
            simultaneous_limit: 5,
            ..BookingPolicy::default()
        });
        let fallback = store.booking_policy("unknown-tenant").await.unwrap();
        assert_eq!(fallback.simultaneous_limit, 5);

        store
            .set_policy(
                TENANT,
                BookingPolicy {
                    simultaneous_limit: 1,
                    ..BookingPolicy::default()
                },
            )
            .unwrap();
        let tenant_policy = store.booking_policy(TENANT).await.unwrap();
        assert_eq!(tenant_policy.simultaneous_limit, 1);
    }

    #[tokio::test]
    async fn test_cancel_unknown_appointment_is_not_found() {
        let store = InMemoryScheduleStore::new(BookingPolicy::default());
        let result = store.cancel_appointment(TENANT, Uuid::new_v4());
        assert!(matches!(result, Err(ScheduleStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cancel_refuses_terminal_statuses() {
        let store = InMemoryScheduleStore::new(BookingPolicy::default());
        let employee_id = Uuid::new_v4();

        let mut completed = appointment(employee_id, 9, 10);
        completed.status = AppointmentStatus::Completed;
        let completed_id = completed.id;
        store.insert_appointment(TENANT, completed).unwrap();
        assert!(matches!(
            store.cancel_appointment(TENANT, completed_id),
            Err(ScheduleStoreError::NotCancellable(_))
        ));

        // A second cancel of the same appointment is refused too
        let stored = store
            .insert_appointment(TENANT, appointment(employee_id, 11, 12))
            .unwrap();
        store.cancel_appointment(TENANT, stored.id).unwrap();
        assert!(matches!(
            store.cancel_appointment(TENANT, stored.id),
            Err(ScheduleStoreError::NotCancellable(_))
        ));
    }

    #[tokio::test]
    async fn test_shared_store_serves_as_a_source_bundle() {
        let store = Arc::new(InMemoryScheduleStore::new(BookingPolicy::default()));
        let employee_id = Uuid::new_v4();
        store
            .add_shift(Shift {
                employee_id,
                weekday: Weekday::Mon,
                start_time: time(8, 0),
                end_time: time(18, 0),
                lunch_break_start: None,
                lunch_break_end: None,
            })
            .unwrap();

        let sources: &dyn SchedulingSources = &store;
        let shifts = sources
            .shift_source()
            .shifts_for(employee_id, Weekday::Mon)
            .await
            .unwrap();
        assert_eq!(shifts.len(), 1);

        let policy = sources
            .policy_source()
            .booking_policy(TENANT)
            .await
            .unwrap();
        assert_eq!(policy.simultaneous_limit, 3);
    }
}
