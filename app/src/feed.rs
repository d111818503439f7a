use common::models::AppUpdate;

pub const FEED_LIMIT: usize = 5;

// Active rows, highest priority first, newest first within a priority.
// The row that sorts first carries the section kill switch for everyone:
// if its section_enabled is false the whole feed is suppressed, whatever
// the other rows say. The flag lives redundantly on every row; that is the
// production schema and is kept as-is.
pub fn shape(rows: Vec<AppUpdate>) -> Vec<AppUpdate> {
    let mut active: Vec<AppUpdate> = rows.into_iter().filter(|row| row.is_active).collect();
    active.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(b.created_at.cmp(&a.created_at))
    });

    match active.first() {
        Some(first) if !first.section_enabled => Vec::new(),
        _ => {
            active.truncate(FEED_LIMIT);
            active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::models::UpdateKind;
    use uuid::Uuid;

    fn update(priority: i32, day: u32, active: bool, section_enabled: bool) -> AppUpdate {
        AppUpdate {
            id: Uuid::new_v4(),
            kind: UpdateKind::Announcement,
            title: format!("p{priority}-d{day}"),
            description: String::new(),
            full_description: None,
            image_url: None,
            action_url: None,
            priority,
            is_active: active,
            section_enabled,
            created_at: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn orders_by_priority_then_recency() {
        let shaped = shape(vec![
            update(5, 1, true, true),
            update(3, 3, true, true),
            update(5, 2, true, true),
        ]);
        let titles: Vec<&str> = shaped.iter().map(|u| u.title.as_str()).collect();
        assert_eq!(titles, ["p5-d2", "p5-d1", "p3-d3"]);
    }

    #[test]
    fn inactive_rows_never_show() {
        let shaped = shape(vec![update(9, 1, false, true), update(1, 2, true, true)]);
        assert_eq!(shaped.len(), 1);
        assert_eq!(shaped[0].title, "p1-d2");
    }

    #[test]
    fn kill_switch_on_the_top_row_suppresses_everything() {
        let shaped = shape(vec![
            update(9, 1, true, false),
            update(5, 2, true, true),
            update(1, 3, true, true),
        ]);
        assert!(shaped.is_empty());
    }

    #[test]
    fn kill_switch_on_a_lower_row_is_ignored() {
        let shaped = shape(vec![update(9, 1, true, true), update(5, 2, true, false)]);
        assert_eq!(shaped.len(), 2);
    }

    #[test]
    fn feed_is_capped() {
        let rows = (1..=8).map(|d| update(d as i32, d, true, true)).collect();
        assert_eq!(shape(rows).len(), FEED_LIMIT);
    }
}
