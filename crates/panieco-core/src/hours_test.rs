use super::*;

const MONDAY: &str = "http://schema.org/Monday";
const TUESDAY: &str = "http://schema.org/Tuesday";
const SATURDAY: &str = "http://schema.org/Saturday";

fn hour(day: &str, opens: &str, closes: &str) -> OpeningHour {
    OpeningHour {
        day_of_week: day.to_owned(),
        opens: opens.to_owned(),
        closes: closes.to_owned(),
    }
}

// -----------------------------------------------------------------------
// format_hours
// -----------------------------------------------------------------------

#[test]
fn format_hours_truncates_seconds() {
    assert_eq!(format_hours(Some("09:30:00")), "09:30");
}

#[test]
fn format_hours_midnight_is_closed() {
    assert_eq!(format_hours(Some("00:00:00")), "Fermé");
}

#[test]
fn format_hours_absent_is_closed() {
    assert_eq!(format_hours(None), "Fermé");
    assert_eq!(format_hours(Some("")), "Fermé");
}

#[test]
fn day_translation_falls_back_to_identity() {
    assert_eq!(day_of_week_to_french(MONDAY), "Lundi");
    assert_eq!(day_of_week_to_french("http://schema.org/Sunday"), "Dimanche");
    assert_eq!(day_of_week_to_french("PublicHolidays"), "PublicHolidays");
}

// -----------------------------------------------------------------------
// group_by_day
// -----------------------------------------------------------------------

#[test]
fn touching_intervals_merge_into_one_span() {
    let grouped = group_by_day(&[
        hour(MONDAY, "12:00:00", "18:00:00"),
        hour(MONDAY, "08:00:00", "12:00:00"),
    ]);
    let monday = grouped.get("Lundi").expect("monday present");
    assert!(monday.merged);
    let main = monday.main.as_ref().unwrap();
    assert_eq!(main.opens, "08:00:00");
    assert_eq!(main.closes, "18:00:00");
    assert!(monday.afternoon.is_none());
    assert_eq!(monday.morning_display(), "08:00 – 18:00");
    assert_eq!(monday.afternoon_display(), "");
}

#[test]
fn overlapping_intervals_merge() {
    let grouped = group_by_day(&[
        hour(MONDAY, "08:00:00", "13:00:00"),
        hour(MONDAY, "12:30:00", "19:00:00"),
    ]);
    let monday = grouped.get("Lundi").unwrap();
    assert!(monday.merged);
    assert_eq!(monday.main.as_ref().unwrap().closes, "19:00:00");
}

#[test]
fn separated_intervals_split_into_morning_and_afternoon() {
    let grouped = group_by_day(&[
        hour(TUESDAY, "14:00:00", "19:00:00"),
        hour(TUESDAY, "09:00:00", "12:30:00"),
    ]);
    let tuesday = grouped.get("Mardi").unwrap();
    assert!(!tuesday.merged);
    assert_eq!(tuesday.morning_display(), "09:00 – 12:30");
    assert_eq!(tuesday.afternoon_display(), "14:00 – 19:00");
    assert!(grouped.has_afternoon_column());
}

#[test]
fn third_interval_is_dropped_and_counted() {
    let grouped = group_by_day(&[
        hour(SATURDAY, "08:00:00", "10:00:00"),
        hour(SATURDAY, "11:00:00", "13:00:00"),
        hour(SATURDAY, "17:00:00", "20:00:00"),
    ]);
    let saturday = grouped.get("Samedi").unwrap();
    assert_eq!(saturday.main.as_ref().unwrap().opens, "08:00:00");
    assert_eq!(saturday.afternoon.as_ref().unwrap().opens, "11:00:00");
    assert_eq!(saturday.dropped, 1);
}

#[test]
fn merged_day_can_still_take_an_afternoon() {
    let grouped = group_by_day(&[
        hour(MONDAY, "08:00:00", "10:00:00"),
        hour(MONDAY, "10:00:00", "12:00:00"),
        hour(MONDAY, "14:00:00", "18:00:00"),
    ]);
    let monday = grouped.get("Lundi").unwrap();
    assert!(monday.merged);
    assert_eq!(monday.main.as_ref().unwrap().closes, "12:00:00");
    assert!(monday.afternoon.is_some());
    // A merged day never shows an afternoon cell.
    assert_eq!(monday.afternoon_display(), "");
    assert!(!grouped.has_afternoon_column());
}

#[test]
fn input_is_left_untouched() {
    let input = vec![
        hour(MONDAY, "08:00:00", "12:00:00"),
        hour(MONDAY, "12:00:00", "18:00:00"),
    ];
    let before = input.clone();
    let _ = group_by_day(&input);
    assert_eq!(input, before);
}

#[test]
fn grouping_is_deterministic_regardless_of_input_order() {
    let a = group_by_day(&[
        hour(MONDAY, "14:00:00", "18:00:00"),
        hour(TUESDAY, "09:00:00", "12:00:00"),
        hour(MONDAY, "09:00:00", "12:00:00"),
    ]);
    let b = group_by_day(&[
        hour(MONDAY, "09:00:00", "12:00:00"),
        hour(MONDAY, "14:00:00", "18:00:00"),
        hour(TUESDAY, "09:00:00", "12:00:00"),
    ]);
    assert_eq!(a, b);
}

#[test]
fn no_afternoon_column_without_split_days() {
    let grouped = group_by_day(&[hour(MONDAY, "09:00:00", "18:00:00")]);
    assert!(!grouped.has_afternoon_column());
}

#[test]
fn empty_input_renders_seven_closed_rows() {
    let grouped = group_by_day(&[]);
    assert!(grouped.is_empty());
    let rows = grouped.rows();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0].day, "Lundi");
    assert_eq!(rows[6].day, "Dimanche");
    assert!(rows.iter().all(|r| r.morning == "Fermé" && r.afternoon.is_empty()));
}

#[test]
fn rows_follow_weekday_order() {
    let grouped = group_by_day(&[
        hour(SATURDAY, "10:00:00", "16:00:00"),
        hour(MONDAY, "09:00:00", "12:00:00"),
    ]);
    let rows = grouped.rows();
    assert_eq!(rows[0].morning, "09:00 – 12:00");
    assert_eq!(rows[1].morning, "Fermé");
    assert_eq!(rows[5].day, "Samedi");
    assert_eq!(rows[5].morning, "10:00 – 16:00");
}

#[test]
fn midnight_interval_renders_as_closed() {
    let grouped = group_by_day(&[hour(MONDAY, "00:00:00", "00:00:00")]);
    assert_eq!(grouped.get("Lundi").unwrap().morning_display(), "Fermé – Fermé");
}
