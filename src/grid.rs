use std::slice;

use crate::document::{Event, SlotValue, Week};
use crate::layout::{slot_label, BREAKS, DAYS, SLOTS};

/// One table body row. Slot rows carry only the physical cells that are not
/// covered by a row span from above; break rows are fixed and span every day
/// column without touching the span accounting.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Slots { label: String, cells: Vec<Cell> },
    Break { time: &'static str, label: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Block { rowspan: usize, entries: Vec<Event> },
}

/// Lay one week out as a row list. Deterministic and free of markup; the
/// commit step in `html` turns the result into a table body.
pub fn layout_week(week: &Week) -> Vec<Row> {
    let mut skip = [0usize; DAYS.len()];
    let mut rows = Vec::new();

    for slot in SLOTS {
        let mut cells = Vec::new();

        for (day_index, day_key) in DAYS.iter().enumerate() {
            if skip[day_index] > 0 {
                // covered by a row span above
                skip[day_index] -= 1;
                continue;
            }

            let value = week
                .day(day_key)
                .map_or(&SlotValue::Empty, |day| day.slot(slot));

            let cell = match value {
                SlotValue::Empty => Cell::Empty,
                SlotValue::Text(text) => Cell::Text(text.clone()),
                SlotValue::One(event) => block(slice::from_ref(event)),
                SlotValue::Many(events) => block(events),
            };

            if let Cell::Block { rowspan, .. } = cell {
                if rowspan > 1 {
                    skip[day_index] = rowspan - 1;
                }
            }

            cells.push(cell);
        }

        rows.push(Row::Slots {
            label: slot_label(slot),
            cells,
        });

        for (anchor, time, label) in BREAKS {
            if anchor == slot {
                rows.push(Row::Break { time, label });
            }
        }
    }

    rows
}

fn block(entries: &[Event]) -> Cell {
    if entries.is_empty() {
        return Cell::Empty;
    }

    // all co-located entries merge as one span of the tallest duration
    let rowspan = entries.iter().map(Event::rows).max().unwrap_or(1);

    Cell::Block {
        rowspan,
        entries: entries.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;

    fn week(days: &str) -> Week {
        let raw = format!(r#"{{"weeks": {{"w1": {{"days": {days}}}}}}}"#);
        parse_document(&raw).unwrap().week("w1").unwrap().clone()
    }

    fn slot_cells(row: &Row) -> &[Cell] {
        match row {
            Row::Slots { cells, .. } => cells,
            Row::Break { .. } => panic!("expected a slot row"),
        }
    }

    #[test]
    fn empty_week_still_renders_every_row() {
        let rows = layout_week(&week("{}"));
        assert_eq!(rows.len(), SLOTS.len() + BREAKS.len());

        let slot_rows: Vec<_> = rows
            .iter()
            .filter(|row| matches!(row, Row::Slots { .. }))
            .collect();
        assert_eq!(slot_rows.len(), SLOTS.len());

        for row in slot_rows {
            let cells = slot_cells(row);
            assert_eq!(cells.len(), DAYS.len());
            assert!(cells.iter().all(|cell| *cell == Cell::Empty));
        }
    }

    #[test]
    fn break_rows_follow_their_anchor_slots() {
        let rows = layout_week(&week("{}"));

        assert!(matches!(
            rows[2],
            Row::Break { label: "TEA BREAK", time: "10:00–10:15" }
        ));
        assert!(matches!(
            rows[5],
            Row::Break { label: "LUNCH BREAK", time: "12:15–13:15" }
        ));
    }

    #[test]
    fn multi_slot_event_spans_and_skips() {
        let rows = layout_week(&week(
            r#"{"tue": {"08_00_09_00": {"title": "Lab", "duration": 3}}}"#,
        ));

        let first = slot_cells(&rows[0]);
        assert_eq!(first.len(), DAYS.len());
        assert!(matches!(first[1], Cell::Block { rowspan: 3, .. }));

        // the next two slot rows emit no cell for tuesday
        assert_eq!(slot_cells(&rows[1]).len(), DAYS.len() - 1);
        assert_eq!(slot_cells(&rows[3]).len(), DAYS.len() - 1);
        assert_eq!(slot_cells(&rows[4]).len(), DAYS.len());
    }

    #[test]
    fn break_rows_do_not_consume_the_skip_counter() {
        // duration 2 starting right before the tea break: the skipped row is
        // the next slot row, not the break row between them
        let rows = layout_week(&week(
            r#"{"mon": {"09_00_10_00": {"title": "Double", "duration": 2}}}"#,
        ));

        assert!(matches!(
            slot_cells(&rows[1])[0],
            Cell::Block { rowspan: 2, .. }
        ));
        assert!(matches!(rows[2], Row::Break { .. }));
        assert_eq!(slot_cells(&rows[3]).len(), DAYS.len() - 1);
    }

    #[test]
    fn colocated_events_merge_on_the_tallest_duration() {
        let rows = layout_week(&week(
            r#"{"wed": {"10_15_11_15": [
                {"title": "Seminar", "duration": 1},
                {"title": "Project", "duration": 2}
            ]}}"#,
        ));

        let Cell::Block { rowspan, entries } = &slot_cells(&rows[3])[2] else {
            panic!("expected an event block");
        };
        assert_eq!(*rowspan, 2);
        assert_eq!(entries.len(), 2);
        assert_eq!(slot_cells(&rows[4]).len(), DAYS.len() - 1);
    }

    #[test]
    fn string_value_stays_plain_text() {
        let rows = layout_week(&week(r#"{"fri": {"08_00_09_00": "Free"}}"#));
        assert_eq!(slot_cells(&rows[0])[4], Cell::Text("Free".into()));
    }

    #[test]
    fn empty_sequence_and_junk_values_render_empty() {
        let rows = layout_week(&week(
            r#"{"mon": {"08_00_09_00": [], "09_00_10_00": true, "10_15_11_15": null}}"#,
        ));

        assert_eq!(slot_cells(&rows[0])[0], Cell::Empty);
        assert_eq!(slot_cells(&rows[1])[0], Cell::Empty);
        assert_eq!(slot_cells(&rows[3])[0], Cell::Empty);
    }

    #[test]
    fn singleton_sequence_renders_like_a_single_event() {
        let one = layout_week(&week(r#"{"mon": {"08_00_09_00": {"title": "Maths"}}}"#));
        let wrapped = layout_week(&week(r#"{"mon": {"08_00_09_00": [{"title": "Maths"}]}}"#));
        assert_eq!(slot_cells(&one[0])[0], slot_cells(&wrapped[0])[0]);
    }

    #[test]
    fn unknown_slot_keys_are_ignored() {
        let rows = layout_week(&week(r#"{"mon": {"23_00_24_00": {"title": "Ghost"}}}"#));
        assert!(rows
            .iter()
            .filter_map(|row| match row {
                Row::Slots { cells, .. } => Some(cells),
                Row::Break { .. } => None,
            })
            .all(|cells| cells.iter().all(|cell| *cell == Cell::Empty)));
    }
}
