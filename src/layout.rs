use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Canonical slot keys, top to bottom. Slot keys outside this set never
/// produce a row.
pub const SLOTS: [&str; 7] = [
    "08_00_09_00",
    "09_00_10_00",
    "10_15_11_15",
    "11_15_12_15",
    "13_15_14_15",
    "14_15_15_15",
    "15_15_16_15",
];

/// Weekday columns, left to right.
pub const DAYS: [&str; 5] = ["mon", "tue", "wed", "thu", "fri"];

pub const DAY_TITLES: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

static SLOT_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("08_00_09_00", "08:00–09:00"),
        ("09_00_10_00", "09:00–10:00"),
        ("10_15_11_15", "10:15–11:15"),
        ("11_15_12_15", "11:15–12:15"),
        ("13_15_14_15", "13:15–14:15"),
        ("14_15_15_15", "14:15–15:15"),
        ("15_15_16_15", "15:15–16:15"),
    ])
});

/// Display label for a slot key. Unknown keys fall back to the key itself
/// with its delimiters turned into colons.
pub fn slot_label(key: &str) -> String {
    match SLOT_LABELS.get(key) {
        Some(label) => (*label).to_string(),
        None => key.replace('_', ":"),
    }
}

/// Fixed break rows: (anchor slot, break time label, break title). Each break
/// row is emitted directly after its anchor slot's row.
pub const BREAKS: [(&str, &str, &str); 2] = [
    ("09_00_10_00", "10:00–10:15", "TEA BREAK"),
    ("11_15_12_15", "12:15–13:15", "LUNCH BREAK"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_slots_have_labels() {
        for slot in SLOTS {
            assert_ne!(slot_label(slot), slot);
        }
    }

    #[test]
    fn unknown_slot_label_is_dedelimited() {
        assert_eq!(slot_label("17_00_18_00"), "17:00:18:00");
    }

    #[test]
    fn break_anchors_are_canonical_slots() {
        for (anchor, _, _) in BREAKS {
            assert!(SLOTS.contains(&anchor));
        }
    }
}
