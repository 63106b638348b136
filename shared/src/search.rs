//! Reminder list search

use crate::models::MedicineReminder;

/// Whether a reminder matches a free-text query
///
/// Case-insensitive substring match over medicine name, notes and condition.
/// A blank query matches everything.
pub fn reminder_matches(reminder: &MedicineReminder, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [
        Some(reminder.medicine_name.as_str()),
        reminder.notes.as_deref(),
        Some(reminder.condition.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|haystack| haystack.to_lowercase().contains(&needle))
}

/// Filter reminders by a free-text query, keeping their order
pub fn filter_reminders(reminders: &[MedicineReminder], query: &str) -> Vec<MedicineReminder> {
    reminders
        .iter()
        .filter(|r| reminder_matches(r, query))
        .cloned()
        .collect()
}
