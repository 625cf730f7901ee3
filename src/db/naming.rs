//! Field name <-> column name conversion.
//!
//! Records use camel case (`lastMessageById`), tables use snake case
//! (`last_message_by_id`). Nothing else in the crate builds column names.

/// `lastMessageById` -> `last_message_by_id`
pub fn to_column_name(field: &str) -> String {
    let mut column = String::with_capacity(field.len() + 4);
    for (i, c) in field.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            column.push('_');
        }
        column.push(c.to_ascii_lowercase());
    }
    column
}

/// `last_message_by_id` -> `lastMessageById`
pub fn to_field_name(column: &str) -> String {
    let joined: String = column
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => joined,
    }
}
