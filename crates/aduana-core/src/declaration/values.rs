//! Value normalization for individual fields.

use crate::models::record::{Field, FieldRecord};

/// Collapse a reference repeated around a hyphen: `ABC-ABC` becomes `ABC`.
pub fn dedupe_reference(reference: &str) -> String {
    let reference = reference.trim();
    if let Some((left, right)) = reference.split_once('-') {
        let left = left.trim();
        if !left.is_empty() && left.to_uppercase() == right.trim().to_uppercase() {
            return left.to_string();
        }
    }
    reference.to_string()
}

/// Map a product condition to `NUEVO`, `USADO` or `REMANUFACTURADO`.
/// Unrecognized values are returned unchanged.
pub fn normalize_condition(condition: &str) -> String {
    let upper = condition.to_uppercase();
    if upper.contains("NUEVO") {
        "NUEVO".to_string()
    } else if upper.contains("USADO") {
        "USADO".to_string()
    } else if upper.contains("REMANUFACTURADO") || upper.contains("RECONSTRUIDO") {
        "REMANUFACTURADO".to_string()
    } else {
        condition.to_string()
    }
}

/// Apply per-field value normalization to a record.
pub fn normalize_values(fields: &mut FieldRecord) {
    if let Some(reference) = fields.get_mut(&Field::Referencia) {
        *reference = dedupe_reference(reference);
    }
    if let Some(condition) = fields.get_mut(&Field::EstadoProducto) {
        *condition = normalize_condition(condition);
    }
}
