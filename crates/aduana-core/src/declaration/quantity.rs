//! Relocating quantities embedded in other field values.
//!
//! Declarations often carry the quantity inside the country of origin,
//! as in `CHINA - 399. CANT (6) UND`, instead of under its own label.

use std::ops::Range;

use tracing::trace;

use crate::models::record::{Field, FieldRecord};
use crate::text::quantity_as_integer;

use super::patterns::{COUNTRY_WITH_CODE, QTY_LABELED, QTY_WITH_UNIT, UNIT_TOKEN};

/// Canonical unit token.
pub const DEFAULT_UNIT: &str = "UND";

const RESIDUE_TRIM: &[char] = &[' ', ',', '.', ';', ':', '-', '\n', '\t'];

/// A quantity found inside a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityMatch {
    pub quantity: String,
    pub unit: Option<String>,
    /// Byte range of the matched text within the value.
    pub span: Range<usize>,
}

impl QuantityMatch {
    /// The value with the matched text removed and leftover punctuation
    /// trimmed.
    pub fn strip_from(&self, value: &str) -> String {
        let mut rest = String::with_capacity(value.len());
        rest.push_str(&value[..self.span.start]);
        rest.push(' ');
        rest.push_str(&value[self.span.end..]);
        rest.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .trim_matches(RESIDUE_TRIM)
            .to_string()
    }
}

/// Find a quantity in `value`: a `CANT` keyword with its number first, then
/// a number directly followed by a unit token.
pub fn find_quantity(value: &str) -> Option<QuantityMatch> {
    let caps = QTY_LABELED
        .captures(value)
        .or_else(|| QTY_WITH_UNIT.captures(value))?;
    let whole = caps.get(0)?;

    Some(QuantityMatch {
        quantity: caps.get(1)?.as_str().to_string(),
        unit: caps.get(2).map(|u| u.as_str().to_uppercase()),
        span: whole.range(),
    })
}

/// Post-process an extracted record so quantity, unit and country each sit
/// in their own field.
///
/// When no `Cantidad` was extracted, the quantity is looked up in
/// `Pais_Origen` first and then in every field in record order; the first
/// hit is moved out of its host value. `Pais_Origen` values of the form
/// `<name> - <code>` are split into name and `Codigo_Pais_Origen`. Finally
/// `Cantidad` becomes an integer string and `Unidad` the canonical token.
pub fn disambiguate(fields: &mut FieldRecord) {
    if !fields.contains_key(&Field::Cantidad) {
        relocate_from(fields, &Field::PaisOrigen);
    }

    if !fields.contains_key(&Field::Cantidad) {
        let keys: Vec<Field> = fields.keys().cloned().collect();
        for key in keys {
            if relocate_from(fields, &key) {
                break;
            }
        }
    }

    split_country_code(fields);
    normalize_quantity(fields);
    normalize_unit(fields);
}

/// Move a quantity found in `field` into `Cantidad`/`Unidad`. The host value
/// is only rewritten when something remains after removing the quantity.
fn relocate_from(fields: &mut FieldRecord, field: &Field) -> bool {
    let Some(value) = fields.get(field).cloned() else {
        return false;
    };
    let Some(found) = find_quantity(&value) else {
        return false;
    };

    trace!("quantity {} found in {}", found.quantity, field);

    let rest = found.strip_from(&value);
    if !rest.is_empty() {
        fields.insert(field.clone(), rest);
    }

    fields.insert(Field::Cantidad, found.quantity);
    if !fields.contains_key(&Field::Unidad) {
        fields.insert(
            Field::Unidad,
            found.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        );
    }
    true
}

fn split_country_code(fields: &mut FieldRecord) {
    if fields.contains_key(&Field::CodigoPaisOrigen) {
        return;
    }
    let Some(country) = fields.get(&Field::PaisOrigen) else {
        return;
    };
    let Some(caps) = COUNTRY_WITH_CODE.captures(country.trim()) else {
        return;
    };

    let name = caps[1].trim().to_string();
    let code = caps[2].to_string();
    fields.insert(Field::PaisOrigen, name);
    fields.insert(Field::CodigoPaisOrigen, code);
}

fn normalize_quantity(fields: &mut FieldRecord) {
    if let Some(quantity) = fields.get_mut(&Field::Cantidad) {
        if let Some(n) = quantity_as_integer(quantity) {
            *quantity = n.to_string();
        }
    }
}

fn normalize_unit(fields: &mut FieldRecord) {
    match fields.get_mut(&Field::Unidad) {
        Some(unit) => {
            if UNIT_TOKEN.is_match(unit) {
                *unit = DEFAULT_UNIT.to_string();
            }
        }
        None => {
            if fields.contains_key(&Field::Cantidad) {
                fields.insert(Field::Unidad, DEFAULT_UNIT.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(pairs: &[(Field, &str)]) -> FieldRecord {
        pairs
            .iter()
            .map(|(field, value)| (field.clone(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_quantity_embedded_in_country() {
        let mut fields = record(&[
            (Field::Producto, "FILTRO DE ACEITE"),
            (Field::PaisOrigen, "CHINA - 399. CANT (6) UND"),
        ]);
        disambiguate(&mut fields);

        assert_eq!(fields.get(&Field::PaisOrigen).map(String::as_str), Some("CHINA"));
        assert_eq!(
            fields.get(&Field::CodigoPaisOrigen).map(String::as_str),
            Some("399")
        );
        assert_eq!(fields.get(&Field::Cantidad).map(String::as_str), Some("6"));
        assert_eq!(fields.get(&Field::Unidad).map(String::as_str), Some("UND"));
        assert_eq!(
            fields.get(&Field::Producto).map(String::as_str),
            Some("FILTRO DE ACEITE")
        );
    }

    #[test]
    fn test_quantity_found_in_product_text() {
        let mut fields = record(&[
            (Field::Producto, "BOMBA DE AGUA 12 PIEZAS"),
            (Field::Marca, "GMB"),
        ]);
        disambiguate(&mut fields);

        assert_eq!(
            fields.get(&Field::Producto).map(String::as_str),
            Some("BOMBA DE AGUA")
        );
        assert_eq!(fields.get(&Field::Cantidad).map(String::as_str), Some("12"));
        assert_eq!(fields.get(&Field::Unidad).map(String::as_str), Some("UND"));
    }

    #[test]
    fn test_first_field_in_order_wins() {
        let mut fields = record(&[
            (Field::Producto, "RETEN"),
            (Field::Modelo, "CANT: 4"),
            (Field::Serial, "9 UND"),
        ]);
        disambiguate(&mut fields);

        assert_eq!(fields.get(&Field::Cantidad).map(String::as_str), Some("4"));
        // Nothing left once the quantity is removed, so the value stays.
        assert_eq!(fields.get(&Field::Modelo).map(String::as_str), Some("CANT: 4"));
        assert_eq!(fields.get(&Field::Serial).map(String::as_str), Some("9 UND"));
    }

    #[test]
    fn test_existing_quantity_is_normalized() {
        let mut fields = record(&[
            (Field::Producto, "RETEN"),
            (Field::Cantidad, "6,0"),
            (Field::PaisOrigen, "JAPON - 399"),
        ]);
        disambiguate(&mut fields);

        assert_eq!(fields.get(&Field::Cantidad).map(String::as_str), Some("6"));
        assert_eq!(fields.get(&Field::Unidad).map(String::as_str), Some("UND"));
        assert_eq!(fields.get(&Field::PaisOrigen).map(String::as_str), Some("JAPON"));
    }

    #[test]
    fn test_unit_synonyms_become_canonical() {
        let mut fields = record(&[
            (Field::Producto, "RETEN"),
            (Field::Cantidad, "3"),
            (Field::Unidad, "PIEZAS"),
        ]);
        disambiguate(&mut fields);
        assert_eq!(fields.get(&Field::Unidad).map(String::as_str), Some("UND"));

        let mut fields = record(&[
            (Field::Producto, "ACEITE"),
            (Field::Cantidad, "20"),
            (Field::Unidad, "LITROS"),
        ]);
        disambiguate(&mut fields);
        assert_eq!(fields.get(&Field::Unidad).map(String::as_str), Some("LITROS"));
    }

    #[test]
    fn test_no_quantity_anywhere() {
        let mut fields = record(&[(Field::Producto, "RETEN"), (Field::Marca, "SKF")]);
        disambiguate(&mut fields);
        assert!(!fields.contains_key(&Field::Cantidad));
        assert!(!fields.contains_key(&Field::Unidad));
    }

    #[test]
    fn test_find_quantity_variants() {
        for (text, quantity) in [
            ("CANT (6) UND", "6"),
            ("CANT: 31", "31"),
            ("CANTIDAD 10", "10"),
            ("CANT. 2,5", "2,5"),
            ("(8) UNIDADES", "8"),
            ("6UND", "6"),
        ] {
            let found = find_quantity(text).map(|m| m.quantity);
            assert_eq!(found.as_deref(), Some(quantity), "{text}");
        }
        assert_eq!(find_quantity("SIN CANTIDAD"), None);
    }
}
