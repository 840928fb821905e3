//! Field name normalization: raw labels to canonical field identifiers.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::record::Field;
use crate::text::strip_accents;

/// Label synonyms (lower-case) and the field they denote.
const SYNONYMS: &[(&str, Field)] = &[
    ("referencia", Field::Referencia),
    ("ref", Field::Referencia),
    ("ref.", Field::Referencia),
    ("serial", Field::Serial),
    ("ser", Field::Serial),
    ("ser.", Field::Serial),
    ("marca", Field::Marca),
    ("modelo", Field::Modelo),
    ("cantidad", Field::Cantidad),
    ("cant", Field::Cantidad),
    ("cant.", Field::Cantidad),
    ("unidad", Field::Unidad),
    ("und", Field::Unidad),
    ("uso", Field::Compatibilidad),
    ("uso o destino", Field::Compatibilidad),
    ("aplicación", Field::Compatibilidad),
    ("aplicacion", Field::Compatibilidad),
    ("compatibilidad", Field::Compatibilidad),
    ("destino", Field::Compatibilidad),
    ("país origen", Field::PaisOrigen),
    ("pais origen", Field::PaisOrigen),
    ("país de origen", Field::PaisOrigen),
    ("pais de origen", Field::PaisOrigen),
    ("pays d'origine", Field::PaisOrigen),
    ("country of origin", Field::PaisOrigen),
    ("país procedencia", Field::PaisProcedencia),
    ("pais procedencia", Field::PaisProcedencia),
    ("categoría", Field::Categoria),
    ("categoria", Field::Categoria),
    ("tipo de repuesto", Field::Categoria),
    ("material", Field::Material),
    ("composición", Field::Composicion),
    ("composicion", Field::Composicion),
    ("empaque", Field::PresentacionComercial),
    ("presentación", Field::PresentacionComercial),
    ("presentacion", Field::PresentacionComercial),
    ("estado", Field::EstadoProducto),
    ("norma", Field::NormaTecnica),
    ("certificación", Field::NormaTecnica),
    ("certificacion", Field::NormaTecnica),
    ("subpartida", Field::Subpartida),
    ("número oem", Field::NumeroOem),
    ("numero oem", Field::NumeroOem),
    ("oem", Field::NumeroOem),
    ("p/n", Field::NumeroOem),
    ("pn", Field::NumeroOem),
    ("p.n.", Field::NumeroOem),
    ("part no", Field::NumeroOem),
    ("aftermarket", Field::NumeroAftermarket),
    ("equiv.", Field::NumeroAftermarket),
    ("equivalente", Field::NumeroAftermarket),
    ("viscosidad", Field::Viscosidad),
    ("tipo aceite", Field::TipoAceite),
    ("capacidad", Field::CapacidadL),
    ("tipo filtro", Field::TipoFiltro),
    ("micraje", Field::Micraje),
    ("medidas", Field::Medidas),
    ("dimensiones", Field::Dimensiones),
    ("tipo bujía", Field::TipoBujia),
    ("tipo bujia", Field::TipoBujia),
    ("rosca", Field::Rosca),
    ("número de calor", Field::NumeroCalor),
    ("numero de calor", Field::NumeroCalor),
    ("terminal", Field::TipoTerminal),
    ("longitud", Field::Longitud),
    ("ancho", Field::Ancho),
    ("paso", Field::Paso),
    ("tipo sensor", Field::TipoSensor),
    ("voltaje", Field::Voltaje),
    ("tipo soporte", Field::TipoSoporte),
    ("incluye", Field::IncluyeAccesorios),
    ("qté", Field::Cantidad),
    ("qte", Field::Cantidad),
    ("quantité", Field::Cantidad),
    ("qty", Field::Cantidad),
    ("quantity", Field::Cantidad),
    ("brand", Field::Marca),
    ("marque", Field::Marca),
    ("model", Field::Modelo),
    ("modèle", Field::Modelo),
];

lazy_static! {
    /// Lookup table: synonyms plus every canonical name in lower case, so
    /// normalizing an already-canonical name is a no-op.
    static ref LOOKUP: HashMap<String, Field> = {
        let mut map: HashMap<String, Field> = SYNONYMS
            .iter()
            .map(|(label, field)| (label.to_string(), field.clone()))
            .collect();
        for (field, canonical) in Field::KNOWN {
            map.entry(canonical.to_lowercase()).or_insert_with(|| field.clone());
        }
        map
    };

    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Fallback key when a label has no word characters at all.
const UNNAMED_FIELD: &str = "Campo";

/// Look up a label in the synonym table without synthesizing a name.
pub fn lookup_label(label: &str) -> Option<Field> {
    let key = WHITESPACE.replace_all(label.trim(), " ").to_lowercase();
    LOOKUP.get(&key).cloned()
}

/// Whether a label (any case) is a known synonym or canonical name.
pub fn is_known_label(label: &str) -> bool {
    lookup_label(label).is_some()
}

/// Map a raw label to its canonical field.
///
/// Known labels resolve through the synonym table. Unknown labels get a
/// synthesized name: accents stripped, punctuation removed, whitespace turned
/// into underscores and each segment capitalized (`"PESO BRUTO"` becomes
/// `Peso_Bruto`). The function is total: every input yields a non-empty name.
pub fn normalize_field_name(label: &str) -> Field {
    if let Some(field) = lookup_label(label) {
        return field;
    }

    let plain = strip_accents(label);
    let plain = NON_WORD.replace_all(&plain, "");
    let plain = WHITESPACE.replace_all(plain.trim(), "_");

    let name = plain
        .split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join("_");

    if name.is_empty() {
        Field::Other(UNNAMED_FIELD.to_string())
    } else {
        Field::from_canonical(&name)
    }
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
