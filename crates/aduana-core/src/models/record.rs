//! Declaration-side records: blocks, canonical fields and product records.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One customs declaration cut out of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationBlock {
    /// Number taken from the `DECLARACION <n> DE <year>` marker.
    pub declaration_number: u32,
    /// Raw block text, starting at the marker.
    pub raw_text: String,
}

/// Canonical field identifier for a product record.
///
/// Labels that do not map to a known field still get a usable key through
/// [`Field::Other`], holding the synthesized canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Producto,
    Subpartida,
    Marca,
    Modelo,
    Referencia,
    Serial,
    Compatibilidad,
    Cantidad,
    Unidad,
    PaisOrigen,
    CodigoPaisOrigen,
    PaisProcedencia,
    Categoria,
    Material,
    Composicion,
    PresentacionComercial,
    EstadoProducto,
    NormaTecnica,
    NumeroOem,
    NumeroAftermarket,
    Viscosidad,
    TipoAceite,
    CapacidadL,
    TipoFiltro,
    Micraje,
    Medidas,
    Dimensiones,
    TipoBujia,
    Rosca,
    NumeroCalor,
    TipoTerminal,
    Longitud,
    Ancho,
    Paso,
    TipoSensor,
    Voltaje,
    TipoSoporte,
    IncluyeAccesorios,
    /// A label outside the known set.
    Other(String),
}

impl Field {
    /// Every known field, paired with its canonical column name.
    pub const KNOWN: &'static [(Field, &'static str)] = &[
        (Field::Producto, "Producto"),
        (Field::Subpartida, "Subpartida"),
        (Field::Marca, "Marca"),
        (Field::Modelo, "Modelo"),
        (Field::Referencia, "Referencia"),
        (Field::Serial, "Serial"),
        (Field::Compatibilidad, "Compatibilidad"),
        (Field::Cantidad, "Cantidad"),
        (Field::Unidad, "Unidad"),
        (Field::PaisOrigen, "Pais_Origen"),
        (Field::CodigoPaisOrigen, "Codigo_Pais_Origen"),
        (Field::PaisProcedencia, "Pais_Procedencia"),
        (Field::Categoria, "Categoria"),
        (Field::Material, "Material"),
        (Field::Composicion, "Composicion"),
        (Field::PresentacionComercial, "Presentacion_Comercial"),
        (Field::EstadoProducto, "Estado_Producto"),
        (Field::NormaTecnica, "Norma_Tecnica"),
        (Field::NumeroOem, "Numero_OEM"),
        (Field::NumeroAftermarket, "Numero_Aftermarket"),
        (Field::Viscosidad, "Viscosidad"),
        (Field::TipoAceite, "Tipo_Aceite"),
        (Field::CapacidadL, "Capacidad_L"),
        (Field::TipoFiltro, "Tipo_Filtro"),
        (Field::Micraje, "Micraje"),
        (Field::Medidas, "Medidas"),
        (Field::Dimensiones, "Dimensiones"),
        (Field::TipoBujia, "Tipo_Bujia"),
        (Field::Rosca, "Rosca"),
        (Field::NumeroCalor, "Numero_Calor"),
        (Field::TipoTerminal, "Tipo_Terminal"),
        (Field::Longitud, "Longitud"),
        (Field::Ancho, "Ancho"),
        (Field::Paso, "Paso"),
        (Field::TipoSensor, "Tipo_Sensor"),
        (Field::Voltaje, "Voltaje"),
        (Field::TipoSoporte, "Tipo_Soporte"),
        (Field::IncluyeAccesorios, "Incluye_Accesorios"),
    ];

    /// Build a field from an already canonical name.
    ///
    /// Known names map to their variant so that `Field::from_canonical("Marca")`
    /// and `Field::Marca` are the same key.
    pub fn from_canonical(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|(_, canonical)| *canonical == name)
            .map(|(field, _)| field.clone())
            .unwrap_or_else(|| Field::Other(name.to_string()))
    }

    /// Canonical column name.
    pub fn as_str(&self) -> &str {
        match self {
            Field::Other(name) => name,
            known => Self::KNOWN
                .iter()
                .find(|(field, _)| field == known)
                .map(|(_, canonical)| *canonical)
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Field {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Field::from_canonical(&name))
    }
}

/// Extracted fields of one product block.
///
/// Insertion order is meaningful: `Producto` comes first, then labels in the
/// order they appear in the block. Re-inserting an existing field keeps its
/// original position.
pub type FieldRecord = IndexMap<Field, String>;

/// A product line item of a declaration, ready for tabular output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Name of the source document.
    pub archivo_origen: String,
    /// Declaration number the product belongs to.
    pub declaracion_numero: String,
    /// Extracted fields; always contains a non-empty `Producto`.
    pub fields: FieldRecord,
}

impl ProductRecord {
    /// Wrap a field record, rejecting it when `Producto` is missing or blank.
    pub fn new(
        archivo_origen: impl Into<String>,
        declaracion_numero: impl Into<String>,
        fields: FieldRecord,
    ) -> Option<Self> {
        let has_product = fields
            .get(&Field::Producto)
            .is_some_and(|p| !p.trim().is_empty());

        if !has_product {
            return None;
        }

        Some(Self {
            archivo_origen: archivo_origen.into(),
            declaracion_numero: declaracion_numero.into(),
            fields,
        })
    }

    /// Value of a field, if extracted.
    pub fn get(&self, field: &Field) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Value for an output column, including the `Archivo`/`Declaracion`
    /// metadata columns.
    pub fn column(&self, name: &str) -> Option<&str> {
        match name {
            "Archivo" => Some(&self.archivo_origen),
            "Declaracion" => Some(&self.declaracion_numero),
            other => self.get(&Field::from_canonical(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_canonical_roundtrip() {
        for (field, name) in Field::KNOWN {
            assert_eq!(field.as_str(), *name);
            assert_eq!(&Field::from_canonical(name), field);
        }
        assert_eq!(Field::from_canonical("Peso"), Field::Other("Peso".to_string()));
        assert_eq!(Field::Other("Peso".to_string()).as_str(), "Peso");
    }

    #[test]
    fn test_product_record_requires_producto() {
        let mut fields = FieldRecord::new();
        fields.insert(Field::Marca, "ACME".to_string());
        assert!(ProductRecord::new("a.pdf", "1", fields.clone()).is_none());

        fields.insert(Field::Producto, "   ".to_string());
        assert!(ProductRecord::new("a.pdf", "1", fields.clone()).is_none());

        fields.insert(Field::Producto, "FILTRO".to_string());
        let record = ProductRecord::new("a.pdf", "1", fields).unwrap();
        assert_eq!(record.column("Archivo"), Some("a.pdf"));
        assert_eq!(record.column("Declaracion"), Some("1"));
        assert_eq!(record.column("Marca"), Some("ACME"));
        assert_eq!(record.column("Modelo"), None);
    }

    #[test]
    fn test_field_serializes_as_canonical_name() {
        let json = serde_json::to_string(&Field::PaisOrigen).unwrap();
        assert_eq!(json, "\"Pais_Origen\"");
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Field::PaisOrigen);
    }
}
