//! Customs declaration processing: segmentation, product splitting, label
//! extraction and field post-processing.

mod extractor;
pub mod fields;
pub mod labels;
pub mod patterns;
pub mod products;
pub mod quantity;
pub mod segmenter;
pub mod table;
pub mod template;
pub mod values;

pub use extractor::{ProductExtraction, ProductExtractor};
pub use fields::normalize_field_name;
pub use labels::LabelExtractor;
pub use products::{product_section, split_products};
pub use quantity::disambiguate;
pub use segmenter::DeclarationSegmenter;
pub use table::{CORE_COLUMNS, ProductTable};
pub use template::{DeclarationTable, fill_template};
