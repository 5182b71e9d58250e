//! Privilege catalogs: query shapes and row decoding.

pub mod decoder;
pub mod query;

pub use decoder::{
    decode, decode_global, decode_schema, decode_table, DecodedRow, GLOBAL_PRIVILEGE_COLUMNS,
    SCHEMA_PRIVILEGE_COLUMNS,
};
pub use query::CatalogQuery;
