//! Template generators. Each module maps a serde-deserializable option type
//! to text artifacts; none of them touch the filesystem.

pub mod api;
pub mod backup;
pub mod cicd;
pub mod component;
pub mod design;
pub mod docs;
pub mod prototype;
pub mod schema;
pub mod test_config;
pub mod test_gen;
pub mod wbs;
