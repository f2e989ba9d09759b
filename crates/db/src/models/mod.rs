//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for partial updates

pub mod note;
