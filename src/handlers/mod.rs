pub mod auth;
pub mod centers;
pub mod document_types;
pub mod regionals;
pub mod roles;
pub mod users;
