pub mod auth;
pub mod json;
pub mod path;
pub mod pet_form;
pub mod query;
