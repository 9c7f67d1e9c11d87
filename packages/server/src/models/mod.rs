pub mod auth;
pub mod event;
pub mod pet;
pub mod shared;
pub mod vaccination;
