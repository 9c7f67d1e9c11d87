pub mod event;
pub mod pet;
pub mod user;
pub mod vaccination;
