mod common;
mod vaccination;
