pub mod file;
pub mod index;
pub mod login;
pub mod logout;
pub mod not_found;
