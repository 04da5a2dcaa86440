pub mod expenses;
pub mod identity;
pub mod mail;
