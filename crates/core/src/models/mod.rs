pub mod account;
pub mod parity;
pub mod profile;
pub mod row;
pub mod table;
