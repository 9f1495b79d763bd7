pub mod notice;
pub mod table;
