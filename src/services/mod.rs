pub mod hashing;
pub mod jwt;
pub mod mail;
pub mod security;
pub mod token;
pub mod uploads;
