pub mod config;
pub mod doctor;
pub mod formats;
pub mod serve;
