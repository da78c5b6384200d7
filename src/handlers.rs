pub mod dashboard;
pub mod emails;
pub mod uploads;
