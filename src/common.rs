pub mod date_range;
pub mod error;
pub mod i18n;
