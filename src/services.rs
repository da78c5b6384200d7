pub mod aggregation;
pub mod dashboard_service;
pub mod email_service;
pub mod storage_service;
