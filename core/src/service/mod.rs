pub mod earnings;
pub mod entry_service;
pub mod merge;
pub mod rates;
pub mod roster_service;
pub mod sync_service;

mod sync_service_test;
