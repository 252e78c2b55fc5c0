pub mod catalog_service;
pub mod seed_data;
