pub mod status_service;
