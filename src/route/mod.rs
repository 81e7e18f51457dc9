pub mod verify_api;
