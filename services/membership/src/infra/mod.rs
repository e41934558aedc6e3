pub mod db;
pub mod notify;
pub mod settings;
pub mod storage;
