pub mod api;
pub mod models;
pub mod normalization;
pub mod storage;
pub mod telemetry;
pub mod validation;
pub mod whatsapp;

pub mod cli {
    pub mod counts;
    pub mod create_admin;
    pub mod seed;
}

pub mod util {
    pub mod db;
    pub mod env;
    pub mod password;
}
