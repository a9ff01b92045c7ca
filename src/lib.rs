// src/lib.rs

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use config::AppConfig;
use services::{image_host::ImageHost, payment_gateway::PaymentGateway};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub images: Arc<dyn ImageHost>,
}

pub mod config;

pub mod entities {
    pub mod prelude;
    pub mod admins;
    pub mod bookings;
    pub mod owners;
    pub mod payments;
    pub mod rooms;
    pub mod users;
}

pub mod services {
    pub mod accounts;
    pub mod admin;
    pub mod auth;
    pub mod image_host;
    pub mod payment;
    pub mod payment_gateway;
    pub mod purchase;
    pub mod rooms;
    pub mod signature;
}

pub mod models {
    pub mod account;
    pub mod admin;
    pub mod error;
    pub mod payment;
    pub mod purchase;
    pub mod room;
}

pub mod handlers {
    pub mod admin;
    pub mod middleware;
    pub mod owner;
    pub mod payment;
    pub mod room;
    pub mod user;
}

pub mod routes;
