//! Stratos Backend Library
//!
//! This library exports the core modules for the Stratos loan-collection
//! backend server.

pub mod auth;
pub mod borrower;
pub mod borrower_service;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod handlers;
pub mod jobs;
pub mod ledger;
pub mod loan;
pub mod middleware;
pub mod models;
pub mod plan;
pub mod provision_service;
pub mod routes;
pub mod services;
pub mod state;
pub mod vault_service;
