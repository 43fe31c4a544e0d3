//! Refuel Station
//!
//! Servicio para registrar abastecimientos de vehículos: un asistente guiado
//! (placa, odómetro y lecturas de bomba, cada una con su foto), persistencia
//! en PostgreSQL y un historial para el acceso gerencial.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
