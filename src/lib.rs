//! Exploratory dashboards over a Netflix catalog CSV.
//!
//! The data layer (`data`, `chart`, `color`) is shared by two front ends:
//! a reactive egui dashboard (`app`, `state`, `ui`) and a server-rendered
//! web form (`web`).

pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
pub mod web;
