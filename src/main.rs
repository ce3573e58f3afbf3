#![allow(warnings)]
//! Batch Check-in Frontend Entry Point

mod models;
mod config;
mod error;
mod commands;
mod checkins;
mod selection;
mod reconcile;
mod sync;
mod timer;
mod context;
mod store;
mod components;
mod app;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let _ = rolling_logger::init(log::LevelFilter::Debug, rolling_logger::DEFAULT_CAPACITY);
    mount_to_body(App);
}
