//! # LabLine Booking Bot
//!
//! A LINE chat bot for a home blood-draw service: patients register and
//! book appointments through guided Thai-language dialogue flows, driven
//! by a signed webhook and backed by CSV files the lab staff already use.

pub mod bot;
pub mod config;
pub mod flows;
pub mod geocode;
pub mod intent;
pub mod line;
pub mod location;
pub mod repo;
pub mod report;
pub mod session;
pub mod state;
pub mod texts;
pub mod webhook;
