#![allow(dead_code)]

pub mod architecture;
pub mod clients;
pub mod config;
