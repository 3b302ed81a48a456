pub mod config;
pub mod demo;
pub mod error;
pub mod game_loop;
