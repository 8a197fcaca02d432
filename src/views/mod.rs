pub mod app;
pub mod shared;
pub mod auth;
pub mod home;
pub mod register;
pub mod patients;
pub mod admin;

pub use app::{load_route_data, render_app, AppView};
