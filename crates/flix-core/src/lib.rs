pub mod carousel;
pub mod catalog;
pub mod config;
pub mod error;
pub mod image;
pub mod model;
pub mod overlay;
pub mod platform;
pub mod rating;
pub mod route;
pub mod search;
pub mod tmdb;
