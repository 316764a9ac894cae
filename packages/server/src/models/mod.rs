pub mod assignment;
pub mod auth;
pub mod banger;
pub mod blob;
pub mod episode;
pub mod movie;
pub mod rating;
pub mod shared;
pub mod user;
