pub mod assignment;
pub mod banger;
pub mod episode;
pub mod movie;
pub mod rating;
pub mod review;
pub mod user;
