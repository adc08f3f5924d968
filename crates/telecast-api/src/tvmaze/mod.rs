pub mod client;

pub use client::TvMazeClient;
