//! On-demand HLS server for a directory of video files.
//!
//! Files are transcoded with ffmpeg the first time they are requested. The
//! [`JobCoordinator`](modules::transcode::coordinator::JobCoordinator) makes
//! sure each file has at most one transcode running no matter how many
//! clients ask for it at once, and picks up where an interrupted one left off
//! after a restart.

pub mod app;
pub mod cli;
pub mod common;
pub mod config;
pub mod docs;
pub mod modules;
pub mod routes;
pub mod state;
pub mod workers;
