pub mod media;
pub mod transcode;
