pub mod thumbnailer;
pub mod transcoder;
