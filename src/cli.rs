use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "hls-vod",
    about = "Serve a media directory and transcode files to HLS on demand",
    version
)]
pub struct Args {
    /// HTTP port to listen on [env: PORT, default: 3000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory holding the source media files [env: MEDIA_DIR, default: ./media]
    #[arg(long, value_name = "DIR")]
    pub media_dir: Option<PathBuf>,

    /// Directory HLS output is written to [env: HLS_DIR, default: ./hls]
    #[arg(long, value_name = "DIR")]
    pub hls_dir: Option<PathBuf>,

    /// Encode with NVENC instead of libx264 [env: HWACCEL]
    #[arg(long)]
    pub hwaccel: bool,
}
