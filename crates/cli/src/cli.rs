use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convert-video")]
#[command(author, version, about = "Convert videos to MP4, compress them or extract MP3 audio")]
pub struct Cli {
    /// Input video file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Compress the video (H.264, CRF 23)
    #[arg(long)]
    pub compress: bool,

    /// Extract the audio track as MP3
    #[arg(long = "to-mp3")]
    pub to_mp3: bool,

    /// Root directory for produced files
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// ffmpeg binary name or path
    #[arg(long, default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
