use anyhow::{Context, Result};
use bvh::{channel_ranges, BvhReader, ReaderConfig, Segment};
use log::*;
use structopt::StructOpt;

use std::path::PathBuf;

#[derive(Debug, StructOpt)]
#[structopt(name = "info", about = "prints the skeleton and motion summary of a bvh file")]
struct Opt {
    /// Input file
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Reader config (toml)
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Fail when the MOTION block is broken
    #[structopt(short, long)]
    strict: bool,

    /// Print every frame
    #[structopt(short, long)]
    frames: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    info!("starting up");

    let opt = Opt::from_args();

    let mut config = match opt.config {
        Some(ref path) => ReaderConfig::load(path).context("failed to read config")?,
        None => ReaderConfig::default(),
    };
    if opt.strict {
        config = ReaderConfig::strict();
    }

    let mut reader = BvhReader::with_config(config);
    reader
        .load_file(&opt.input)
        .with_context(|| format!("failed to load {}", opt.input.display()))?;

    if let Some(e) = reader.motion_error() {
        warn!("motion ignored: {}", e);
    }

    for (seg, cols) in channel_ranges(reader.roots()) {
        let channels: Vec<&str> = seg.channels.iter().map(|c| c.name()).collect();
        println!(
            "{:<24} offset ({:.2}, {:.2}, {:.2}) cols {:?} {}",
            seg.name,
            seg.offset.x,
            seg.offset.y,
            seg.offset.z,
            cols,
            channels.join(" ")
        );
    }
    println!("-----------------------------");
    print_tree(reader.roots(), 0);
    println!("-----------------------------");

    let motion = reader.motion();
    println!("channels: {}", reader.channels());
    println!(
        "frames: {} declared, {} read, {:.4}s each, {:.2}s total",
        reader.frame_count(),
        motion.frames.len(),
        reader.frame_time(),
        motion.duration()
    );
    if opt.frames {
        for (i, frame) in motion.frames.iter().enumerate() {
            println!("{:04}: {:?}", i, frame);
        }
    }

    Ok(())
}

fn print_tree(segments: &[Segment], depth: usize) {
    for seg in segments {
        println!("{}{}", "  ".repeat(depth), seg.name);
        print_tree(&seg.children, depth + 1);
    }
}
