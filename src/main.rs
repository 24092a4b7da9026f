//! Oddlib CLI - Command-line tool for Oddworld LVL asset inspection.
//!
//! This is the main entry point for the Oddlib command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, LevelFilter};
use rayon::prelude::*;

use oddlib::prelude::*;

/// Oddlib - Oddworld asset inspection and extraction tool
#[derive(Parser)]
#[command(name = "oddlib")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files and chunks of an LVL archive
    LvlList {
        /// Path to the LVL file
        #[arg(short, long, env = "INPUT_LVL")]
        lvl: PathBuf,

        /// Filter pattern for file names (glob-style)
        #[arg(short, long)]
        filter: Option<String>,

        /// Show every chunk of each file
        #[arg(short, long)]
        detailed: bool,
    },

    /// Extract every chunk of an LVL archive to raw files
    LvlExtract {
        /// Path to the LVL file
        #[arg(short, long, env = "INPUT_LVL")]
        lvl: PathBuf,

        /// Output directory
        #[arg(short, long, env = "OUTPUT_FOLDER")]
        output: PathBuf,

        /// Filter pattern for file names (glob-style)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show the animations of an animation set
    AnimInfo {
        /// Path to the LVL file
        #[arg(short, long, env = "INPUT_LVL")]
        lvl: PathBuf,

        /// File inside the archive, e.g. ABEBLOW.BAN
        #[arg(short, long)]
        file: String,

        /// Resource id of the Anim chunk
        #[arg(short, long)]
        id: u32,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Decode every frame of an animation set to PNG
    AnimExport {
        /// Path to the LVL file
        #[arg(short, long, env = "INPUT_LVL")]
        lvl: PathBuf,

        /// File inside the archive
        #[arg(short, long)]
        file: String,

        /// Resource id of the Anim chunk
        #[arg(short, long)]
        id: u32,

        /// Output directory
        #[arg(short, long, env = "OUTPUT_FOLDER")]
        output: PathBuf,
    },

    /// Print the collision lines stored in a path block
    PathLines {
        /// File holding the path block
        #[arg(short, long)]
        input: PathBuf,

        /// Byte offset of the first collision item
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Number of collision items
        #[arg(short, long)]
        count: usize,

        /// Cast a ray through the lines: x1,y1,x2,y2
        #[arg(long, value_delimiter = ',', num_args = 4)]
        ray: Option<Vec<f32>>,
    },

    /// Convert a pair of ADSR register words to a volume envelope
    Envelope {
        /// Low ADSR word (decimal or 0x-prefixed hex)
        #[arg(value_parser = parse_word)]
        low: u16,

        /// High ADSR word (decimal or 0x-prefixed hex)
        #[arg(value_parser = parse_word)]
        high: u16,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    match cli.command {
        Commands::LvlList {
            lvl,
            filter,
            detailed,
        } => cmd_lvl_list(&lvl, filter.as_deref(), detailed),
        Commands::LvlExtract {
            lvl,
            output,
            filter,
        } => cmd_lvl_extract(&lvl, &output, filter.as_deref()),
        Commands::AnimInfo {
            lvl,
            file,
            id,
            json,
        } => cmd_anim_info(&lvl, &file, id, json),
        Commands::AnimExport {
            lvl,
            file,
            id,
            output,
        } => cmd_anim_export(&lvl, &file, id, &output),
        Commands::PathLines {
            input,
            offset,
            count,
            ray,
        } => cmd_path_lines(&input, offset, count, ray.as_deref()),
        Commands::Envelope { low, high } => cmd_envelope(low, high),
    }
}

fn open_archive(path: &Path) -> Result<LvlArchive> {
    let start = Instant::now();
    let archive = LvlArchive::open(path)
        .with_context(|| format!("Failed to open LVL archive {}", path.display()))?;
    debug!("opened {} in {:?}", archive.name(), start.elapsed());
    Ok(archive)
}

fn file_filter(filter: Option<&str>) -> Result<Option<glob::Pattern>> {
    filter
        .map(|p| glob::Pattern::new(&p.to_uppercase()).context("Invalid filter pattern"))
        .transpose()
}

fn name_matches(pattern: Option<&glob::Pattern>, name: &str) -> bool {
    pattern.map_or(true, |p| p.matches(&name.to_uppercase()))
}

fn cmd_lvl_list(path: &Path, filter: Option<&str>, detailed: bool) -> Result<()> {
    let archive = open_archive(path)?;
    let pattern = file_filter(filter)?;

    println!(
        "{}: {} files, {} bytes",
        archive.name(),
        archive.file_count(),
        archive.size()
    );

    let mut count = 0;
    for file in archive.files() {
        if !name_matches(pattern.as_ref(), file.name()) {
            continue;
        }

        println!(
            "{:<16} {:>10} {:>10} {:>4} chunks",
            file.name(),
            file.offset(),
            file.size(),
            file.chunk_count()
        );
        if detailed {
            for chunk in file.chunks() {
                println!(
                    "    {} {:>8} {:>10} bytes @ {}",
                    chunk.resource_type(),
                    chunk.id(),
                    chunk.len(),
                    chunk.offset()
                );
            }
        }
        count += 1;
    }

    println!("\nTotal: {} files", count);

    Ok(())
}

fn cmd_lvl_extract(path: &Path, output: &Path, filter: Option<&str>) -> Result<()> {
    let archive = open_archive(path)?;
    let pattern = file_filter(filter)?;

    let files: Vec<&LvlFile> = archive
        .files()
        .iter()
        .filter(|f| name_matches(pattern.as_ref(), f.name()))
        .collect();
    let total: usize = files.iter().map(|f| f.chunk_count()).sum();

    println!("Extracting {} chunks from {} files to {}...", total, files.len(), output.display());

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut extracted = 0;
    let mut errors = 0;

    for file in files {
        let dir = output.join(file.name());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let results = archive.read_parallel(file.chunks());
        for (chunk, result) in file.chunks().iter().zip(results) {
            let name = format!("{}_{}.bin", chunk.resource_type().to_string().trim_end(), chunk.id());
            match result {
                Ok(data) => {
                    fs::write(dir.join(&name), data)?;
                    extracted += 1;
                }
                Err(e) => {
                    eprintln!("Error extracting {}/{}: {}", file.name(), name, e);
                    errors += 1;
                }
            }
            pb.inc(1);
        }
    }

    pb.finish_with_message("Done");
    println!(
        "Extracted {} chunks in {:?} ({} errors)",
        extracted,
        start.elapsed(),
        errors
    );

    Ok(())
}

fn cmd_anim_info(path: &Path, file: &str, id: u32, json: bool) -> Result<()> {
    let archive = open_archive(path)?;
    let set = oddlib::load_animation_set(&archive, file, id)
        .with_context(|| format!("Failed to load animation set {file}:{id}"))?;

    if json {
        let info = serde_json::json!({
            "file": file,
            "id": id,
            "variant": set.variant(),
            "header": set.header(),
            "palette_entries": set.palette().len(),
            "frame_table_offset": set.frame_table_offset(),
            "unique_frames": set.frame_count(),
            "animations": set.animations(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!(
        "{}:{} ({:?}), {} palette entries, {} unique frames",
        file,
        id,
        set.variant(),
        set.palette().len(),
        set.frame_count()
    );
    for (i, anim) in set.animations().iter().enumerate() {
        println!(
            "  #{:<3} @ {:>6}: {:>3} frames, {:>2} fps, loop from {}{}",
            i,
            anim.offset,
            anim.frame_count,
            anim.fps,
            anim.loop_start_frame,
            if anim.frame_count == 0 { " (empty)" } else { "" }
        );
    }

    Ok(())
}

fn cmd_anim_export(path: &Path, file: &str, id: u32, output: &Path) -> Result<()> {
    let archive = open_archive(path)?;
    let set = oddlib::load_animation_set(&archive, file, id)
        .with_context(|| format!("Failed to load animation set {file}:{id}"))?;

    let start = Instant::now();
    let frames = set
        .decode_all_frames_parallel()
        .context("Failed to decode frames")?;
    println!("Decoded {} frames in {:?}", frames.len(), start.elapsed());

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let stem = Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file);
    let palette = set.palette();

    frames
        .par_iter()
        .try_for_each(|frame| -> Result<()> {
            let rgba = palette.to_rgba8(frame);
            let full = image::RgbaImage::from_raw(frame.actual_width, frame.height, rgba)
                .context("Frame buffer does not match its dimensions")?;
            let width = frame.width.min(frame.actual_width);
            let cropped = image::imageops::crop_imm(&full, 0, 0, width, frame.height).to_image();

            let out = output.join(format!("{}_{}_{}.png", stem, id, frame.offset));
            cropped
                .save(&out)
                .with_context(|| format!("Failed to write {}", out.display()))
        })?;

    println!("Exported {} frames to {}", frames.len(), output.display());

    Ok(())
}

fn cmd_path_lines(input: &Path, offset: usize, count: usize, ray: Option<&[f32]>) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;
    let items = oddlib::path::parse_collision_items(&data, offset, count)
        .context("Failed to parse collision items")?;
    let lines = CollisionLines::build(&items);

    for (id, line) in lines.iter() {
        let link = |l: Option<oddlib::path::LineId>| l.map_or("-".to_string(), |id| id.to_string());
        println!(
            "{:>4} {:?} ({}, {}) -> ({}, {}) prev {} next {}",
            id,
            line.line_type,
            line.p1.x,
            line.p1.y,
            line.p2.x,
            line.p2.y,
            link(line.link.previous),
            link(line.link.next)
        );
    }
    println!("\nTotal: {} lines", lines.len());

    if let Some(&[x1, y1, x2, y2]) = ray {
        match lines.ray_cast(Point::new(x1, y1), Point::new(x2, y2), LineMask::ALL) {
            Some(hit) => println!(
                "Ray hits line {} at ({}, {}), distance {}",
                hit.line, hit.point.x, hit.point.y, hit.distance
            ),
            None => println!("Ray hits nothing"),
        }
    }

    Ok(())
}

fn cmd_envelope(low: u16, high: u16) -> Result<()> {
    let envelope = VolumeEnvelope::from_adsr(low, high);
    println!("ADSR {:#06x} {:#06x}", low, high);
    println!("  attack:  {:.6} s", envelope.attack_time);
    println!("  decay:   {:.6} s", envelope.decay_time);
    println!("  sustain: {:.4}", envelope.sustain_level);
    println!(
        "  release: {:.6} s ({})",
        envelope.linear_release_time,
        if envelope.exp_release { "exponential" } else { "linear" }
    );
    Ok(())
}

/// Parse a register word given in decimal or with a `0x` prefix.
fn parse_word(s: &str) -> std::result::Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid ADSR word {s:?}: {e}"))
}
