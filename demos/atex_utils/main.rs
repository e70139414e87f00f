//! ATEX Texture CLI Utility
//!
//! A command-line tool for inspecting and decoding ATEX texture
//! containers fetched from the Guild Wars 2 asset CDN.
//!
//! # Features
//!
//! - **info**: Print header details of an ATEX container
//! - **decode**: Convert an ATEX container to a PNG image
//! - **scan**: Walk a directory and summarize every container in it
//!
//! # Usage
//!
//! ```bash
//! # Inspect a container header
//! cargo run --example atex_utils info texture.atex
//!
//! # Decode a container to PNG
//! cargo run --example atex_utils decode texture.atex texture.png
//!
//! # Summarize a directory of downloaded containers
//! cargo run --example atex_utils scan ./downloads
//! ```

use clap::{Parser, Subcommand};
use gw2tex_rs::prelude::{AtexFile, AtexHeader};
use image::RgbaImage;
use log::warn;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "atex_utils")]
#[command(author = "gw2tex-rs project")]
#[command(version = "1.0")]
#[command(about = "ATEX texture utility - inspect and decode texture containers", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print header details of an ATEX container
	Info {
		/// Input ATEX file path
		#[arg(value_name = "INPUT_ATEX")]
		input: PathBuf,

		/// Emit the header as JSON
		#[arg(short, long)]
		json: bool,
	},

	/// Decode an ATEX container to a PNG image
	Decode {
		/// Input ATEX file path
		#[arg(value_name = "INPUT_ATEX")]
		input: PathBuf,

		/// Output PNG file path
		#[arg(value_name = "OUTPUT_PNG")]
		output: PathBuf,

		/// Show verbose output
		#[arg(short, long)]
		verbose: bool,
	},

	/// Walk a directory and summarize every ATEX container in it
	Scan {
		/// Directory to scan
		#[arg(value_name = "DIRECTORY")]
		directory: PathBuf,
	},
}

/// Handle info command
fn handle_info(input: PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
	let data = fs::read(&input)?;
	let header = AtexHeader::from_bytes(&data)?;

	if json {
		let fourcc = header.fourcc().to_le_bytes();
		let value = serde_json::json!({
			"file": input.display().to_string(),
			"magic": String::from_utf8_lossy(&header.magic()),
			"format": String::from_utf8_lossy(&fourcc),
			"width": header.width(),
			"height": header.height(),
			"size": data.len(),
		});
		println!("{}", serde_json::to_string_pretty(&value)?);
	} else {
		println!("{header}");
		println!("- File Size: {} bytes", data.len());
		println!("- First Bytes: {}", hex::encode(&data[..data.len().min(16)]));
	}

	Ok(())
}

/// Handle decode command
fn handle_decode(
	input: PathBuf,
	output: PathBuf,
	verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	if verbose {
		println!("🔄 Decoding ATEX to PNG");
		println!("   Input:  {}", input.display());
		println!("   Output: {}", output.display());
	}

	if verbose {
		println!("\n📖 Loading ATEX file...");
	}
	let file = AtexFile::open(&input)?;

	let width = u32::from(file.header().width());
	let height = u32::from(file.header().height());

	if verbose {
		println!("   ✓ Decoded {}x{} image", width, height);
	}

	let image = file.into_image();
	let pixel_count = image.pixels().len();

	let img: RgbaImage = RgbaImage::from_raw(width, height, image.into_raw())
		.ok_or("Failed to create image buffer")?;

	if verbose {
		println!("\n💾 Saving PNG file...");
	}
	img.save(&output)?;

	if verbose {
		println!("   ✓ Saved to {}", output.display());
		println!("\n✅ Decoding completed successfully!");
	} else {
		println!(
			"✓ Decoded {} -> {} ({}x{}, {} bytes of RGBA)",
			input.display(),
			output.display(),
			width,
			height,
			pixel_count
		);
	}

	Ok(())
}

/// Handle scan command
fn handle_scan(directory: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
	let mut found = 0usize;
	let mut rejected = 0usize;

	for entry in walkdir::WalkDir::new(&directory) {
		let entry = entry?;
		if !entry.file_type().is_file() {
			continue;
		}

		let data = fs::read(entry.path())?;
		match AtexHeader::from_bytes(&data) {
			Ok(header) => {
				let fourcc = header.fourcc().to_le_bytes();
				println!(
					"{}: {} {}x{} ({} bytes)",
					entry.path().display(),
					String::from_utf8_lossy(&fourcc),
					header.width(),
					header.height(),
					data.len()
				);
				found += 1;
			}
			Err(err) => {
				warn!("{}: {}", entry.path().display(), err);
				rejected += 1;
			}
		}
	}

	println!("\n{found} container(s) found, {rejected} other file(s) skipped");

	Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();

	match cli.command {
		Commands::Info { input, json } => handle_info(input, json),

		Commands::Decode {
			input,
			output,
			verbose,
		} => handle_decode(input, output, verbose),

		Commands::Scan { directory } => handle_scan(directory),
	}
}
