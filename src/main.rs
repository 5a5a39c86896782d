//! # Cartela CLI
//!
//! Command-line interface for rendering exhibit labels.
//!
//! ## Usage
//!
//! ```bash
//! # Render a card to a PNG preview and a TRI binary
//! cartela render --card card.json --png card.png --tri card.tri --dither 2
//!
//! # Preview what the panel will show
//! cartela render --card card.json --png device.png --device-accurate
//!
//! # Expand a TRI binary back to PNG
//! cartela view card.tri --png card.png
//!
//! # Run the HTTP render server
//! cartela serve --listen 0.0.0.0:8080 --photo-root ./photos
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use cartela::{
    CardModel, CartelaError, CardRenderer, RenderConfig,
    encode::{decode_tri, encode_png},
    font::FontCache,
    photo::{Photo, PhotoTone},
    raster::Raster,
    render::OutputFormat,
    server::{self, ServerConfig},
};

/// Cartela - exhibit label renderer for tri-tone e-paper
#[derive(Parser, Debug)]
#[command(name = "cartela")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a card JSON file
    Render {
        /// Card JSON (camelCase or snake_case fields)
        #[arg(long, value_name = "FILE")]
        card: PathBuf,

        /// Write a PNG preview
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Write the TRI device binary
        #[arg(long, value_name = "FILE")]
        tri: Option<PathBuf>,

        /// Dither level: 0 nearest, 1 ordered, 2 Floyd-Steinberg, 3 serpentine
        #[arg(long, default_value = "0")]
        dither: i64,

        /// Quantize the PNG preview like the panel does
        #[arg(long)]
        device_accurate: bool,

        /// Keep photo colors instead of the museum grayscale tone
        #[arg(long)]
        color_photo: bool,

        /// TrueType font for regular text (requires --font-bold)
        #[arg(long, value_name = "FILE", requires = "font_bold")]
        font_regular: Option<PathBuf>,

        /// TrueType font for bold text (requires --font-regular)
        #[arg(long, value_name = "FILE", requires = "font_regular")]
        font_bold: Option<PathBuf>,
    },

    /// Expand a TRI binary to a PNG
    View {
        /// TRI file to read
        file: PathBuf,

        /// PNG output path
        #[arg(long, value_name = "FILE")]
        png: PathBuf,
    },

    /// Start the HTTP render server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// Directory local photo paths must stay inside; without it only
        /// http(s) photos are fetched
        #[arg(long, value_name = "DIR")]
        photo_root: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cartela=info".into()),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CartelaError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            card,
            png,
            tri,
            dither,
            device_accurate,
            color_photo,
            font_regular,
            font_bold,
        } => {
            let tone = if color_photo {
                PhotoTone::Color
            } else {
                PhotoTone::Museum
            };
            let config = RenderConfig::new(dither)?
                .with_device_accurate(device_accurate)
                .with_photo_tone(tone);

            let card = load_card(&card)?;

            let fonts = match (font_regular, font_bold) {
                (Some(regular), Some(bold)) => {
                    let fonts = FontCache::from_ttf(std::fs::read(regular)?, std::fs::read(bold)?)?;
                    FontCache::install(fonts)?
                }
                _ => FontCache::shared()?,
            };

            let mut formats = Vec::new();
            if png.is_some() {
                formats.push(OutputFormat::Png);
            }
            if tri.is_some() {
                formats.push(OutputFormat::Tri);
            }
            if formats.is_empty() {
                println!("Nothing to do: pass --png and/or --tri");
                return Ok(());
            }

            let output = CardRenderer::new(fonts).render(&card, &config, &formats)?;

            if let (Some(path), Some(bytes)) = (png, output.png) {
                std::fs::write(&path, bytes)?;
                println!("Saved preview to {}", path.display());
            }
            if let (Some(path), Some(bytes)) = (tri, output.tri) {
                std::fs::write(&path, &bytes)?;
                println!("Saved {} bytes to {}", bytes.len(), path.display());
            }
        }
        Commands::View { file, png } => {
            let raster = decode_tri(&std::fs::read(&file)?)?;
            let counts = raster.histogram();
            std::fs::write(&png, encode_png(&Raster::Tri(&raster))?)?;
            println!(
                "{}: white {}, black {}, accent {} -> {}",
                file.display(),
                counts[0],
                counts[1],
                counts[2],
                png.display()
            );
        }
        Commands::Serve { listen, photo_root } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(ServerConfig {
                listen_addr: listen,
                photo_root,
                ..Default::default()
            }))?;
        }
    }

    Ok(())
}

/// Read a card JSON file and attach the photo named by `imagePath`.
/// Relative photo paths resolve against the card's directory; http(s)
/// URLs are downloaded.
fn load_card(path: &Path) -> Result<CardModel, CartelaError> {
    let json = std::fs::read_to_string(path)?;
    let card: CardModel = serde_json::from_str(&json).map_err(|e| {
        CartelaError::Decode(format!("Invalid card JSON in {}: {}", path.display(), e))
    })?;

    let reference = match card.image_path.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => return Ok(card),
    };

    let bytes = if server::is_remote(&reference) {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(server::fetch_remote(&reference))?
    } else {
        let local = Path::new(&reference);
        let local = if local.is_relative() {
            path.parent().unwrap_or(Path::new(".")).join(local)
        } else {
            local.to_path_buf()
        };
        std::fs::read(&local)?
    };

    let photo = Photo::decode(&bytes)?;
    Ok(card.with_photo(photo))
}
