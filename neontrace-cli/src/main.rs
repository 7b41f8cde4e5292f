use clap::{Parser, Subcommand};
use image::{GenericImageView, RgbaImage};
use neontrace_core::config::OutlineConfig;
use neontrace_core::palette::parse_hex;
use neontrace_core::pipeline::process_file;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "neontrace",
    about = "Multi-method edge detection and stylization for images"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single image
    Single {
        /// Input image path
        input: PathBuf,

        /// Output image path (default: input_<preset>.png)
        output: Option<PathBuf>,

        /// Use a named preset: outline, ink, neon, sketch, toon, scan
        #[arg(long)]
        preset: Option<String>,

        /// Region mask image for palette-driven edge colors
        #[arg(long)]
        mask: Option<PathBuf>,

        /// Animation clock in seconds (edge color pulse phase)
        #[arg(long, default_value_t = 0.0)]
        time: f32,

        /// Edge color as hex, e.g. "#00FFFF"
        #[arg(long)]
        edge_color: Option<String>,

        /// Edge thickness in pixels
        #[arg(long)]
        thickness: Option<f32>,

        /// Global edge strength multiplier
        #[arg(long)]
        strength: Option<f32>,

        /// Color-difference threshold
        #[arg(long)]
        color_threshold: Option<f32>,

        /// Disable the color detector
        #[arg(long)]
        no_color: bool,

        /// Enable the luminance detector
        #[arg(long)]
        luminance: bool,

        /// Enable the saturation detector
        #[arg(long)]
        saturation: bool,

        /// Enable the hue detector
        #[arg(long)]
        hue: bool,

        /// 8/12-tap sampling instead of the fast 4-tap cross
        #[arg(long)]
        multi_sampling: bool,

        /// 12 taps instead of 8 (with --multi-sampling)
        #[arg(long)]
        high_quality: bool,

        /// Circular tap placement instead of cross+diagonal
        #[arg(long)]
        circular: bool,

        /// 1.5x sampling radius
        #[arg(long)]
        wide: bool,

        /// Output edges on a transparent background
        #[arg(long)]
        edge_only: bool,

        /// Add edges on top of the source instead of blending
        #[arg(long)]
        sharpen: bool,

        /// Smooth the edge-strength field
        #[arg(long)]
        smooth: bool,

        /// Dilate edges outward
        #[arg(long)]
        dilate: bool,

        /// Dither the edge-strength field
        #[arg(long)]
        dither: bool,
    },

    /// Process all images in a directory with every preset
    Batch {
        /// Input directory
        input_dir: PathBuf,

        /// Output directory (default: input_dir/output)
        output_dir: Option<PathBuf>,

        /// Run only a specific preset (default: all presets)
        #[arg(long)]
        preset: Option<String>,

        /// Number of parallel jobs (default: num_cpus)
        #[arg(long, short)]
        jobs: Option<usize>,

        /// Reprocess even if output is up-to-date
        #[arg(long)]
        force: bool,
    },

    /// Compare two images pixel-by-pixel
    Compare {
        /// First image
        image_a: PathBuf,

        /// Second image
        image_b: PathBuf,

        /// Save visual diff to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];
const PRESET_SUFFIXES: &[&str] = &["outline", "ink", "neon", "sketch", "toon", "scan"];

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_generated_file(path: &Path) -> bool {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    PRESET_SUFFIXES
        .iter()
        .any(|suffix| stem.ends_with(suffix))
}

fn default_output_path(input: &Path, preset_name: &str) -> PathBuf {
    let stem = input.file_stem().unwrap().to_str().unwrap();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{}_{}.png", stem, preset_name))
}

fn output_up_to_date(input: &Path, output: &Path) -> bool {
    if !output.exists() {
        return false;
    }
    match (input.metadata(), output.metadata()) {
        (Ok(in_meta), Ok(out_meta)) => match (in_meta.modified(), out_meta.modified()) {
            (Ok(in_time), Ok(out_time)) => out_time > in_time,
            _ => false,
        },
        _ => false,
    }
}

fn cmd_batch(
    input_dir: &Path,
    output_dir: &Path,
    presets: Vec<(&'static str, OutlineConfig)>,
    jobs: Option<usize>,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let images: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_image_file(p) && !is_generated_file(p))
        .collect();

    if images.is_empty() {
        eprintln!("No source images found in {}", input_dir.display());
        return Ok(());
    }

    std::fs::create_dir_all(output_dir)?;

    if let Some(n) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok();
    }

    // Flatten to one work item per (image, preset), skipping up-to-date
    // outputs unless forced.
    let mut work: Vec<(PathBuf, PathBuf, &'static str, OutlineConfig)> = Vec::new();
    let mut skipped = 0usize;
    for image_path in &images {
        let stem = image_path.file_stem().unwrap().to_str().unwrap();
        for (preset_name, config) in &presets {
            let output_path = output_dir.join(format!("{}_{}.png", stem, preset_name));
            if !force && output_up_to_date(image_path, &output_path) {
                skipped += 1;
                continue;
            }
            work.push((image_path.clone(), output_path, *preset_name, config.clone()));
        }
    }

    eprintln!(
        "Found {} source images, {} presets: {} outputs to render, {} up-to-date",
        images.len(),
        presets.len(),
        work.len(),
        skipped
    );

    let errors: Vec<String> = work
        .par_iter()
        .filter_map(|(input, output, preset_name, config)| {
            eprintln!("  [{}] {} -> {}", preset_name, input.display(), output.display());
            match process_file(input, output, None, config, 0.0) {
                Ok(()) => None,
                Err(e) => {
                    let msg = format!("{} [{}]: {}", input.display(), preset_name, e);
                    eprintln!("  Error: {}", msg);
                    Some(msg)
                }
            }
        })
        .collect();

    eprintln!(
        "\nDone! Rendered: {}, Skipped: {}, Errors: {}",
        work.len() - errors.len(),
        skipped,
        errors.len()
    );
    for e in &errors {
        eprintln!("  {}", e);
    }

    Ok(())
}

fn cmd_compare(
    image_a: &Path,
    image_b: &Path,
    diff_output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let a = image::open(image_a)?;
    let b = image::open(image_b)?;

    let (wa, ha) = a.dimensions();
    let (wb, hb) = b.dimensions();

    if wa != wb || ha != hb {
        println!(
            "Images have different dimensions: {}x{} vs {}x{}",
            wa, ha, wb, hb
        );
        return Ok(());
    }

    let rgba_a = a.to_rgba8();
    let rgba_b = b.to_rgba8();
    let total_pixels = (wa * ha) as u64;

    let mut exact_matches = 0u64;
    let mut sum_abs_error = [0u64; 4];
    let mut max_error = [0u32; 4];

    let mut diff_img = diff_output.map(|_| RgbaImage::new(wa, ha));

    for y in 0..ha {
        for x in 0..wa {
            let pa = rgba_a.get_pixel(x, y);
            let pb = rgba_b.get_pixel(x, y);

            let mut pixel_match = true;
            for c in 0..4 {
                let diff = (pa[c] as i32 - pb[c] as i32).unsigned_abs();
                if diff > 0 {
                    pixel_match = false;
                }
                sum_abs_error[c] += diff as u64;
                max_error[c] = max_error[c].max(diff);

                if let Some(ref mut img) = diff_img {
                    let vis = (diff * 4).min(255) as u8;
                    // Keep the diff visible: amplified channel error, opaque.
                    img.get_pixel_mut(x, y)[c] = if c == 3 { 255 } else { vis };
                }
            }

            if pixel_match {
                exact_matches += 1;
            }
        }
    }

    let match_pct = (exact_matches as f64 / total_pixels as f64) * 100.0;
    let mae: Vec<f64> = sum_abs_error
        .iter()
        .map(|&s| s as f64 / total_pixels as f64)
        .collect();

    println!(
        "Image comparison: {} vs {}",
        image_a.display(),
        image_b.display()
    );
    println!("Dimensions: {}x{}", wa, ha);
    println!("Exact matches: {} ({:.2}%)", exact_matches, match_pct);
    println!(
        "MAE per channel (R,G,B,A): {:.4}, {:.4}, {:.4}, {:.4}",
        mae[0], mae[1], mae[2], mae[3]
    );
    println!(
        "Max error per channel (R,G,B,A): {}, {}, {}, {}",
        max_error[0], max_error[1], max_error[2], max_error[3]
    );

    if let (Some(img), Some(out_path)) = (diff_img, diff_output) {
        img.save(out_path)?;
        println!("Visual diff saved to: {}", out_path.display());
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Single {
            input,
            output,
            preset,
            mask,
            time,
            edge_color,
            thickness,
            strength,
            color_threshold,
            no_color,
            luminance,
            saturation,
            hue,
            multi_sampling,
            high_quality,
            circular,
            wide,
            edge_only,
            sharpen,
            smooth,
            dilate,
            dither,
        } => {
            let (preset_name, mut config) = if let Some(ref name) = preset {
                let c = OutlineConfig::from_preset(name)
                    .ok_or_else(|| format!("Unknown preset: {}", name))?;
                (name.clone(), c)
            } else {
                ("outline".to_string(), OutlineConfig::default())
            };

            // Flag overrides on top of the preset.
            if let Some(ref hex) = edge_color {
                config.edge_color = parse_hex(hex)?;
            }
            if let Some(v) = thickness {
                config.edge_thickness = v;
            }
            if let Some(v) = strength {
                config.edge_strength = v;
            }
            if let Some(v) = color_threshold {
                config.color_threshold = v;
            }
            if no_color {
                config.use_color = false;
            }
            if luminance {
                config.use_luminance = true;
            }
            if saturation {
                config.use_saturation = true;
            }
            if hue {
                config.use_hue = true;
            }
            if multi_sampling {
                config.multi_sampling = true;
            }
            if high_quality {
                config.high_quality = true;
            }
            if circular {
                config.circular = true;
            }
            if wide {
                config.wide = true;
            }
            if edge_only {
                config.edge_only = true;
            }
            if sharpen {
                config.sharpening = true;
            }
            if smooth {
                config.edge_smoothing = true;
            }
            if dilate {
                config.edge_dilation = true;
            }
            if dither {
                config.dithered_edges = true;
            }
            if mask.is_some() {
                config.use_mask_texture = true;
            }

            let output_path = output.unwrap_or_else(|| default_output_path(&input, &preset_name));

            eprintln!(
                "Processing: {} -> {}",
                input.display(),
                output_path.display()
            );
            eprintln!("Preset: {}", preset_name);
            process_file(&input, &output_path, mask.as_deref(), &config, time)?;
            eprintln!("Done: {}", output_path.display());
        }

        Commands::Batch {
            input_dir,
            output_dir,
            preset,
            jobs,
            force,
        } => {
            let output = output_dir.unwrap_or_else(|| input_dir.join("output"));

            let presets: Vec<(&'static str, OutlineConfig)> = if let Some(ref name) = preset {
                let config = OutlineConfig::from_preset(name)
                    .ok_or_else(|| format!("Unknown preset: {}", name))?;
                let name: &'static str = PRESET_SUFFIXES
                    .iter()
                    .copied()
                    .find(|s| *s == name.as_str())
                    .unwrap_or("custom");
                vec![(name, config)]
            } else {
                OutlineConfig::all_presets()
            };

            cmd_batch(&input_dir, &output, presets, jobs, force)?;
        }

        Commands::Compare {
            image_a,
            image_b,
            output,
        } => {
            cmd_compare(&image_a, &image_b, output.as_deref())?;
        }
    }

    Ok(())
}
