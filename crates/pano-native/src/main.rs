use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use pano_core::compositor::{compose, Blend};
use pano_core::constants::ENVIRONMENTS_PATH;
use pano_core::environment::{self, Environment};
use pano_core::polygon::{self, FanCheck};
use pano_core::{labels, HotspotKind, HotspotSet, PresetDocument, ViewMode, Viewer, ViewerPreset};

#[derive(Parser, Debug)]
#[command(name = "pano-inspect", about = "Inspect pano360 environments and presets")]
struct Cli {
    /// Raise log output to debug.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve one environment and print its layer stack and hotspots.
    Inspect {
        /// Directory served as the site root (holds environments.json).
        #[arg(long)]
        public: PathBuf,
        #[arg(long)]
        env: Option<String>,
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },
    /// Normalize a legacy preset.
    Migrate {
        #[arg(long)]
        preset: PathBuf,
        /// Overwrite the file instead of printing.
        #[arg(long)]
        write: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Lights,
    Final,
}

impl From<ModeArg> for ViewMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Lights => ViewMode::Lights,
            ModeArg::Final => ViewMode::Final,
        }
    }
}

/// Site-absolute paths (`/img/x`) resolved under the public directory.
fn site_path(public: &Path, url: &str) -> PathBuf {
    public.join(url.trim_start_matches('/'))
}

fn read_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            log::debug!("[fs] {}: {}", path.display(), e);
            None
        }
    }
}

fn inspect(public: &Path, requested: Option<&str>, mode: Option<ModeArg>) -> Result<()> {
    let registry = read_optional(&site_path(public, ENVIRONMENTS_PATH))
        .map(|t| environment::parse_registry(&t))
        .unwrap_or_default();
    let env_id = environment::initial_environment(&registry, requested);
    let env: Environment = environment::lookup(&registry, &env_id)
        .with_context(|| format!("environment {:?} is not registered", env_id))?;

    let manifest_path = site_path(public, &env.manifest_url());
    let manifest = fs::read_to_string(&manifest_path)
        .with_context(|| format!("reading {}", manifest_path.display()))?;
    let files = environment::parse_manifest(&manifest);

    let remote = if env.preset_path.is_empty() {
        None
    } else {
        read_optional(&site_path(public, &env.preset_path)).and_then(|t| {
            PresetDocument::from_json(&t)
                .map_err(|e| log::warn!("[preset] {}", e))
                .ok()
        })
    };

    let mut viewer = Viewer::new();
    viewer.load_environment(&env.id, &files, None, remote.as_ref());
    let mode = mode.map(ViewMode::from).unwrap_or(viewer.view_mode());

    println!("environment: {} ({})", env.display_name(), env.id);
    println!("preset: {}", if remote.is_some() { env.preset_path.as_str() } else { "none" });
    println!(
        "view mode: {:?} (permission {:?})",
        mode,
        viewer.view().permission()
    );

    println!("\nfiles:");
    for f in labels::sort_lights(&files) {
        println!("  {}", f);
    }

    println!("\ncomposite (bottom first):");
    for (i, d) in compose(viewer.layers(), mode, viewer.board())
        .iter()
        .enumerate()
    {
        let blend = match d.blend {
            Blend::Normal => "normal",
            Blend::Additive => "additive",
        };
        println!(
            "  {:>2} {:<32} {:<24} {:>5.2} {}",
            i,
            d.file,
            labels::sanitize_label(&d.file),
            d.opacity,
            blend
        );
    }

    let hotspots = viewer.hotspots();
    println!("\nhotspots: {}", hotspots.len());
    for h in hotspots.iter() {
        let detail = match &h.kind {
            HotspotKind::Switch { lights, .. } => {
                format!("lights [{}]", lights.iter().cloned().collect::<Vec<_>>().join(", "))
            }
            HotspotKind::Portal {
                target_environment, ..
            } => format!(
                "-> {}",
                target_environment.as_deref().unwrap_or("(no target)")
            ),
            HotspotKind::Swap { target_images } => format!("cycle [{}]", target_images.join(", ")),
        };
        println!("  {} {:<7} {}", h.id, h.tag().as_str(), detail);
    }

    for (id, file) in hotspots.dangling_swap_targets(viewer.board().files()) {
        log::warn!("[hotspot] {} swaps to unknown file {:?}", id, file);
    }
    for (id, points) in hotspots.polygons() {
        match polygon::check_fan(points) {
            FanCheck::Valid => {}
            check => log::warn!("[polygon] {} ({} points) is {:?}", id, points.len(), check),
        }
    }
    Ok(())
}

fn migrate(path: &Path, write: bool) -> Result<()> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut preset = ViewerPreset::from_json(&text)?;

    let mut set = HotspotSet::new();
    set.replace_all(preset.hotspots.clone());
    for (file, record) in preset.lights_state.iter_mut() {
        record.linked_hotspot_ids = set.linked_hotspots(file);
    }

    let out = preset.to_json_pretty()?;
    if write {
        fs::write(path, &out).with_context(|| format!("writing {}", path.display()))?;
        log::info!("[preset] rewrote {}", path.display());
    } else {
        println!("{}", out);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::builder()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    match cli.command {
        Command::Inspect { public, env, mode } => inspect(&public, env.as_deref(), mode),
        Command::Migrate { preset, write } => migrate(&preset, write),
    }
}
