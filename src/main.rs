use anyhow::Context;
use bling::color::{Color, NeonPreset};
use bling::config::{ConfigFile, DisplayConfig, DisplayMode, PlayerOptions, SettingsUpdate};
use bling::metrics::{init_figlet_fonts_and_warn, CellSize, FigletMetrics, GlyphRasterizer};
use bling::player::Player;
use bling::render::{query_surface, SurfaceSize};
use bling::report::PlanReport;
use clap::Parser;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Run a text as an LED sign in the terminal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The text to show.
    text: Option<String>,

    /// A preset name (see --list-colors), #RRGGBB or #RRGGBBAA.
    #[clap(short, long)]
    color: Option<Color>,

    /// The font size in points, 50 to 300.
    #[clap(short, long)]
    size: Option<f32>,

    /// The speed factor, 0.1 to 2.0.
    #[clap(short = 'S', long)]
    speed: Option<f32>,

    /// Whether to scroll or blink the text.
    #[clap(short, long, value_enum)]
    mode: Option<DisplayMode>,

    /// The FIGlet font to draw the text with.
    #[clap(short, long)]
    font: Option<String>,

    /// The config file to use instead of the default one.
    #[clap(long, env = "BLING_CONFIG")]
    config: Option<PathBuf>,

    /// Skip the power-on splash.
    #[clap(long)]
    no_splash: bool,

    /// Frames drawn per second.
    #[clap(long)]
    fps: Option<u32>,

    /// Write logs to this file. The filter is taken from BLING_LOG.
    #[clap(long, env = "BLING_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Print the animation plan as JSON instead of showing the sign.
    #[clap(long)]
    print_plan: bool,

    /// List the color presets and exit.
    #[clap(long)]
    list_colors: bool,
}

impl Cli {
    fn sign_updates(&self) -> Vec<SettingsUpdate> {
        let mut updates = Vec::new();
        if let Some(text) = &self.text {
            updates.push(SettingsUpdate::Text(text.clone()));
        }
        if let Some(color) = self.color {
            updates.push(SettingsUpdate::Color(color));
        }
        if let Some(size) = self.size {
            updates.push(SettingsUpdate::FontSize(size));
        }
        if let Some(speed) = self.speed {
            updates.push(SettingsUpdate::Speed(speed));
        }
        if let Some(mode) = self.mode {
            updates.push(SettingsUpdate::Mode(mode));
        }
        updates
    }

    fn player_options(&self, mut options: PlayerOptions) -> PlayerOptions {
        if let Some(font) = &self.font {
            options.font = font.clone();
        }
        if self.no_splash {
            options.splash = false;
        }
        if let Some(fps) = self.fps {
            options.fps = fps;
        }
        options
    }
}

fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    // the terminal belongs to the sign, so logs only ever go to a file
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env("BLING_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(Mutex::new(file)).with_ansi(false).init();
    Ok(())
}

fn list_colors() {
    for preset in NeonPreset::all() {
        println!("{:8} {}", preset.to_string(), preset.color());
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.log_file.as_deref())?;
    if cli.list_colors {
        list_colors();
        return Ok(());
    }

    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::load_default()?,
    };
    let options = cli.player_options(file.player.clone());
    options.validate()?;
    let config = DisplayConfig::default()
        .apply_all(file.sign_updates())
        .context("invalid sign in config file")?
        .apply_all(cli.sign_updates())?;

    if !options.font.eq_ignore_ascii_case("standard") {
        init_figlet_fonts_and_warn();
    }
    let rasterizer = GlyphRasterizer::with_fallback(&options.font)?;
    let metrics = FigletMetrics::new(rasterizer, CellSize::FALLBACK);

    if cli.print_plan {
        let surface = query_surface().unwrap_or(SurfaceSize { columns: 80, rows: 24, cell: CellSize::FALLBACK });
        let mut metrics = metrics;
        metrics.set_cell(surface.cell);
        let report = PlanReport::build(&config, &metrics, surface)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    Player::new(config, metrics, &options).run(io::stdout())?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli)
}
