use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ringlet", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an avatar configuration to an encoded image.
    Render(RenderArgs),
    /// Print the built-in preset catalog as JSON.
    Presets,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input avatar configuration JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Square output size in pixels.
    #[arg(long, default_value_t = 800)]
    size: u32,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    format: FormatChoice,

    /// Portrait image file composited behind the ribbon.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Font file registered before rendering (for hosts without a system
    /// font matching the configured family).
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
}

impl From<FormatChoice> for ringlet::ExportFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Png => ringlet::ExportFormat::Png,
            FormatChoice::Jpeg => ringlet::ExportFormat::Jpeg,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Presets => cmd_presets(),
    }
}

fn read_config_json(path: &Path) -> anyhow::Result<ringlet::AvatarConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let config: ringlet::AvatarConfig =
        serde_json::from_reader(r).with_context(|| "parse avatar config JSON")?;
    Ok(config)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = read_config_json(&args.in_path)?;

    if let Some(image_path) = &args.image {
        let bytes = std::fs::read(image_path)
            .with_context(|| format!("read portrait '{}'", image_path.display()))?;
        let decoded = ringlet::decode_image(&bytes)?;
        config = config.with_image(Some(ringlet::ImageHandle::ready(decoded)));
    }

    config.validate()?;

    let size = ringlet::CanvasSize::new(args.size)?;
    let mut compositor = ringlet::Compositor::new(size)?;

    if let Some(font_path) = &args.font {
        let bytes = std::fs::read(font_path)
            .with_context(|| format!("read font '{}'", font_path.display()))?;
        let family = compositor.text_engine_mut().register_font(bytes)?;
        eprintln!("registered font family '{family}'");
    }

    compositor.set_layers(ringlet::build_layers(&config, size))?;
    let frame = compositor.frame();
    let bytes = ringlet::encode_frame(&frame, args.format.into())?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    let presets = ringlet::builtin_presets();
    println!("{}", serde_json::to_string_pretty(&presets)?);
    Ok(())
}
