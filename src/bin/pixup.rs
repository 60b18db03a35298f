use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pixup", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cut a square region out of an image and write it as a JPEG thumbnail.
    Crop(CropArgs),
    /// Upload a file and print the stored asset URL.
    Upload(UploadArgs),
}

#[derive(Parser, Debug)]
struct CropArgs {
    /// Input image path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    /// Preview width the region coordinates refer to. Defaults to a fit
    /// of the image into 800x600.
    #[arg(long, requires = "display_h")]
    display_w: Option<f64>,

    /// Preview height the region coordinates refer to.
    #[arg(long, requires = "display_w")]
    display_h: Option<f64>,

    /// Selection left edge in preview pixels. Defaults to the centered
    /// square when x/y/size are omitted.
    #[arg(long, requires = "y")]
    x: Option<f64>,

    /// Selection top edge in preview pixels.
    #[arg(long, requires = "size")]
    y: Option<f64>,

    /// Selection side length in preview pixels.
    #[arg(long, requires = "x")]
    size: Option<f64>,

    /// Output edge length in pixels.
    #[arg(long, default_value_t = 300)]
    output_size: u32,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = 90)]
    quality: u8,
}

#[derive(Parser, Debug)]
struct UploadArgs {
    /// File to upload.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Endpoint path appended to the base URL (e.g. "upload/logo").
    #[arg(long)]
    endpoint: String,

    /// Base API URL. Overrides PIXUP_API_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Multipart field name.
    #[arg(long)]
    field: Option<String>,

    /// JSON response field holding the asset URL.
    #[arg(long)]
    url_field: Option<String>,

    /// Upload ceiling in megabytes.
    #[arg(long)]
    max_mb: Option<u64>,

    /// Accept documents (PDF) in addition to images.
    #[arg(long)]
    document: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Crop(args) => cmd_crop(args),
        Command::Upload(args) => cmd_upload(args),
    }
}

fn cmd_crop(args: CropArgs) -> anyhow::Result<()> {
    let image = pixup::load_image(&args.in_path)?;
    let natural = pixup::natural_size(&image);

    let display = match (args.display_w, args.display_h) {
        (Some(w), Some(h)) => pixup::DisplaySize::new(w, h)?,
        _ => pixup::fit_within(natural, pixup::DisplaySize::new(800.0, 600.0)?),
    };

    let mut session = pixup::CropSession::with_display(natural, display);
    if let (Some(x), Some(y), Some(size)) = (args.x, args.y, args.size) {
        session.select(x, y, size)?;
    }

    let settings = pixup::EncodeSettings::default()
        .with_output_size(args.output_size)
        .with_jpeg_quality(args.quality);
    let jpeg = pixup::render_crop(&image, session.region(), session.display(), settings)?;

    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }
    std::fs::write(&args.out, &jpeg)
        .with_context(|| format!("write jpeg '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_upload(args: UploadArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let filename = args
        .in_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.bin")
        .to_string();

    let mut config = pixup::EnvConfig::from_env()?;
    if let Some(base_url) = args.base_url {
        config.base_url = Some(base_url);
    }
    if let Some(field) = args.field {
        config.field_name = field;
    }
    if let Some(url_field) = args.url_field {
        config.url_field = url_field;
    }
    if let Some(max_mb) = args.max_mb {
        config.max_upload_mb = max_mb;
    }

    let target = if args.document {
        config.document_target(&args.endpoint)?
    } else {
        config.image_target(&args.endpoint)?
    };

    let client = pixup::UploadClient::new();
    let url = client.upload(&bytes, &filename, &target)?;
    println!("{url}");
    Ok(())
}
