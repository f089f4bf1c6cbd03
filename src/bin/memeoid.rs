use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

const ENV_LOG: &str = "MEMEOID_LOG";

#[derive(Parser, Debug)]
#[command(name = "memeoid", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding source GIFs (overrides config and environment).
    #[arg(long, global = true)]
    sources: Option<PathBuf>,

    /// Directory receiving generated memes (overrides config and environment).
    #[arg(long, global = true)]
    memes: Option<PathBuf>,

    /// Caption font family or font file path.
    #[arg(long, global = true)]
    font: Option<String>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available source GIFs.
    List(ListArgs),
    /// Generate (or fetch from cache) a captioned GIF.
    Meme(MemeArgs),
    /// Render a JPEG preview of a source's first frame.
    Preview(PreviewArgs),
    /// Print the artifact id of a query string.
    Id(IdArgs),
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Print a JSON array instead of one name per line.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct MemeArgs {
    /// Source GIF name.
    #[arg(long, required_unless_present = "query", conflicts_with = "query")]
    from: Option<String>,

    /// Top caption.
    #[arg(long)]
    top: Option<String>,

    /// Bottom caption.
    #[arg(long)]
    bottom: Option<String>,

    /// Raw query string, e.g. `from=earth.gif&top=hello`.
    #[arg(long)]
    query: Option<String>,

    /// Also copy the artifact to this path.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Source GIF name.
    #[arg(long)]
    from: String,

    /// Preview width in pixels.
    #[arg(long)]
    width: u32,

    /// Preview height in pixels.
    #[arg(long)]
    height: u32,

    /// Top caption.
    #[arg(long)]
    top: Option<String>,

    /// Bottom caption.
    #[arg(long)]
    bottom: Option<String>,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct IdArgs {
    /// Raw query string.
    #[arg(long)]
    query: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.common.verbose)?;

    match cli.cmd {
        Command::List(args) => cmd_list(&cli.common, args),
        Command::Meme(args) => cmd_meme(&cli.common, args),
        Command::Preview(args) => cmd_preview(&cli.common, args),
        Command::Id(args) => cmd_id(args),
    }
}

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let level = match std::env::var(ENV_LOG) {
        Ok(v) => v
            .parse::<tracing::Level>()
            .with_context(|| format!("parse {ENV_LOG}='{v}'"))?,
        Err(_) => match verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        },
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(common: &CommonArgs) -> anyhow::Result<memeoid::MemeConfig> {
    let mut config = match &common.config {
        Some(path) => memeoid::MemeConfig::from_json_file(path)?,
        None => memeoid::MemeConfig::default(),
    };
    config.apply_env()?;
    if let Some(dir) = &common.sources {
        config.source_dir = dir.clone();
    }
    if let Some(dir) = &common.memes {
        config.artifact_dir = dir.clone();
    }
    if let Some(font) = &common.font {
        config.font = font.clone();
    }
    config.validate()?;
    Ok(config)
}

fn cmd_list(common: &CommonArgs, args: ListArgs) -> anyhow::Result<()> {
    let config = load_config(common)?;
    let gateway = memeoid::FsGateway::new(&config.source_dir, &config.artifact_dir);
    let names = memeoid::StorageGateway::list_sources(&gateway)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

fn cmd_meme(common: &CommonArgs, args: MemeArgs) -> anyhow::Result<()> {
    let request = match (&args.query, &args.from) {
        (Some(query), _) => memeoid::MemeRequest::from_query(query)?,
        (None, Some(from)) => {
            memeoid::MemeRequest::new(from, args.top.as_deref(), args.bottom.as_deref())?
        }
        (None, None) => anyhow::bail!("either --from or --query is required"),
    };

    let config = load_config(common)?;
    let service = memeoid::MemeService::from_config(&config)?;
    let artifact = service.meme(&request)?;

    if let Some(out) = &args.out {
        create_parent_dir(out)?;
        std::fs::copy(artifact.location().as_path(), out)
            .with_context(|| format!("copy artifact to '{}'", out.display()))?;
    }

    println!("{}", artifact.url());
    eprintln!("wrote {}", artifact.location().as_path().display());
    Ok(())
}

fn cmd_preview(common: &CommonArgs, args: PreviewArgs) -> anyhow::Result<()> {
    let request = memeoid::PreviewRequest::new(
        &args.from,
        args.width,
        args.height,
        args.top.as_deref(),
        args.bottom.as_deref(),
    )?;

    let config = load_config(common)?;
    let service = memeoid::MemeService::from_config(&config)?;
    let still = service.preview(&request)?;

    create_parent_dir(&args.out)?;
    std::fs::write(&args.out, &still.bytes)
        .with_context(|| format!("write preview '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} ({}x{}, {}, sha256={})",
        args.out.display(),
        still.width,
        still.height,
        still.content_type,
        memeoid::sha256_hex(&still.bytes)
    );
    Ok(())
}

fn cmd_id(args: IdArgs) -> anyhow::Result<()> {
    let params = memeoid::QueryParams::parse(&args.query);
    println!("{}", memeoid::Identity::new().for_params(&params));
    Ok(())
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
