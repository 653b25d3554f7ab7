use std::path::PathBuf;

use ambient_field::{FieldConfig, Simulation};
use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: ambient-field [--config FILE.json] [--size WxH] [--snapshot OUT.png] [--frames N] [--pointer X,Y]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    size: Option<(u32, u32)>,
    snapshot: Option<PathBuf>,
    frames: Option<u32>,
    pointer: Option<(f32, f32)>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .with_context(|| format!("{name} needs a value\n{USAGE}"))
            };
            match arg.as_str() {
                "--config" => parsed.config = Some(value("--config")?.into()),
                "--snapshot" => parsed.snapshot = Some(value("--snapshot")?.into()),
                "--size" => parsed.size = Some(parse_size(&value("--size")?)?),
                "--frames" => {
                    let frames = value("--frames")?;
                    parsed.frames = Some(
                        frames
                            .parse()
                            .with_context(|| format!("invalid frame count `{frames}`"))?,
                    );
                }
                "--pointer" => parsed.pointer = Some(parse_pointer(&value("--pointer")?)?),
                "-h" | "--help" => bail!("{USAGE}"),
                other => bail!("unknown argument `{other}`\n{USAGE}"),
            }
        }
        Ok(parsed)
    }
}

fn parse_size(text: &str) -> Result<(u32, u32)> {
    let (w, h) = text
        .split_once(['x', 'X'])
        .with_context(|| format!("size `{text}` is not WIDTHxHEIGHT"))?;
    let width = w.trim().parse().with_context(|| format!("invalid width `{w}`"))?;
    let height = h.trim().parse().with_context(|| format!("invalid height `{h}`"))?;
    Ok((width, height))
}

fn parse_pointer(text: &str) -> Result<(f32, f32)> {
    let (x, y) = text
        .split_once(',')
        .with_context(|| format!("pointer `{text}` is not X,Y"))?;
    let x = x.trim().parse().with_context(|| format!("invalid pointer x `{x}`"))?;
    let y = y.trim().parse().with_context(|| format!("invalid pointer y `{y}`"))?;
    Ok((x, y))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => FieldConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => FieldConfig::default(),
    };

    let mut sim = Simulation::new().with_config(config);
    if let Some((width, height)) = args.size {
        sim = sim.with_window_size(width, height);
    }
    if let Some((x, y)) = args.pointer {
        sim = sim.with_pointer(x, y);
    }

    tracing::info!("Ambient Field v{}", env!("CARGO_PKG_VERSION"));

    match args.snapshot {
        Some(path) => sim
            .save_snapshot(&path, args.frames.unwrap_or(120))
            .with_context(|| format!("writing snapshot to {}", path.display()))?,
        None => sim.run()?,
    }

    Ok(())
}
