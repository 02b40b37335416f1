use monogram::raster::{RasterError, RasterOptions};
use monogram::{AvatarConfig, AvatarGenerator, Capabilities, Rgb};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Avatar(monogram::Error),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Avatar(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<monogram::Error> for CliError {
    fn from(value: monogram::Error) -> Self {
        Self::Avatar(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Source,
    Svg,
    Png,
    Jpeg,
    Info,
    Color,
    Initials,
    Decode,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    words: Vec<String>,
    width: Option<u32>,
    height: Option<u32>,
    config: Option<String>,
    no_font: bool,
    pretty: bool,
    verbose: bool,
    scale: f32,
    background: Option<String>,
    out: Option<String>,
}

#[derive(Serialize)]
struct InfoOut<'a> {
    name: &'a str,
    initials: String,
    color: Rgb,
    background: Rgb,
    foreground: Rgb,
    size: u32,
}

fn usage() -> &'static str {
    "monogram-cli\n\
\n\
USAGE:\n\
  monogram-cli [source] [--width <px>] [--height <px>] [--config <path>] [--no-font] [<name>...|-]\n\
  monogram-cli svg [--width <px>] [--height <px>] [--config <path>] [--no-font] [--out <path>] [<name>...|-]\n\
  monogram-cli png|jpg [--size <px>] [--scale <n>] [--background <css-color>] [--config <path>] [--out <path>] [<name>...|-]\n\
  monogram-cli info [--pretty] [--width <px>] [--height <px>] [--config <path>] [<name>...|-]\n\
  monogram-cli color [--config <path>] [<name>...|-]\n\
  monogram-cli initials [<name>...|-]\n\
  monogram-cli decode [<data-uri>|-]\n\
\n\
NOTES:\n\
  - If no name is given or it is '-', the name is read from stdin.\n\
  - A name like 'Karl Benson (KA)' forces the initials to KA.\n\
  - source prints the data:image/svg+xml;base64 URI to stdout.\n\
  - PNG/JPG output defaults to ./avatar.png or ./avatar.jpg; use --out - for stdout.\n\
  - --verbose logs diagnostics to stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Source,
        scale: 1.0,
        ..Default::default()
    };

    fn px(value: Option<&String>) -> Result<u32, CliError> {
        let Some(value) = value else {
            return Err(CliError::Usage(usage()));
        };
        value.parse::<u32>().map_err(|_| CliError::Usage(usage()))
    }

    let mut it = argv.iter().skip(1).peekable();
    let mut saw_command = false;
    while let Some(a) = it.next() {
        let command = match a.as_str() {
            "source" => Some(Command::Source),
            "svg" => Some(Command::Svg),
            "png" => Some(Command::Png),
            "jpg" | "jpeg" => Some(Command::Jpeg),
            "info" => Some(Command::Info),
            "color" => Some(Command::Color),
            "initials" => Some(Command::Initials),
            "decode" => Some(Command::Decode),
            _ => None,
        };
        if let Some(command) = command {
            if !saw_command && args.words.is_empty() {
                args.command = command;
                saw_command = true;
                continue;
            }
        }

        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "--no-font" => args.no_font = true,
            "--verbose" | "-v" => args.verbose = true,
            "--width" => args.width = Some(px(it.next())?),
            "--height" => args.height = Some(px(it.next())?),
            "--size" => {
                let size = px(it.next())?;
                args.width = Some(size);
                args.height = Some(size);
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.scale.is_finite() && args.scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                args.words.extend(it.by_ref().cloned());
            }
            "-" => args.words.push("-".to_string()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            word => args.words.push(word.to_string()),
        }
    }

    Ok(args)
}

fn read_input(words: &[String]) -> Result<String, CliError> {
    match words {
        [] => read_stdin(),
        [only] if only == "-" => read_stdin(),
        _ => Ok(words.join(" ")),
    }
}

fn read_stdin() -> Result<String, CliError> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            println!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_bytes(bytes: &[u8], out: Option<&str>, default_path: &str) -> Result<(), CliError> {
    match out.unwrap_or(default_path) {
        "-" => {
            std::io::stdout().lock().write_all(bytes)?;
            Ok(())
        }
        path => {
            std::fs::write(path, bytes)?;
            tracing::info!(path, bytes = bytes.len(), "wrote avatar");
            Ok(())
        }
    }
}

fn build_generator(args: &Args) -> Result<AvatarGenerator, CliError> {
    let config = match args.config.as_deref() {
        Some(path) => AvatarConfig::from_path(Path::new(path))?,
        None => AvatarConfig::default(),
    };
    let capabilities = Capabilities {
        base64: true,
        font_delivery: !args.no_font,
    };
    Ok(AvatarGenerator::new(config, capabilities)?)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let input = read_input(&args.words)?;

    // Built per command so `decode` and `initials` never read the config.
    let load_generator = || build_generator(&args);
    let raster = RasterOptions {
        scale: args.scale,
        background: args.background.clone(),
        ..Default::default()
    };

    match args.command {
        Command::Decode => {
            let svg = monogram::decode_source(&input)?;
            write_text(&svg, args.out.as_deref())
        }
        Command::Initials => write_text(&monogram::initials(&input), args.out.as_deref()),
        Command::Color => {
            let generator = load_generator()?;
            let color = monogram::color::color_for_name_with_base(
                &input,
                generator.config().base_color,
                0,
            );
            write_text(&color.to_string(), args.out.as_deref())
        }
        Command::Source => {
            let generator = load_generator()?;
            if (args.width.is_some() || args.height.is_some()) && args.width != args.height {
                tracing::warn!("avatar height must match its width");
            }
            let uri = generator.source(&input, args.width, args.height);
            write_text(&uri, args.out.as_deref())
        }
        Command::Svg => {
            let generator = load_generator()?;
            let svg = generator.svg(&input, args.width, args.height);
            write_text(&svg, args.out.as_deref())
        }
        Command::Png => {
            let generator = load_generator()?;
            let size = Some(generator.size_for(args.width, args.height));
            let bytes = monogram::raster::render_png(&generator, &input, size, &raster)?;
            write_bytes(&bytes, args.out.as_deref(), "avatar.png")
        }
        Command::Jpeg => {
            let generator = load_generator()?;
            let size = Some(generator.size_for(args.width, args.height));
            let bytes = monogram::raster::render_jpeg(&generator, &input, size, &raster)?;
            write_bytes(&bytes, args.out.as_deref(), "avatar.jpg")
        }
        Command::Info => {
            let generator = load_generator()?;
            let cfg = generator.config();
            let out = InfoOut {
                name: &input,
                initials: monogram::initials(&input),
                color: monogram::color::color_for_name_with_base(&input, cfg.base_color, 0),
                background: monogram::color::color_for_name_with_base(
                    &input,
                    cfg.base_color,
                    cfg.background_modifier,
                ),
                foreground: monogram::color::color_for_name_with_base(
                    &input,
                    cfg.base_color,
                    cfg.foreground_modifier,
                ),
                size: generator.size_for(args.width, args.height),
            };
            let mut stdout = std::io::stdout().lock();
            if args.pretty {
                serde_json::to_writer_pretty(&mut stdout, &out)?;
            } else {
                serde_json::to_writer(&mut stdout, &out)?;
            }
            writeln!(stdout)?;
            Ok(())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
