use clap::{Parser, ValueEnum};
use kontolib::{
    decode_latin1,
    error::{KontoError, Result},
    formats::{csv::Csv, json::Json, xml::Xml},
    traits::WriteFormat,
    DividerMode, Mt940, ParseTarget, ParserOptions,
};
use std::fs::File;
use std::io::{self, Read, Write};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutFmt {
    Json,
    Csv,
    Xml,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Divider {
    Auto,
    Crlf,
    AtAt,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Encoding {
    Latin1,
    Utf8,
}

#[derive(Parser, Debug)]
#[command(name = "konto", version, about = "Разбор выписок MT940/MT942")]
struct Cli {
    /// Входной файл (по умолчанию stdin)
    #[arg(short = 'i', long = "input")]
    input: Option<String>,

    /// Выходной файл (по умолчанию stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Формат выхода
    #[arg(long = "out-format", value_enum, default_value = "json")]
    out_format: OutFmt,

    /// Разделитель строк во входном тексте
    #[arg(long, value_enum, default_value = "auto")]
    divider: Divider,

    /// Кодировка входа
    #[arg(long, value_enum, default_value = "latin1")]
    encoding: Encoding,

    /// Представление результата
    #[arg(long, default_value = "days")]
    target: String,

    /// error, warn, info, debug, trace (иначе RUST_LOG, по умолчанию warn)
    #[arg(long = "log-level")]
    log_level: Option<LevelFilter>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level);

    let target: ParseTarget = cli.target.parse()?;

    let mut reader: Box<dyn Read> = match &cli.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;

    let text = match cli.encoding {
        Encoding::Latin1 => decode_latin1(&raw),
        Encoding::Utf8 => String::from_utf8_lossy(&raw).into_owned(),
    };

    let divider = match cli.divider {
        Divider::Auto => DividerMode::Auto,
        Divider::Crlf => DividerMode::Crlf,
        Divider::AtAt => DividerMode::AtAt,
    };
    let soa = Mt940::new(ParserOptions { divider }).parse_as(&text, target)?;
    info!(
        days = soa.days.len(),
        transactions = soa.transactions().count(),
        "statement parsed"
    );

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    match cli.out_format {
        OutFmt::Json => Json::write(&mut writer, &soa),
        OutFmt::Csv => Csv::write(&mut writer, &soa),
        OutFmt::Xml => Xml::write(&mut writer, &soa),
    }?;

    writer.flush().map_err(KontoError::from)
}

// stdout занят данными, поэтому логи идут в stderr
fn setup_logging(level: Option<LevelFilter>) {
    let filter = match level {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(terminal_log).init();
}
