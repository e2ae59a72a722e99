use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::info;

use device_parsers as dp;
use device_parsers::{AttributeSchema, DeviceParser, MetricsHub, ParserRegistry, TypeTag};

#[derive(Parser, Debug)]
#[command(
    name = "hxp",
    version,
    about = "Appliance parser resolution CLI",
    disable_help_subcommand = true
)]
struct Cli {
    /// Registry config (YAML); the builtin entries and rules are used when absent
    #[arg(long, global = true, env = "HXP_REGISTRY_CONFIG")]
    config: Option<PathBuf>,

    /// Print Prometheus metrics after the command
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the parser for a device
    Resolve {
        /// Device type code (e.g. 015)
        device_type: String,
        /// Feature code (e.g. 50.2f); pass "" for devices that report none
        feature_code: String,
        /// Print JSON instead of a table
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// List registry entries and fallback rules
    List,
    /// Show one bundled parser table
    Show {
        /// Parser name (e.g. dishwasher_015_50_2f)
        parser: String,
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Validate a parser table file and the active registry config
    Validate {
        /// YAML parser table to check
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Label raw telemetry with the device's schemas
    Decode {
        device_type: String,
        feature_code: String,
        /// Raw fields as key=value
        #[arg(required = true)]
        fields: Vec<String>,
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Validate a value and print the write command for it
    Write {
        device_type: String,
        feature_code: String,
        key: String,
        value: String,
    },
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let registry = dp::load_registry(cli.config.as_deref())?;
    let hub = if cli.metrics {
        let hub = MetricsHub::new().map_err(anyhow::Error::msg)?;
        hub.record_registry(&registry);
        Some(hub)
    } else {
        None
    };

    match cli.command {
        Commands::Resolve {
            device_type,
            feature_code,
            json,
        } => resolve_device(&registry, hub.as_ref(), &device_type, &feature_code, json)?,
        Commands::List => list_registry(&registry),
        Commands::Show { parser, json } => show_parser(&registry, &parser, json)?,
        Commands::Validate { file } => validate(&registry, file.as_deref())?,
        Commands::Decode {
            device_type,
            feature_code,
            fields,
            json,
        } => decode_fields(
            &registry,
            hub.as_ref(),
            &device_type,
            &feature_code,
            &fields,
            json,
        )?,
        Commands::Write {
            device_type,
            feature_code,
            key,
            value,
        } => write_command(
            &registry,
            hub.as_ref(),
            &device_type,
            &feature_code,
            &key,
            &value,
        )?,
    }

    if let Some(hub) = hub {
        print!("{}", hub.encode_text());
    }
    Ok(())
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_parser<'a>(
    registry: &'a ParserRegistry,
    hub: Option<&MetricsHub>,
    device_type: &str,
    feature_code: &str,
) -> Result<dp::Resolution<'a>> {
    let outcome = registry.resolve_with_path(device_type, feature_code);
    if let Some(h) = hub {
        h.record_resolution(&outcome);
    }
    Ok(outcome?)
}

fn resolve_device(
    registry: &ParserRegistry,
    hub: Option<&MetricsHub>,
    device_type: &str,
    feature_code: &str,
    json: bool,
) -> Result<()> {
    let r = resolve_parser(registry, hub, device_type, feature_code)?;
    if json {
        let out = serde_json::json!({
            "parser": r.variant,
            "path": r.path.as_str(),
            "device_type": r.parser.device_type(),
            "feature_code": r.parser.feature_code(),
            "attributes": r.parser.attributes(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}\tpath={}", r.variant, r.path.as_str());
        print_table(r.parser);
    }
    Ok(())
}

fn list_registry(registry: &ParserRegistry) {
    for e in registry.entries() {
        println!("{}\t{:?}\t{}", e.device_type, e.feature_code, e.parser);
    }
    let rules = registry.rules();
    for s in &rules.special_cases {
        println!(
            "special\t{}\t{:?}\t{}",
            s.device_type, s.feature_code, s.parser
        );
    }
    for l in &rules.legacy {
        println!("legacy\t{}\t{}", l.device_type, l.parser);
    }
    println!(
        "generic\t{}\t{}",
        rules.generic_whitelist.join(","),
        rules.generic
    );
}

fn show_parser(registry: &ParserRegistry, name: &str, json: bool) -> Result<()> {
    let variant = dp::ParserVariant::from_name(name)
        .ok_or_else(|| anyhow::anyhow!("unknown parser: {name}"))?;
    let parser = registry.parser(variant);
    if json {
        println!("{}", serde_json::to_string_pretty(parser)?);
    } else {
        println!(
            "{variant}\tdevice_type={}\tfeature_code={:?}",
            parser.device_type(),
            parser.feature_code()
        );
        print_table(parser);
    }
    Ok(())
}

fn validate(registry: &ParserRegistry, file: Option<&Path>) -> Result<()> {
    if let Some(f) = file {
        let parser = dp::load_parser_file(f)?;
        println!(
            "ok: {} ({}/{:?}, {} attributes)",
            f.display(),
            parser.device_type(),
            parser.feature_code(),
            parser.attributes().len()
        );
    }
    println!(
        "ok: registry ({} entries, {} parsers)",
        registry.entries().len(),
        registry.parsers().count()
    );
    Ok(())
}

fn decode_fields(
    registry: &ParserRegistry,
    hub: Option<&MetricsHub>,
    device_type: &str,
    feature_code: &str,
    fields: &[String],
    json: bool,
) -> Result<()> {
    let r = resolve_parser(registry, hub, device_type, feature_code)?;
    let pairs = fields
        .iter()
        .map(|f| {
            f.split_once('=')
                .ok_or_else(|| anyhow::anyhow!("expected key=value, got {f:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let rec = dp::label_telemetry(r.parser, pairs, Some(OffsetDateTime::now_utc()));
    if let Some(h) = hub {
        h.record_telemetry(&rec);
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&rec)?);
        return Ok(());
    }
    for (key, value) in &rec.fields {
        println!("{key}\t{value}");
    }
    for (key, reason) in &rec.rejected {
        println!("{key}\trejected: {reason}");
    }
    for key in &rec.unmapped {
        println!("{key}\tunmapped");
    }
    Ok(())
}

fn write_command(
    registry: &ParserRegistry,
    hub: Option<&MetricsHub>,
    device_type: &str,
    feature_code: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    let r = resolve_parser(registry, hub, device_type, feature_code)?;
    let cmd = dp::build_write_command(r.parser, key, value)?;
    info!(device_type, feature_code, key = %cmd.key, value = %cmd.value, "write command built");
    println!("{}", serde_json::to_string(&cmd)?);
    Ok(())
}

fn print_table(parser: &DeviceParser) {
    for schema in parser.attributes().values() {
        println!(
            "  {}\t{}\t{}\t{}\t{}",
            schema.key(),
            schema.type_tag(),
            schema.read_write(),
            domain(schema),
            schema.name()
        );
    }
}

fn domain(schema: &AttributeSchema) -> String {
    match schema.type_tag() {
        TypeTag::Enum => schema
            .value_map()
            .map(|m| {
                m.iter()
                    .map(|(raw, label)| format!("{raw}={label}"))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default(),
        TypeTag::Number => schema
            .value_range()
            .map(|r| format!("{r} step {}", schema.step()))
            .unwrap_or_default(),
        TypeTag::Boolean => "0,1".to_string(),
        TypeTag::String => "text".to_string(),
    }
}
