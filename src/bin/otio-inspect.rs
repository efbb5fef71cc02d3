use otio_bridge::bindings::{composition, item, object, timeline};
use otio_bridge::logging::{init_logging, LogConfig};
use otio_bridge::{BridgeConfig, BridgeContext, BridgeError, ManagedObject, ProjectionPolicy};
use otio_native::SchemaKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Debug)]
struct Options {
    file: PathBuf,
    indent: Option<u32>,
    reuse_live: bool,
    dump: bool,
}

impl Options {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let prog = args.first().map(String::as_str).unwrap_or("otio-inspect");

        let mut file = None;
        let mut indent = None;
        let mut reuse_live = false;
        let mut dump = false;

        let mut rest = args.iter().skip(1);
        while let Some(arg) = rest.next() {
            match arg.as_str() {
                "--help" | "-h" => return Err(Self::usage(prog)),
                "--reuse-live" => reuse_live = true,
                "--dump" => dump = true,
                "--indent" => {
                    let value = rest
                        .next()
                        .ok_or_else(|| format!("--indent needs a value\n\n{}", Self::usage(prog)))?;
                    indent = Some(
                        value
                            .parse()
                            .map_err(|_| format!("Invalid indent: {}", value))?,
                    );
                }
                path if !path.starts_with("--") && file.is_none() => file = Some(PathBuf::from(path)),
                opt => return Err(format!("Unknown option: {}\n\n{}", opt, Self::usage(prog))),
            }
        }

        let file = file.ok_or_else(|| Self::usage(prog))?;
        Ok(Self {
            file,
            indent,
            reuse_live,
            dump,
        })
    }

    fn usage(prog: &str) -> String {
        format!(
            "otio-inspect - load a timeline file through the bridge and print its tree\n\n\
            USAGE:\n    {} [OPTIONS] <file.otio>\n\n\
            OPTIONS:\n    \
            -h, --help      Print help information\n    \
            --indent N      Indent for --dump (default from .otio-bridge.toml)\n    \
            --reuse-live    Reuse live wrappers when projecting\n    \
            --dump          Print the re-encoded JSON after the tree",
            prog
        )
    }
}

fn describe(wrapper: &ManagedObject) -> Result<String, BridgeError> {
    let class = wrapper.class();
    let name = if class.is_a_schema(SchemaKind::SerializableObjectWithMetadata) {
        object::name(wrapper)?
    } else {
        object::schema_name(wrapper)?
    };
    Ok(format!("{} '{}'", class.schema_name, name))
}

fn print_tree(node: &Arc<ManagedObject>, depth: usize) -> Result<(), BridgeError> {
    let pad = "  ".repeat(depth);
    let class = node.class();

    if class.is_a_schema(SchemaKind::Timeline) {
        let duration = item::duration(node)
            .map(|d| d.to_string())
            .unwrap_or_else(|e| format!("<{}>", e.kind()));
        println!("{}{} duration={}", pad, describe(node)?, duration);
        return print_tree(&timeline::tracks(node)?, depth + 1);
    }

    if class.is_a_schema(SchemaKind::Composition) {
        println!("{}{}", pad, describe(node)?);
        match composition::range_of_all_children(node) {
            Ok(ranges) => {
                for (child, range) in ranges {
                    println!("{}  @ {}", pad, range);
                    print_tree(&child, depth + 1)?;
                }
            }
            Err(e) => {
                println!("{}  <{}>", pad, e);
                for child in composition::children(node)? {
                    print_tree(&child, depth + 1)?;
                }
            }
        }
        return Ok(());
    }

    if class.is_a_schema(SchemaKind::SerializableCollection) {
        println!("{}{}", pad, describe(node)?);
        for child in composition::children(node)? {
            print_tree(&child, depth + 1)?;
        }
        return Ok(());
    }

    println!("{}{}", pad, describe(node)?);
    Ok(())
}

fn run(options: &Options, mut config: BridgeConfig) -> Result<(), BridgeError> {
    if options.reuse_live {
        config.registry.projection = ProjectionPolicy::ReuseLive;
    }
    let ctx = BridgeContext::new(config);

    let root = object::from_json_file(&ctx, &options.file)?;
    debug!(class = root.class().schema_name, "loaded");
    print_tree(&root, 0)?;

    if options.dump {
        println!("{}", object::to_json_string(&root, options.indent)?);
    }

    println!("{}", ctx.stats());
    drop(root);
    info!(stats = %ctx.stats(), "released");
    Ok(())
}

fn main() {
    let config = BridgeConfig::discover();
    let _guard = init_logging(LogConfig::from_config(&config.logging).with_env_overrides());

    let options = match Options::from_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    debug!(?options, "options");

    if let Err(e) = run(&options, config) {
        error!(kind = %e.kind(), category = ?e.category(), "inspect failed");
        eprintln!("{}: {}", options.file.display(), e);
        std::process::exit(1);
    }
}
