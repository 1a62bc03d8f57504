use imeta_reader::{ImetaReader, Metadata, ReadOptions};
use std::env;

fn print_metadata(meta: &Metadata) {
    println!("  Format: {}", meta.format);

    let mut groups: Vec<_> = meta.groups().collect();
    groups.sort_by_key(|(name, _)| *name);
    for (name, group) in groups {
        println!("  [{}] {} tags", name, group.len());
        let mut tags: Vec<_> = group.iter().collect();
        tags.sort_by(|a, b| a.0.cmp(b.0));
        for (id, values) in tags {
            for value in values {
                println!("    {} ({}, count {}) = {}", id, value.value_type, value.count, value);
            }
        }
    }

    for block in &meta.resources {
        println!("  Resource block {:#04x} ({:?}): {} bytes", block.id, block.kind(), block.data.len());
    }
    for warning in &meta.warnings {
        println!("  Warning: {}", warning);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    let lenient = args.iter().any(|a| a == "--lenient");
    let paths: Vec<&String> = args.iter().skip(1).filter(|a| !a.starts_with('-')).collect();

    if paths.is_empty() {
        eprintln!("Usage: {} [-v] [--lenient] <image-file>...", args[0]);
        std::process::exit(1);
    }

    // Respect RUST_LOG if set, otherwise pick a level from the verbose flag
    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose { "imeta_reader=trace" } else { "imeta_reader=warn" }.to_string()
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let reader = ImetaReader::with_options(ReadOptions {
        recover_sections: lenient,
        ..ReadOptions::default()
    });

    let mut failed = false;
    for path in paths {
        println!("{}", path);
        match reader.read_path(path) {
            Ok(meta) => print_metadata(&meta),
            Err(e) => {
                eprintln!("{}: {}", path, e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
