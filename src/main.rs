//! symdoc: generate Markdown reference documentation from Swift symbol dumps.
//!
//! Reads the JSON produced by `sourcekitten doc` (or `sourcekitten structure`)
//! and writes one page per type, extension, enum, protocol and typealias,
//! plus a contents document:
//!
//! - **file mode**: `symdoc -o Docs/Reference -t Kit.json Extra.json`
//! - **stdin mode**: `sourcekitten doc --spm --module-name Kit | symdoc -l`

mod classify;
mod error;
mod index;
mod input;
mod model;
mod record;
mod render;
mod toc;
mod traverse;
mod writer;

use anyhow::{Context, Result};
use clap::Parser;
use index::DocumentIndex;
use input::Module;
use record::AccessLevel;
use render::{Page, RenderOptions};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT_DIRECTORY: &str = "Documentation/Reference";

#[derive(Parser)]
#[command(
    name = "symdoc",
    about = "Generate Markdown documentation from SourceKitten symbol JSON"
)]
struct Cli {
    /// Input JSON files, directories or glob patterns. If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_DIRECTORY)]
    output: PathBuf,

    /// Name of the root contents document
    #[arg(long, default_value = render::contents::DEFAULT_CONTENTS_FILENAME)]
    contents_filename: String,

    /// Module name, used with --module-name-path
    #[arg(long)]
    module_name: Option<String>,

    /// Include the module name as part of the output folder path
    #[arg(short = 'm', long, requires = "module_name")]
    module_name_path: bool,

    /// Delete previously generated documentation before writing
    #[arg(short = 'c', long)]
    clean: bool,

    /// Put methods, properties and enum cases inside collapsible blocks
    #[arg(short = 'l', long)]
    collapsible: bool,

    /// Generate a table of contents with members for each page
    #[arg(short = 't', long)]
    table_of_contents: bool,

    /// Skip declarations less visible than this level
    #[arg(long, value_enum, default_value_t = AccessLevel::Private)]
    min_acl: AccessLevel,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            collapsible_sections: self.collapsible,
            table_of_contents: self.table_of_contents,
        }
    }

    fn docs_path(&self) -> PathBuf {
        match (&self.module_name, self.module_name_path) {
            (Some(module), true) => self.output.join(module),
            _ => self.output.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let modules = if cli.files.is_empty() {
        stdin_modules(cli.module_name.as_deref())?
    } else {
        file_modules(&cli.files)?
    };

    let (pages, contents) = generate(&modules, cli.min_acl, cli.render_options())?;

    let docs_path = cli.docs_path();
    if cli.clean {
        writer::clean(&docs_path, &cli.contents_filename)?;
    }
    writer::write(&docs_path, &cli.contents_filename, &pages, &contents)
}

/// Logs go to stderr. `RUST_LOG` overrides the -v level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Build, finalize and render the whole index in memory. Nothing touches
/// the disk until this has succeeded.
fn generate(
    modules: &[Module],
    min_access: AccessLevel,
    options: RenderOptions,
) -> Result<(Vec<Page>, String)> {
    let mut index = DocumentIndex::new();
    let mut driver = traverse::Driver::new(&mut index, min_access);
    for module in modules {
        driver.process(module)?;
    }
    let stats = driver.finish();
    index.finalize()?;
    info!(
        appended = stats.appended,
        malformed = stats.malformed,
        filtered = stats.filtered,
        documents = index.len(),
        "index finalized"
    );

    if index.is_empty() {
        warn!("no documentable declarations found");
    }

    let pages = render::render_index(&index, &options)?;
    let contents = render::contents::render_contents(&pages);
    Ok((pages, contents))
}

/// stdin mode: one JSON document, named after --module-name if given.
fn stdin_modules(module_name: Option<&str>) -> Result<Vec<Module>> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("failed to read stdin")?;
    let origin = module_name.unwrap_or("stdin");
    Ok(input::parse_modules(origin, &text)?)
}

/// file mode: every matched file contributes its modules, in path order.
fn file_modules(patterns: &[String]) -> Result<Vec<Module>> {
    let paths = expand_globs(patterns)?;
    if paths.is_empty() {
        anyhow::bail!("no input files matched");
    }
    let mut modules = Vec::new();
    for path in &paths {
        modules.extend(input::load_file(path)?);
    }
    Ok(modules)
}

/// File extensions recognized as symbol dumps.
const SUPPORTED_EXTENSIONS: &[&str] = &["json"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for supported extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        // Try as glob
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn foo_module() -> Module {
        let text = json!([{
            "/src/Foo.swift": {
                "key.substructure": [
                    {
                        "key.kind": "source.lang.swift.decl.struct",
                        "key.name": "Foo",
                        "key.accessibility": "source.lang.swift.accessibility.public",
                        "key.substructure": [{
                            "key.kind": "source.lang.swift.decl.var.instance",
                            "key.name": "bar",
                            "key.parsed_declaration": "public var bar: Int",
                            "key.accessibility": "source.lang.swift.accessibility.public"
                        }]
                    },
                    {
                        "key.kind": "source.lang.swift.decl.extension",
                        "key.name": "Foo",
                        "key.substructure": [{
                            "key.kind": "source.lang.swift.decl.function.method.instance",
                            "key.name": "baz()",
                            "key.parsed_declaration": "public func baz()",
                            "key.accessibility": "source.lang.swift.accessibility.public"
                        }]
                    },
                    {
                        "key.kind": "source.lang.swift.decl.extension",
                        "key.name": "String"
                    }
                ]
            }
        }])
        .to_string();
        input::parse_modules("Kit", &text).unwrap().remove(0)
    }

    #[test]
    fn generate_merges_and_lists_pages() {
        let (pages, contents) =
            generate(&[foo_module()], AccessLevel::Private, RenderOptions::default()).unwrap();
        let paths: Vec<_> = pages.iter().map(|p| p.path.clone()).collect();
        assert_eq!(
            paths,
            [
                PathBuf::from("structs").join("Foo.md"),
                PathBuf::from("extensions").join("String.md"),
            ]
        );
        let foo = &pages[0].text;
        assert!(foo.find("`bar`").unwrap() < foo.find("`baz()`").unwrap());
        assert!(contents.contains("- [Foo](structs/Foo.md)"));
        assert!(contents.contains("- [String](extensions/String.md)"));
    }

    #[test]
    fn docs_path_with_module_name() {
        let cli = Cli::parse_from(["symdoc", "-o", "out", "--module-name", "Kit", "-m"]);
        assert_eq!(cli.docs_path(), PathBuf::from("out").join("Kit"));
        let cli = Cli::parse_from(["symdoc", "-o", "out", "--module-name", "Kit"]);
        assert_eq!(cli.docs_path(), PathBuf::from("out"));
    }

    #[test]
    fn supported_extensions() {
        assert!(has_supported_extension(Path::new("Kit.json")));
        assert!(!has_supported_extension(Path::new("Kit.swift")));
    }
}
