//! wrapkit CLI - hierarchy queries, property synthesis, and overload planning

mod config;
mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::json;

use wrapkit_ast::ClassDescriptor;
use wrapkit_hierarchy::{parse_type, Database, DatabaseBuilder, HierarchyError, RecordError};
use wrapkit_overload::{plan_class, ClassPlan};
use wrapkit_properties::{ClassProperties, PropertySynthesizer};

use config::{Overrides, WrapSettings};
use logging::LogFormat;

#[derive(Parser)]
#[command(name = "wrapkit")]
#[command(about = "Plan language bindings for a native class hierarchy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    /// Log wrapkit events to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log line format
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(flatten)]
    overrides: OverrideArgs,
}

#[derive(Args)]
struct OverrideArgs {
    /// Hierarchy flag that excludes a type from wrapping
    #[arg(long, global = true)]
    exclude_flag: Option<String>,
    /// Leave legacy methods out
    #[arg(long, global = true)]
    no_legacy: bool,
    /// Let protected methods contribute to properties
    #[arg(long, global = true)]
    protected: bool,
    /// Don't plan constructors
    #[arg(long, global = true)]
    no_constructors: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load hierarchy files or directories and report what was found
    Hierarchy {
        /// Hierarchy files or directories of `*.txt` files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Include every entity in the output
        #[arg(long)]
        dump: bool,
    },
    /// Check whether a class derives from a base, through templates and aliases
    Isa {
        #[arg(long = "hierarchy", required = true)]
        hierarchy: Vec<PathBuf>,
        /// Class, possibly with template arguments, e.g. `vtkVector3d` or `vtkVector<float, 2>`
        class: String,
        /// Base class name
        base: String,
    },
    /// Expand typedefs in a type written in alias-target syntax
    Expand {
        #[arg(long = "hierarchy", required = true)]
        hierarchy: Vec<PathBuf>,
        /// Class scope to resolve names in
        #[arg(long)]
        scope: Option<String>,
        /// Type, e.g. `*vtkIdType` or `[3]vtkMapper::Vector3`
        #[arg(value_name = "TYPE")]
        ty: String,
    },
    /// Synthesize properties for one class description
    Properties {
        #[arg(long)]
        class: PathBuf,
        #[arg(long = "hierarchy")]
        hierarchy: Vec<PathBuf>,
    },
    /// Plan overload dispatch for one class description
    Overloads {
        #[arg(long)]
        class: PathBuf,
        #[arg(long = "hierarchy")]
        hierarchy: Vec<PathBuf>,
    },
    /// Properties and dispatch plans for many classes against one hierarchy
    Plan {
        #[arg(long = "hierarchy", required = true)]
        hierarchy: Vec<PathBuf>,
        /// Class description files
        #[arg(required = true)]
        classes: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose, cli.log_format);

    let overrides = Overrides {
        exclude_flag: cli.overrides.exclude_flag,
        no_legacy: cli.overrides.no_legacy,
        protected_properties: cli.overrides.protected,
        no_constructors: cli.overrides.no_constructors,
    };
    let settings = match WrapSettings::resolve(cli.config.as_deref(), &overrides) {
        Ok(settings) => settings,
        Err(e) => fail(&e.to_string()),
    };
    let pretty = cli.pretty;

    match cli.command {
        Commands::Hierarchy { paths, dump } => cmd_hierarchy(&paths, dump, pretty),
        Commands::Isa {
            hierarchy,
            class,
            base,
        } => cmd_isa(&hierarchy, &class, &base, pretty),
        Commands::Expand {
            hierarchy,
            scope,
            ty,
        } => cmd_expand(&hierarchy, scope.as_deref(), &ty, pretty),
        Commands::Properties { class, hierarchy } => {
            cmd_properties(&class, &hierarchy, &settings, pretty)
        }
        Commands::Overloads { class, hierarchy } => {
            cmd_overloads(&class, &hierarchy, &settings, pretty)
        }
        Commands::Plan { hierarchy, classes } => cmd_plan(&hierarchy, &classes, &settings, pretty),
    }
}

fn cmd_hierarchy(paths: &[PathBuf], dump: bool, pretty: bool) {
    let db = load_hierarchy(paths);
    let summary = db.summary();
    for warning in summary.warnings {
        eprintln!("warning[{}]: {}", warning.code(), warning);
    }

    if dump {
        let entities: Vec<_> = db.iter().collect();
        print_json(&json!({ "summary": summary, "entities": entities }), pretty);
    } else {
        print_json(&summary, pretty);
    }
}

fn cmd_isa(hierarchy: &[PathBuf], class: &str, base: &str, pretty: bool) {
    let db = load_hierarchy(hierarchy);
    let matched = db.is_a(class, base);
    print_json(
        &json!({ "class": class, "base": base, "match": matched }),
        pretty,
    );
}

fn cmd_expand(hierarchy: &[PathBuf], scope: Option<&str>, text: &str, pretty: bool) {
    let db = load_hierarchy(hierarchy);
    let mut ty = match parse_type(text) {
        Ok(ty) => ty,
        Err(e) => {
            report_record_error("<type>", text, &e);
            std::process::exit(1);
        }
    };
    let changed = match db.expand_typedef(&mut ty, scope) {
        Ok(changed) => changed,
        Err(e) => fail(&format!("error[{}]: {}", e.code(), e)),
    };
    print_json(
        &json!({ "display": ty.to_string(), "changed": changed, "type": ty }),
        pretty,
    );
}

fn cmd_properties(class: &Path, hierarchy: &[PathBuf], settings: &WrapSettings, pretty: bool) {
    let db = optional_hierarchy(hierarchy);
    let class = read_class(class);
    print_json(&synthesize(&class, db.as_ref(), settings), pretty);
}

fn cmd_overloads(class: &Path, hierarchy: &[PathBuf], settings: &WrapSettings, pretty: bool) {
    let db = optional_hierarchy(hierarchy);
    let class = read_class(class);
    print_json(&plan_class(&class, db.as_ref(), &settings.overloads()), pretty);
}

#[derive(Serialize)]
struct ClassOutput {
    class_name: String,
    properties: ClassProperties,
    overloads: ClassPlan,
}

fn cmd_plan(hierarchy: &[PathBuf], classes: &[PathBuf], settings: &WrapSettings, pretty: bool) {
    let db = load_hierarchy(hierarchy);
    let overload_settings = settings.overloads();

    let results: Vec<Result<ClassOutput, String>> = classes
        .par_iter()
        .map(|path| {
            let class = parse_class(path)?;
            Ok(ClassOutput {
                class_name: class.name.clone(),
                properties: synthesize(&class, Some(&db), settings),
                overloads: plan_class(&class, Some(&db), &overload_settings),
            })
        })
        .collect();

    let mut outputs = Vec::new();
    let mut all_ok = true;
    for result in results {
        match result {
            Ok(output) => outputs.push(output),
            Err(message) => {
                eprintln!("{message}");
                all_ok = false;
            }
        }
    }
    tracing::debug!(classes = outputs.len(), "planned classes");

    print_json(&outputs, pretty);
    if !all_ok {
        std::process::exit(1);
    }
}

fn synthesize(class: &ClassDescriptor, db: Option<&Database>, settings: &WrapSettings) -> ClassProperties {
    let synthesizer = PropertySynthesizer::new(&settings.properties());
    match db {
        Some(db) => synthesizer.with_database(db).synthesize(class),
        None => synthesizer.synthesize(class),
    }
}

fn optional_hierarchy(paths: &[PathBuf]) -> Option<Database> {
    (!paths.is_empty()).then(|| load_hierarchy(paths))
}

/// Load every source; any source that fails is reported and the process
/// exits once all of them have been tried
fn load_hierarchy(paths: &[PathBuf]) -> Database {
    let mut builder = DatabaseBuilder::new();
    let mut failed = Vec::new();

    for path in paths {
        if path.is_dir() {
            match builder.load_dir(path) {
                Ok(report) => failed.extend(report.failed),
                Err(e) => failed.push(e),
            }
        } else if let Err(e) = builder.load_file(path) {
            failed.push(e);
        }
    }

    if !failed.is_empty() {
        for err in &failed {
            report_hierarchy_error(err);
        }
        std::process::exit(1);
    }
    builder.build()
}

fn parse_class(path: &Path) -> Result<ClassDescriptor, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("Invalid class description {}: {}", path.display(), e))
}

fn read_class(path: &Path) -> ClassDescriptor {
    match parse_class(path) {
        Ok(class) => class,
        Err(message) => fail(&message),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => fail(&format!("Error serializing output: {}", e)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn report_hierarchy_error(error: &HierarchyError) {
    if let HierarchyError::Record {
        source_name,
        error: record,
        ..
    } = error
    {
        if let Ok(source) = fs::read_to_string(source_name) {
            report_record_error(source_name, &source, record);
            return;
        }
    }
    eprintln!("error[{}]: {}", error.code(), error);
}

fn report_record_error(source_name: &str, source: &str, error: &RecordError) {
    let span = error.span();
    let id = source_name.to_string();
    let printed = Report::build(ReportKind::Error, id.clone(), span.start)
        .with_code(error.code())
        .with_message(error.to_string())
        .with_label(
            Label::new((id.clone(), span.start..span.end))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((id, Source::from(source)));
    if printed.is_err() {
        eprintln!("error[{}]: {}", error.code(), error);
    }
}
