//! Slang CLI tool using safe Rust API

use clap::{Parser, Subcommand};
use slangrs::reflect::{ParameterCategory, TypeKind, TypeLayout, VariableLayout};
use slangrs::{
    CompileTarget, CompilerOptions, ComponentType, Downcast, GlobalSession, Module, OptimizationLevel, Session,
    SessionBuilder, Stage, TargetDescBuilder,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "slangrs")]
#[command(about = "Slang shader compiler command-line tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a Slang module to target code
    Compile {
        /// Input Slang file
        input: PathBuf,

        /// Target format (e.g., spirv, glsl, hlsl, metal, wgsl)
        #[arg(short, long)]
        target: CompileTarget,

        /// Target profile (e.g., spirv_1_5, sm_6_5)
        #[arg(short, long)]
        profile: Option<String>,

        /// Entry point to include (default: every entry point in the module)
        #[arg(short, long = "entry")]
        entries: Vec<String>,

        /// Include search paths
        #[arg(short = 'I', long = "include", value_name = "DIR")]
        includes: Vec<PathBuf>,

        /// Preprocessor defines (NAME=VALUE or NAME)
        #[arg(short = 'D', long = "define", value_name = "NAME=VALUE")]
        defines: Vec<String>,

        /// Optimization level 0-3
        #[arg(short = 'O', long, default_value = "1", value_parser = clap::value_parser!(u8).range(0..=3))]
        optimize: u8,

        /// Output file (default: <input> with the target's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show parameter, entry point and struct layouts
    Reflect {
        /// Input Slang file
        input: PathBuf,

        /// Target format the layout is computed for
        #[arg(short, long, default_value = "spirv")]
        target: CompileTarget,

        /// Target profile (e.g., spirv_1_5, sm_6_5)
        #[arg(short, long)]
        profile: Option<String>,
    },
}

fn parse_define(s: &str) -> (String, String) {
    s.split_once('=')
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .unwrap_or_else(|| (s.to_string(), "1".to_string()))
}

fn extension(target: CompileTarget) -> &'static str {
    match target {
        CompileTarget::SpirV => "spv",
        CompileTarget::SpirVAsm => "spvasm",
        CompileTarget::Glsl => "glsl",
        CompileTarget::Hlsl => "hlsl",
        CompileTarget::Dxbc => "dxbc",
        CompileTarget::Dxil => "dxil",
        CompileTarget::Metal => "metal",
        CompileTarget::MetalLib => "metallib",
        CompileTarget::Wgsl => "wgsl",
        CompileTarget::CudaSource => "cu",
        CompileTarget::CppSource => "cpp",
        CompileTarget::CSource => "c",
        _ => "out",
    }
}

fn open_session(
    global: &GlobalSession,
    target: CompileTarget,
    profile: Option<&str>,
    includes: &[PathBuf],
    defines: &[String],
) -> Result<Session, String> {
    if !global.supports_target(target) {
        return Err(format!("This Slang build cannot generate {target}"));
    }

    let mut target_desc = TargetDescBuilder::new(target);
    if let Some(profile) = profile {
        target_desc = target_desc.profile(profile);
    }

    let mut builder = SessionBuilder::new().target(target_desc);
    for dir in includes {
        builder = builder.search_path(&dir.to_string_lossy());
    }
    for def in defines {
        let (name, value) = parse_define(def);
        builder = builder.define(&name, &value);
    }

    global.create_session(&builder).map_err(|e| format!("{}", e))
}

fn load(session: &Session, input: &Path) -> Result<Module, String> {
    log::info!("Loading {}", input.display());
    session
        .load_module_from_file(input)
        .map_err(|e| format!("Failed to load {}: {}", input.display(), e))
}

#[allow(clippy::too_many_arguments)]
fn compile_shader(
    input: PathBuf,
    target: CompileTarget,
    profile: Option<String>,
    entries: Vec<String>,
    includes: Vec<PathBuf>,
    defines: Vec<String>,
    optimize: u8,
    output: Option<PathBuf>,
) -> Result<(), String> {
    let output = output.unwrap_or_else(|| input.with_extension(extension(target)));

    let global = GlobalSession::new().map_err(|e| format!("{}", e))?;
    let session = open_session(&global, target, profile.as_deref(), &includes, &defines)?;
    let module = load(&session, &input)?;

    let entry_points = if entries.is_empty() {
        module
            .entry_points()
            .collect::<slangrs::Result<Vec<_>>>()
            .map_err(|e| format!("{}", e))?
    } else {
        entries
            .iter()
            .map(|name| module.find_entry_point_by_name(name))
            .collect::<slangrs::Result<Vec<_>>>()
            .map_err(|e| format!("{}", e))?
    };
    if entry_points.is_empty() {
        return Err(format!("{} defines no entry points", input.display()));
    }

    let mut components: Vec<&ComponentType> = vec![module.downcast()];
    components.extend(entry_points.iter().map(|e| e.downcast()));
    let program = session
        .create_composite_component_type(&components)
        .map_err(|e| format!("{}", e))?;

    let level = OptimizationLevel::from(optimize as i32);
    let linked = program
        .link_with_options(&CompilerOptions::new().optimization(level))
        .map_err(|e| format!("{}", e))?;
    let code = linked.target_code(0).map_err(|e| format!("{}", e))?;

    std::fs::write(&output, code.as_bytes())
        .map_err(|e| format!("Failed to write {}: {}", output.display(), e))?;

    eprintln!(
        "Compiled {} ({} entry points) -> {} ({} bytes)",
        input.display(),
        entry_points.len(),
        output.display(),
        code.len()
    );

    Ok(())
}

fn primary_category(layout: &TypeLayout) -> ParameterCategory {
    match layout.parameter_category() {
        ParameterCategory::Mixed => layout.categories().next().unwrap_or(ParameterCategory::None),
        category => category,
    }
}

fn print_fields(layout: &TypeLayout, indent: usize) {
    for field in layout.fields() {
        let Some(field_layout) = field.type_layout() else {
            continue;
        };
        let category = primary_category(&field_layout);
        println!(
            "{:indent$}+{:3}: {} {} ({} {})",
            "",
            field.offset(category),
            field_layout.name().unwrap_or("?"),
            field.name().unwrap_or("?"),
            field_layout.size(category),
            if category == ParameterCategory::Uniform { "bytes" } else { category.name() },
        );
        if field_layout.kind() == TypeKind::Struct {
            print_fields(&field_layout, indent + 4);
        }
    }
}

fn print_parameter(param: &VariableLayout) {
    let Some(layout) = param.type_layout() else {
        println!("  {} (no layout)", param.name().unwrap_or("?"));
        return;
    };
    let category = primary_category(&layout);
    println!(
        "  [{}:{}] {}: {} ({}, {} {})",
        param.binding_space(),
        param.binding_index(),
        param.name().unwrap_or("?"),
        layout.name().unwrap_or("?"),
        category.name(),
        layout.size(category),
        if category == ParameterCategory::Uniform { "bytes" } else { "slots" },
    );

    let body = match layout.kind() {
        TypeKind::ConstantBuffer | TypeKind::ParameterBlock => layout.element_type_layout(),
        TypeKind::Struct => Some(layout),
        _ => None,
    };
    if let Some(body) = body.filter(|b| b.field_count() > 0) {
        print_fields(&body, 6);
    }
}

fn reflect_shader(input: PathBuf, target: CompileTarget, profile: Option<String>) -> Result<(), String> {
    let global = GlobalSession::new().map_err(|e| format!("{}", e))?;
    let session = open_session(&global, target, profile.as_deref(), &[], &[])?;
    let module = load(&session, &input)?;

    // Compose every entry point so their layouts are reported too
    let entry_points = module
        .entry_points()
        .collect::<slangrs::Result<Vec<_>>>()
        .map_err(|e| format!("{}", e))?;
    let mut components: Vec<&ComponentType> = vec![module.downcast()];
    components.extend(entry_points.iter().map(|e| e.downcast()));
    let program = session
        .create_composite_component_type(&components)
        .map_err(|e| format!("{}", e))?;
    let layout = program.layout(0).map_err(|e| format!("Reflection failed: {}", e))?;

    println!("Module: {} ({})", module.name(), module.file_path().unwrap_or("<memory>"));
    println!("Target: {}", target);
    println!();

    let params: Vec<_> = layout.parameters().collect();
    if !params.is_empty() {
        println!("Global Parameters ({}):", params.len());
        for param in &params {
            print_parameter(param);
        }
        println!();
    }

    let entries: Vec<_> = layout.entry_points().collect();
    if !entries.is_empty() {
        println!("Entry Points ({}):", entries.len());
        for entry in entries {
            let stage = entry.stage();
            if stage == Stage::Compute {
                let [x, y, z] = entry.compute_thread_group_size();
                println!("  {} ({}) [numthreads({}, {}, {})]", entry.name().unwrap_or("?"), stage, x, y, z);
            } else {
                println!("  {} ({})", entry.name().unwrap_or("?"), stage);
            }
            for param in entry.parameters() {
                let semantic = match (param.semantic_name(), param.semantic_index()) {
                    (Some(name), 0) => format!(" : {}", name),
                    (Some(name), index) => format!(" : {}{}", name, index),
                    (None, _) => String::new(),
                };
                let ty = param.type_layout().and_then(|t| t.name()).unwrap_or("?");
                println!("      {} {}{}", ty, param.name().unwrap_or("?"), semantic);
            }
            if let Some(result) = entry.result_var_layout() {
                let ty = result.type_layout().and_then(|t| t.name()).unwrap_or("?");
                println!("      -> {} : {}", ty, result.semantic_name().unwrap_or("?"));
            }
        }
        println!();
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            input,
            target,
            profile,
            entries,
            includes,
            defines,
            optimize,
            output,
        } => compile_shader(input, target, profile, entries, includes, defines, optimize, output),
        Commands::Reflect {
            input,
            target,
            profile,
        } => reflect_shader(input, target, profile),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_define() {
        assert_eq!(parse_define("QUALITY=2"), ("QUALITY".to_string(), "2".to_string()));
        assert_eq!(parse_define("DEBUG"), ("DEBUG".to_string(), "1".to_string()));
    }

    #[test]
    fn test_cli_parses_compile() {
        let cli = Cli::try_parse_from([
            "slangrs", "compile", "blur.slang", "-t", "spirv", "-e", "main", "-I", "shaders", "-D", "N=4", "-O", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Compile {
                target,
                entries,
                optimize,
                includes,
                ..
            } => {
                assert_eq!(target, CompileTarget::SpirV);
                assert_eq!(entries, vec!["main".to_string()]);
                assert_eq!(optimize, 2);
                assert_eq!(includes, vec![PathBuf::from("shaders")]);
            }
            _ => panic!("expected compile"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_target() {
        assert!(Cli::try_parse_from(["slangrs", "compile", "a.slang", "-t", "vulkan"]).is_err());
        assert!(Cli::try_parse_from(["slangrs", "compile", "a.slang", "-t", "spirv", "-O", "7"]).is_err());
    }

    #[test]
    fn test_extension_follows_target() {
        assert_eq!(extension(CompileTarget::SpirV), "spv");
        assert_eq!(extension(CompileTarget::Wgsl), "wgsl");
        assert_eq!(extension(CompileTarget::Ptx), "out");
    }
}
