//! Module listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use phasediv_registry::{ModuleRegistry, ModuleTag};

#[derive(Args)]
pub struct ModulesArgs {
    /// Show details for a specific module
    #[arg(value_name = "MODULE")]
    module: Option<String>,
}

pub fn run(args: &ModulesArgs) -> anyhow::Result<()> {
    let registry = ModuleRegistry::global();

    let Some(id) = &args.module else {
        println!("Available Modules");
        println!("=================");
        for &tag in ModuleTag::ALL {
            let modules = registry.modules_with_tag(tag);
            if modules.is_empty() {
                continue;
            }
            println!();
            println!("{}:", tag.name());
            for module in modules {
                println!("  {:15} - {}", module.id, module.description);
            }
        }
        println!();
        println!("Use 'phasediv modules <id>' for detailed parameter info.");
        return Ok(());
    };

    let descriptor = registry
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Unknown module: {id}"))?;
    let module = registry
        .create(id)
        .ok_or_else(|| anyhow::anyhow!("Unknown module: {id}"))?;

    println!("{}", descriptor.name);
    println!("{}", "=".repeat(descriptor.name.len()));
    println!();
    println!("{}", descriptor.description);
    let tags: Vec<_> = descriptor.tags.iter().map(|t| t.name()).collect();
    println!("Tags: {}", tags.join(", "));
    println!();

    println!("Parameters:");
    println!();
    println!("  {:12}  {:8}  {:10}  {}", "Id", "Name", "Default", "Range");
    println!("  {:12}  {:8}  {:10}  {}", "--", "----", "-------", "-----");

    for index in 0..module.module_param_count() {
        let Some(desc) = module.module_param_info(index) else {
            continue;
        };
        let default = module
            .module_format_value(index, desc.default)
            .unwrap_or_default();
        let min = module.module_format_value(index, desc.min).unwrap_or_default();
        let max = module.module_format_value(index, desc.max).unwrap_or_default();
        println!(
            "  {:12}  {:8}  {:10}  {} - {}",
            desc.string_id, desc.name, default, min, max
        );
    }

    println!();
    println!(
        "Jacks: {} inputs, {} outputs, {} lights",
        module.input_count(),
        module.output_count(),
        module.light_count()
    );

    Ok(())
}
