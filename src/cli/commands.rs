// file: src/cli/commands.rs
// version: 1.0.0
// guid: 40c7f9a2-61e8-4b5d-930a-85d2c4b1e760

//! Command implementations for the CLI

use super::args::OutputFormat;
use crate::{
    config::ConfigResolver,
    deploy::{build_deployment, Deployment},
    logging::logger::with_operation_span,
    Result,
};
use tracing::info;

/// Build the deployment document and write it to stdout or a file
pub async fn build_command(
    stack_path: &str,
    output: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    info!("Building deployment from stack {}", stack_path);

    let deployment = load_and_build(stack_path)?;
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&deployment)?,
        OutputFormat::Json => serde_json::to_string_pretty(&deployment)?,
    };

    match output {
        Some(path) => {
            tokio::fs::write(&path, rendered).await?;
            info!("Deployment document written to {}", path);
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Build the deployment and discard it, reporting the first fatal error
pub async fn validate_command(stack_path: &str) -> Result<()> {
    info!("Validating stack {}", stack_path);

    let deployment = load_and_build(stack_path)?;
    info!(
        "Stack is valid: {} VMs, {} cloud-init templates, {} firewall rules",
        deployment.vms.len(),
        deployment.cloud_init_templates.len(),
        deployment.firewall.rules.len()
    );

    Ok(())
}

/// Print the aggregate exports
pub async fn summary_command(stack_path: &str, json_output: bool) -> Result<()> {
    let deployment = load_and_build(stack_path)?;
    let exports = &deployment.exports;

    if json_output {
        println!("{}", serde_json::to_string_pretty(exports)?);
        return Ok(());
    }

    println!("{}", exports.cluster_status);
    for (role, id) in &exports.vm_ids {
        println!("  {:<8} vm {} ({})", role, id, exports.vm_names[role]);
    }
    println!("  total vCPU:    {}", exports.total_vcpu);
    println!("  total memory:  {} GB", exports.total_memory_gb);
    println!("  total storage: {} GB", exports.total_storage_gb);

    Ok(())
}

fn load_and_build(stack_path: &str) -> Result<Deployment> {
    with_operation_span("build_deployment", || {
        let resolver = ConfigResolver::from_file(stack_path)?;
        build_deployment(&resolver)
    })
}
