//! # NetCDF File Information Module
//!
//! Extraction and display of NetCDF file structure: dimensions, variables,
//! attributes and nested groups. Group awareness matters here because the
//! elevation-change products sometimes bury their grids several groups deep.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Information about a NetCDF dimension
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetCdfDimensionInfo {
    pub name: String,
    pub length: usize,
    pub is_unlimited: bool,
}

/// Information about a NetCDF variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetCdfVariableInfo {
    pub name: String,
    /// Group path the variable lives in, empty for the root
    pub group: String,
    pub dimensions: Vec<String>,
    pub attributes: HashMap<String, String>,
    pub shape: Vec<usize>,
}

/// Complete structural information about a NetCDF file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetCdfInfo {
    pub path: String,
    pub dimensions: Vec<NetCdfDimensionInfo>,
    pub variables: Vec<NetCdfVariableInfo>,
    pub groups: Vec<String>,
    pub global_attributes: HashMap<String, String>,
    pub file_size: Option<u64>,
    pub total_variables: usize,
    pub total_dimensions: usize,
}

/// Extract structural information from a NetCDF file, including variables
/// nested in groups. When `variable` is set, only that variable (matched
/// by name in any group) is reported.
pub fn get_netcdf_info(
    file_path: &str,
    variable: Option<&str>,
    detailed: bool,
) -> Result<NetCdfInfo> {
    debug!("Opening NetCDF file: {}", file_path);
    let file = netcdf::open(file_path)
        .with_context(|| format!("Failed to open NetCDF file: {}", file_path))?;

    let file_size = std::fs::metadata(file_path).ok().map(|m| m.len());

    let mut dimensions = Vec::new();
    for dim in file.dimensions() {
        dimensions.push(NetCdfDimensionInfo {
            name: dim.name().to_string(),
            length: dim.len(),
            is_unlimited: dim.is_unlimited(),
        });
    }

    let mut variables = Vec::new();
    let mut groups = Vec::new();
    for var in file.variables() {
        collect_variable(&var, "", variable, &mut variables);
    }
    if let Some(root) = file.root() {
        for sub in root.groups() {
            collect_group(&sub, "", variable, &mut variables, &mut groups);
        }
    }

    let mut global_attributes = HashMap::new();
    if detailed {
        for attr in file.attributes() {
            if let Ok(value) = attr.value() {
                global_attributes.insert(attr.name().to_string(), format_attribute_value(&value));
            }
        }
    }

    file.close().context("Failed to close NetCDF file")?;

    Ok(NetCdfInfo {
        path: file_path.to_string(),
        total_dimensions: dimensions.len(),
        total_variables: variables.len(),
        dimensions,
        variables,
        groups,
        global_attributes,
        file_size,
    })
}

fn collect_group(
    group: &netcdf::Group,
    parent: &str,
    only: Option<&str>,
    variables: &mut Vec<NetCdfVariableInfo>,
    groups: &mut Vec<String>,
) {
    let path = if parent.is_empty() {
        group.name().to_string()
    } else {
        format!("{}/{}", parent, group.name())
    };
    groups.push(path.clone());

    for var in group.variables() {
        collect_variable(&var, &path, only, variables);
    }
    for sub in group.groups() {
        collect_group(&sub, &path, only, variables, groups);
    }
}

fn collect_variable(
    var: &netcdf::Variable,
    group: &str,
    only: Option<&str>,
    variables: &mut Vec<NetCdfVariableInfo>,
) {
    if let Some(wanted) = only {
        if var.name() != wanted {
            return;
        }
    }

    let mut attributes = HashMap::new();
    for attr in var.attributes() {
        if let Ok(value) = attr.value() {
            attributes.insert(attr.name().to_string(), format_attribute_value(&value));
        }
    }

    variables.push(NetCdfVariableInfo {
        name: var.name().to_string(),
        group: group.to_string(),
        dimensions: var.dimensions().iter().map(|d| d.name().to_string()).collect(),
        shape: var.dimensions().iter().map(|d| d.len()).collect(),
        attributes,
    });
}

/// Format netcdf attribute value for display
fn format_attribute_value(value: &netcdf::AttributeValue) -> String {
    format!("{:?}", value)
}

/// Print NetCDF info in human-readable format
pub fn print_file_info_human(info: &NetCdfInfo) {
    println!("NetCDF File Information:");
    println!("  Path: {}", info.path);
    if let Some(size) = info.file_size {
        println!("  File Size: {:.2} MB", size as f64 / 1_048_576.0);
    }
    println!("  Dimensions: {} total", info.total_dimensions);
    for dim in &info.dimensions {
        println!(
            "    {} ({}{})",
            dim.name,
            dim.length,
            if dim.is_unlimited { ", unlimited" } else { "" }
        );
    }
    if !info.groups.is_empty() {
        println!("  Groups: {}", info.groups.join(", "));
    }
    println!("  Variables: {} total", info.total_variables);
    for var in &info.variables {
        println!(
            "    {}{} - dimensions: [{}]",
            if var.group.is_empty() {
                String::new()
            } else {
                format!("{}/", var.group)
            },
            var.name,
            var.dimensions.join(", ")
        );
        for (name, value) in &var.attributes {
            println!("      @{}: {}", name, value);
        }
    }
    if !info.global_attributes.is_empty() {
        println!("  Global Attributes:");
        for (name, value) in &info.global_attributes {
            println!("    @{}: {}", name, value);
        }
    }
}

/// Print NetCDF info in JSON format
pub fn print_file_info_json(info: &NetCdfInfo) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(info)?);
    Ok(())
}

/// Print NetCDF info in YAML format
pub fn print_file_info_yaml(info: &NetCdfInfo) -> Result<()> {
    let yaml = serde_yaml::to_string(info).context("Failed to serialize NetCDF info to YAML")?;
    println!("{}", yaml);
    Ok(())
}

/// Print NetCDF info in CSV format (variables only)
pub fn print_file_info_csv(info: &NetCdfInfo) -> Result<()> {
    println!("variable_name,group,dimensions,shape,attributes_count");
    for var in &info.variables {
        println!(
            "{},{},{},{},{}",
            var.name,
            var.group,
            format!("\"{}\"", var.dimensions.join(";")),
            format!(
                "\"{}\"",
                var.shape
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(";")
            ),
            var.attributes.len()
        );
    }
    Ok(())
}
