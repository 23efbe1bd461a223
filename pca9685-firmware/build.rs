//! Build script for pca9685-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates board.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate board.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read board.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in board.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_pca9685(&config, &mut errors);
    validate_i2c(&config, &mut errors);
    validate_channels(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid board configuration", &errors);
    }

    println!("cargo:warning=board.toml validated successfully");
}

fn validate_pca9685(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(section) = config.get("pca9685").and_then(|s| s.as_table()) else {
        errors.push("Missing [pca9685] section".to_string());
        return;
    };

    match section.get("address") {
        Some(toml::Value::Integer(addr)) if !(0x40..=0x7F).contains(addr) => {
            errors.push(format!("[pca9685] address {:#x} outside 0x40-0x7F", addr));
        }
        Some(toml::Value::Integer(_)) | None => {}
        Some(_) => errors.push("[pca9685] address must be an integer".to_string()),
    }

    // Out-of-range frequencies are clamped by the driver; only reject nonsense
    match section.get("frequency_hz") {
        Some(toml::Value::Integer(f)) if !(1..=u16::MAX as i64).contains(f) => {
            errors.push(format!("[pca9685] frequency_hz {} is not a valid frequency", f));
        }
        Some(toml::Value::Integer(f)) if !(24..=1526).contains(f) => {
            println!(
                "cargo:warning=[pca9685] frequency_hz {} will be clamped to 24-1526",
                f
            );
        }
        Some(toml::Value::Integer(_)) | None => {}
        Some(_) => errors.push("[pca9685] frequency_hz must be an integer".to_string()),
    }

    for key in ["sleep_during_prescale", "totem_pole"] {
        if let Some(value) = section.get(key) {
            if !value.is_bool() {
                errors.push(format!("[pca9685] {} must be true or false", key));
            }
        }
    }
}

fn validate_i2c(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(freq) = config.get("i2c").and_then(|s| s.get("frequency")) {
        match freq.as_integer() {
            Some(f) if (10_000..=1_000_000).contains(&f) => {}
            _ => errors.push("[i2c] frequency must be 10000-1000000".to_string()),
        }
    }
}

fn validate_channels(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(duty) = config.get("channels").and_then(|s| s.get("duty")) else {
        return;
    };

    let Some(values) = duty.as_array() else {
        errors.push("[channels] duty must be an array".to_string());
        return;
    };

    if values.len() > 16 {
        errors.push(format!("[channels] duty has {} entries, max 16", values.len()));
    }

    for (i, value) in values.iter().enumerate() {
        match value.as_integer() {
            Some(d) if (0..=4095).contains(&d) => {}
            _ => errors.push(format!("[channels] duty[{}] must be 0-4095", i)),
        }
    }
}

/// Abort the build with a boxed error report
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| {
                let truncated = if line.len() > 62 {
                    format!("{}...", &line[..59])
                } else {
                    line.to_string()
                };
                format!("║  • {:<62} ║", truncated)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}
