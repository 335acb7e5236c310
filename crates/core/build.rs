//! Compiles the message catalogs under `locales/` to .mo files.
//!
//! Uses msgfmt when available, otherwise the pre-compiled messages.mo
//! checked in next to each .po file.

use std::path::Path;
use std::process::Command;

const LOCALES: &[&str] = &["en", "zh"];

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=locales/");

    let out_dir = std::env::var("OUT_DIR")
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;

    for locale in LOCALES {
        let po_path = format!("locales/{locale}/messages.po");
        let precompiled_mo_path = format!("locales/{locale}/messages.mo");
        let out_mo_path = format!("{out_dir}/{locale}.mo");

        println!("cargo:rerun-if-changed={po_path}");
        println!("cargo:rerun-if-changed={precompiled_mo_path}");

        let compiled = Command::new("msgfmt")
            .args(["-o", &out_mo_path, &po_path])
            .status()
            .map(|status| status.success())
            .unwrap_or(false);

        if !compiled {
            if !Path::new(&precompiled_mo_path).exists() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!(
                        "msgfmt not available and no pre-compiled catalog for locale {locale}; \
                         run: msgfmt -o {precompiled_mo_path} {po_path}"
                    ),
                ));
            }
            std::fs::copy(&precompiled_mo_path, &out_mo_path)?;
        }
    }

    Ok(())
}
