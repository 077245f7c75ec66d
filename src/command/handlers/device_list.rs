//! Read-only queries against the device directory

use super::HandlerContext;
use crate::directory::{resolve, DeviceInfo};
use crate::wfd::{MSFT_OUI, WFA_OUI};

/// Display budget for the wide listing; no terminal probing.
const WIDE_WIDTH: usize = 80;

/// Handle `list [w]`
pub async fn handle_list(ctx: &mut HandlerContext<'_>, params: &str) -> i32 {
    let snapshot = ctx.directory.snapshot().await;
    let wide = params.replace('/', "").to_lowercase() == "w";
    for line in format_device_list(&snapshot, wide) {
        println!("{line}");
    }
    0
}

/// Render the named devices of a snapshot, one `#NN: name` entry per device.
/// The wide variant packs entries into columns over a fixed line budget.
pub fn format_device_list(snapshot: &[DeviceInfo], wide: bool) -> Vec<String> {
    let entries: Vec<String> = snapshot
        .iter()
        .filter(|d| !d.name.is_empty())
        .enumerate()
        .map(|(i, d)| format!("#{:02}: {}", i, d.name))
        .collect();

    if !wide || entries.is_empty() {
        return entries;
    }

    let max_width = entries.iter().map(String::len).max().unwrap_or(0) + 3;
    let columns = (WIDE_WIDTH / (max_width + 2)).max(1);

    let mut widths = vec![0usize; columns];
    for (i, entry) in entries.iter().enumerate() {
        let col = i % columns;
        widths[col] = widths[col].max(entry.len() + 3);
    }

    entries
        .chunks(columns)
        .map(|row| {
            let mut line = String::new();
            for (col, entry) in row.iter().enumerate() {
                line.push_str(entry);
                for _ in entry.len()..widths[col] {
                    line.push(' ');
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}

/// Handle `info <name>|<#n>`: print the vendor information elements a device
/// advertises. Read-only; never contributes a failure status.
pub async fn handle_info(ctx: &mut HandlerContext<'_>, params: &str) -> i32 {
    let snapshot = ctx.directory.snapshot().await;
    let device = match resolve(&snapshot, params) {
        Ok(d) => d.clone(),
        Err(e) => {
            println!("{e}");
            return 0;
        }
    };

    match ctx.pairing.information_elements(&device).await {
        Ok(elements) => {
            for element in &elements {
                let mut oui = element.oui_hex();
                if element.oui == MSFT_OUI {
                    oui.push_str(" (Microsoft)");
                } else if element.oui == WFA_OUI {
                    oui.push_str(" (WFA)");
                }
                println!("OUI {}, Type {}", oui, element.oui_type);
            }
            println!("Information elements found: {}", elements.len());
        }
        Err(e) => println!("No information element found: {e}"),
    }
    0
}
