//! The `set` command

use crate::pairing::PairingOrchestrator;
use crate::wfd::DEFAULT_GROUP_OWNER_INTENT;

/// Handle `set goi=<0..15|null>`.
///
/// Out-of-range or non-numeric values are rejected and the previous value is
/// retained; `null` always clears back to the backend default.
pub fn handle_set(pairing: &mut PairingOrchestrator, params: &str) -> i32 {
    let param = params.replace(' ', "");
    let Some(value) = param.strip_prefix("goi=") else {
        println!(
            "Error setting parameter. Use: set goi={}",
            DEFAULT_GROUP_OWNER_INTENT
        );
        return 1;
    };

    if value == "null" {
        pairing.set_group_owner_intent(None);
    } else {
        match value.parse::<i16>() {
            Ok(v) if (0..16).contains(&v) => pairing.set_group_owner_intent(Some(v as u8)),
            _ => {
                println!("Group owner intent must be an integer in 0..15 or null");
                return 1;
            }
        }
    }

    let goi = pairing
        .group_owner_intent()
        .map_or_else(|| "null".to_string(), |v| v.to_string());
    println!("Group owner intent set to {goi}");
    0
}
