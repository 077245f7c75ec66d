//! Session utility commands: delay, help, clear

use crate::command::VERSION_BANNER;
use crate::interp::Interrupt;
use std::io::Write;
use std::time::Duration;

/// Handle `delay <ms>`: suspend until the duration elapses or an interrupt
/// releases the wait, whichever comes first.
pub async fn handle_delay(interrupt: &Interrupt, params: &str) -> i32 {
    match params.parse::<u64>() {
        Ok(ms) => {
            let _ = interrupt
                .cancellable(tokio::time::sleep(Duration::from_millis(ms)))
                .await;
            0
        }
        Err(_) => {
            println!("Invalid delay value {params}");
            1
        }
    }
}

/// Handle `help` / `?`
pub fn handle_help() -> i32 {
    println!(
        "{VERSION_BANNER}\n\
         \n  help, ?\t\t\t: show help information\
         \n  quit, q\t\t\t: quit from application\
         \n  list, ls [w]\t\t\t: show available WiFi Direct devices\
         \n  info <name> or <#>\t\t: show available device elements\
         \n  delay <msec>\t\t\t: pause execution for a certain number of milliseconds\
         \n  set goi=[0..15]\t\t: set GroupOwnerIntent value. Default value is 14\
         \n  connect <name> or <#>\t\t: connect to WiFi Direct device. Syn: o, open, pair\
         \n  connectpc <name> or <#>\t: connect to PC with enabled projection. Syn: opc, openpc, pairpc\
         \n  disconnect <name> or <#>\t: unpair from device. Syn: c, close, unpair\
         \n  foreach [device_mask]\t\t: start devices enumerating loop\
         \n  endfor\t\t\t: end foreach loop\
         \n  if <cmd> <params>\t\t: start conditional block dependent on command status\
         \n    elif\t\t\t: another conditional block\
         \n    else\t\t\t: if condition == false block\
         \n  endif\t\t\t\t: end conditional block\n"
    );
    0
}

/// Handle `clear` / `cls` / `clr`
pub fn handle_clear() -> i32 {
    // ANSI clear screen plus cursor home
    print!("\x1b[2J\x1b[1;1H");
    let _ = std::io::stdout().flush();
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delay_completes_after_duration() {
        let interrupt = Interrupt::new();
        assert_eq!(handle_delay(&interrupt, "10").await, 0);
    }

    #[tokio::test]
    async fn test_delay_malformed_argument() {
        let interrupt = Interrupt::new();
        assert_eq!(handle_delay(&interrupt, "soon").await, 1);
        assert_eq!(handle_delay(&interrupt, "").await, 1);
    }

    #[tokio::test]
    async fn test_delay_released_early_by_interrupt() {
        let interrupt = Interrupt::new();
        let trigger = interrupt.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.interrupted();
        });

        let start = Instant::now();
        assert_eq!(handle_delay(&interrupt, "5000").await, 0);
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
