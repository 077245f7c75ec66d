//! The interactive session: one line in, one dispatch out

use super::conditional::ConditionalStack;
use super::foreach::{LoopState, PLACEHOLDER};
use super::interrupt::Interrupt;
use crate::command::handlers::{self, HandlerContext};
use crate::command::{tokenize, CommandKind};
use crate::directory::DeviceDirectory;
use crate::pairing::PairingOrchestrator;
use crate::wfd::WfdProvider;
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// All interpreter state for one session. Owned exclusively here and mutated
/// only on the line-processing path; the device directory is the one piece
/// shared with the discovery flow.
pub struct Session {
    exit_code: i32,
    running: bool,
    interactive: bool,
    skip_prompt: bool,
    cond: ConditionalStack,
    looping: LoopState,
    directory: DeviceDirectory,
    pairing: PairingOrchestrator,
    interrupt: Arc<Interrupt>,
}

impl Session {
    pub fn new(
        directory: DeviceDirectory,
        provider: Arc<dyn WfdProvider>,
        interrupt: Arc<Interrupt>,
        interactive: bool,
    ) -> Self {
        Self {
            exit_code: 0,
            running: true,
            interactive,
            skip_prompt: false,
            cond: ConditionalStack::default(),
            looping: LoopState::default(),
            directory,
            pairing: PairingOrchestrator::new(provider),
            interrupt,
        }
    }

    /// Accumulated exit code, handed to the shell at process exit
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn pairing(&self) -> &PairingOrchestrator {
        &self.pairing
    }

    /// Read and interpret lines until end of input, `quit`, or an interrupt
    /// with nothing left to cancel. Returns the accumulated exit code.
    pub async fn run<R>(&mut self, input: R) -> i32
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        while self.running {
            if self.interactive && !self.skip_prompt {
                print!("WiFiDirect: ");
                let _ = std::io::stdout().flush();
            }
            self.skip_prompt = false;

            let line = tokio::select! {
                read = lines.next_line() => match read {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                },
                _ = self.interrupt.shutdown_requested() => break,
            };

            // On a piped-in script an empty line means end of input.
            if !self.interactive && line.trim().is_empty() {
                break;
            }

            self.process_line(&line, None).await;
            self.drain_replay().await;
        }

        if self.interrupt.is_terminated() && self.interactive {
            println!("\n{} is terminated", env!("CARGO_PKG_NAME"));
        }
        self.exit_code
    }

    /// Interpret one input line. `replay_device` carries the matched device
    /// name when the line comes out of the loop buffer.
    pub async fn process_line(&mut self, raw: &str, replay_device: Option<&str>) {
        let line = raw.trim_start_matches([' ', '\t']);
        if line.is_empty() {
            return;
        }
        let Some(cmd) = tokenize(line) else {
            return;
        };
        let kind = CommandKind::parse(&cmd.name);

        // Recording is independent of gating: the whole body is captured,
        // even lines a conditional is currently skipping.
        if self.looping.collecting && kind != CommandKind::EndFor {
            self.looping.record(line);
        }

        let mut params = cmd.params;
        if let Some(device) = replay_device {
            params = params.replace(PLACEHOLDER, device);
        }

        match kind {
            CommandKind::Elif => self.handle_elif(&params).await,
            CommandKind::Else => self.handle_else(&params).await,
            CommandKind::EndIf => {
                self.cond.clear_closing();
                self.cond.pop();
            }
            _ if self.cond.gate_open() => {
                // Nothing below the dispatch boundary may kill the session.
                if let Err(e) = self.execute(kind, &params).await {
                    println!("{e}");
                }
            }
            CommandKind::If => self.cond.push_skipped(),
            _ => {} // skipped by the gate
        }
    }

    /// Feed replayed loop lines back through the interpreter until the
    /// replay is exhausted
    async fn drain_replay(&mut self) {
        while self.running {
            let was_replaying = self.looping.replaying;
            match self.looping.next_line() {
                Some((line, device)) => self.process_line(&line, Some(&device)).await,
                None => {
                    if was_replaying {
                        self.skip_prompt = true;
                    }
                    break;
                }
            }
        }
    }

    /// Evaluate a condition command and accumulate its status, separate from
    /// the general line path: no recording, no gating.
    async fn probe(&mut self, params: &str) -> Result<()> {
        let Some(cmd) = tokenize(params) else {
            return Ok(());
        };
        let kind = CommandKind::parse(&cmd.name);
        Box::pin(self.execute(kind, &cmd.params)).await
    }

    async fn handle_elif(&mut self, params: &str) {
        if !self.cond.in_block() {
            return;
        }
        self.cond.clear_closing();
        if self.cond.top_failed() {
            self.exit_code = 0;
            if !params.is_empty() {
                if let Err(e) = self.probe(params).await {
                    println!("{e}");
                }
                self.cond.set_branch(self.exit_code > 0);
            }
        } else {
            self.cond.skip_branch();
        }
    }

    async fn handle_else(&mut self, params: &str) {
        if !self.cond.in_block() {
            return;
        }
        self.cond.clear_closing();
        if self.cond.top_failed() {
            self.exit_code = 0;
            // else is terminal: an inline command runs unconditionally and
            // its status no longer gates further branches.
            if !params.is_empty() {
                if let Err(e) = self.probe(params).await {
                    println!("{e}");
                }
            }
        } else {
            self.cond.skip_branch();
        }
    }

    async fn execute(&mut self, kind: CommandKind, params: &str) -> Result<()> {
        match kind {
            CommandKind::If => {
                self.cond.push_open();
                self.exit_code = 0;
                if !params.is_empty() {
                    self.probe(params).await?;
                    self.cond.set_branch(self.exit_code > 0);
                }
            }
            // Inert as probes; as input lines they are routed to the
            // conditional engine before dispatch.
            CommandKind::Elif | CommandKind::Else | CommandKind::EndIf => {}
            CommandKind::ForEach => self.looping.begin_collection(params),
            CommandKind::EndFor => {
                let snapshot = self.directory.snapshot().await;
                self.looping.finish_collection(&snapshot);
            }
            CommandKind::Quit => self.running = false,
            CommandKind::Help => {
                handlers::handle_help();
            }
            CommandKind::Clear => {
                handlers::handle_clear();
            }
            CommandKind::Delay => {
                let status = handlers::handle_delay(&self.interrupt, params).await;
                self.exit_code += status;
            }
            CommandKind::Set => {
                let status = handlers::handle_set(&mut self.pairing, params);
                self.exit_code += status;
            }
            CommandKind::List => {
                let status = handlers::handle_list(&mut self.handler_ctx(), params).await;
                self.exit_code += status;
            }
            CommandKind::Info => {
                let status = handlers::handle_info(&mut self.handler_ctx(), params).await;
                self.exit_code += status;
            }
            CommandKind::Connect => {
                let status = handlers::handle_connect(&mut self.handler_ctx(), params).await;
                self.exit_code += status;
            }
            CommandKind::ConnectPc => {
                let status = handlers::handle_connect_pc(&mut self.handler_ctx(), params).await;
                self.exit_code += status;
            }
            CommandKind::Disconnect => {
                let status = handlers::handle_disconnect(&mut self.handler_ctx(), params).await;
                self.exit_code += status;
            }
            CommandKind::Unknown => println!("Unknown command. Type \"?\" for help."),
        }
        Ok(())
    }

    fn handler_ctx(&mut self) -> HandlerContext<'_> {
        HandlerContext {
            directory: &self.directory,
            pairing: &mut self.pairing,
            interrupt: self.interrupt.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{DeviceEvent, DeviceInfo};
    use crate::wfd::{SimOp, SimWfd};

    async fn session_with(names: &[&str]) -> (Arc<SimWfd>, Session) {
        let directory = DeviceDirectory::new();
        for (i, name) in names.iter().enumerate() {
            directory
                .apply(DeviceEvent::Added(DeviceInfo::new(format!("id-{i}"), *name)))
                .await;
        }
        let sim = Arc::new(SimWfd::new());
        let session = Session::new(directory, sim.clone(), Interrupt::new(), false);
        (sim, session)
    }

    async fn feed(session: &mut Session, lines: &[&str]) {
        for line in lines {
            session.process_line(line, None).await;
            session.drain_replay().await;
        }
    }

    fn paired_devices(sim: &SimWfd) -> Vec<String> {
        sim.operations()
            .into_iter()
            .filter_map(|op| match op {
                SimOp::Pair { device, .. } => Some(device),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_quit_stops_the_session() {
        let (_sim, mut session) = session_with(&[]).await;
        let code = session.run(std::io::Cursor::new("quit\nconnect Alpha\n")).await;
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_empty_line_ends_piped_input() {
        let (sim, mut session) = session_with(&["Alpha"]).await;
        session
            .run(std::io::Cursor::new("list\n\nconnect Alpha\n"))
            .await;
        // Nothing after the blank line ran.
        assert!(sim.operations().is_empty());
    }

    #[tokio::test]
    async fn test_failed_connect_accumulates_exit_code() {
        let (_sim, mut session) = session_with(&["Alpha"]).await;
        let code = session
            .run(std::io::Cursor::new("connect NoSuchDevice\nconnect Nothing\n"))
            .await;
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_unknown_command_keeps_session_alive() {
        let (sim, mut session) = session_with(&["Alpha"]).await;
        feed(&mut session, &["frobnicate", "connect Alpha"]).await;
        assert_eq!(session.exit_code(), 0);
        assert_eq!(paired_devices(&sim), vec!["id-0"]);
    }

    #[tokio::test]
    async fn test_case_insensitive_dispatch_with_leading_whitespace() {
        let (sim, mut session) = session_with(&["Alpha"]).await;
        feed(&mut session, &["  \tConNect Alpha"]).await;
        assert_eq!(paired_devices(&sim), vec!["id-0"]);
    }

    // Scenario: set goi=7 then connect carries intent 7 into the pairing request.
    #[tokio::test]
    async fn test_connect_carries_configured_intent() {
        let (sim, mut session) = session_with(&["Alpha"]).await;
        feed(&mut session, &["set goi=7", "connect Alpha"]).await;
        assert!(sim.operations().contains(&SimOp::Pair {
            device: "id-0".into(),
            group_owner_intent: Some(7),
        }));
    }

    // Scenario: a failing if-probe skips the body when no elif/else follows.
    #[tokio::test]
    async fn test_if_failing_probe_skips_body() {
        let (_sim, mut session) = session_with(&["Alpha"]).await;
        feed(
            &mut session,
            &["if connect NoSuchDevice", "set goi=3", "endif"],
        )
        .await;
        assert_eq!(session.pairing().group_owner_intent(), None);
        assert_eq!(session.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_if_successful_probe_runs_body() {
        let (_sim, mut session) = session_with(&["Alpha"]).await;
        feed(&mut session, &["if delay 0", "set goi=3", "endif"]).await;
        assert_eq!(session.pairing().group_owner_intent(), Some(3));
        assert_eq!(session.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_elif_runs_when_if_probe_failed() {
        let (_sim, mut session) = session_with(&["Alpha"]).await;
        feed(
            &mut session,
            &[
                "if connect NoSuchDevice",
                "set goi=1",
                "elif delay 0",
                "set goi=5",
                "endif",
            ],
        )
        .await;
        assert_eq!(session.pairing().group_owner_intent(), Some(5));
    }

    #[tokio::test]
    async fn test_elif_skipped_after_taken_branch() {
        let (_sim, mut session) = session_with(&["Alpha"]).await;
        feed(
            &mut session,
            &[
                "if delay 0",
                "set goi=1",
                "elif delay 0",
                "set goi=5",
                "endif",
            ],
        )
        .await;
        assert_eq!(session.pairing().group_owner_intent(), Some(1));
    }

    #[tokio::test]
    async fn test_else_branch_taken_on_failure() {
        let (_sim, mut session) = session_with(&["Alpha"]).await;
        feed(
            &mut session,
            &[
                "if connect NoSuchDevice",
                "set goi=1",
                "else",
                "set goi=9",
                "endif",
            ],
        )
        .await;
        assert_eq!(session.pairing().group_owner_intent(), Some(9));
    }

    #[tokio::test]
    async fn test_else_branch_skipped_on_success() {
        let (_sim, mut session) = session_with(&["Alpha"]).await;
        feed(
            &mut session,
            &["if delay 0", "set goi=1", "else", "set goi=9", "endif"],
        )
        .await;
        assert_eq!(session.pairing().group_owner_intent(), Some(1));
    }

    // A nested if inside a skipped branch must not disturb the outer block.
    // With the original's shared failed/closing pair the inner endif would
    // have cleared the outer failed flag and the else branch would not run.
    #[tokio::test]
    async fn test_nested_if_inside_skipped_branch() {
        let (_sim, mut session) = session_with(&["Alpha"]).await;
        feed(
            &mut session,
            &[
                "if connect NoSuchDevice",
                "if delay 0",
                "set goi=2",
                "endif",
                "else",
                "set goi=8",
                "endif",
                "set goi=12",
            ],
        )
        .await;
        // else branch ran, and the gate is fully open again afterwards.
        assert_eq!(session.pairing().group_owner_intent(), Some(12));
    }

    // Scenario: foreach b / connect $ / endfor over Alpha, Beta, Bravo pairs
    // with Beta then Bravo.
    #[tokio::test]
    async fn test_foreach_replays_per_matched_device() {
        let (sim, mut session) = session_with(&["Alpha", "Beta", "Bravo"]).await;
        feed(&mut session, &["foreach b", "connect $", "endfor"]).await;
        // Collection also dispatched `connect $` once, which failed to
        // resolve; only the replayed passes reach the backend.
        assert_eq!(paired_devices(&sim), vec!["id-1", "id-2"]);
    }

    // Recording is independent of gating: a line skipped by a failing
    // conditional during collection still replays, and executes when the
    // probe succeeds for a real device.
    #[tokio::test]
    async fn test_foreach_records_lines_skipped_by_conditional() {
        let (_sim, mut session) = session_with(&["Alpha"]).await;
        feed(
            &mut session,
            &["foreach a", "if connect $", "set goi=9", "endif", "endfor"],
        )
        .await;
        assert_eq!(session.pairing().group_owner_intent(), Some(9));
    }

    #[tokio::test]
    async fn test_foreach_without_matches_replays_nothing() {
        let (sim, mut session) = session_with(&["Alpha"]).await;
        feed(&mut session, &["foreach zzz", "connect $", "endfor"]).await;
        assert!(paired_devices(&sim).is_empty());
    }
}
