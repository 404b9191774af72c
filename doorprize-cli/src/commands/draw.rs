use crate::config::CliConfig;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use doorprize_core::{format_winners, DoorprizeError, Participant, ParticipantStore};
use doorprize_draw::{DrawEngine, DrawTiming, Phase, Result, SessionObserver, SessionSnapshot};
use std::cell::{Cell, RefCell};
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

const SWEEP_BAR_WIDTH: usize = 30;

#[derive(Args)]
pub struct DrawArgs {
    /// Number of winners (defaults to `default_winners` from config.json)
    #[arg(short = 'n', long)]
    pub winners: Option<usize>,
    /// Write the numbered winners list to this file
    #[arg(short, long)]
    pub export: Option<PathBuf>,
    /// Use compressed rehearsal timings
    #[arg(long)]
    pub fast: bool,
}

/// Draws the session to a terminal, one line per phase and per winner.
struct TerminalRenderer<W: Write> {
    out: RefCell<W>,
    pool: Rc<RefCell<Vec<Participant>>>,
    phase: Cell<Phase>,
    printed: Cell<usize>,
    // cursor sits on a `\r`-rewritten status line
    inline: Cell<bool>,
}

impl TerminalRenderer<std::io::Stdout> {
    fn stdout(pool: Rc<RefCell<Vec<Participant>>>) -> Self {
        Self::new(std::io::stdout(), pool)
    }
}

impl<W: Write> TerminalRenderer<W> {
    fn new(out: W, pool: Rc<RefCell<Vec<Participant>>>) -> Self {
        Self {
            out: RefCell::new(out),
            pool,
            phase: Cell::new(Phase::Idle),
            printed: Cell::new(0),
            inline: Cell::new(false),
        }
    }

    // a broken terminal must not disturb the draw itself
    fn emit(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            tracing::debug!("Failed to write draw output: {}", e);
        }
    }

    fn line(&self, text: &str) {
        if self.inline.replace(false) {
            self.emit("\n");
        }
        self.emit(&format!("{}\n", text));
    }

    fn status(&self, text: &str) {
        self.emit(&format!("\r{:<60}", text));
        self.inline.set(true);
    }

    fn phase_changed(&self, phase: Phase, requested: usize) {
        match phase {
            Phase::Sweeping => self.line(&format!("Drawing {} winners. Get ready...", requested)),
            Phase::Highlighting => self.line("Shuffling the pool..."),
            Phase::Settling => self.line("Stopping..."),
            Phase::Revealing => self.line("And the winners are:"),
            Phase::Done => self.line("Draw complete!"),
            Phase::Cancelled => self.line("Draw cancelled"),
            Phase::Idle => {}
        }
    }
}

impl<W: Write> SessionObserver for TerminalRenderer<W> {
    fn on_session_change(&self, snapshot: &SessionSnapshot) {
        // the last reveal arrives together with Done, so print winners first
        for winner in snapshot.revealed.iter().skip(self.printed.get()) {
            let rank = self.printed.get() + 1;
            self.line(&format!("  {}. {}", rank, winner));
            self.printed.set(rank);
        }

        if self.phase.replace(snapshot.phase) != snapshot.phase {
            self.phase_changed(snapshot.phase, snapshot.requested);
        }

        if let Some(frame) = snapshot.sweep {
            let filled = ((frame.progress * SWEEP_BAR_WIDTH as f32).round() as usize).min(SWEEP_BAR_WIDTH);
            self.status(&format!(
                "[{}{}]",
                "=".repeat(filled),
                " ".repeat(SWEEP_BAR_WIDTH - filled)
            ));
        }

        if let Some(index) = snapshot.highlighted_index {
            if let Some(p) = self.pool.borrow().get(index) {
                self.status(&format!("> {}", p));
            }
        }
    }
}

pub async fn handle_draw_command(
    args: DrawArgs,
    store: &dyn ParticipantStore,
    config: &CliConfig,
) -> Result<()> {
    let timing = if args.fast {
        DrawTiming::fast()
    } else {
        config.timing.clone()
    };
    let winners = args.winners.unwrap_or(config.default_winners);
    let bell = config.bell_on_reveal;

    let pool = Rc::new(RefCell::new(Vec::new()));
    let renderer = TerminalRenderer::stdout(pool.clone());
    let celebrate = move |_: &Participant| -> anyhow::Result<()> {
        if bell {
            let mut stdout = std::io::stdout();
            stdout.write_all(b"\x07")?;
            stdout.flush()?;
        }
        Ok(())
    };

    let local = tokio::task::LocalSet::new();
    let settled = local
        .run_until(async {
            let engine = DrawEngine::new(timing, renderer, celebrate)?;
            engine.start_from_store(store, winners).await?;

            if let Some(snapshot) = engine.pool() {
                *pool.borrow_mut() = snapshot;
            }

            let cancel = engine.cancel_handle();
            let interrupt = tokio::task::spawn_local(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            });

            let settled = engine.wait_settled().await;
            interrupt.abort();
            Ok::<_, doorprize_draw::DrawError>(settled)
        })
        .await?;

    if settled.phase != Phase::Done {
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Rank", "Name", "Unit"]);
    for (i, winner) in settled.revealed.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            winner.name.clone(),
            winner.unit.clone(),
        ]);
    }
    println!("{}", table);

    if let Some(path) = args.export {
        tokio::fs::write(&path, format_winners(&settled.revealed))
            .await
            .map_err(DoorprizeError::from)?;
        println!("Winners exported to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(phase: Phase, revealed: Vec<Participant>) -> SessionSnapshot {
        SessionSnapshot {
            phase,
            highlighted_index: None,
            sweep: None,
            revealed,
            requested: 2,
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn output(renderer: &TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.out.borrow().clone()).unwrap()
    }

    #[test]
    fn test_renderer_prints_each_winner_once() {
        let renderer = TerminalRenderer::new(Vec::new(), Rc::new(RefCell::new(Vec::new())));
        let first = Participant::new("John Doe", "IT").unwrap();
        let second = Participant::new("Jane Smith", "HR").unwrap();

        renderer.on_session_change(&snapshot(Phase::Revealing, vec![first.clone()]));
        renderer.on_session_change(&snapshot(Phase::Revealing, vec![first.clone()]));
        assert_eq!(renderer.printed.get(), 1);

        renderer.on_session_change(&snapshot(Phase::Done, vec![first, second]));
        assert_eq!(renderer.printed.get(), 2);
        assert_eq!(renderer.phase.get(), Phase::Done);

        let text = output(&renderer);
        assert_eq!(text.matches("1. John Doe (IT)").count(), 1);
        assert!(text.find("2. Jane Smith (HR)") < text.find("Draw complete!"));
    }

    #[test]
    fn test_status_line_is_closed_before_next_line() {
        let pool = vec![Participant::new("John Doe", "IT").unwrap()];
        let renderer = TerminalRenderer::new(Vec::new(), Rc::new(RefCell::new(pool)));

        let mut highlight = snapshot(Phase::Highlighting, Vec::new());
        highlight.highlighted_index = Some(0);
        renderer.on_session_change(&highlight);
        assert!(renderer.inline.get());

        renderer.on_session_change(&snapshot(Phase::Cancelled, Vec::new()));
        assert!(!renderer.inline.get());
        let text = output(&renderer);
        assert!(text.contains("> John Doe (IT)"));
        assert!(text.ends_with("\nDraw cancelled\n"));
    }

    #[test]
    fn test_write_failures_do_not_panic() {
        let pool = vec![Participant::new("John Doe", "IT").unwrap()];
        let renderer = TerminalRenderer::new(BrokenPipe, Rc::new(RefCell::new(pool.clone())));

        let mut highlight = snapshot(Phase::Highlighting, Vec::new());
        highlight.highlighted_index = Some(0);
        renderer.on_session_change(&highlight);
        renderer.on_session_change(&snapshot(Phase::Done, pool));

        assert_eq!(renderer.printed.get(), 1);
        assert_eq!(renderer.phase.get(), Phase::Done);
    }
}
