//! Full-screen terminal status.
//!
//! Header and footer stay fixed; the body shows the latest cycle only.

use rust_decimal::Decimal;
use std::io::{self, Write};
use tracing::warn;

use super::Reporter;
use crate::engine::outcome::CycleOutcome;
use crate::types::RigId;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";
const SEPARATOR: &str = "--------------------------------------------------------";

pub struct TerminalReporter<W: Write> {
    out: W,
    header: Vec<String>,
    body: Vec<String>,
    footer: Vec<String>,
}

impl TerminalReporter<io::Stdout> {
    pub fn stdout(rig: RigId, floor: Decimal, offset_pct: Decimal) -> Self {
        Self::new(io::stdout(), rig, floor, offset_pct)
    }
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W, rig: RigId, floor: Decimal, offset_pct: Decimal) -> Self {
        let header = vec![
            format!("autoprice v{}", env!("CARGO_PKG_VERSION")),
            format!("Rig: {rig} minPrice: {floor:.6}  priceDiff: {offset_pct}%"),
            SEPARATOR.to_string(),
            String::new(),
        ];
        let footer = vec![SEPARATOR.to_string(), r#"Press "enter" to quit"#.to_string()];

        Self {
            out,
            header,
            body: Vec::new(),
            footer,
        }
    }

    /// Clear the screen and redraw header, body and footer.
    pub fn refresh(&mut self) {
        if let Err(e) = self.draw() {
            warn!(error = %e, "Failed to draw status screen");
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self) -> io::Result<()> {
        write!(self.out, "{CLEAR_SCREEN}")?;
        for line in self.header.iter().chain(&self.body) {
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out)?;
        for line in &self.footer {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

impl<W: Write> Reporter for TerminalReporter<W> {
    fn report(&mut self, outcome: &CycleOutcome) {
        self.body = outcome.lines();
        self.refresh();
    }
}
