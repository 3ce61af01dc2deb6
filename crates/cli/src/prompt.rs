//! Line-based `[Y/n]` confirmation.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use clawguard_security::{Confirm, Confirmation};

use crate::render;

/// Asks each question on `output` and reads one answer line from `input`.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl LinePrompt<StdinLock<'static>, Stdout> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, request: &Confirmation<'_>) -> io::Result<bool> {
        writeln!(self.output, "\n{}", render::finding(request.finding()))?;
        write!(self.output, "{} [Y/n] ", request.question())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // EOF: nobody is there to say yes.
            writeln!(self.output)?;
            return Ok(false);
        }
        Ok(parse_answer(&line))
    }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<R, W> {
    fn confirm(&mut self, request: &Confirmation<'_>) -> bool {
        match self.ask(request) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read answer, treating as no");
                false
            }
        }
    }
}

/// `n` / `no` (any case) declines, anything else accepts.
pub fn parse_answer(line: &str) -> bool {
    !matches!(line.trim().to_lowercase().as_str(), "n" | "no")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clawguard_core::{Category, DocPath, FieldChange, Finding, Proposal, Severity};
    use std::io::Cursor;

    fn proposal() -> Proposal {
        Proposal::new(
            Finding::new(Category::GatewayBind, Severity::Fail, "gateway.bind", "exposed"),
            "Change bind to 'loopback' (localhost only)?",
            vec![FieldChange::new(DocPath::new(["gateway", "bind"]), "loopback")],
        )
    }

    fn answer(input: &str) -> (bool, String) {
        let p = proposal();
        let mut out = Vec::new();
        let accepted = LinePrompt::new(Cursor::new(input.to_string()), &mut out)
            .confirm(&Confirmation::Change(&p));
        (accepted, String::from_utf8(out).unwrap())
    }

    #[test]
    fn empty_answer_is_yes() {
        assert!(answer("\n").0);
        assert!(answer("y\n").0);
        assert!(answer("Yes\n").0);
    }

    #[test]
    fn n_or_no_is_no() {
        assert!(!answer("n\n").0);
        assert!(!answer("NO\n").0);
        assert!(!answer("  no  \n").0);
    }

    #[test]
    fn eof_is_no() {
        assert!(!answer("").0);
    }

    #[test]
    fn question_and_finding_are_shown() {
        let (_, out) = answer("\n");
        assert!(out.contains("[FAIL] exposed"));
        assert!(out.contains("Change bind to 'loopback' (localhost only)? [Y/n]"));
    }

    #[test]
    fn parse_answer_table() {
        assert!(parse_answer(""));
        assert!(parse_answer("whatever"));
        assert!(!parse_answer("n"));
        assert!(!parse_answer("No\r\n"));
    }
}
