//! The shift-reduce driver.
//!
//! [`Engine`] runs a validated [`Tables`] automaton over tokens pulled from a
//! [`Scanner`], calling back into grammar-specific [`Actions`] on every
//! reduction. Syntax errors are recovered from with the classic yacc
//! protocol: report once, pop to a state that shifts the error terminal,
//! shift it, then skip input until a token fits. Further errors stay
//! unreported until [`RECOVERY_SHIFTS`] tokens have been shifted.

use crate::{Action, Merge, ParseError, Rule, RuleId, Scanner, Stack, StateId, Tables, Terminal};
use smartstring::alias::String;

/// Tokens that must be shifted after an error before errors are reported
/// again.
pub const RECOVERY_SHIFTS: usize = 5;

/// Diagnostics list the expected terminals only when there are fewer than
/// this many.
const MAX_LISTED_EXPECTED: usize = 7;

pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// What a semantic action asks the engine to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Finish the reduction normally.
    Continue,
    /// Stop and return the current value as the parse result.
    Accept,
    /// Stop with [`ParseError::Aborted`], skipping error recovery.
    Abort,
    /// Treat the current lookahead as a syntax error and recover. The
    /// reduced rule's right-hand side stays on the stack.
    Error,
}

/// The rule being reduced, as seen by [`Actions::reduce`].
#[derive(Debug)]
pub struct Reduction<'a, V, S> {
    pub rule_id: RuleId,
    pub rule: &'a Rule,
    /// Right-hand-side values, leftmost first.
    pub values: &'a [V],
    /// Right-hand-side locations, leftmost first.
    pub spans: &'a [S],
    /// Location synthesized for the left-hand side.
    pub span: &'a S,
}

/// Grammar-specific behavior injected into an [`Engine`].
pub trait Actions {
    type Value: Clone + Default;
    type Span: Merge + Clone;

    /// Runs the semantic action of `reduction.rule_id`.
    ///
    /// On entry `value` holds the default result: the first right-hand-side
    /// value, or `Value::default()` for an empty rule. Whatever `value`
    /// holds on return is pushed for the left-hand side.
    fn reduce(
        &mut self,
        reduction: Reduction<'_, Self::Value, Self::Span>,
        value: &mut Self::Value,
    ) -> Control;

    /// Human-readable terminal name used in diagnostics.
    fn terminal_name(&self, tables: &Tables, terminal: Terminal) -> String {
        tables.terminal_name(terminal)
    }
}

/// Counters for one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserStats {
    pub tokens: usize,
    pub shifts: usize,
    pub reductions: usize,
    pub errors: usize,
    pub discarded: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Recovering { shifted: usize },
}

/// Where a syntax error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    /// The lookahead has no action in the top state.
    Syntax,
    /// A semantic action returned [`Control::Error`]. The top state may
    /// still accept the lookahead, so its expected set is not listed.
    Raised,
}

enum Step<V> {
    Continue,
    Accept(V),
    Error,
}

/// A shift-reduce parser for one token stream.
///
/// The engine keeps three stacks of equal depth (states, values and spans)
/// plus a one-token lookahead buffer. All of it is reset by every call to
/// [`parse`](Engine::parse); the tables are only read and may be shared by
/// any number of engines. One engine runs one parse at a time.
pub struct Engine<'t, L, A>
where
    L: Scanner<Value = A::Value, Span = A::Span>,
    A: Actions,
{
    tables: &'t Tables,
    scanner: L,
    actions: A,
    max_depth: usize,
    states: Stack<StateId>,
    values: Stack<A::Value>,
    spans: Stack<A::Span>,
    lookahead: Terminal,
    last_span: A::Span,
    mode: Mode,
    stats: ParserStats,
}

impl<'t, L, A> Engine<'t, L, A>
where
    L: Scanner<Value = A::Value, Span = A::Span>,
    A: Actions,
{
    pub fn new(tables: &'t Tables, scanner: L, actions: A) -> Self {
        let last_span = scanner.span();
        Self {
            tables,
            scanner,
            actions,
            max_depth: DEFAULT_MAX_DEPTH,
            states: Stack::new(),
            values: Stack::new(),
            spans: Stack::new(),
            lookahead: Terminal::NONE,
            last_span,
            mode: Mode::Normal,
            stats: ParserStats::default(),
        }
    }

    /// Caps the stack depth; deeper parses fail with
    /// [`ParseError::StackOverflow`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses the whole token stream.
    ///
    /// Returns the value produced for the accept rule, or the reason the
    /// parse failed. Syntax errors that were recovered from are reported
    /// through [`Scanner::report_error`] only.
    pub fn parse(&mut self) -> Result<A::Value, ParseError> {
        let result = self.run();
        match &result {
            Ok(_) => log::debug!("accepted: {:?}", self.stats),
            Err(err) => log::debug!("failed: {err}: {:?}", self.stats),
        }
        self.states.clear();
        self.values.clear();
        self.spans.clear();
        self.lookahead = Terminal::NONE;
        self.mode = Mode::Normal;
        result
    }

    pub fn stats(&self) -> ParserStats {
        self.stats.clone()
    }

    pub fn tables(&self) -> &'t Tables {
        self.tables
    }

    pub fn scanner(&self) -> &L {
        &self.scanner
    }

    pub fn scanner_mut(&mut self) -> &mut L {
        &mut self.scanner
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut A {
        &mut self.actions
    }

    pub fn into_parts(self) -> (L, A) {
        (self.scanner, self.actions)
    }

    fn run(&mut self) -> Result<A::Value, ParseError> {
        self.stats = ParserStats::default();
        self.lookahead = Terminal::NONE;
        self.mode = Mode::Normal;
        self.last_span = self.scanner.span();
        let start = self.tables.start_state();
        self.push(start, A::Value::default(), self.last_span.clone())?;

        loop {
            let top = *self.states.peek();
            match self.decide(top) {
                Action::Shift(target) => self.shift(target)?,
                Action::Reduce(rule_id) => match self.reduce(rule_id)? {
                    Step::Continue => {}
                    Step::Accept(value) => return Ok(value),
                    Step::Error => self.recover(Fault::Raised)?,
                },
                Action::Error => self.recover(Fault::Syntax)?,
            }
            debug_assert!(self.in_sync(), "parser stacks out of sync");
            if log::log_enabled!(log::Level::Trace) {
                self.dump_state();
            }
        }
    }

    /// Picks the action for `state`, fetching a lookahead only when the
    /// state has a lookahead table.
    fn decide(&mut self, state: StateId) -> Action {
        let tables = self.tables;
        let state = tables.state(state);
        let mut code = state.default_action();
        if state.has_lookahead() {
            let token = self.fetch();
            if let Some(entry) = state.entry(token) {
                code = entry;
            }
        }
        Action::decode(code)
    }

    fn fetch(&mut self) -> Terminal {
        if self.lookahead.is_none() {
            self.last_span = self.scanner.span();
            let token = self.scanner.next_token();
            debug_assert!(!token.is_none(), "scanner returned the reserved terminal 0");
            self.lookahead = token;
            self.stats.tokens += 1;
            log::trace!("Lookahead {}", self.name(token));
        }
        self.lookahead
    }

    fn shift(&mut self, target: StateId) -> Result<(), ParseError> {
        let token = self.fetch();
        log::trace!("Shift {} -> {}", self.name(token), target.0);
        let value = self.scanner.value();
        let span = self.scanner.span();
        self.push(target, value, span)?;
        self.stats.shifts += 1;
        if token != self.tables.end_terminal() {
            self.lookahead = Terminal::NONE;
        }
        if let Mode::Recovering { shifted } = &mut self.mode {
            *shifted += 1;
            if *shifted >= RECOVERY_SHIFTS {
                log::debug!("error recovery complete");
                self.mode = Mode::Normal;
            }
        }
        Ok(())
    }

    fn reduce(&mut self, rule_id: RuleId) -> Result<Step<A::Value>, ParseError> {
        let tables = self.tables;
        let rule = tables.rule(rule_id);
        let n = rule.len();
        log::trace!("Reduce {} ({})", rule_id.0, tables.display_rule(rule_id));

        let (mut value, span) = match n {
            0 => {
                // An empty rule sits between the last consumed token and the
                // next one, so the next one has to be known.
                self.fetch();
                let span = self.scanner.span().merge(&self.last_span);
                (A::Value::default(), span)
            }
            1 => (self.values.peek().clone(), self.spans.peek().clone()),
            _ => {
                let spans = self.spans.top(n);
                let span = spans[0].merge(&spans[n - 1]);
                (self.values.top(n)[0].clone(), span)
            }
        };

        let control = self.actions.reduce(
            Reduction {
                rule_id,
                rule,
                values: self.values.top(n),
                spans: self.spans.top(n),
                span: &span,
            },
            &mut value,
        );
        self.stats.reductions += 1;

        match control {
            Control::Continue => {}
            Control::Accept => {
                log::debug!("rule {} requested accept", rule_id.0);
                return Ok(Step::Accept(value));
            }
            Control::Abort => {
                log::debug!("rule {} requested abort", rule_id.0);
                return Err(ParseError::Aborted);
            }
            Control::Error => {
                log::debug!("rule {} raised a syntax error", rule_id.0);
                return Ok(Step::Error);
            }
        }

        if rule_id == tables.accept_rule() {
            return Ok(Step::Accept(value));
        }

        self.pop(n);
        let top = *self.states.peek();
        let target = tables.state(top).goto_for(rule.lhs).unwrap_or(top);
        self.push(target, value, span)?;
        Ok(Step::Continue)
    }

    /// Handles a syntax error at the current lookahead.
    fn recover(&mut self, fault: Fault) -> Result<(), ParseError> {
        let tables = self.tables;
        let token = self.fetch();
        let span = self.scanner.span();
        self.stats.errors += 1;

        // A repeated error with nothing shifted since the last one would
        // resynchronize on the same token forever; it gets skipped instead.
        let stalled = self.mode == Mode::Recovering { shifted: 0 };
        if self.mode == Mode::Normal {
            let expecting = match fault {
                Fault::Syntax => Some(*self.states.peek()),
                Fault::Raised => None,
            };
            let message = self.describe(token, expecting);
            log::debug!("{message}");
            self.scanner.report_error(&message, &span);
        }

        let error = tables.error_terminal();
        let target = loop {
            if self.states.is_empty() {
                log::debug!("no state on the stack shifts {}", self.name(error));
                return Err(ParseError::Unrecoverable);
            }
            let top = *self.states.peek();
            match tables.state(top).entry(error).map(Action::decode) {
                Some(Action::Shift(target)) => break target,
                _ => {
                    log::trace!("Pop {}", top.0);
                    self.pop(1);
                }
            }
        };
        log::trace!("Shift {} -> {}", self.name(error), target.0);
        self.push(target, A::Value::default(), span)?;
        self.mode = Mode::Recovering { shifted: 0 };

        let mut skip = stalled;
        loop {
            let state = tables.state(*self.states.peek());
            if !skip {
                if !state.has_lookahead() {
                    break;
                }
                let token = self.fetch();
                if state.lookup(token) != 0 {
                    break;
                }
            }
            skip = false;
            let token = self.fetch();
            if token == tables.end_terminal() {
                log::debug!("end of input while recovering");
                return Err(ParseError::UnexpectedEnd);
            }
            log::trace!("Discard {}", self.name(token));
            self.lookahead = Terminal::NONE;
            self.stats.discarded += 1;
        }
        log::debug!("resynchronized in state {}", self.states.peek().0);
        Ok(())
    }

    fn describe(&self, token: Terminal, expecting: Option<StateId>) -> String {
        let mut message = String::from("syntax error, unexpected ");
        message.push_str(&self.name(token));
        let expected = expecting.map_or_else(Vec::new, |state| self.tables.expected(state));
        if !expected.is_empty() && expected.len() < MAX_LISTED_EXPECTED {
            message.push_str(", expecting ");
            for (i, terminal) in expected.iter().enumerate() {
                if i > 0 {
                    message.push_str(if i + 1 == expected.len() { " or " } else { ", " });
                }
                message.push_str(&self.name(*terminal));
            }
        }
        message
    }

    fn name(&self, terminal: Terminal) -> String {
        self.actions.terminal_name(self.tables, terminal)
    }

    fn push(&mut self, state: StateId, value: A::Value, span: A::Span) -> Result<(), ParseError> {
        if self.states.depth() >= self.max_depth {
            return Err(ParseError::StackOverflow {
                limit: self.max_depth,
            });
        }
        self.states.push(state);
        self.values.push(value);
        self.spans.push(span);
        Ok(())
    }

    fn pop(&mut self, n: usize) {
        self.states.discard(n);
        self.values.discard(n);
        self.spans.discard(n);
    }

    fn in_sync(&self) -> bool {
        self.states.depth() == self.values.depth() && self.values.depth() == self.spans.depth()
    }

    fn dump_state(&self) {
        let mut output = String::new();
        for state in self.states.iter() {
            output.push_str(&format!("<{}>  ", state.0));
        }
        if !self.lookahead.is_none() {
            output.push_str("<-  ");
            output.push_str(&self.name(self.lookahead));
        }
        log::trace!("{}", output);
    }
}
