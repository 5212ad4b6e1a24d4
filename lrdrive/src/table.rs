//! Grammar tables: rules, automaton states and the action-code encoding.
//!
//! A table set is produced once per grammar (normally by an offline
//! generator), validated by [`TablesBuilder::build`], and then shared
//! read-only by any number of parses.
//!
//! # Action codes
//!
//! Every table cell is an [`ActionCode`]:
//!
//! - `n > 0`: shift, then go to state `n`;
//! - `n < 0`: reduce by rule `-n`;
//! - `0`: syntax error.
//!
//! Rule 0 therefore can never be reduced; by convention it holds the
//! augmented `$accept -> Start $end` production. The rule whose reduction
//! finishes the parse is named separately, see [`Tables::accept_rule`].

use crate::TableError;
use indexmap::IndexMap;
use smartstring::alias::String;
use std::fmt;

/// Raw table cell.
pub type ActionCode = i32;

/// A terminal symbol id. Id 0 is reserved for "no lookahead".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Terminal(pub u16);

impl Terminal {
    /// Marks an empty lookahead buffer; never a real token.
    pub const NONE: Terminal = Terminal(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl From<Terminal> for usize {
    fn from(t: Terminal) -> Self {
        t.0 as usize
    }
}

/// A nonterminal symbol id, numbered independently of terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonterminal(pub u16);

impl From<Nonterminal> for usize {
    fn from(n: Nonterminal) -> Self {
        n.0 as usize
    }
}

/// An automaton state number; state 0 is the start state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StateId(pub u32);

impl From<StateId> for usize {
    fn from(s: StateId) -> Self {
        s.0 as usize
    }
}

/// A rule number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub u16);

impl From<RuleId> for usize {
    fn from(r: RuleId) -> Self {
        r.0 as usize
    }
}

/// A grammar symbol on the right-hand side of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(Terminal),
    Nonterminal(Nonterminal),
}

impl From<Terminal> for Symbol {
    fn from(t: Terminal) -> Self {
        Symbol::Terminal(t)
    }
}

impl From<Nonterminal> for Symbol {
    fn from(n: Nonterminal) -> Self {
        Symbol::Nonterminal(n)
    }
}

/// A decoded [`ActionCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(StateId),
    Reduce(RuleId),
    Error,
}

impl Action {
    #[inline]
    pub fn decode(code: ActionCode) -> Self {
        match code {
            0 => Action::Error,
            n if n > 0 => Action::Shift(StateId(n as u32)),
            n => Action::Reduce(RuleId(n.unsigned_abs() as u16)),
        }
    }

    /// Encodes the action as a table cell.
    ///
    /// # Panics
    ///
    /// `Shift(StateId(0))` and `Reduce(RuleId(0))` have no code: both would
    /// encode as `0`, the error cell. The start state is never a shift
    /// target and rule 0 is never reduced.
    #[inline]
    pub fn code(self) -> ActionCode {
        match self {
            Action::Shift(state) => {
                assert!(state.0 != 0, "shift to the start state has no action code");
                state.0 as ActionCode
            }
            Action::Reduce(rule) => {
                assert!(rule.0 != 0, "reduce by rule 0 has no action code");
                -(rule.0 as ActionCode)
            }
            Action::Error => 0,
        }
    }
}

/// A grammar production `lhs -> rhs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub lhs: Nonterminal,
    pub rhs: Vec<Symbol>,
}

impl Rule {
    pub fn new(lhs: Nonterminal, rhs: impl Into<Vec<Symbol>>) -> Self {
        Self {
            lhs,
            rhs: rhs.into(),
        }
    }

    /// Number of right-hand-side symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    /// True for an empty (epsilon) production.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }
}

/// One automaton state.
///
/// A state that makes the same decision for every lookahead carries no
/// lookahead table and is driven by its default action alone; the engine
/// does not fetch a token to act in such a state.
#[derive(Debug, Clone, Default)]
pub struct State {
    actions: Option<IndexMap<Terminal, ActionCode>>,
    gotos: IndexMap<Nonterminal, StateId>,
    default: ActionCode,
}

impl State {
    pub fn builder() -> StateBuilder {
        StateBuilder::default()
    }

    /// Does this state distinguish between lookahead terminals?
    #[inline]
    pub fn has_lookahead(&self) -> bool {
        self.actions.is_some()
    }

    #[inline]
    pub fn default_action(&self) -> ActionCode {
        self.default
    }

    /// The action for `terminal`: its table entry, else the default action.
    #[inline]
    pub fn lookup(&self, terminal: Terminal) -> ActionCode {
        self.entry(terminal).unwrap_or(self.default)
    }

    /// The lookahead-table entry for `terminal`, if there is one.
    #[inline]
    pub fn entry(&self, terminal: Terminal) -> Option<ActionCode> {
        self.actions
            .as_ref()
            .and_then(|actions| actions.get(&terminal).copied())
    }

    #[inline]
    pub fn goto_for(&self, nonterminal: Nonterminal) -> Option<StateId> {
        self.gotos.get(&nonterminal).copied()
    }

    /// Lookahead-table entries in table order.
    pub fn actions(&self) -> impl Iterator<Item = (Terminal, ActionCode)> + '_ {
        self.actions
            .iter()
            .flat_map(|actions| actions.iter().map(|(t, code)| (*t, *code)))
    }

    pub fn gotos(&self) -> impl Iterator<Item = (Nonterminal, StateId)> + '_ {
        self.gotos.iter().map(|(n, s)| (*n, *s))
    }
}

/// Assembles a [`State`].
///
/// ```rust
/// # use lrdrive::{Action, Nonterminal, RuleId, State, StateId, Terminal};
/// let state = State::builder()
///     .on(Terminal(3), Action::Shift(StateId(4)))
///     .on(Terminal(1), Action::Reduce(RuleId(2)))
///     .goto(Nonterminal(1), StateId(5))
///     .build();
/// assert!(state.has_lookahead());
/// assert_eq!(state.lookup(Terminal(3)), 4);
/// assert_eq!(state.lookup(Terminal(9)), 0);
/// ```
#[derive(Debug, Default)]
pub struct StateBuilder {
    actions: IndexMap<Terminal, ActionCode>,
    gotos: IndexMap<Nonterminal, StateId>,
    default: ActionCode,
}

impl StateBuilder {
    pub fn on(self, terminal: Terminal, action: Action) -> Self {
        self.on_code(terminal, action.code())
    }

    pub fn on_code(mut self, terminal: Terminal, code: ActionCode) -> Self {
        self.actions.insert(terminal, code);
        self
    }

    pub fn goto(mut self, nonterminal: Nonterminal, state: StateId) -> Self {
        self.gotos.insert(nonterminal, state);
        self
    }

    /// Action used when the lookahead has no entry, or for every lookahead
    /// when the state has no entries at all.
    pub fn default_action(self, action: Action) -> Self {
        self.default_code(action.code())
    }

    pub fn default_code(mut self, code: ActionCode) -> Self {
        self.default = code;
        self
    }

    pub fn build(self) -> State {
        State {
            actions: (!self.actions.is_empty()).then_some(self.actions),
            gotos: self.gotos,
            default: self.default,
        }
    }
}

/// A complete, validated table set for one grammar.
#[derive(Debug, Clone)]
pub struct Tables {
    rules: Vec<Rule>,
    states: Vec<State>,
    error: Terminal,
    end: Terminal,
    accept: RuleId,
    terminal_names: Vec<String>,
    nonterminal_names: Vec<String>,
}

impl Tables {
    pub fn builder() -> TablesBuilder {
        TablesBuilder::default()
    }

    #[inline]
    pub fn start_state(&self) -> StateId {
        StateId(0)
    }

    /// Panics if `id` is not a rule of this table set.
    #[inline]
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[usize::from(id)]
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Panics if `id` is not a state of this table set.
    #[inline]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[usize::from(id)]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// The terminal shifted synthetically to enter an error-handling state.
    #[inline]
    pub fn error_terminal(&self) -> Terminal {
        self.error
    }

    #[inline]
    pub fn end_terminal(&self) -> Terminal {
        self.end
    }

    /// The rule whose reduction completes a parse.
    #[inline]
    pub fn accept_rule(&self) -> RuleId {
        self.accept
    }

    /// Terminals `state` has a nonzero table entry for, in table order.
    /// The error terminal is left out.
    pub fn expected(&self, state: StateId) -> Vec<Terminal> {
        self.state(state)
            .actions()
            .filter(|&(t, code)| code != 0 && t != self.error)
            .map(|(t, _)| t)
            .collect()
    }

    pub fn terminal_name(&self, terminal: Terminal) -> String {
        match self.terminal_names.get(usize::from(terminal)) {
            Some(name) => name.clone(),
            None => format!("#{}", terminal.0).into(),
        }
    }

    pub fn nonterminal_name(&self, nonterminal: Nonterminal) -> String {
        match self.nonterminal_names.get(usize::from(nonterminal)) {
            Some(name) => name.clone(),
            None => format!("<{}>", nonterminal.0).into(),
        }
    }

    /// Renders `rule` as `Lhs -> a B c`.
    pub fn display_rule(&self, id: RuleId) -> String {
        let rule = self.rule(id);
        let mut out = self.nonterminal_name(rule.lhs);
        out.push_str(" ->");
        for symbol in &rule.rhs {
            out.push(' ');
            match *symbol {
                Symbol::Terminal(t) => out.push_str(&self.terminal_name(t)),
                Symbol::Nonterminal(n) => out.push_str(&self.nonterminal_name(n)),
            }
        }
        out
    }
}

/// Collects the pieces of a [`Tables`] and validates them.
#[derive(Debug)]
pub struct TablesBuilder {
    rules: Vec<Rule>,
    states: Vec<State>,
    error: Terminal,
    end: Terminal,
    accept: RuleId,
    terminal_names: Vec<String>,
    nonterminal_names: Vec<String>,
}

impl Default for TablesBuilder {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            states: Vec::new(),
            error: Terminal(2),
            end: Terminal(1),
            accept: RuleId(1),
            terminal_names: Vec::new(),
            nonterminal_names: Vec::new(),
        }
    }
}

impl TablesBuilder {
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    pub fn states(mut self, states: impl IntoIterator<Item = State>) -> Self {
        self.states.extend(states);
        self
    }

    /// Defaults to terminal 2.
    pub fn error_terminal(mut self, terminal: Terminal) -> Self {
        self.error = terminal;
        self
    }

    /// Defaults to terminal 1.
    pub fn end_terminal(mut self, terminal: Terminal) -> Self {
        self.end = terminal;
        self
    }

    /// Defaults to rule 1.
    pub fn accept_rule(mut self, rule: RuleId) -> Self {
        self.accept = rule;
        self
    }

    /// Names indexed by terminal id; index 0 is never displayed.
    pub fn terminal_names<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.terminal_names = names.into_iter().map(|s| String::from(s.as_ref())).collect();
        self
    }

    /// Names indexed by nonterminal id.
    pub fn nonterminal_names<S: AsRef<str>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.nonterminal_names = names.into_iter().map(|s| String::from(s.as_ref())).collect();
        self
    }

    /// Checks every cross-reference once so the engine can index tables
    /// without further checks.
    pub fn build(self) -> Result<Tables, TableError> {
        if self.states.is_empty() {
            return Err(TableError::NoStates);
        }
        if self.states.len() > ActionCode::MAX as usize {
            return Err(TableError::TooManyStates(self.states.len()));
        }
        if self.error.is_none() {
            return Err(TableError::ReservedTerminal("error"));
        }
        if self.end.is_none() {
            return Err(TableError::ReservedTerminal("end-of-input"));
        }
        let accept = usize::from(self.accept);
        if accept == 0 || accept >= self.rules.len() {
            return Err(TableError::InvalidAcceptRule(accept));
        }
        for (index, state) in self.states.iter().enumerate() {
            self.check_code(index, state.default)?;
            for (terminal, code) in state.actions() {
                if terminal.is_none() {
                    return Err(TableError::ReservedKey { state: index });
                }
                self.check_code(index, code)?;
            }
            for (nonterminal, target) in state.gotos() {
                if usize::from(target) >= self.states.len() {
                    return Err(TableError::GotoOutOfRange {
                        state: index,
                        nonterminal: nonterminal.0,
                        target: target.0,
                    });
                }
            }
        }
        log::debug!(
            "loaded tables: {} rules, {} states",
            self.rules.len(),
            self.states.len()
        );
        Ok(Tables {
            rules: self.rules,
            states: self.states,
            error: self.error,
            end: self.end,
            accept: self.accept,
            terminal_names: self.terminal_names,
            nonterminal_names: self.nonterminal_names,
        })
    }

    fn check_code(&self, state: usize, code: ActionCode) -> Result<(), TableError> {
        if code > 0 {
            if code as usize >= self.states.len() {
                return Err(TableError::ShiftOutOfRange {
                    state,
                    target: code as usize,
                });
            }
        } else if code < 0 {
            let rule = code.unsigned_abs() as usize;
            if rule >= self.rules.len() || rule > u16::MAX as usize {
                return Err(TableError::UnknownRule { state, rule });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Tables {
    /// Dumps the automaton in a yacc-like listing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..self.rules.len() {
            writeln!(f, "rule {index}: {}", self.display_rule(RuleId(index as u16)))?;
        }
        for (index, state) in self.states.iter().enumerate() {
            writeln!(f, "state {index}:")?;
            for (terminal, code) in state.actions() {
                writeln!(
                    f,
                    "    {:<12} {:?}",
                    self.terminal_name(terminal),
                    Action::decode(code)
                )?;
            }
            writeln!(f, "    {:<12} {:?}", "$default", Action::decode(state.default))?;
            for (nonterminal, target) in state.gotos() {
                writeln!(
                    f,
                    "    {:<12} goto {}",
                    self.nonterminal_name(nonterminal),
                    target.0
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(id: u16) -> Terminal {
        Terminal(id)
    }

    fn rules() -> Vec<Rule> {
        vec![
            Rule::new(
                Nonterminal(0),
                vec![Symbol::Nonterminal(Nonterminal(1)), Symbol::Terminal(t(1))],
            ),
            Rule::new(Nonterminal(1), vec![Symbol::Terminal(t(3))]),
        ]
    }

    #[test]
    fn action_codes_decode_by_sign() {
        assert_eq!(Action::decode(7), Action::Shift(StateId(7)));
        assert_eq!(Action::decode(-3), Action::Reduce(RuleId(3)));
        assert_eq!(Action::decode(0), Action::Error);
        assert_eq!(Action::Reduce(RuleId(12)).code(), -12);
        assert_eq!(Action::Shift(StateId(4)).code(), 4);
    }

    #[test]
    #[should_panic(expected = "shift to the start state")]
    fn shift_to_start_state_cannot_be_encoded() {
        let _ = State::builder().on(t(3), Action::Shift(StateId(0)));
    }

    #[test]
    #[should_panic(expected = "reduce by rule 0")]
    fn reduce_by_rule_zero_cannot_be_encoded() {
        let _ = State::builder().default_action(Action::Reduce(RuleId(0)));
    }

    #[test]
    fn state_without_entries_has_no_lookahead_table() {
        let state = State::builder()
            .default_action(Action::Reduce(RuleId(1)))
            .build();
        assert!(!state.has_lookahead());
        assert_eq!(state.lookup(t(5)), -1);
        assert_eq!(state.entry(t(5)), None);
    }

    #[test]
    fn table_entry_overrides_default() {
        let state = State::builder()
            .on(t(3), Action::Shift(StateId(1)))
            .default_action(Action::Reduce(RuleId(1)))
            .goto(Nonterminal(1), StateId(0))
            .build();
        assert_eq!(state.lookup(t(3)), 1);
        assert_eq!(state.lookup(t(4)), -1);
        assert_eq!(state.goto_for(Nonterminal(1)), Some(StateId(0)));
        assert_eq!(state.goto_for(Nonterminal(2)), None);
    }

    #[test]
    fn builds_and_names_symbols() {
        let tables = Tables::builder()
            .rules(rules())
            .state(State::builder().on(t(3), Action::Shift(StateId(1))).build())
            .state(State::builder().default_action(Action::Reduce(RuleId(1))).build())
            .terminal_names(["", "$end", "error", "'x'"])
            .nonterminal_names(["$accept", "S"])
            .build()
            .unwrap();
        assert_eq!(tables.terminal_name(t(3)).as_str(), "'x'");
        assert_eq!(tables.terminal_name(t(9)).as_str(), "#9");
        assert_eq!(tables.nonterminal_name(Nonterminal(7)).as_str(), "<7>");
        assert_eq!(tables.display_rule(RuleId(0)).as_str(), "$accept -> S $end");
        assert_eq!(tables.expected(StateId(0)), vec![t(3)]);
        assert!(tables.expected(StateId(1)).is_empty());
        assert!(tables.to_string().contains("state 1:"));
    }

    #[test]
    fn expected_skips_errors_and_the_error_terminal() {
        let tables = Tables::builder()
            .rules(rules())
            .state(
                State::builder()
                    .on(t(2), Action::Shift(StateId(1)))
                    .on(t(4), Action::Error)
                    .on(t(3), Action::Shift(StateId(1)))
                    .build(),
            )
            .state(State::builder().default_action(Action::Reduce(RuleId(1))).build())
            .build()
            .unwrap();
        assert_eq!(tables.expected(StateId(0)), vec![t(3)]);
    }

    #[test]
    fn rejects_out_of_range_references() {
        let shift = Tables::builder()
            .rules(rules())
            .state(State::builder().on(t(3), Action::Shift(StateId(5))).build())
            .build();
        assert_eq!(
            shift.unwrap_err(),
            TableError::ShiftOutOfRange { state: 0, target: 5 }
        );

        let reduce = Tables::builder()
            .rules(rules())
            .state(State::builder().default_code(-9).build())
            .build();
        assert_eq!(
            reduce.unwrap_err(),
            TableError::UnknownRule { state: 0, rule: 9 }
        );

        let goto = Tables::builder()
            .rules(rules())
            .state(State::builder().goto(Nonterminal(1), StateId(3)).build())
            .build();
        assert!(matches!(goto, Err(TableError::GotoOutOfRange { target: 3, .. })));
    }

    #[test]
    fn rejects_reserved_ids() {
        let key = Tables::builder()
            .rules(rules())
            .state(State::builder().on(Terminal::NONE, Action::Error).build())
            .build();
        assert_eq!(key.unwrap_err(), TableError::ReservedKey { state: 0 });

        let end = Tables::builder()
            .rules(rules())
            .state(State::default())
            .end_terminal(Terminal::NONE)
            .build();
        assert!(matches!(end, Err(TableError::ReservedTerminal(_))));

        let accept = Tables::builder()
            .rules(rules())
            .state(State::default())
            .accept_rule(RuleId(0))
            .build();
        assert_eq!(accept.unwrap_err(), TableError::InvalidAcceptRule(0));
    }

    #[test]
    fn rejects_empty_state_table() {
        let err = Tables::builder().rules(rules()).build().unwrap_err();
        assert_eq!(err, TableError::NoStates);
    }
}
