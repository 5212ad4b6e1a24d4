//! Hand-built automata and fixtures shared by the engine tests.

use crate::{
    Action, Actions, Control, Nonterminal, Reduction, Rule, RuleId, Scanner, State, StateId,
    Symbol, Tables, Terminal,
};
use smartstring::alias::String;
use std::ops::Range;

pub const END: Terminal = Terminal(1);
pub const ERROR: Terminal = Terminal(2);

fn t(id: u16) -> Symbol {
    Symbol::Terminal(Terminal(id))
}

fn n(id: u16) -> Symbol {
    Symbol::Nonterminal(Nonterminal(id))
}

fn shift(target: u32) -> Action {
    Action::Shift(StateId(target))
}

/// `S -> A B`, `A -> a`, `B -> b`.
pub mod pair {
    use super::*;

    pub const A: Terminal = Terminal(3);
    pub const B: Terminal = Terminal(4);

    const NT_A: Nonterminal = Nonterminal(2);
    const NT_B: Nonterminal = Nonterminal(3);

    pub fn tables() -> Tables {
        Tables::builder()
            .rules([
                Rule::new(Nonterminal(0), vec![n(1), t(1)]),
                Rule::new(Nonterminal(1), vec![n(2), n(3)]),
                Rule::new(NT_A, vec![t(3)]),
                Rule::new(NT_B, vec![t(4)]),
            ])
            .states([
                State::builder().on(A, shift(1)).goto(NT_A, StateId(2)).build(),
                State::builder().default_action(Action::Reduce(RuleId(2))).build(),
                State::builder().on(B, shift(3)).goto(NT_B, StateId(4)).build(),
                State::builder().default_action(Action::Reduce(RuleId(3))).build(),
                State::builder().on(END, Action::Reduce(RuleId(1))).build(),
            ])
            .terminal_names(["", "$end", "error", "'a'", "'b'"])
            .nonterminal_names(["$accept", "S", "A", "B"])
            .build()
            .unwrap()
    }

    pub fn scan(source: &str) -> VecScanner {
        VecScanner::lex(source, |word| if word == "a" { A } else { B })
    }
}

/// A statement list with an error production and two empty rules:
///
/// ```text
/// Start -> List
/// List  -> ε | List Stmt
/// Stmt  -> Item ';' | error ';'
/// Item  -> Word
/// Word  -> x Opt
/// Opt   -> ε | '!'
/// ```
pub mod stmts {
    use super::*;

    pub const X: Terminal = Terminal(3);
    pub const SEMI: Terminal = Terminal(4);
    pub const BANG: Terminal = Terminal(5);

    pub const START: RuleId = RuleId(1);
    pub const LIST_EMPTY: RuleId = RuleId(2);
    pub const LIST_MORE: RuleId = RuleId(3);
    pub const STMT: RuleId = RuleId(4);
    pub const ERROR_STMT: RuleId = RuleId(5);
    pub const ITEM: RuleId = RuleId(6);
    pub const WORD: RuleId = RuleId(7);
    pub const OPT_EMPTY: RuleId = RuleId(8);
    pub const OPT_BANG: RuleId = RuleId(9);

    const LIST: Nonterminal = Nonterminal(2);
    const STMT_NT: Nonterminal = Nonterminal(3);
    const ITEM_NT: Nonterminal = Nonterminal(4);
    const WORD_NT: Nonterminal = Nonterminal(5);
    const OPT: Nonterminal = Nonterminal(6);

    fn reduce(rule: RuleId) -> State {
        State::builder().default_action(Action::Reduce(rule)).build()
    }

    pub fn tables() -> Tables {
        Tables::builder()
            .rules([
                Rule::new(Nonterminal(0), vec![n(1), t(1)]),
                Rule::new(Nonterminal(1), vec![n(2)]),
                Rule::new(LIST, Vec::<Symbol>::new()),
                Rule::new(LIST, vec![n(2), n(3)]),
                Rule::new(STMT_NT, vec![n(4), t(4)]),
                Rule::new(STMT_NT, vec![t(2), t(4)]),
                Rule::new(ITEM_NT, vec![n(5)]),
                Rule::new(WORD_NT, vec![t(3), n(6)]),
                Rule::new(OPT, Vec::<Symbol>::new()),
                Rule::new(OPT, vec![t(5)]),
            ])
            .states([
                // 0
                State::builder()
                    .default_action(Action::Reduce(LIST_EMPTY))
                    .goto(LIST, StateId(1))
                    .build(),
                // 1
                State::builder()
                    .on(END, Action::Reduce(START))
                    .on(ERROR, shift(2))
                    .on(X, shift(3))
                    .goto(STMT_NT, StateId(4))
                    .goto(ITEM_NT, StateId(5))
                    .goto(WORD_NT, StateId(6))
                    .build(),
                // 2
                State::builder().on(SEMI, shift(7)).build(),
                // 3
                State::builder()
                    .on(BANG, shift(8))
                    .on(SEMI, Action::Reduce(OPT_EMPTY))
                    .goto(OPT, StateId(9))
                    .build(),
                // 4
                reduce(LIST_MORE),
                // 5
                State::builder().on(SEMI, shift(10)).build(),
                // 6
                reduce(ITEM),
                // 7
                reduce(ERROR_STMT),
                // 8
                reduce(OPT_BANG),
                // 9
                reduce(WORD),
                // 10
                reduce(STMT),
            ])
            .terminal_names(["", "$end", "error", "x", "';'", "'!'"])
            .nonterminal_names(["$accept", "Start", "List", "Stmt", "Item", "Word", "Opt"])
            .build()
            .unwrap()
    }

    pub fn scan(source: &str) -> VecScanner {
        VecScanner::lex(source, |word| match word {
            ";" => SEMI,
            "!" => BANG,
            _ => X,
        })
    }
}

/// `Start -> Key`, `Key -> do | if | in | is | of | or | to`: a start state
/// with seven possible tokens. Any other word scans as `word`.
pub mod wide {
    use super::*;

    pub const KEYWORDS: [&str; 7] = ["do", "if", "in", "is", "of", "or", "to"];
    pub const WORD: Terminal = Terminal(10);

    const KEY: Nonterminal = Nonterminal(2);

    fn keyword(index: usize) -> Terminal {
        Terminal(3 + index as u16)
    }

    pub fn tables() -> Tables {
        let start = (0..KEYWORDS.len()).fold(
            State::builder().goto(KEY, StateId(8)),
            |state, i| state.on(keyword(i), shift(1 + i as u32)),
        );
        let keys = (0..KEYWORDS.len()).map(|i| {
            State::builder()
                .default_action(Action::Reduce(RuleId(2 + i as u16)))
                .build()
        });
        Tables::builder()
            .rule(Rule::new(Nonterminal(0), vec![n(1), t(1)]))
            .rule(Rule::new(Nonterminal(1), vec![n(2)]))
            .rules((0..KEYWORDS.len()).map(|i| Rule::new(KEY, vec![Symbol::Terminal(keyword(i))])))
            .state(start.build())
            .states(keys)
            .state(State::builder().on(END, Action::Reduce(RuleId(1))).build())
            .terminal_names(["", "$end", "error"].into_iter().chain(KEYWORDS).chain(["word"]))
            .nonterminal_names(["$accept", "Start", "Key"])
            .build()
            .unwrap()
    }

    pub fn scan(source: &str) -> VecScanner {
        VecScanner::lex(source, |word| {
            KEYWORDS
                .iter()
                .position(|k| *k == word)
                .map_or(WORD, keyword)
        })
    }
}

/// Serves pre-lexed tokens with byte-range spans and keeps every
/// diagnostic it receives.
pub struct VecScanner {
    tokens: Vec<(Terminal, String, Range<usize>)>,
    next: usize,
    len: usize,
    value: String,
    span: Range<usize>,
    pub fetched: usize,
    pub diagnostics: Vec<(std::string::String, Range<usize>)>,
}

impl VecScanner {
    /// Splits `source` on whitespace; `;` and `!` are always tokens of
    /// their own.
    pub fn lex(source: &str, classify: impl Fn(&str) -> Terminal) -> Self {
        let is_punct = |c: char| matches!(c, ';' | '!');
        let mut tokens = Vec::new();
        let mut chars = source.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            if c.is_whitespace() {
                continue;
            }
            let mut end = start + c.len_utf8();
            if !is_punct(c) {
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_whitespace() || is_punct(c) {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
            }
            let text = &source[start..end];
            tokens.push((classify(text), String::from(text), start..end));
        }
        Self {
            tokens,
            next: 0,
            len: source.len(),
            value: String::new(),
            span: 0..0,
            fetched: 0,
            diagnostics: Vec::new(),
        }
    }
}

impl Scanner for VecScanner {
    type Value = String;
    type Span = Range<usize>;

    fn next_token(&mut self) -> Terminal {
        self.fetched += 1;
        match self.tokens.get(self.next) {
            Some((terminal, text, span)) => {
                self.next += 1;
                self.value = text.clone();
                self.span = span.clone();
                *terminal
            }
            None => {
                self.value = String::new();
                self.span = self.len..self.len;
                END
            }
        }
    }

    fn value(&mut self) -> String {
        std::mem::take(&mut self.value)
    }

    fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    fn report_error(&mut self, message: &str, span: &Range<usize>) {
        self.diagnostics.push((message.to_string(), span.clone()));
    }
}

#[derive(Debug)]
pub struct Reduced {
    pub rule: RuleId,
    pub value: String,
    pub span: Range<usize>,
}

/// Records every reduction. Rules with two or more symbols produce their
/// non-empty child values joined by spaces; shorter rules keep the default.
pub struct Recorder {
    pub reductions: Vec<Reduced>,
    control: Box<dyn FnMut(RuleId, &str) -> Control>,
}

impl Recorder {
    pub fn with_control(control: impl FnMut(RuleId, &str) -> Control + 'static) -> Self {
        Self {
            reductions: Vec::new(),
            control: Box::new(control),
        }
    }

    /// The first reduction by `rule`.
    pub fn find(&self, rule: RuleId) -> &Reduced {
        self.reductions
            .iter()
            .find(|r| r.rule == rule)
            .unwrap_or_else(|| panic!("rule {} was never reduced", rule.0))
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::with_control(|_, _| Control::Continue)
    }
}

impl Actions for Recorder {
    type Value = String;
    type Span = Range<usize>;

    fn reduce(
        &mut self,
        reduction: Reduction<'_, String, Range<usize>>,
        value: &mut String,
    ) -> Control {
        assert_eq!(reduction.values.len(), reduction.rule.len());
        assert_eq!(reduction.spans.len(), reduction.rule.len());
        if reduction.values.len() > 1 {
            let parts: Vec<&str> = reduction
                .values
                .iter()
                .map(|v| v.as_str())
                .filter(|v| !v.is_empty())
                .collect();
            *value = parts.join(" ").into();
        }
        self.reductions.push(Reduced {
            rule: reduction.rule_id,
            value: value.clone(),
            span: reduction.span.clone(),
        });
        (self.control)(reduction.rule_id, value.as_str())
    }
}
