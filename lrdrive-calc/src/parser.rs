//! # Calculator Parser
//!
//! This module couples the calculator's parse tables with its semantic
//! actions. It exposes:
//!
//! - [`CalcActions`]: the reduction hooks, evaluating expressions as they
//!   are reduced and storing assignments in a [`SymTab`],
//! - [`CalcParser`]: owns the tables and the scanner automaton, and
//!   evaluates whole programs into an [`Evaluation`].
//!
//! ## Behavior highlights
//! - **Statements** are `Expr ;` or `ident = Expr ;`. Each completed
//!   statement is recorded with its value and location.
//! - **Syntax errors** are recovered from at statement level through the
//!   `Stmt -> error ';'` rule; the skipped statement is recorded with no
//!   value.
//! - **Undefined variables** and **overflow** are semantic errors: the
//!   statement is abandoned as if it had a syntax error, and evaluation
//!   continues with the next one.
//! - **Division by zero** stops evaluation.

use crate::parser_data::{self, ProdID};
use crate::{CalcError, Diagnostic, Lexicon, SymTab, TokenValue};
use lrdrive::{
    Actions, Control, DEFAULT_MAX_DEPTH, Engine, ParseError, ParserStats, Reduction, Span, Tables,
};

/// One statement of the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub span: Span,
    /// `None` for a statement skipped by error recovery.
    pub value: Option<i64>,
}

/// Everything an evaluation produced.
#[derive(Debug)]
pub struct Evaluation {
    pub statements: Vec<Statement>,
    /// Lexical and syntax errors, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
    /// Semantic errors the evaluation recovered from.
    pub errors: Vec<CalcError>,
    /// `Err` if the parse stopped before the end of input.
    pub outcome: Result<(), CalcError>,
    pub stats: ParserStats,
}

impl Evaluation {
    /// True when the whole program was evaluated without any error.
    pub fn is_clean(&self) -> bool {
        self.outcome.is_ok() && self.diagnostics.is_empty() && self.errors.is_empty()
    }

    pub fn values(&self) -> Vec<Option<i64>> {
        self.statements.iter().map(|s| s.value).collect()
    }
}

fn number(value: &TokenValue) -> i64 {
    let TokenValue::Number(n) = value else {
        unreachable!("expected a number, found {value:?}")
    };
    *n
}

/// Semantic actions for the calculator grammar.
pub struct CalcActions<'s> {
    symtab: &'s mut SymTab,
    statements: Vec<Statement>,
    errors: Vec<CalcError>,
    fatal: Option<CalcError>,
}

impl<'s> CalcActions<'s> {
    pub fn new(symtab: &'s mut SymTab) -> Self {
        Self {
            symtab,
            statements: Vec::new(),
            errors: Vec::new(),
            fatal: None,
        }
    }

    fn statement(&mut self, span: Span, value: Option<i64>) {
        log::debug!("statement at {span}: {value:?}");
        self.statements.push(Statement { span, value });
    }

    fn checked(&mut self, result: Option<i64>, span: Span, value: &mut TokenValue) -> Control {
        match result {
            Some(n) => {
                *value = TokenValue::Number(n);
                Control::Continue
            }
            None => {
                self.errors.push(CalcError::Overflow { span });
                Control::Error
            }
        }
    }
}

impl Actions for CalcActions<'_> {
    type Value = TokenValue;
    type Span = Span;

    fn reduce(
        &mut self,
        reduction: Reduction<'_, TokenValue, Span>,
        value: &mut TokenValue,
    ) -> Control {
        let Some(prod) = ProdID::from_rule(reduction.rule_id) else {
            unreachable!("unknown rule {}", reduction.rule_id.0)
        };
        let values = reduction.values;
        let span = *reduction.span;
        match prod {
            ProdID::Start => {
                // $accept -> Program $end
                // never reduced
                unreachable!()
            }
            ProdID::Program | ProdID::Stmts1 | ProdID::Stmts2 => {
                // Program -> Stmts
                // Stmts -> | Stmts Stmt
            }
            ProdID::Stmt1 => {
                // Stmt -> Expr ;
                self.statement(span, Some(number(&values[0])));
                *value = TokenValue::None;
            }
            ProdID::Stmt2 => {
                // Stmt -> ident = Expr ;
                let TokenValue::Ident(name) = &values[0] else {
                    unreachable!()
                };
                let n = number(&values[2]);
                self.symtab.assign(name, n);
                self.statement(span, Some(n));
                *value = TokenValue::None;
            }
            ProdID::Stmt3 => {
                // Stmt -> error ;
                self.statement(span, None);
            }
            ProdID::Expr1 => {
                // Expr -> Expr + Term
                let sum = number(&values[0]).checked_add(number(&values[2]));
                return self.checked(sum, span, value);
            }
            ProdID::Expr2 => {
                // Expr -> Expr - Term
                let difference = number(&values[0]).checked_sub(number(&values[2]));
                return self.checked(difference, span, value);
            }
            ProdID::Term1 => {
                // Term -> Term * Factor
                let product = number(&values[0]).checked_mul(number(&values[2]));
                return self.checked(product, span, value);
            }
            ProdID::Term2 => {
                // Term -> Term / Factor
                let divisor = number(&values[2]);
                if divisor == 0 {
                    self.fatal = Some(CalcError::DivisionByZero { span });
                    return Control::Abort;
                }
                let quotient = number(&values[0]).checked_div(divisor);
                return self.checked(quotient, span, value);
            }
            ProdID::Expr3 | ProdID::Term3 | ProdID::Factor1 => {
                // Expr -> Term
                // Term -> Factor
                // Factor -> number
            }
            ProdID::Factor2 => {
                // Factor -> ident
                let TokenValue::Ident(name) = &values[0] else {
                    unreachable!()
                };
                match self.symtab.lookup(name) {
                    Some(n) => *value = TokenValue::Number(n),
                    None => {
                        self.errors.push(CalcError::Undefined {
                            name: name.clone(),
                            span,
                        });
                        return Control::Error;
                    }
                }
            }
            ProdID::Factor3 => {
                // Factor -> ( Expr )
                *value = values[1].clone();
            }
            ProdID::Factor4 => {
                // Factor -> - Factor
                let negated = number(&values[1]).checked_neg();
                return self.checked(negated, span, value);
            }
        }
        Control::Continue
    }
}

/// The calculator front end: scanner automaton plus parse tables.
///
/// Both are built once by [`try_new`](CalcParser::try_new) and reused by
/// every [`evaluate`](CalcParser::evaluate) call.
///
/// # Example
///
/// ```rust
/// # use lrdrive_calc::{CalcParser, SymTab};
/// let parser = CalcParser::try_new().unwrap();
/// let mut symtab = SymTab::new();
/// let eval = parser.evaluate("hello = 1;\n foo =\n 5 + 3 * 2;\n (foo + hello) * -2;", &mut symtab);
/// assert_eq!(eval.values(), vec![Some(1), Some(11), Some(-24)]);
/// assert_eq!(symtab.len(), 2);
/// ```
#[derive(Debug)]
pub struct CalcParser {
    lexicon: Lexicon,
    tables: Tables,
    max_depth: usize,
}

impl CalcParser {
    pub fn try_new() -> Result<Self, CalcError> {
        Ok(Self {
            lexicon: Lexicon::try_new()?,
            tables: parser_data::tables()?,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Limits parser stack depth, bounding expression nesting.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Evaluates every statement of `source`, reading and updating
    /// variables in `symtab`.
    pub fn evaluate(&self, source: &str, symtab: &mut SymTab) -> Evaluation {
        let lexer = self.lexicon.scan(source);
        let actions = CalcActions::new(symtab);
        let mut engine = Engine::new(&self.tables, lexer, actions).with_max_depth(self.max_depth);
        let result = engine.parse();
        let stats = engine.stats();
        let (lexer, actions) = engine.into_parts();
        let CalcActions {
            statements,
            errors,
            fatal,
            ..
        } = actions;
        let outcome = match result {
            Ok(_) => Ok(()),
            Err(ParseError::Aborted) => Err(fatal.unwrap_or(CalcError::Parse(ParseError::Aborted))),
            Err(err) => Err(err.into()),
        };
        Evaluation {
            statements,
            diagnostics: lexer.into_diagnostics(),
            errors,
            outcome,
            stats,
        }
    }
}
