//! # Mathematical Evaluation Adapter
//!
//! File: dialog/src/logic/math.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Finds an arithmetic expression inside the input and answers with its value:
//! `"What is 4 + 9?"` gets `"4 + 9 = 13"`, `"what is four plus nine"` gets
//! `"four plus nine = 13"`.
//!
//! ## Architecture
//!
//! 1. **Lexing**: the input is split into numbers, operator symbols, words and
//!    everything else, keeping byte offsets into the original text.
//! 2. **Classification**: words become math tokens where possible: number
//!    words (`"twenty-one"`, `"two hundred"`) and operator words (`"plus"`,
//!    `"divided by"`, `"to the power of"`). Anything else breaks the
//!    expression.
//! 3. **Selection**: the longest run of math tokens that holds at least two
//!    numbers and evaluates cleanly is the expression. Dangling operators at
//!    either end are trimmed first.
//! 4. **Evaluation**: recursive descent with the usual precedence; `^` binds
//!    tightest and is right-associative, unary minus binds looser than `^`.
//!
//! Division by zero, unbalanced parentheses, nesting deeper than
//! [`MAX_NESTING`] and non-finite results make the input unprocessable rather
//! than producing an error.
//!
//! `can_process` and `process` are called back to back with the same input;
//! the last evaluation is cached so the text is only parsed once.
//!
use super::LogicAdapter;
use crate::error::Result;
use crate::statement::Statement;
use crate::storage::SqlStorage;
use std::cell::RefCell;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(Op),
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq)]
enum LexemeKind {
    Number(f64),
    Symbol(char),
    Word(String),
    Other,
}

#[derive(Debug, Clone)]
struct Lexeme {
    kind: LexemeKind,
    start: usize,
    end: usize,
}

/// A math token with the byte span of the text it came from.
#[derive(Debug, Clone, Copy)]
struct Spanned {
    token: Token,
    start: usize,
    end: usize,
}

/// Deepest nesting of parentheses, signs and exponents the parser follows.
pub const MAX_NESTING: usize = 64;

#[derive(Error, Debug, PartialEq)]
enum MathError {
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unexpected token {0:?}")]
    UnexpectedToken(Token),
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NotFinite,
    #[error("expression nests deeper than {MAX_NESTING} levels")]
    TooDeep,
}

/// An expression found in the input and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The expression exactly as the user wrote it.
    pub expression: String,
    pub value: f64,
}

impl Evaluation {
    /// `"<expression> = <value>"`, whole values without a decimal part.
    pub fn answer(&self) -> String {
        format!("{} = {}", self.expression, format_number(self.value))
    }
}

#[derive(Debug, Default)]
pub struct MathematicalEvaluation {
    /// Input text and result of the most recent evaluation.
    last: RefCell<Option<(String, Option<Evaluation>)>>,
}

impl MathematicalEvaluation {
    pub fn new() -> Self {
        Self::default()
    }

    /// [`evaluate`](Self::evaluate), reusing the previous result for the same text.
    fn evaluate_cached(&self, text: &str) -> Option<Evaluation> {
        if let Some((cached_text, evaluation)) = self.last.borrow().as_ref() {
            if cached_text == text {
                return evaluation.clone();
            }
        }
        let evaluation = self.evaluate(text);
        *self.last.borrow_mut() = Some((text.to_string(), evaluation.clone()));
        evaluation
    }

    /// The longest evaluable expression in `text`, if any.
    pub fn evaluate(&self, text: &str) -> Option<Evaluation> {
        let mut best: Option<(usize, Evaluation)> = None;
        for run in token_runs(&lex(text)) {
            let Some(run) = trim_run(&run) else {
                continue;
            };
            let tokens: Vec<Token> = run.iter().map(|s| s.token).collect();
            let numbers = tokens
                .iter()
                .filter(|t| matches!(t, Token::Number(_)))
                .count();
            if numbers < 2 {
                continue;
            }
            match evaluate_tokens(&tokens) {
                Ok(value) => {
                    if best.as_ref().map_or(true, |(len, _)| tokens.len() > *len) {
                        let expression = text[run[0].start..run[run.len() - 1].end].to_string();
                        best = Some((tokens.len(), Evaluation { expression, value }));
                    }
                }
                Err(e) => debug!("Skipping expression candidate: {}", e),
            }
        }
        best.map(|(_, evaluation)| evaluation)
    }
}

impl LogicAdapter for MathematicalEvaluation {
    fn name(&self) -> &str {
        "math"
    }

    fn can_process(&self, input: &Statement) -> bool {
        self.evaluate_cached(&input.text).is_some()
    }

    fn process(&self, input: &Statement, _storage: &SqlStorage) -> Result<Statement> {
        Ok(match self.evaluate_cached(&input.text) {
            Some(evaluation) => Statement::new(evaluation.answer()).confidence(1.0),
            None => Statement::new(input.text.clone()).confidence(0.0),
        })
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

// --- Lexing ---

fn lex(text: &str) -> Vec<Lexeme> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map_or(text.len(), |(b, _)| *b);
    let is_digit_at = |i: usize| chars.get(i).is_some_and(|(_, c)| c.is_ascii_digit());
    let is_alpha_at = |i: usize| chars.get(i).is_some_and(|(_, c)| c.is_alphabetic());

    let mut lexemes = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (start, c) = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let (kind, next) = if c.is_ascii_digit() || (c == '.' && is_digit_at(i + 1)) {
            let mut j = i;
            let mut seen_dot = false;
            while j < chars.len() {
                let cj = chars[j].1;
                if cj.is_ascii_digit() {
                    j += 1;
                } else if cj == '.' && !seen_dot && is_digit_at(j + 1) {
                    seen_dot = true;
                    j += 1;
                } else {
                    break;
                }
            }
            match text[start..byte_at(j)].parse::<f64>() {
                Ok(value) => (LexemeKind::Number(value), j),
                Err(_) => (LexemeKind::Other, j),
            }
        } else if "+-*/^()×÷".contains(c) {
            (LexemeKind::Symbol(c), i + 1)
        } else if c.is_alphabetic() {
            let mut j = i + 1;
            while is_alpha_at(j) || (chars.get(j).is_some_and(|(_, c)| *c == '-') && is_alpha_at(j + 1)) {
                j += 1;
            }
            (LexemeKind::Word(text[start..byte_at(j)].to_lowercase()), j)
        } else {
            (LexemeKind::Other, i + 1)
        };

        lexemes.push(Lexeme {
            kind,
            start,
            end: byte_at(next),
        });
        i = next;
    }
    lexemes
}

// --- Classification ---

#[derive(Debug, Clone, Copy)]
enum NumberPart {
    Small(f64),
    Hundred,
    Scale(f64),
}

fn number_part(word: &str) -> Option<NumberPart> {
    const SMALL: [&str; 20] = [
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen",
        "eighteen", "nineteen",
    ];
    const TENS: [&str; 8] = [
        "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    ];
    if let Some(n) = SMALL.iter().position(|w| *w == word) {
        return Some(NumberPart::Small(n as f64));
    }
    if let Some(n) = TENS.iter().position(|w| *w == word) {
        return Some(NumberPart::Small((n as f64 + 2.0) * 10.0));
    }
    match word {
        "hundred" => Some(NumberPart::Hundred),
        "thousand" => Some(NumberPart::Scale(1e3)),
        "million" => Some(NumberPart::Scale(1e6)),
        "billion" => Some(NumberPart::Scale(1e9)),
        _ => None,
    }
}

fn is_number_word(word: &str) -> bool {
    word.split('-').all(|part| number_part(part).is_some())
}

/// Value of a run of number words, e.g. `["two", "hundred", "forty-two"]` is 242.
fn words_to_number<'a>(words: impl IntoIterator<Item = &'a str>) -> f64 {
    let mut total = 0.0;
    let mut current = 0.0_f64;
    for part in words.into_iter().flat_map(|w| w.split('-')) {
        match number_part(part) {
            Some(NumberPart::Small(v)) => current += v,
            Some(NumberPart::Hundred) => current = current.max(1.0) * 100.0,
            Some(NumberPart::Scale(scale)) => {
                total += current.max(1.0) * scale;
                current = 0.0;
            }
            None => {}
        }
    }
    total + current
}

fn word_at(lexemes: &[Lexeme], i: usize) -> Option<&str> {
    match lexemes.get(i).map(|l| &l.kind) {
        Some(LexemeKind::Word(w)) => Some(w.as_str()),
        _ => None,
    }
}

/// Operator spelled out in words starting at `lexemes[i]`, with the number of
/// words it spans.
fn word_operator(lexemes: &[Lexeme], i: usize) -> Option<(Op, usize)> {
    let next_is = |offset: usize, expected: &str| word_at(lexemes, i + offset) == Some(expected);
    match word_at(lexemes, i)? {
        "plus" => Some((Op::Add, 1)),
        "minus" => Some((Op::Sub, 1)),
        "times" => Some((Op::Mul, 1)),
        "over" => Some((Op::Div, 1)),
        "multiplied" if next_is(1, "by") => Some((Op::Mul, 2)),
        "divided" if next_is(1, "by") => Some((Op::Div, 2)),
        "to" if next_is(1, "the") && next_is(2, "power") && next_is(3, "of") => Some((Op::Pow, 4)),
        _ => None,
    }
}

fn symbol_token(c: char) -> Option<Token> {
    Some(match c {
        '+' => Token::Op(Op::Add),
        '-' => Token::Op(Op::Sub),
        '*' | '×' => Token::Op(Op::Mul),
        '/' | '÷' => Token::Op(Op::Div),
        '^' => Token::Op(Op::Pow),
        '(' => Token::Open,
        ')' => Token::Close,
        _ => return None,
    })
}

/// Maximal runs of consecutive math tokens.
fn token_runs(lexemes: &[Lexeme]) -> Vec<Vec<Spanned>> {
    let mut runs = Vec::new();
    let mut current: Vec<Spanned> = Vec::new();
    let mut i = 0;
    while i < lexemes.len() {
        let lexeme = &lexemes[i];
        let mut used = 1;
        let token = match &lexeme.kind {
            LexemeKind::Number(v) => Some(Token::Number(*v)),
            LexemeKind::Symbol(c) => symbol_token(*c),
            LexemeKind::Word(w) if is_number_word(w) => {
                while word_at(lexemes, i + used).is_some_and(is_number_word) {
                    used += 1;
                }
                let words = (i..i + used).filter_map(|k| word_at(lexemes, k));
                Some(Token::Number(words_to_number(words)))
            }
            LexemeKind::Word(_) => word_operator(lexemes, i).map(|(op, span)| {
                used = span;
                Token::Op(op)
            }),
            LexemeKind::Other => None,
        };

        match token {
            Some(token) => current.push(Spanned {
                token,
                start: lexeme.start,
                end: lexemes[i + used - 1].end,
            }),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
        i += used;
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Drops operators that cannot start or end an expression. A leading minus
/// is kept as a sign.
fn trim_run(run: &[Spanned]) -> Option<&[Spanned]> {
    let mut lo = 0;
    let mut hi = run.len();
    while lo < hi
        && matches!(run[lo].token, Token::Close | Token::Op(Op::Add | Op::Mul | Op::Div | Op::Pow))
    {
        lo += 1;
    }
    while hi > lo && matches!(run[hi - 1].token, Token::Open | Token::Op(_)) {
        hi -= 1;
    }
    (lo < hi).then(|| &run[lo..hi])
}

// --- Evaluation ---

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    /// Runs `parse` one nesting level deeper, failing past [`MAX_NESTING`].
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> std::result::Result<f64, MathError>,
    ) -> std::result::Result<f64, MathError> {
        if self.depth >= MAX_NESTING {
            return Err(MathError::TooDeep);
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> std::result::Result<Token, MathError> {
        let token = self.peek().ok_or(MathError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn expression(&mut self) -> std::result::Result<f64, MathError> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ (Op::Add | Op::Sub))) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Op::Add { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> std::result::Result<f64, MathError> {
        let mut value = self.unary()?;
        while let Some(Token::Op(op @ (Op::Mul | Op::Div))) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = if op == Op::Mul {
                value * rhs
            } else if rhs == 0.0 {
                return Err(MathError::DivisionByZero);
            } else {
                value / rhs
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> std::result::Result<f64, MathError> {
        match self.peek() {
            Some(Token::Op(Op::Sub)) => {
                self.pos += 1;
                Ok(-self.nested(Self::unary)?)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> std::result::Result<f64, MathError> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Op(Op::Pow)) {
            self.pos += 1;
            let exponent = self.nested(Self::unary)?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> std::result::Result<f64, MathError> {
        match self.next()? {
            Token::Number(value) => Ok(value),
            Token::Open => {
                let value = self.nested(Self::expression)?;
                match self.next()? {
                    Token::Close => Ok(value),
                    other => Err(MathError::UnexpectedToken(other)),
                }
            }
            other => Err(MathError::UnexpectedToken(other)),
        }
    }
}

fn evaluate_tokens(tokens: &[Token]) -> std::result::Result<f64, MathError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;
    if let Some(extra) = parser.peek() {
        return Err(MathError::UnexpectedToken(extra));
    }
    if !value.is_finite() {
        return Err(MathError::NotFinite);
    }
    Ok(value)
}
