//! Single-pass translation from C-- source to quads.
//!
//! Parsing and code generation are interleaved: every construct is emitted
//! into the [`CompilationContext`] as soon as it is recognised, with no tree
//! in between.
//!
//! Frame layout: parameters occupy slots `0..n` above the frame pointer `I1`,
//! locals follow. `I2` points at the first free stack slot. A call stores the
//! return address, the caller's frame pointer and the live temporaries, then
//! the arguments, and moves `I1` to the first argument slot.

use cmm_quads::{Opcode, Register};
use log::debug;

use super::lexer::{Token, TokenKind, lex, token_text};
use super::scope::{Frame, ReturnType, Signature, Signatures};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Span};
use crate::emit::{CompilationContext, EmitError};

/// Emit one quad: mnemonic followed by space-separated operands.
macro_rules! quad {
    ($this:expr, $op:expr $(, $operand:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut text = String::from(Opcode::mnemonic($op));
        $(
            text.push(' ');
            text.push_str(&$operand.to_string());
        )*
        $this.ctx.emit(text)
    }};
}

/// Why translation stopped before the end of the source.
#[derive(Debug)]
pub(crate) enum Abort {
    /// A lexical or syntax error was reported.
    Syntax,
    RecursionLimit,
    Emit(EmitError),
}

impl From<EmitError> for Abort {
    fn from(err: EmitError) -> Self {
        Abort::Emit(err)
    }
}

type PResult<T> = Result<T, Abort>;

pub(crate) struct Translator<'src, 'ctx> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    ctx: &'ctx mut CompilationContext,
    diagnostics: Diagnostics,
    signatures: Signatures<'src>,
    depth: u32,
    recursion_fuel: u32,
}

impl<'src, 'ctx> Translator<'src, 'ctx> {
    pub fn new(source: &'src str, ctx: &'ctx mut CompilationContext, recursion_fuel: u32) -> Self {
        Self {
            source,
            tokens: lex(source),
            pos: 0,
            ctx,
            diagnostics: Diagnostics::new(),
            signatures: Signatures::default(),
            depth: 0,
            recursion_fuel,
        }
    }

    /// Translate the whole source.
    ///
    /// Diagnostics are returned even when translation aborts.
    pub fn translate(mut self) -> (Result<(), Abort>, Diagnostics) {
        let result = self.parse_program();
        (result, self.diagnostics)
    }

    fn parse_program(&mut self) -> PResult<()> {
        while self.peek().is_some() {
            self.parse_item()?;
        }
        Ok(())
    }

    fn parse_item(&mut self) -> PResult<()> {
        let returns = self.parse_type()?;
        let (name, name_span) = self.expect_ident()?;
        self.expect(TokenKind::ParenOpen)?;
        let params = self.parse_params()?;
        self.expect(TokenKind::ParenClose)?;

        if self.eat(TokenKind::Semicolon) {
            self.declare_prototype(name, name_span, returns, params.len());
            return Ok(());
        }
        if !self.at(TokenKind::BraceOpen) {
            return Err(self.unexpected(DiagnosticKind::UnexpectedToken, Some("`;` or `{`")));
        }

        let arity = params.len();
        self.define_function(name, name_span, returns, arity)?;

        let mut frame = Frame::new(name, returns);
        for (param, span) in params {
            if let Err(previous) = frame.declare(param, span.clone()) {
                self.report_duplicate_variable(param, span, previous);
            }
        }
        quad!(self, Opcode::Add2I, Register::STACK, Register::FRAME, arity)?;

        let returned = self.parse_block(&mut frame)?;
        if !returned {
            quad!(self, Opcode::Retrn)?;
        }
        Ok(())
    }

    fn parse_type(&mut self) -> PResult<ReturnType> {
        let returns = match self.peek() {
            Some(TokenKind::Int) => ReturnType::Int,
            Some(TokenKind::Void) => ReturnType::Void,
            _ => return Err(self.unexpected(DiagnosticKind::ExpectedType, None)),
        };
        self.advance();
        Ok(returns)
    }

    fn parse_params(&mut self) -> PResult<Vec<(&'src str, Span)>> {
        let mut params = Vec::new();
        if self.at(TokenKind::ParenClose) {
            return Ok(params);
        }
        if self.at(TokenKind::Void) && self.nth(1) == Some(TokenKind::ParenClose) {
            self.advance();
            return Ok(params);
        }

        loop {
            self.expect(TokenKind::Int)?;
            params.push(self.expect_ident()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn declare_prototype(&mut self, name: &'src str, span: Span, returns: ReturnType, arity: usize) {
        match self.signatures.get(name) {
            Some(signature) => {
                if !signature.agrees_with(returns, arity) {
                    let previous = signature.declared_at.clone();
                    self.report_signature_mismatch(name, span, previous);
                }
            }
            None => self.signatures.insert(
                name,
                Signature {
                    returns,
                    arity,
                    declared_at: span,
                    defined_at: None,
                },
            ),
        }
        self.ctx.declare(name);
    }

    fn define_function(
        &mut self,
        name: &'src str,
        span: Span,
        returns: ReturnType,
        arity: usize,
    ) -> PResult<()> {
        let mut mismatch = None;
        match self.signatures.get_mut(name) {
            Some(signature) => {
                if !signature.agrees_with(returns, arity) {
                    mismatch = Some(signature.declared_at.clone());
                }
                if signature.defined_at.is_none() {
                    signature.defined_at = Some(span.clone());
                }
            }
            None => self.signatures.insert(
                name,
                Signature {
                    returns,
                    arity,
                    declared_at: span.clone(),
                    defined_at: Some(span.clone()),
                },
            ),
        }
        if let Some(previous) = mismatch {
            self.report_signature_mismatch(name, span.clone(), previous);
        }

        match self.ctx.define_function(name) {
            Ok(address) => {
                debug!("translating `{name}` from {address}");
                Ok(())
            }
            Err(EmitError::DuplicateDefinition { .. }) => {
                let first = self
                    .signatures
                    .get(name)
                    .and_then(|signature| signature.defined_at.clone())
                    .unwrap_or_else(|| span.clone());
                self.diagnostics
                    .report(DiagnosticKind::DuplicateDefinition, span)
                    .message(name)
                    .related_to("first defined here", first)
                    .emit();
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns whether the block ends control flow with `return`.
    fn parse_block(&mut self, frame: &mut Frame<'src>) -> PResult<bool> {
        self.nested(|this| {
            this.expect(TokenKind::BraceOpen)?;
            let mut returned = false;
            let mut warned = false;
            while !this.at(TokenKind::BraceClose) {
                if this.peek().is_none() {
                    return Err(this.unexpected(DiagnosticKind::UnexpectedToken, Some("`}`")));
                }
                if returned && !warned {
                    let span = this.current_span();
                    this.diagnostics
                        .report(DiagnosticKind::UnreachableCode, span)
                        .emit();
                    warned = true;
                }
                returned |= this.parse_statement(frame)?;
            }
            this.advance();
            Ok(returned)
        })
    }

    fn parse_statement(&mut self, frame: &mut Frame<'src>) -> PResult<bool> {
        let returned = match self.peek() {
            Some(TokenKind::Int) => {
                self.parse_local(frame)?;
                false
            }
            Some(TokenKind::Return) => {
                self.parse_return(frame)?;
                true
            }
            Some(TokenKind::Write) => {
                self.parse_write(frame)?;
                false
            }
            Some(TokenKind::Read) => {
                self.parse_read(frame)?;
                false
            }
            Some(TokenKind::BraceOpen) => self.parse_block(frame)?,
            Some(TokenKind::Ident) => {
                match self.nth(1) {
                    Some(TokenKind::ParenOpen) => {
                        let (name, span) = self.expect_ident()?;
                        self.parse_call(frame, name, span)?;
                    }
                    Some(TokenKind::Equals) => self.parse_assignment(frame)?,
                    _ => {
                        self.advance();
                        return Err(
                            self.unexpected(DiagnosticKind::UnexpectedToken, Some("`=` or `(`"))
                        );
                    }
                }
                self.expect(TokenKind::Semicolon)?;
                false
            }
            _ => return Err(self.unexpected(DiagnosticKind::ExpectedStatement, None)),
        };
        frame.release_temps();
        Ok(returned)
    }

    fn parse_local(&mut self, frame: &mut Frame<'src>) -> PResult<()> {
        self.advance();
        let (name, span) = self.expect_ident()?;
        let value = if self.eat(TokenKind::Equals) {
            Some(self.parse_expr(frame)?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;

        match frame.declare(name, span.clone()) {
            Ok(offset) => {
                quad!(self, Opcode::Add2I, Register::STACK, Register::STACK, 1)?;
                if let Some(value) = value {
                    quad!(self, Opcode::StorI, value, Register::FRAME, offset)?;
                }
            }
            Err(previous) => self.report_duplicate_variable(name, span, previous),
        }
        Ok(())
    }

    fn parse_assignment(&mut self, frame: &mut Frame<'src>) -> PResult<()> {
        let (name, span) = self.expect_ident()?;
        self.expect(TokenKind::Equals)?;
        let value = self.parse_expr(frame)?;

        match frame.lookup(name) {
            Some(offset) => {
                quad!(self, Opcode::StorI, value, Register::FRAME, offset)?;
            }
            None => self.report_undeclared_variable(name, span),
        }
        Ok(())
    }

    fn parse_return(&mut self, frame: &mut Frame<'src>) -> PResult<()> {
        let span = self.advance();

        if self.eat(TokenKind::Semicolon) {
            if frame.returns == ReturnType::Int {
                self.diagnostics
                    .report(DiagnosticKind::ReturnMismatch, span)
                    .message(format!("`{}` must return a value", frame.name))
                    .emit();
            }
        } else {
            let value = self.parse_expr(frame)?;
            self.expect(TokenKind::Semicolon)?;
            if frame.returns == ReturnType::Void {
                self.diagnostics
                    .report(DiagnosticKind::ReturnMismatch, span)
                    .message(format!(
                        "`{}` returns `{}`",
                        frame.name,
                        frame.returns.keyword()
                    ))
                    .emit();
            }
            quad!(self, Opcode::CopyI, Register::RESULT, value)?;
        }

        quad!(self, Opcode::Retrn)?;
        Ok(())
    }

    fn parse_write(&mut self, frame: &mut Frame<'src>) -> PResult<()> {
        self.advance();
        self.expect(TokenKind::ParenOpen)?;
        let value = self.parse_expr(frame)?;
        self.expect(TokenKind::ParenClose)?;
        self.expect(TokenKind::Semicolon)?;
        quad!(self, Opcode::PrntI, value)?;
        Ok(())
    }

    fn parse_read(&mut self, frame: &mut Frame<'src>) -> PResult<()> {
        self.advance();
        self.expect(TokenKind::ParenOpen)?;
        let (name, span) = self.expect_ident()?;
        self.expect(TokenKind::ParenClose)?;
        self.expect(TokenKind::Semicolon)?;

        match frame.lookup(name) {
            Some(offset) => {
                let temp = frame.fresh_temp();
                quad!(self, Opcode::ReadI, temp)?;
                quad!(self, Opcode::StorI, temp, Register::FRAME, offset)?;
            }
            None => self.report_undeclared_variable(name, span),
        }
        Ok(())
    }

    /// Parse the argument list of a call to `name` and emit the call.
    ///
    /// Returns the callee's return type, or `None` if it is not declared.
    fn parse_call(
        &mut self,
        frame: &mut Frame<'src>,
        name: &'src str,
        span: Span,
    ) -> PResult<Option<ReturnType>> {
        self.expect(TokenKind::ParenOpen)?;
        let live = frame.live_temps();
        let mut args = Vec::new();
        if !self.at(TokenKind::ParenClose) {
            loop {
                args.push(self.parse_expr(frame)?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::ParenClose)?;

        let Some(signature) = self.signatures.get(name) else {
            self.diagnostics
                .report(DiagnosticKind::UndeclaredFunction, span)
                .message(name)
                .emit();
            return Ok(None);
        };
        let (returns, arity) = (signature.returns, signature.arity);

        if arity != args.len() {
            self.diagnostics
                .report(DiagnosticKind::ArityMismatch, span)
                .message(format!(
                    "`{name}` takes {}, {} given",
                    plural(arity, "argument"),
                    args.len()
                ))
                .emit();
        }

        self.emit_call_sequence(name, &live, &args)?;
        Ok(Some(returns))
    }

    fn emit_call_sequence(
        &mut self,
        name: &str,
        live: &[Register],
        args: &[Register],
    ) -> PResult<()> {
        let linkage = 2 + live.len() as u32;

        quad!(self, Opcode::StorI, Register::RETURN_ADDRESS, Register::STACK, 0)?;
        quad!(self, Opcode::StorI, Register::FRAME, Register::STACK, 1)?;
        for (slot, temp) in (2u32..).zip(live) {
            quad!(self, Opcode::StorI, temp, Register::STACK, slot)?;
        }
        for (slot, arg) in (linkage..).zip(args) {
            quad!(self, Opcode::StorI, arg, Register::STACK, slot)?;
        }
        quad!(self, Opcode::Add2I, Register::FRAME, Register::STACK, linkage)?;

        self.ctx.emit_call(name)?;

        quad!(self, Opcode::SubtI, Register::STACK, Register::FRAME, linkage)?;
        quad!(self, Opcode::LoadI, Register::FRAME, Register::STACK, 1)?;
        quad!(self, Opcode::LoadI, Register::RETURN_ADDRESS, Register::STACK, 0)?;
        for (slot, temp) in (2u32..).zip(live) {
            quad!(self, Opcode::LoadI, temp, Register::STACK, slot)?;
        }
        Ok(())
    }

    fn parse_expr(&mut self, frame: &mut Frame<'src>) -> PResult<Register> {
        let mut lhs = self.parse_term(frame)?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => Opcode::Add2I,
                Some(TokenKind::Minus) => Opcode::SubtI,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_term(frame)?;
            let dst = frame.fresh_temp();
            quad!(self, op, dst, lhs, rhs)?;
            lhs = dst;
        }
    }

    fn parse_term(&mut self, frame: &mut Frame<'src>) -> PResult<Register> {
        let mut lhs = self.parse_unary(frame)?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => Opcode::MultI,
                Some(TokenKind::Slash) => Opcode::DivdI,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_unary(frame)?;
            let dst = frame.fresh_temp();
            quad!(self, op, dst, lhs, rhs)?;
            lhs = dst;
        }
    }

    fn parse_unary(&mut self, frame: &mut Frame<'src>) -> PResult<Register> {
        self.nested(|this| {
            if !this.eat(TokenKind::Minus) {
                return this.parse_atom(frame);
            }
            let operand = this.parse_unary(frame)?;
            let zero = frame.fresh_temp();
            quad!(this, Opcode::CopyI, zero, 0)?;
            let dst = frame.fresh_temp();
            quad!(this, Opcode::SubtI, dst, zero, operand)?;
            Ok(dst)
        })
    }

    fn parse_atom(&mut self, frame: &mut Frame<'src>) -> PResult<Register> {
        match self.peek() {
            Some(TokenKind::Number) => {
                let text = self.current_text();
                let Ok(value) = text.parse::<i32>() else {
                    let span = self.current_span();
                    self.diagnostics
                        .report(DiagnosticKind::IntegerOutOfRange, span)
                        .message(format!("`{text}`"))
                        .emit();
                    return Err(Abort::Syntax);
                };
                self.advance();
                let temp = frame.fresh_temp();
                quad!(self, Opcode::CopyI, temp, value)?;
                Ok(temp)
            }
            Some(TokenKind::Ident) if self.nth(1) == Some(TokenKind::ParenOpen) => {
                let (name, span) = self.expect_ident()?;
                let returns = self.parse_call(frame, name, span.clone())?;
                if returns == Some(ReturnType::Void) {
                    self.diagnostics
                        .report(DiagnosticKind::VoidValue, span)
                        .message(name)
                        .emit();
                }
                let temp = frame.fresh_temp();
                if returns == Some(ReturnType::Int) {
                    quad!(self, Opcode::CopyI, temp, Register::RESULT)?;
                }
                Ok(temp)
            }
            Some(TokenKind::Ident) => {
                let (name, span) = self.expect_ident()?;
                let temp = frame.fresh_temp();
                match frame.lookup(name) {
                    Some(offset) => {
                        quad!(self, Opcode::LoadI, temp, Register::FRAME, offset)?;
                    }
                    None => self.report_undeclared_variable(name, span),
                }
                Ok(temp)
            }
            Some(TokenKind::ParenOpen) => {
                self.advance();
                let value = self.parse_expr(frame)?;
                self.expect(TokenKind::ParenClose)?;
                Ok(value)
            }
            _ => Err(self.unexpected(DiagnosticKind::ExpectedExpression, None)),
        }
    }

    fn report_undeclared_variable(&mut self, name: &str, span: Span) {
        self.diagnostics
            .report(DiagnosticKind::UndeclaredVariable, span)
            .message(name)
            .emit();
    }

    fn report_duplicate_variable(&mut self, name: &str, span: Span, previous: Span) {
        self.diagnostics
            .report(DiagnosticKind::DuplicateVariable, span)
            .message(name)
            .related_to("first declared here", previous)
            .emit();
    }

    fn report_signature_mismatch(&mut self, name: &str, span: Span, previous: Span) {
        self.diagnostics
            .report(DiagnosticKind::SignatureMismatch, span)
            .message(name)
            .related_to("previous declaration", previous)
            .emit();
    }

    /// Report the current token as unexpected and return the abort marker.
    ///
    /// Unrecognised characters and unclosed comments get their own kinds;
    /// everything else is reported as `kind`, with `expected` naming what the
    /// grammar wanted when `kind` does not already say it.
    fn unexpected(&mut self, kind: DiagnosticKind, expected: Option<&str>) -> Abort {
        let span = self.current_span();
        match self.peek() {
            Some(TokenKind::Garbage) => {
                let text = self.current_text();
                self.diagnostics
                    .report(DiagnosticKind::UnexpectedCharacter, span)
                    .message(format!("`{text}`"))
                    .emit();
            }
            Some(TokenKind::UnclosedComment) => {
                self.diagnostics
                    .report(DiagnosticKind::UnclosedComment, span)
                    .emit();
            }
            _ => {
                let found = self.found();
                let detail = match expected {
                    Some(expected) => format!("{expected}, found {found}"),
                    None => found,
                };
                self.diagnostics.report(kind, span).message(detail).emit();
            }
        }
        Abort::Syntax
    }

    fn found(&self) -> String {
        match self.peek() {
            Some(TokenKind::Ident | TokenKind::Number) => format!("`{}`", self.current_text()),
            Some(kind) => kind.describe().to_string(),
            None => "end of input".to_string(),
        }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.recursion_fuel {
            return Err(Abort::RecursionLimit);
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<TokenKind> {
        self.nth(0)
    }

    fn nth(&self, lookahead: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + lookahead).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|t| t.span.clone())
            .unwrap_or(self.source.len()..self.source.len())
    }

    fn current_text(&self) -> &'src str {
        match self.tokens.get(self.pos) {
            Some(token) => token_text(self.source, token),
            None => "",
        }
    }

    /// Move past the current token, returning its span.
    fn advance(&mut self) -> Span {
        let span = self.current_span();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        span
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Span> {
        if self.at(kind) {
            return Ok(self.advance());
        }
        Err(self.unexpected(DiagnosticKind::UnexpectedToken, Some(kind.describe())))
    }

    fn expect_ident(&mut self) -> PResult<(&'src str, Span)> {
        if !self.at(TokenKind::Ident) {
            return Err(self.unexpected(DiagnosticKind::ExpectedIdentifier, None));
        }
        let text = self.current_text();
        Ok((text, self.advance()))
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
