//! Function signatures and per-function frames.

use cmm_quads::Register;
use indexmap::IndexMap;

use crate::diagnostics::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnType {
    Int,
    Void,
}

impl ReturnType {
    pub fn keyword(self) -> &'static str {
        match self {
            ReturnType::Int => "int",
            ReturnType::Void => "void",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub returns: ReturnType,
    pub arity: usize,
    /// First prototype or definition.
    pub declared_at: Span,
    pub defined_at: Option<Span>,
}

impl Signature {
    pub fn agrees_with(&self, returns: ReturnType, arity: usize) -> bool {
        self.returns == returns && self.arity == arity
    }
}

/// Every function seen so far, by name.
#[derive(Debug, Default)]
pub struct Signatures<'src> {
    table: IndexMap<&'src str, Signature>,
}

impl<'src> Signatures<'src> {
    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.table.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Signature> {
        self.table.get_mut(name)
    }

    pub fn insert(&mut self, name: &'src str, signature: Signature) {
        self.table.insert(name, signature);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Local {
    /// Slot relative to the frame pointer.
    pub offset: u32,
    pub declared_at: Span,
}

/// Locals and temporaries of the function being translated.
///
/// Parameters take the first slots, locals follow in declaration order. One
/// flat scope covers the whole body.
#[derive(Debug)]
pub struct Frame<'src> {
    pub name: &'src str,
    pub returns: ReturnType,
    locals: IndexMap<&'src str, Local>,
    next_temp: Register,
}

impl<'src> Frame<'src> {
    pub fn new(name: &'src str, returns: ReturnType) -> Self {
        Self {
            name,
            returns,
            locals: IndexMap::new(),
            next_temp: Register::FIRST_TEMP,
        }
    }

    /// Give `name` the next slot.
    ///
    /// Fails with the earlier declaration's span when `name` already exists.
    pub fn declare(&mut self, name: &'src str, span: Span) -> Result<u32, Span> {
        if let Some(previous) = self.locals.get(name) {
            return Err(previous.declared_at.clone());
        }
        let offset = self.locals.len() as u32;
        self.locals.insert(
            name,
            Local {
                offset,
                declared_at: span,
            },
        );
        Ok(offset)
    }

    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.locals.get(name).map(|local| local.offset)
    }

    pub fn fresh_temp(&mut self) -> Register {
        let temp = self.next_temp;
        self.next_temp = temp.next();
        temp
    }

    /// Temporaries currently holding values, lowest first.
    pub fn live_temps(&self) -> Vec<Register> {
        (Register::FIRST_TEMP.index()..self.next_temp.index())
            .map(Register::new)
            .collect()
    }

    /// Temporaries are statement-local.
    pub fn release_temps(&mut self) {
        self.next_temp = Register::FIRST_TEMP;
    }
}
