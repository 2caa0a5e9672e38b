//! Append-only instruction log.

use std::collections::HashMap;

use cmm_quads::{Address, Quad};
use log::trace;

use super::EmitError;

/// Ordered log of emitted quads.
///
/// The k-th emitted quad gets address k. Quads are never removed or
/// rewritten; once [`finalize`](Self::finalize) has been called the buffer
/// only answers queries.
#[derive(Debug, Default)]
pub struct InstructionBuffer {
    quads: Vec<Quad>,
    labels: HashMap<String, Address>,
    text: Option<String>,
}

impl InstructionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an opaque instruction.
    ///
    /// The text must fit on one line.
    pub fn emit(&mut self, text: impl Into<String>) -> Result<Address, EmitError> {
        self.push(Quad::plain(text))
    }

    /// Append a call whose target the linker fills in.
    ///
    /// The returned address must be recorded in the registry before anything
    /// else is emitted.
    pub fn emit_placeholder_call(&mut self, target: &str) -> Result<Address, EmitError> {
        self.push(Quad::placeholder_call(target))
    }

    /// Append the entry label of `name`.
    pub fn define_label(&mut self, name: &str) -> Result<Address, EmitError> {
        if let Some(&first) = self.labels.get(name) {
            return Err(EmitError::DuplicateDefinition {
                name: name.to_string(),
                first,
            });
        }
        let address = self.push(Quad::label(name))?;
        self.labels.insert(name.to_string(), address);
        Ok(address)
    }

    /// Serialize the stream, one quad per line, and freeze the buffer.
    ///
    /// Later calls return the same text.
    pub fn finalize(&mut self) -> &str {
        let quads = &self.quads;
        self.text.get_or_insert_with(|| render(quads))
    }

    /// Frozen stream text, if finalized.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_finalized(&self) -> bool {
        self.text.is_some()
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Address the next emitted quad will get.
    pub fn next_address(&self) -> Address {
        Address::from_index(self.quads.len())
    }

    pub fn get(&self, address: Address) -> Option<&Quad> {
        self.quads.get(address.index())
    }

    /// Address of the label of `name`, if defined.
    pub fn label_of(&self, name: &str) -> Option<Address> {
        self.labels.get(name).copied()
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn iter(&self) -> impl Iterator<Item = (Address, &Quad)> {
        self.quads
            .iter()
            .enumerate()
            .map(|(i, quad)| (Address::from_index(i), quad))
    }

    fn push(&mut self, quad: Quad) -> Result<Address, EmitError> {
        if self.is_finalized() {
            return Err(EmitError::Finalized);
        }
        let text = quad.to_string();
        if text.contains(['\n', '\r']) {
            return Err(EmitError::MultilineInstruction { text });
        }
        let address = self.next_address();
        trace!("{address}: {text}");
        self.quads.push(quad);
        Ok(address)
    }
}

fn render(quads: &[Quad]) -> String {
    let mut out = String::new();
    for quad in quads {
        out.push_str(&quad.to_string());
        out.push('\n');
    }
    out
}
