//! Reading module artifacts back.
//!
//! The compiler only writes artifacts; this reader is for the other side of
//! the contract: linkers, inspection tools, and tests.

use std::fmt;

use crate::{Address, Addressing, ArtifactError, LinkEntry, ModuleHeader, Opcode, StreamLine};

/// A parsed module artifact: header plus instruction stream lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    header: ModuleHeader,
    lines: Vec<String>,
    addressing: Addressing,
}

impl Artifact {
    /// Parse artifact text whose header uses `addressing`.
    pub fn parse(text: &str, addressing: Addressing) -> Result<Self, ArtifactError> {
        let (header, stream) = ModuleHeader::parse(text)?;
        let lines = stream.lines().map(str::to_string).collect();
        Ok(Self {
            header,
            lines,
            addressing,
        })
    }

    pub fn header(&self) -> &ModuleHeader {
        &self.header
    }

    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    /// Number of instruction lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Stream line that a header address refers to.
    pub fn line_at(&self, address: u32) -> Option<&str> {
        let address = self.addressing.from_header(address)?;
        self.lines.get(address.index()).map(String::as_str)
    }

    /// Number of `JLINK` lines still carrying the unresolved marker.
    pub fn placeholder_count(&self) -> usize {
        self.lines()
            .filter(|line| StreamLine::parse(line).is_placeholder())
            .count()
    }

    /// Check every header entry against the stream.
    ///
    /// Call sites must hold unresolved calls and entry points must hold the
    /// label of the function they name.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        for entry in &self.header.unimplemented {
            let line = self.entry_line(entry)?;
            if !StreamLine::parse(line).is_placeholder() {
                return Err(ArtifactError::NotAPlaceholder {
                    name: entry.name.clone(),
                    address: entry.address,
                });
            }
        }

        for entry in &self.header.implemented {
            let line = self.entry_line(entry)?;
            if StreamLine::parse(line) != StreamLine::Label(&entry.name) {
                return Err(ArtifactError::NotALabel {
                    name: entry.name.clone(),
                    address: entry.address,
                });
            }
        }

        Ok(())
    }

    /// Rewrite the unresolved call at `call_site` to jump to `target`.
    ///
    /// `target` is written verbatim, so it must already be in whatever
    /// numbering the linked program uses.
    pub fn patch_call(&mut self, call_site: &LinkEntry, target: u32) -> Result<(), ArtifactError> {
        let index = self.entry_index(call_site)?;
        if !StreamLine::parse(&self.lines[index]).is_placeholder() {
            return Err(ArtifactError::NotAPlaceholder {
                name: call_site.name.clone(),
                address: call_site.address,
            });
        }
        self.lines[index] = format!("{} {target}", Opcode::JLink);
        Ok(())
    }

    /// The instruction stream, one line per quad, each terminated by `\n`.
    pub fn stream(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    fn entry_index(&self, entry: &LinkEntry) -> Result<usize, ArtifactError> {
        self.addressing
            .from_header(entry.address)
            .map(Address::index)
            .filter(|&index| index < self.lines.len())
            .ok_or_else(|| ArtifactError::AddressOutOfRange {
                name: entry.name.clone(),
                address: entry.address,
            })
    }

    fn entry_line(&self, entry: &LinkEntry) -> Result<&str, ArtifactError> {
        let index = self.entry_index(entry)?;
        Ok(&self.lines[index])
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.header, self.stream())
    }
}
