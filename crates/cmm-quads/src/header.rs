//! Module header: the linking contract at the top of every artifact.
//!
//! ```text
//! <header>
//! <unimplemented> name1,addr1 name2,addr2 ...
//! <implemented> name1,addr1 name2,addr2 ...
//! </header>
//! ```
//!
//! Each section tag is followed by exactly one space, even when the section is
//! empty. Addresses are written in the module's [`Addressing`](crate::Addressing).

use std::fmt;
use std::str::FromStr;

use crate::ArtifactError;

pub const HEADER_OPEN: &str = "<header>";
pub const UNIMPLEMENTED_TAG: &str = "<unimplemented>";
pub const IMPLEMENTED_TAG: &str = "<implemented>";
pub const HEADER_CLOSE: &str = "</header>";

/// One `name,address` pair of a header section.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkEntry {
    pub name: String,
    /// Address as written, i.e. already shifted by the addressing offset.
    pub address: u32,
}

impl LinkEntry {
    pub fn new(name: impl Into<String>, address: u32) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

impl fmt::Display for LinkEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.name, self.address)
    }
}

impl FromStr for LinkEntry {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, address) = s.rsplit_once(',').ok_or(())?;
        if name.is_empty() || name.contains(',') {
            return Err(());
        }
        let address = address.parse::<u32>().map_err(|_| ())?;
        Ok(Self::new(name, address))
    }
}

/// The two linking sections of a module.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleHeader {
    /// Every call site in the module, one entry per call.
    pub unimplemented: Vec<LinkEntry>,
    /// Every function defined in the module, one entry per function.
    pub implemented: Vec<LinkEntry>,
}

impl ModuleHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry address of a function defined in this module.
    pub fn implemented_address(&self, name: &str) -> Option<u32> {
        self.implemented
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.address)
    }

    /// Call sites of `name`, in call order.
    pub fn call_sites<'a>(&'a self, name: &'a str) -> impl Iterator<Item = u32> + 'a {
        self.unimplemented
            .iter()
            .filter(move |entry| entry.name == name)
            .map(|entry| entry.address)
    }

    /// Parse the header at the start of `text`.
    ///
    /// Returns the header and the text following `</header>`.
    pub fn parse(text: &str) -> Result<(Self, &str), ArtifactError> {
        let mut rest = text;

        let open = take_line(&mut rest, 1, HEADER_OPEN)?;
        if open.trim_end() != HEADER_OPEN {
            return Err(ArtifactError::MissingSection {
                line: 1,
                expected: HEADER_OPEN,
            });
        }

        let unimplemented = take_line(&mut rest, 2, UNIMPLEMENTED_TAG)?;
        let unimplemented = parse_section(unimplemented, 2, UNIMPLEMENTED_TAG)?;
        let implemented = take_line(&mut rest, 3, IMPLEMENTED_TAG)?;
        let implemented = parse_section(implemented, 3, IMPLEMENTED_TAG)?;

        let close = take_line(&mut rest, 4, HEADER_CLOSE)?;
        if close.trim_end() != HEADER_CLOSE {
            return Err(ArtifactError::MissingSection {
                line: 4,
                expected: HEADER_CLOSE,
            });
        }

        let header = Self {
            unimplemented,
            implemented,
        };
        Ok((header, rest))
    }
}

fn take_line<'a>(
    rest: &mut &'a str,
    line: usize,
    expected: &'static str,
) -> Result<&'a str, ArtifactError> {
    if rest.is_empty() {
        return Err(ArtifactError::MissingSection { line, expected });
    }
    let (current, tail) = rest.split_once('\n').unwrap_or((*rest, ""));
    *rest = tail;
    Ok(current.strip_suffix('\r').unwrap_or(current))
}

fn parse_section(
    text: &str,
    line: usize,
    tag: &'static str,
) -> Result<Vec<LinkEntry>, ArtifactError> {
    let Some(body) = text.strip_prefix(tag) else {
        return Err(ArtifactError::MissingSection {
            line,
            expected: tag,
        });
    };

    body.split_whitespace()
        .map(|entry| {
            entry
                .parse::<LinkEntry>()
                .map_err(|()| ArtifactError::MalformedEntry {
                    line,
                    entry: entry.to_string(),
                })
        })
        .collect()
}

fn write_section(f: &mut fmt::Formatter<'_>, tag: &str, entries: &[LinkEntry]) -> fmt::Result {
    write!(f, "{tag} ")?;
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{entry}")?;
    }
    f.write_str("\n")
}

impl fmt::Display for ModuleHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER_OPEN}")?;
        write_section(f, UNIMPLEMENTED_TAG, &self.unimplemented)?;
        write_section(f, IMPLEMENTED_TAG, &self.implemented)?;
        writeln!(f, "{HEADER_CLOSE}")
    }
}
