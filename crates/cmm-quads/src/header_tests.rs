use indoc::indoc;

use crate::{ArtifactError, LinkEntry, ModuleHeader};

fn sample() -> ModuleHeader {
    ModuleHeader {
        unimplemented: vec![LinkEntry::new("g", 7), LinkEntry::new("g", 12)],
        implemented: vec![LinkEntry::new("f", 5), LinkEntry::new("g", 15)],
    }
}

#[test]
fn renders_both_sections() {
    insta::assert_snapshot!(sample().to_string(), @r"
    <header>
    <unimplemented> g,7 g,12
    <implemented> f,5 g,15
    </header>
    ");
}

#[test]
fn empty_sections_keep_the_space_after_the_tag() {
    let text = ModuleHeader::new().to_string();
    assert_eq!(
        text,
        "<header>\n<unimplemented> \n<implemented> \n</header>\n"
    );
}

#[test]
fn parse_returns_rest_of_text() {
    let text = indoc! {"
        <header>
        <unimplemented> g,7 g,12
        <implemented> f,5 g,15
        </header>
        LABEL f
        RETRN
    "};

    let (header, rest) = ModuleHeader::parse(text).unwrap();

    assert_eq!(header, sample());
    assert_eq!(rest, "LABEL f\nRETRN\n");
}

#[test]
fn parse_accepts_empty_sections() {
    let text = ModuleHeader::new().to_string();
    let (header, rest) = ModuleHeader::parse(&text).unwrap();

    assert_eq!(header, ModuleHeader::new());
    assert_eq!(rest, "");
}

#[test]
fn parse_accepts_crlf_lines() {
    let text = "<header>\r\n<unimplemented> \r\n<implemented> main,5\r\n</header>\r\nLABEL main\r\n";

    let (header, _) = ModuleHeader::parse(text).unwrap();

    assert_eq!(header.implemented_address("main"), Some(5));
}

#[test]
fn parse_rejects_missing_section() {
    let text = "<header>\n<implemented> \n</header>\n";

    let err = ModuleHeader::parse(text).unwrap_err();

    assert_eq!(
        err,
        ArtifactError::MissingSection {
            line: 2,
            expected: "<unimplemented>",
        }
    );
    assert_eq!(err.to_string(), "line 2: expected `<unimplemented>`");
}

#[test]
fn parse_rejects_truncated_header() {
    let err = ModuleHeader::parse("<header>\n<unimplemented> \n").unwrap_err();

    assert_eq!(
        err,
        ArtifactError::MissingSection {
            line: 3,
            expected: "<implemented>",
        }
    );
}

#[test]
fn parse_rejects_malformed_entry() {
    let text = "<header>\n<unimplemented> g7\n<implemented> \n</header>\n";

    let err = ModuleHeader::parse(text).unwrap_err();

    assert_eq!(
        err,
        ArtifactError::MalformedEntry {
            line: 2,
            entry: "g7".to_string(),
        }
    );
}

#[test]
fn link_entry_requires_name_and_number() {
    assert_eq!("f,5".parse::<LinkEntry>(), Ok(LinkEntry::new("f", 5)));
    assert!(",5".parse::<LinkEntry>().is_err());
    assert!("f,".parse::<LinkEntry>().is_err());
    assert!("f,-1".parse::<LinkEntry>().is_err());
    assert!("a,b,5".parse::<LinkEntry>().is_err());
}

#[test]
fn call_sites_keep_call_order() {
    let header = sample();

    assert_eq!(header.call_sites("g").collect::<Vec<_>>(), vec![7, 12]);
    assert_eq!(header.call_sites("f").count(), 0);
    assert_eq!(header.implemented_address("g"), Some(15));
    assert_eq!(header.implemented_address("h"), None);
}
