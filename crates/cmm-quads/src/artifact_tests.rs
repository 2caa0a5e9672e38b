use indoc::indoc;

use crate::{Addressing, Artifact, ArtifactError, LinkEntry};

const FILE_ADDRESSED: &str = indoc! {"
    <header>
    <unimplemented> g,7
    <implemented> f,5 g,9
    </header>
    LABEL f
    ADD2I I2 I1 0
    JLINK -1
    RETRN
    LABEL g
    RETRN
"};

const STREAM_ADDRESSED: &str = indoc! {"
    <header>
    <unimplemented> g,3
    <implemented> f,1 g,5
    </header>
    LABEL f
    ADD2I I2 I1 0
    JLINK -1
    RETRN
    LABEL g
    RETRN
"};

#[test]
fn line_at_follows_addressing() {
    let file = Artifact::parse(FILE_ADDRESSED, Addressing::File).unwrap();
    let stream = Artifact::parse(STREAM_ADDRESSED, Addressing::Stream).unwrap();

    assert_eq!(file.len(), 6);
    assert_eq!(file.line_at(5), Some("LABEL f"));
    assert_eq!(file.line_at(7), Some("JLINK -1"));
    assert_eq!(file.line_at(4), None);
    assert_eq!(file.line_at(11), None);

    assert_eq!(stream.line_at(1), Some("LABEL f"));
    assert_eq!(stream.line_at(3), Some("JLINK -1"));
    assert_eq!(stream.line_at(0), None);
}

#[test]
fn consistent_artifacts_validate() {
    Artifact::parse(FILE_ADDRESSED, Addressing::File)
        .unwrap()
        .validate()
        .unwrap();
    Artifact::parse(STREAM_ADDRESSED, Addressing::Stream)
        .unwrap()
        .validate()
        .unwrap();
}

#[test]
fn wrong_addressing_fails_validation() {
    let artifact = Artifact::parse(FILE_ADDRESSED, Addressing::Stream).unwrap();

    let err = artifact.validate().unwrap_err();

    assert_eq!(
        err,
        ArtifactError::AddressOutOfRange {
            name: "g".to_string(),
            address: 7,
        }
    );
}

#[test]
fn call_site_must_hold_placeholder() {
    let text = indoc! {"
        <header>
        <unimplemented> g,2
        <implemented>
        </header>
        COPYI I4 1
        PRNTI I4
    "};
    let artifact = Artifact::parse(text, Addressing::Stream).unwrap();

    let err = artifact.validate().unwrap_err();

    assert_eq!(
        err.to_string(),
        "address 2 of `g` is not an unresolved call"
    );
}

#[test]
fn entry_point_must_hold_own_label() {
    let text = indoc! {"
        <header>
        <unimplemented>
        <implemented> f,1 g,1
        </header>
        LABEL f
        RETRN
    "};
    let artifact = Artifact::parse(text, Addressing::Stream).unwrap();

    let err = artifact.validate().unwrap_err();

    assert_eq!(
        err,
        ArtifactError::NotALabel {
            name: "g".to_string(),
            address: 1,
        }
    );
}

#[test]
fn patch_call_resolves_placeholder_once() {
    let mut artifact = Artifact::parse(FILE_ADDRESSED, Addressing::File).unwrap();
    let site = LinkEntry::new("g", 7);

    assert_eq!(artifact.placeholder_count(), 1);
    artifact.patch_call(&site, 9).unwrap();

    assert_eq!(artifact.line_at(7), Some("JLINK 9"));
    assert_eq!(artifact.placeholder_count(), 0);

    let err = artifact.patch_call(&site, 9).unwrap_err();
    assert_eq!(
        err,
        ArtifactError::NotAPlaceholder {
            name: "g".to_string(),
            address: 7,
        }
    );
}

#[test]
fn renders_back_to_source_text() {
    let artifact = Artifact::parse(FILE_ADDRESSED, Addressing::File).unwrap();

    assert_eq!(artifact.to_string(), FILE_ADDRESSED);
}

#[test]
fn header_only_artifact_has_empty_stream() {
    let text = "<header>\n<unimplemented> \n<implemented> \n</header>\n";
    let artifact = Artifact::parse(text, Addressing::File).unwrap();

    assert!(artifact.is_empty());
    assert_eq!(artifact.stream(), "");
    artifact.validate().unwrap();
}
