//! Tests for section marker parsing

use rstest::rstest;

use nacetree::domain::{
    DomainError, FnSectionParser, RegexSectionParser, SectionMarker, SectionMarkerParser,
};

#[rstest]
#[case("SECTION", "SECTION A — AGRICULTURE, FORESTRY AND FISHING", "A", "Agriculture, Forestry And Fishing")]
#[case("SECTION", "SECTION U — ACTIVITIES OF EXTRATERRITORIAL ORGANISATIONS", "U", "Activities Of Extraterritorial Organisations")]
#[case("ABSCHNITT", "ABSCHNITT C — VERARBEITENDES GEWERBE/HERSTELLUNG VON WAREN", "C", "Verarbeitendes Gewerbe/Herstellung Von Waren")]
#[case("ABSCHNITT", "ABSCHNITT Q — GESUNDHEITS- UND SOZIALWESEN", "Q", "Gesundheits- Und Sozialwesen")]
fn given_marker_when_parsing_then_letter_and_title_case(
    #[case] keyword: &str,
    #[case] text: &str,
    #[case] letter: &str,
    #[case] title: &str,
) {
    let parser = RegexSectionParser::new(keyword, "—").unwrap();

    let marker = parser.parse(text).unwrap();

    assert_eq!(
        marker,
        SectionMarker {
            letter: letter.to_string(),
            title: title.to_string()
        }
    );
}

#[rstest]
#[case("NOT A VALID HEADER")]
#[case("SECTION — AGRICULTURE")]
#[case("SECTION AB — AGRICULTURE")]
#[case("ABSCHNITT A — LANDWIRTSCHAFT")]
fn given_foreign_text_when_parsing_then_unrecognized_section_format(#[case] text: &str) {
    let parser = RegexSectionParser::new("SECTION", "—").unwrap();

    let err = parser.parse(text).unwrap_err();

    assert_eq!(
        err,
        DomainError::UnrecognizedSectionFormat {
            text: text.to_string()
        }
    );
}

#[test]
fn given_function_pair_when_parsing_then_delegates_to_both() {
    let parser = FnSectionParser::new(
        |text: &str| text.strip_prefix("SEKTIO ").map(|rest| rest[..1].to_string()),
        |text: &str| text.split_once(": ").map(|(_, title)| title.to_string()),
    );

    let marker = parser.parse("SEKTIO A: Maatalous").unwrap();

    assert_eq!(marker.letter, "A");
    assert_eq!(marker.title, "Maatalous");
}
