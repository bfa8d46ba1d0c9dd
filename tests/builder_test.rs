//! Tests for HierarchyBuilder

use rstest::rstest;

use nacetree::domain::{
    ClassificationCode, DomainError, Forest, HierarchyBuilder, Level, RegexSectionParser,
    StructuralError, TableRow,
};
use nacetree::util::testing;

fn builder() -> HierarchyBuilder<RegexSectionParser> {
    testing::init_test_setup();
    HierarchyBuilder::new(RegexSectionParser::new("SECTION", "—").unwrap())
}

fn marker(text: &str) -> TableRow {
    TableRow::new("", "", "", text)
}

fn row(code: &str, description: &str) -> TableRow {
    TableRow::new(code, "", "", description)
}

/// Two sections, divisions with several groups, groups with several classes.
fn sample_rows() -> Vec<TableRow> {
    vec![
        marker("SECTION A — AGRICULTURE, FORESTRY AND FISHING"),
        row("01", "Crop and animal production"),
        row("01.1", "Growing of non-perennial crops"),
        row("01.11", "Growing of cereals"),
        row("01.12", "Growing of rice"),
        row("01.2", "Growing of perennial crops"),
        row("01.21", "Growing of grapes"),
        row("02", "Forestry and logging"),
        row("02.1", "Silviculture"),
        row("02.10", "Silviculture"),
        marker("SECTION B — MINING AND QUARRYING"),
        row("05", "Mining of coal and lignite"),
        row("05.1", "Mining of hard coal"),
        row("05.10", "Mining of hard coal"),
    ]
}

fn assert_forest_shape(forest: &[ClassificationCode]) {
    fn check(node: &ClassificationCode) {
        match node.level.child() {
            Some(child_level) => {
                for child in &node.children {
                    assert_eq!(child.level, child_level, "child of {node}");
                    check(child);
                }
            }
            None => assert!(node.children.is_empty(), "class {node} has children"),
        }
    }
    for section in forest {
        assert_eq!(section.level, Level::Section);
        check(section);
    }
}

#[test]
fn given_four_row_table_when_building_then_single_nested_chain() {
    // Arrange
    let rows = vec![
        marker("SECTION A — AGRICULTURE"),
        TableRow::new("01", "", "", "Crop production"),
        TableRow::new("01", ".1", "", "Growing of cereals"),
        TableRow::new("01", ".1", ".1", "Growing of wheat"),
    ];

    // Act
    let forest = builder().build(rows).unwrap();

    // Assert
    assert_eq!(forest.len(), 1);
    let section = &forest[0];
    assert_eq!(section.letter(), Some("A"));
    assert_eq!(section.title(), "Agriculture");
    let division = &section.children[0];
    assert_eq!((division.level, division.division_id), (Level::Division, Some(1)));
    let group = &division.children[0];
    assert_eq!((group.level, group.group_id), (Level::Group, Some(1)));
    let class = &group.children[0];
    assert_eq!((class.level, class.class_id), (Level::Class, Some(1)));
    assert!(class.children.is_empty());
}

#[test]
fn given_sample_table_when_building_then_forest_shape_holds() {
    let forest = builder().build(sample_rows()).unwrap();

    assert_eq!(forest.len(), 2);
    assert_forest_shape(&forest);
    let counts = forest.level_counts();
    assert_eq!(counts[&Level::Section], 2);
    assert_eq!(counts[&Level::Division], 3);
    assert_eq!(counts[&Level::Group], 4);
    assert_eq!(counts[&Level::Class], 5);
}

#[test]
fn given_sample_table_when_traversing_preorder_then_reproduces_row_order() {
    let rows = sample_rows();
    let expected: Vec<String> = rows
        .iter()
        .filter(|r| !r.is_section_marker())
        .map(TableRow::code)
        .collect();

    let forest = builder().build(rows).unwrap();

    let visited: Vec<String> = forest
        .preorder()
        .filter(|n| !n.is_section())
        .map(|n| n.raw_code.clone())
        .collect();
    assert_eq!(visited, expected);
}

#[test]
fn given_built_division_when_flattening_and_rebuilding_then_isomorphic_subtree() {
    // Arrange
    let forest = builder().build(sample_rows()).unwrap();
    let section = &forest[0];

    let mut rows = vec![marker("SECTION Z — SYNTHETIC")];
    rows.extend(section.descendant_rows());

    // Act
    let rebuilt = builder().build(rows).unwrap();

    // Assert
    assert_eq!(rebuilt.len(), 1);
    assert_eq!(rebuilt[0].children, section.children);
}

#[test]
fn given_division_before_any_section_when_building_then_missing_parent_at_row_one() {
    let err = builder()
        .build(vec![row("01", "Crop production")])
        .unwrap_err();

    assert_eq!(
        err,
        DomainError::Structural(StructuralError::MissingParent {
            row: 1,
            code: "01".to_string(),
            level: Level::Division,
            parent: Level::Section,
        })
    );
}

#[rstest]
#[case::group_without_division(vec![marker("SECTION A — X"), row("01.1", "g")], 2, Level::Group)]
#[case::class_without_group(vec![marker("SECTION A — X"), row("01", "d"), row("01.11", "c")], 3, Level::Class)]
#[case::group_after_new_section(
    vec![marker("SECTION A — X"), row("01", "d"), marker("SECTION B — Y"), row("01.1", "g")],
    4,
    Level::Group
)]
fn given_orphan_row_when_building_then_structural_error(
    #[case] rows: Vec<TableRow>,
    #[case] expected_row: usize,
    #[case] expected_level: Level,
) {
    let err = builder().build(rows).unwrap_err();

    match err {
        DomainError::Structural(StructuralError::MissingParent { row, level, .. }) => {
            assert_eq!(row, expected_row);
            assert_eq!(level, expected_level);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_invalid_section_text_when_building_then_unrecognized_section_format() {
    let err = builder()
        .build(vec![marker("NOT A VALID HEADER")])
        .unwrap_err();

    assert_eq!(
        err,
        DomainError::UnrecognizedSectionFormat {
            text: "NOT A VALID HEADER".to_string()
        }
    );
}

#[test]
fn given_no_rows_when_building_then_empty_forest() {
    let forest = builder().build(Vec::new()).unwrap();
    assert!(forest.is_empty());
}

#[test]
fn given_forest_when_finding_by_code_then_matches_dotted_and_normalized() {
    let forest = builder().build(sample_rows()).unwrap();

    assert_eq!(forest.find("01.12").map(|n| n.description.as_str()), Some("Growing of rice"));
    assert_eq!(forest.find("0510").map(|n| n.raw_code.as_str()), Some("05.10"));
    assert_eq!(forest.find("B").map(|n| n.title()), Some("Mining And Quarrying"));
    assert!(forest.find("99.99").is_none());
}

#[test]
fn given_forest_when_rendering_tree_to_division_depth_then_omits_groups() {
    let forest = builder().build(sample_rows()).unwrap();

    let rendered = forest.to_tree_string(Level::Division).to_string();

    assert!(rendered.starts_with("NACE\n"));
    assert!(rendered.contains("02 Forestry and logging"));
    assert!(!rendered.contains("01.1 "));
}
