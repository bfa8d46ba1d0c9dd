//! Domain entities: table rows and classification codes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult, StructuralError};

/// Separator used inside dotted NACE codes ("01.11").
const CODE_SEPARATOR: char = '.';

/// One row of the source classification table.
///
/// The three code fragments are concatenated to form the raw code; all of them
/// are empty for a section marker row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub division: String,
    pub group: String,
    pub class: String,
    pub description: String,
}

impl TableRow {
    pub fn new(
        division: impl Into<String>,
        group: impl Into<String>,
        class: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            division: division.into(),
            group: group.into(),
            class: class.into(),
            description: description.into(),
        }
    }

    /// Build a row from extracted table cells.
    ///
    /// Cells beyond the fourth are ignored; fewer than four is a malformed row.
    pub fn from_cells(row: usize, cells: Vec<String>) -> DomainResult<Self> {
        let found = cells.len();
        let mut cells = cells.into_iter();
        match (cells.next(), cells.next(), cells.next(), cells.next()) {
            (Some(division), Some(group), Some(class), Some(description)) => Ok(Self {
                division,
                group,
                class,
                description,
            }),
            _ => Err(DomainError::MalformedRow { row, cells: found }),
        }
    }

    /// Concatenated code fragments, e.g. "01" + ".1" + ".1" = "01.1.1".
    pub fn code(&self) -> String {
        format!("{}{}{}", self.division, self.group, self.class)
    }

    /// True when the row carries no code at all and must be read as a section marker.
    pub fn is_section_marker(&self) -> bool {
        normalize(&self.code()).is_empty()
    }
}

/// Hierarchy level of a classification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Section,
    Division,
    Group,
    Class,
}

impl Level {
    /// Derive the level from which numeric ids a code carries.
    ///
    /// Returns `None` for shapes that cannot occur in a NACE table, e.g. a class id
    /// without a group id.
    pub fn from_ids(division: Option<u8>, group: Option<u8>, class: Option<u8>) -> Option<Self> {
        match (division, group, class) {
            (None, None, None) => Some(Level::Section),
            (Some(_), None, None) => Some(Level::Division),
            (Some(_), Some(_), None) => Some(Level::Group),
            (Some(_), Some(_), Some(_)) => Some(Level::Class),
            _ => None,
        }
    }

    /// Level whose nodes hold nodes of this level as children.
    pub fn parent(self) -> Option<Self> {
        match self {
            Level::Section => None,
            Level::Division => Some(Level::Section),
            Level::Group => Some(Level::Division),
            Level::Class => Some(Level::Group),
        }
    }

    /// Level of the children a node of this level may hold.
    pub fn child(self) -> Option<Self> {
        match self {
            Level::Section => Some(Level::Division),
            Level::Division => Some(Level::Group),
            Level::Group => Some(Level::Class),
            Level::Class => None,
        }
    }

    /// Zero-based depth in the tree (section = 0).
    pub fn depth(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Section => "section",
            Level::Division => "division",
            Level::Group => "group",
            Level::Class => "class",
        };
        f.write_str(name)
    }
}

/// A classified NACE code and the subtree below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationCode {
    /// Dotted code as published ("01.1"), or the letter for a section.
    #[serde(rename = "code")]
    pub raw_code: String,
    /// Code with separators stripped ("011").
    pub normalized_code: String,
    pub description: String,
    pub division_id: Option<u8>,
    pub group_id: Option<u8>,
    pub class_id: Option<u8>,
    pub level: Level,
    pub children: Vec<ClassificationCode>,
}

impl ClassificationCode {
    /// Classify a code string.
    ///
    /// A code counts as numeric only when, with separators stripped, it consists of ASCII
    /// digits. Empty and non-numeric codes are sections.
    pub fn new(code: &str, description: &str) -> DomainResult<Self> {
        let raw_code = code.trim().to_string();
        let normalized_code = normalize(&raw_code);

        let (division_id, group_id, class_id) = if is_numeric(&normalized_code) {
            let division = normalized_code.get(..2).unwrap_or(&normalized_code);
            (
                digits(division),
                normalized_code.get(2..3).and_then(digits),
                normalized_code.get(3..4).and_then(digits),
            )
        } else {
            (None, None, None)
        };

        let level = Level::from_ids(division_id, group_id, class_id).ok_or_else(|| {
            StructuralError::Unclassifiable {
                row: 0,
                code: raw_code.clone(),
            }
        })?;

        Ok(Self {
            raw_code,
            normalized_code,
            description: description.trim().to_string(),
            division_id,
            group_id,
            class_id,
            level,
            children: Vec::new(),
        })
    }

    /// Create a section node from its marker letter and title.
    pub fn section(letter: &str, title: &str) -> DomainResult<Self> {
        Self::new(letter, title)
    }

    pub fn is_section(&self) -> bool {
        self.level == Level::Section
    }

    pub fn is_division(&self) -> bool {
        self.level == Level::Division
    }

    pub fn is_group(&self) -> bool {
        self.level == Level::Group
    }

    pub fn is_class(&self) -> bool {
        self.level == Level::Class
    }

    /// Section letter, if this node is a section.
    pub fn letter(&self) -> Option<&str> {
        self.is_section().then_some(self.raw_code.as_str())
    }

    /// Human-readable label; for sections this is the title-cased section name.
    pub fn title(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for ClassificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.raw_code, self.description)
    }
}

fn normalize(code: &str) -> String {
    code.trim().replace(CODE_SEPARATOR, "")
}

fn is_numeric(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit())
}

fn digits(s: &str) -> Option<u8> {
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_two_digit_code_when_classifying_then_is_division() {
        let code = ClassificationCode::new("01", "Crop production").unwrap();
        assert_eq!(code.level, Level::Division);
        assert_eq!(code.division_id, Some(1));
        assert_eq!(code.group_id, None);
        assert_eq!(code.class_id, None);
    }

    #[test]
    fn given_dotted_four_digit_code_when_classifying_then_is_class() {
        let code = ClassificationCode::new("01.11", "Growing of cereals").unwrap();
        assert_eq!(code.normalized_code, "0111");
        assert_eq!(code.level, Level::Class);
        assert_eq!(
            (code.division_id, code.group_id, code.class_id),
            (Some(1), Some(1), Some(1))
        );
    }

    #[test]
    fn given_single_digit_code_when_classifying_then_is_division() {
        let code = ClassificationCode::new("5", "Short").unwrap();
        assert_eq!(code.level, Level::Division);
        assert_eq!(code.division_id, Some(5));
    }

    #[test]
    fn given_non_numeric_code_when_classifying_then_falls_back_to_section() {
        let code = ClassificationCode::new("0x.1", "Garbage").unwrap();
        assert_eq!(code.level, Level::Section);
        assert_eq!(code.division_id, None);
    }

    #[test]
    fn given_padded_description_when_classifying_then_trims() {
        let code = ClassificationCode::new(" 01.1 ", "  Growing  ").unwrap();
        assert_eq!(code.raw_code, "01.1");
        assert_eq!(code.description, "Growing");
    }

    #[test]
    fn given_three_cells_when_building_row_then_malformed() {
        let cells = vec!["01".to_string(), String::new(), String::new()];
        assert_eq!(
            TableRow::from_cells(7, cells),
            Err(DomainError::MalformedRow { row: 7, cells: 3 })
        );
    }

    #[test]
    fn given_impossible_id_shape_when_deriving_level_then_none() {
        assert_eq!(Level::from_ids(Some(1), None, Some(1)), None);
        assert_eq!(Level::from_ids(None, Some(1), None), None);
    }

    #[test]
    fn test_level_parent_child_chain() {
        assert_eq!(Level::Class.parent(), Some(Level::Group));
        assert_eq!(Level::Section.child(), Some(Level::Division));
        assert_eq!(Level::Section.parent(), None);
        assert_eq!(Level::Class.child(), None);
        assert_eq!(Level::Group.depth(), 2);
    }
}
