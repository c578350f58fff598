//! Record schema
//!
//! Canonical definition of every field on an evaluation form, in the fixed
//! order used for the SQL table, the insert statement, the JSON record and
//! the CSV header. Validation, coercion, persistence and export all read
//! their field lists from [`FIELDS`]; no other field list exists.

/// Table holding evaluation records
pub const TABLE_NAME: &str = "evaluations";

/// Store-assigned identifier column
pub const ID_COLUMN: &str = "id";

/// Store-assigned creation timestamp column
pub const CREATED_AT_COLUMN: &str = "created_at";

/// Semantic type of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Identity text (names, contact details, team)
    ShortText,
    /// Free-form text (project details, expectations)
    LongText,
    /// Integer score, zero when absent
    Score,
}

impl FieldKind {
    pub fn is_text(self) -> bool {
        matches!(self, FieldKind::ShortText | FieldKind::LongText)
    }

    /// SQLite column type
    pub fn sql_type(self) -> &'static str {
        match self {
            FieldKind::Score => "INTEGER",
            FieldKind::ShortText | FieldKind::LongText => "TEXT",
        }
    }
}

/// One field of the evaluation form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Canonical (camelCase) field name, as sent by clients
    pub name: &'static str,
    pub kind: FieldKind,
    /// Must be present and non-empty at submission
    pub required: bool,
}

const fn required(name: &'static str) -> FieldDef {
    FieldDef { name, kind: FieldKind::ShortText, required: true }
}

const fn identity(name: &'static str) -> FieldDef {
    FieldDef { name, kind: FieldKind::ShortText, required: false }
}

const fn score(name: &'static str) -> FieldDef {
    FieldDef { name, kind: FieldKind::Score, required: false }
}

const fn free_text(name: &'static str) -> FieldDef {
    FieldDef { name, kind: FieldKind::LongText, required: false }
}

/// All form fields in canonical order
pub const FIELDS: &[FieldDef] = &[
    // Identity
    required("firstName"),
    required("lastName"),
    identity("phoneNumber"),
    required("emailAddress"),
    identity("team"),
    required("projectName"),
    identity("teamType"),
    // Key qualities and project evaluation
    score("passion"),
    score("motivation"),
    score("integrity"),
    score("originality"),
    score("creativity"),
    score("feasibility"),
    score("scientificValue"),
    score("technologicalValue"),
    score("impact"),
    // Team composition
    score("teamSize"),
    score("participantQuality"),
    score("teamStrengths"),
    score("investedEffort"),
    score("investedResources"),
    // Maturity and business development
    score("maturityLevel"),
    score("hrNeeds"),
    score("investmentNeeds"),
    score("businessPlan"),
    score("businessModel"),
    score("developmentPlanning"),
    // Technical skills
    score("mathematics"),
    score("physics"),
    score("mechanics"),
    score("chemistry"),
    score("biology"),
    score("algorithmic"),
    score("ai"),
    score("coding"),
    // Business skills
    score("financialAnalysis"),
    score("marketAnalysis"),
    score("strategicPlanning"),
    score("projectManagement"),
    // Soft skills
    score("communication"),
    score("adaptability"),
    score("problemSolving"),
    score("teamwork"),
    score("criticalThinking"),
    score("curiosity"),
    score("empathy"),
    score("timeManagement"),
    score("leadership"),
    score("detailOrientation"),
    // Additional criteria
    score("design"),
    score("intellectualProperty"),
    score("ipPatentStatus"),
    score("quality"),
    score("formalizationCapacity"),
    // Free text and caller-computed total
    free_text("projectDetails"),
    free_text("expectations"),
    score("totalScore"),
];

/// Look up a field by its exact canonical name
pub fn field(name: &str) -> Option<&'static FieldDef> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Position of a field in canonical order
pub fn position(name: &str) -> Option<usize> {
    FIELDS.iter().position(|f| f.name == name)
}

/// Names of the fields that must be non-empty at submission, in canonical order
pub fn required_fields() -> Vec<&'static str> {
    FIELDS.iter().filter(|f| f.required).map(|f| f.name).collect()
}

/// Map a column name reported by the store back to its canonical name
///
/// Matching ignores ASCII case, so a backend that folds unquoted identifiers
/// (`firstname`, `FIRSTNAME`) still resolves to `firstName`. The two
/// store-assigned columns resolve to themselves.
pub fn canonical_name(column: &str) -> Option<&'static str> {
    if column.eq_ignore_ascii_case(ID_COLUMN) {
        return Some(ID_COLUMN);
    }
    if column.eq_ignore_ascii_case(CREATED_AT_COLUMN) || column.eq_ignore_ascii_case("createdAt") {
        return Some(CREATED_AT_COLUMN);
    }
    FIELDS
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(column))
        .map(|f| f.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_count_and_kinds() {
        assert_eq!(FIELDS.len(), 57);

        let scores = FIELDS.iter().filter(|f| f.kind == FieldKind::Score).count();
        let short = FIELDS.iter().filter(|f| f.kind == FieldKind::ShortText).count();
        let long = FIELDS.iter().filter(|f| f.kind == FieldKind::LongText).count();

        // 47 criteria + totalScore
        assert_eq!(scores, 48);
        assert_eq!(short, 7);
        assert_eq!(long, 2);
    }

    #[test]
    fn test_names_unique_ignoring_case() {
        let mut seen = HashSet::new();
        for f in FIELDS {
            assert!(
                seen.insert(f.name.to_ascii_lowercase()),
                "Duplicate field name: {}",
                f.name
            );
        }
        assert!(!seen.contains(ID_COLUMN));
        assert!(!seen.contains(CREATED_AT_COLUMN));
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(
            required_fields(),
            vec!["firstName", "lastName", "emailAddress", "projectName"]
        );
    }

    #[test]
    fn test_canonical_name_case_folding() {
        assert_eq!(canonical_name("firstname"), Some("firstName"));
        assert_eq!(canonical_name("EMAILADDRESS"), Some("emailAddress"));
        assert_eq!(canonical_name("ippatentstatus"), Some("ipPatentStatus"));
        assert_eq!(canonical_name("totalScore"), Some("totalScore"));
        assert_eq!(canonical_name("ID"), Some(ID_COLUMN));
        assert_eq!(canonical_name("CREATED_AT"), Some(CREATED_AT_COLUMN));
        assert_eq!(canonical_name("nonexistent"), None);
    }

    #[test]
    fn test_lookup_and_position() {
        assert_eq!(position("firstName"), Some(0));
        assert_eq!(position("totalScore"), Some(FIELDS.len() - 1));
        assert_eq!(field("ai").map(|f| f.kind), Some(FieldKind::Score));
        assert_eq!(field("projectDetails").map(|f| f.kind), Some(FieldKind::LongText));
        // Exact lookup is case-sensitive; only canonical_name folds case
        assert!(field("FirstName").is_none());
    }

    #[test]
    fn test_sql_types() {
        assert_eq!(FieldKind::Score.sql_type(), "INTEGER");
        assert_eq!(FieldKind::ShortText.sql_type(), "TEXT");
        assert_eq!(FieldKind::LongText.sql_type(), "TEXT");
        assert!(FieldKind::LongText.is_text());
        assert!(!FieldKind::Score.is_text());
    }
}
