//! Category view of a stored evaluation
//!
//! Groups a record's fields into the fixed categories shown on the
//! dashboard's detail page. The grouping is editorial: each category lists
//! its (output key, record field) pairs explicitly.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::record::{EvaluationRecord, FieldValue};

/// (output key, canonical field name) pairs of one category
pub type Assignment = &'static [(&'static str, &'static str)];

pub const PERSONAL_INFO: Assignment = &[
    ("firstName", "firstName"),
    ("lastName", "lastName"),
    ("email", "emailAddress"),
    ("phone", "phoneNumber"),
    ("team", "team"),
    ("project", "projectName"),
    ("teamType", "teamType"),
];

pub const KEY_QUALITIES: Assignment = &[
    ("passion", "passion"),
    ("motivation", "motivation"),
    ("integrity", "integrity"),
];

pub const PROJECT_EVALUATION: Assignment = &[
    ("originality", "originality"),
    ("creativity", "creativity"),
    ("feasibility", "feasibility"),
    ("scientificValue", "scientificValue"),
    ("technologicalValue", "technologicalValue"),
    ("impact", "impact"),
];

pub const TEAM_COMPOSITION: Assignment = &[
    ("teamSize", "teamSize"),
    ("participantQuality", "participantQuality"),
    ("teamStrengths", "teamStrengths"),
    ("investedEffort", "investedEffort"),
    ("investedResources", "investedResources"),
];

pub const PROJECT_MATURITY: Assignment = &[
    ("maturityLevel", "maturityLevel"),
    ("hrNeeds", "hrNeeds"),
    ("investmentNeeds", "investmentNeeds"),
];

pub const BUSINESS_DEVELOPMENT: Assignment = &[
    ("businessPlan", "businessPlan"),
    ("businessModel", "businessModel"),
    ("developmentPlanning", "developmentPlanning"),
];

pub const TECHNICAL_SKILLS: Assignment = &[
    ("mathematics", "mathematics"),
    ("physics", "physics"),
    ("mechanics", "mechanics"),
    ("chemistry", "chemistry"),
    ("biology", "biology"),
    ("algorithmic", "algorithmic"),
    ("ai", "ai"),
    ("coding", "coding"),
];

pub const BUSINESS_SKILLS: Assignment = &[
    ("financialAnalysis", "financialAnalysis"),
    ("marketAnalysis", "marketAnalysis"),
    ("strategicPlanning", "strategicPlanning"),
    ("projectManagement", "projectManagement"),
];

pub const SOFT_SKILLS: Assignment = &[
    ("communication", "communication"),
    ("adaptability", "adaptability"),
    ("problemSolving", "problemSolving"),
    ("teamwork", "teamwork"),
    ("criticalThinking", "criticalThinking"),
    ("curiosity", "curiosity"),
    ("empathy", "empathy"),
    ("timeManagement", "timeManagement"),
    ("leadership", "leadership"),
    ("detailOrientation", "detailOrientation"),
];

pub const ADDITIONAL_CRITERIA: Assignment = &[
    ("design", "design"),
    ("intellectualProperty", "intellectualProperty"),
    ("ipPatentStatus", "ipPatentStatus"),
    ("quality", "quality"),
    ("formalizationCapacity", "formalizationCapacity"),
];

/// Every category in output order, keyed by its JSON name
pub const CATEGORIES: &[(&str, Assignment)] = &[
    ("personalInfo", PERSONAL_INFO),
    ("keyQualities", KEY_QUALITIES),
    ("projectEvaluation", PROJECT_EVALUATION),
    ("teamComposition", TEAM_COMPOSITION),
    ("projectMaturity", PROJECT_MATURITY),
    ("businessDevelopment", BUSINESS_DEVELOPMENT),
    ("technicalSkills", TECHNICAL_SKILLS),
    ("businessSkills", BUSINESS_SKILLS),
    ("softSkills", SOFT_SKILLS),
    ("additionalCriteria", ADDITIONAL_CRITERIA),
];

/// Fields placed at the top level of the view rather than in a category
pub const TOP_LEVEL_FIELDS: &[&str] = &["projectDetails", "expectations", "totalScore"];

/// One category: ordered (output key, value) pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    entries: Vec<(&'static str, FieldValue)>,
}

impl CategoryView {
    fn collect(record: &EvaluationRecord, assignment: Assignment) -> Self {
        let entries = assignment
            .iter()
            .filter_map(|(key, field)| record.fields.get(field).map(|v| (*key, v.clone())))
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CategoryView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Read-only nested view of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsView {
    pub personal_info: CategoryView,
    pub key_qualities: CategoryView,
    pub project_evaluation: CategoryView,
    pub team_composition: CategoryView,
    pub project_maturity: CategoryView,
    pub business_development: CategoryView,
    pub technical_skills: CategoryView,
    pub business_skills: CategoryView,
    pub soft_skills: CategoryView,
    pub additional_criteria: CategoryView,
    pub project_details: String,
    pub expectations: String,
    pub total_score: i64,
    pub created_at: String,
}

/// Build the category view of a record
pub fn organize(record: &EvaluationRecord) -> MetricsView {
    MetricsView {
        personal_info: CategoryView::collect(record, PERSONAL_INFO),
        key_qualities: CategoryView::collect(record, KEY_QUALITIES),
        project_evaluation: CategoryView::collect(record, PROJECT_EVALUATION),
        team_composition: CategoryView::collect(record, TEAM_COMPOSITION),
        project_maturity: CategoryView::collect(record, PROJECT_MATURITY),
        business_development: CategoryView::collect(record, BUSINESS_DEVELOPMENT),
        technical_skills: CategoryView::collect(record, TECHNICAL_SKILLS),
        business_skills: CategoryView::collect(record, BUSINESS_SKILLS),
        soft_skills: CategoryView::collect(record, SOFT_SKILLS),
        additional_criteria: CategoryView::collect(record, ADDITIONAL_CRITERIA),
        project_details: record.text("projectDetails").to_string(),
        expectations: record.text("expectations").to_string(),
        total_score: record.score("totalScore"),
        created_at: record.created_at.clone(),
    }
}
