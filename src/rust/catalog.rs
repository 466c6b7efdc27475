//! Grouping and search over the known symptom names.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Body-system groups used to browse symptoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    General,
    Skin,
    Digestive,
    Neurological,
    Respiratory,
    MuscleJoint,
    Others,
}

const GROUPS: [(Category, &[&str]); 6] = [
    (
        Category::General,
        &["fatigue", "fever", "lethargy", "weight_loss", "high_fever", "chills", "malaise", "phlegm", "sweating", "mild_fever"],
    ),
    (
        Category::Skin,
        &["itching", "skin_rash", "nodal_skin_eruptions", "pustule", "blackheads", "scurring", "yellowish_skin", "bruising", "peeling_skin"],
    ),
    (
        Category::Digestive,
        &["vomiting", "indigestion", "nausea", "abdominal_pain", "constipation", "diarrhoea", "stomach_pain", "acidity", "burning_micturition", "distention_of_abdomen"],
    ),
    (
        Category::Neurological,
        &["headache", "dizziness", "altered_sensorium", "unsteadiness", "lack_of_concentration", "visual_disturbances", "balance_errors"],
    ),
    (
        Category::Respiratory,
        &["continuous_sneezing", "cough", "breathlessness", "mucoid_sputum", "chest_pain"],
    ),
    (
        Category::MuscleJoint,
        &["joint_pain", "muscle_wasting", "muscle_weakness", "back_pain", "neck_pain", "stiff_neck", "knee_pain", "swelling_joints"],
    ),
];

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Skin => "Skin",
            Self::Digestive => "Digestive",
            Self::Neurological => "Neurological",
            Self::Respiratory => "Respiratory",
            Self::MuscleJoint => "Muscle/Joint",
            Self::Others => "Others",
        }
    }

    /// Category of `symptom`, or `Others` if no group lists it
    pub fn of(symptom: &str) -> Self {
        GROUPS
            .iter()
            .find(|(_, members)| members.contains(&symptom))
            .map(|(category, _)| *category)
            .unwrap_or(Self::Others)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        GROUPS
            .iter()
            .map(|(category, _)| *category)
            .chain([Self::Others])
            .find(|c| c.label().eq_ignore_ascii_case(wanted) || format!("{:?}", c).eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown category '{}'", wanted))
    }
}

/// Turns `skin_rash` into `skin rash`
pub fn display_name(symptom: &str) -> String {
    symptom.replace('_', " ")
}

/// Symptoms whose name contains `term` (ignoring case), restricted to
/// `category` when given. Input order is preserved.
pub fn search<'a>(symptoms: &'a [String], term: &str, category: Option<Category>) -> Vec<&'a str> {
    let term = term.trim().to_lowercase();
    symptoms
        .iter()
        .map(String::as_str)
        .filter(|s| s.to_lowercase().contains(&term))
        .filter(|s| category.map_or(true, |c| Category::of(s) == c))
        .collect()
}
