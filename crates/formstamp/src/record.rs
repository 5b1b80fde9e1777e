//! Leave records: the upstream JSON document a form is filled from.

use formstamp_core::{FillRequest, Mark, RoleContext};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::template::{FormTemplate, TemplateError};

/// A yes/no answer as it arrives upstream: a boolean or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YesNo {
    Bool(bool),
    Text(String),
}

impl Default for YesNo {
    fn default() -> Self {
        YesNo::Text(String::new())
    }
}

impl YesNo {
    /// `true`, or text equal to "yes" after trimming, ignoring case.
    pub fn is_yes(&self) -> bool {
        match self {
            YesNo::Bool(value) => *value,
            YesNo::Text(text) => text.trim().eq_ignore_ascii_case("yes"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeeInformation {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientInformation {
    /// "no" when the leave is for the employee's own condition.
    pub is_family_member: YesNo,
}

impl Default for PatientInformation {
    fn default() -> Self {
        Self {
            is_family_member: YesNo::Text("No".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MedicalCondition {
    pub date_commenced: String,
    pub probable_duration: String,
    pub is_serious_health_condition: YesNo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkCapacity {
    pub employee_able_to_work: YesNo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CareRequirements {
    pub patient_requires_assistance: YesNo,
    pub needs_further_help: YesNo,
}

/// A medical leave record. Missing sections take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeaveRecord {
    pub employee_information: EmployeeInformation,
    pub patient_information: PatientInformation,
    pub medical_condition: MedicalCondition,
    pub work_capacity: WorkCapacity,
    pub care_requirements: CareRequirements,
}

impl LeaveRecord {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Whether the leave is for the employee's own condition.
    pub fn is_self(&self) -> bool {
        match &self.patient_information.is_family_member {
            YesNo::Bool(value) => !value,
            YesNo::Text(text) => text.trim().eq_ignore_ascii_case("no"),
        }
    }

    /// Role whose name line the form is filled against.
    pub fn role(&self) -> RoleContext {
        if self.is_self() {
            RoleContext::Employee
        } else {
            RoleContext::Patient
        }
    }

    /// Fill requests in form order.
    ///
    /// The activity bubble repeats the able-to-work answer. Record fields
    /// the template does not lay out are left out.
    pub fn to_requests(&self, template: &FormTemplate) -> Result<Vec<FillRequest>, TemplateError> {
        let role = self.role();
        let medical = &self.medical_condition;
        let able_to_work = self.work_capacity.employee_able_to_work.is_yes();
        let care = &self.care_requirements;

        let marks = [
            (
                "employee_name",
                Mark::Text(self.employee_information.full_name.clone()),
            ),
            ("self_bubble", Mark::Choice(self.is_self())),
            ("date_commenced", Mark::Text(medical.date_commenced.clone())),
            (
                "probable_duration",
                Mark::Text(medical.probable_duration.clone()),
            ),
            (
                "serious_condition",
                Mark::Choice(medical.is_serious_health_condition.is_yes()),
            ),
            ("able_to_work", Mark::Choice(able_to_work)),
            ("activity", Mark::Choice(able_to_work)),
            (
                "basic_needs",
                Mark::Choice(care.patient_requires_assistance.is_yes()),
            ),
            ("further_help", Mark::Choice(care.needs_further_help.is_yes())),
        ];

        marks
            .into_iter()
            .filter(|(name, _)| {
                let laid_out = template.has_field(name);
                if !laid_out {
                    debug!(field = *name, template = %template.name, "field not in template");
                }
                laid_out
            })
            .map(|(name, mark)| Ok(FillRequest::new(template.field(name, role)?, mark)))
            .collect()
    }
}
