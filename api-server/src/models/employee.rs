//! Employee form model

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use attrition_core::logic::features::layout::choices_for;
use attrition_core::{FeatureValue, RawAttributes};

/// One employee as submitted by the form.
///
/// Every field is optional: blanks are forwarded to the core as nulls so the
/// pipeline can name them. Values that are present must be in range.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EmployeeForm {
    // Personal
    #[validate(range(min = 18, max = 65))]
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    #[validate(range(min = 0, max = 20))]
    pub distance_from_home: Option<i64>,

    // Education
    #[validate(range(min = 1, max = 5))]
    pub education: Option<i64>,
    pub education_field: Option<String>,

    // Job
    pub department: Option<String>,
    pub job_role: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub job_level: Option<i64>,
    pub overtime: Option<String>,
    pub business_travel: Option<String>,

    // Compensation
    #[validate(range(min = 1000, max = 20000))]
    pub monthly_income: Option<i64>,
    #[validate(range(min = 100, max = 2000))]
    pub daily_rate: Option<i64>,
    #[validate(range(min = 10, max = 70))]
    pub hourly_rate: Option<i64>,
    #[validate(range(min = 0, max = 30))]
    pub percent_salary_hike: Option<i64>,
    #[validate(range(min = 0, max = 3))]
    pub stock_option_level: Option<i64>,

    // Career history
    #[validate(range(min = 0, max = 20))]
    pub num_companies_worked: Option<i64>,
    #[validate(range(min = 0, max = 50))]
    pub total_working_years: Option<i64>,
    #[validate(range(min = 0, max = 40))]
    pub years_at_company: Option<i64>,
    #[validate(range(min = 0, max = 20))]
    pub years_in_current_role: Option<i64>,
    #[validate(range(min = 0, max = 20))]
    pub years_since_last_promotion: Option<i64>,
    #[validate(range(min = 0, max = 20))]
    pub years_with_curr_manager: Option<i64>,
    #[validate(range(min = 0, max = 10))]
    pub training_times_last_year: Option<i64>,

    // Satisfaction & rating (1-4 scale)
    #[validate(range(min = 1, max = 4))]
    pub environment_satisfaction: Option<i64>,
    #[validate(range(min = 1, max = 4))]
    pub job_satisfaction: Option<i64>,
    #[validate(range(min = 1, max = 4))]
    pub relationship_satisfaction: Option<i64>,
    #[validate(range(min = 1, max = 4))]
    pub work_life_balance: Option<i64>,
    #[validate(range(min = 1, max = 4))]
    pub job_involvement: Option<i64>,
    #[validate(range(min = 1, max = 4))]
    pub performance_rating: Option<i64>,
}

impl EmployeeForm {
    fn categorical(&self) -> [(&'static str, Option<&String>); 7] {
        [
            ("gender", self.gender.as_ref()),
            ("marital_status", self.marital_status.as_ref()),
            ("education_field", self.education_field.as_ref()),
            ("department", self.department.as_ref()),
            ("job_role", self.job_role.as_ref()),
            ("overtime", self.overtime.as_ref()),
            ("business_travel", self.business_travel.as_ref()),
        ]
    }

    /// Ranges plus categorical choices
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        for (key, value) in self.categorical() {
            let (Some(value), Some(choices)) = (value, choices_for(key)) else {
                continue;
            };
            if !choices.contains(&value.as_str()) {
                let mut error = ValidationError::new("choice");
                error.message = Some(Cow::Owned(format!(
                    "'{}' is not one of: {}",
                    value,
                    choices.join(", ")
                )));
                errors.add(key, error);
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Raw attributes for the core pipeline, blanks kept as nulls
    pub fn into_raw_attributes(self) -> RawAttributes {
        fn int(v: Option<i64>) -> Option<FeatureValue> {
            v.map(FeatureValue::Int)
        }
        fn text(v: Option<String>) -> Option<FeatureValue> {
            v.map(FeatureValue::Text)
        }

        let fields = [
            ("age", int(self.age)),
            ("gender", text(self.gender)),
            ("marital_status", text(self.marital_status)),
            ("distance_from_home", int(self.distance_from_home)),
            ("education", int(self.education)),
            ("education_field", text(self.education_field)),
            ("department", text(self.department)),
            ("job_role", text(self.job_role)),
            ("job_level", int(self.job_level)),
            ("overtime", text(self.overtime)),
            ("business_travel", text(self.business_travel)),
            ("monthly_income", int(self.monthly_income)),
            ("daily_rate", int(self.daily_rate)),
            ("hourly_rate", int(self.hourly_rate)),
            ("percent_salary_hike", int(self.percent_salary_hike)),
            ("stock_option_level", int(self.stock_option_level)),
            ("num_companies_worked", int(self.num_companies_worked)),
            ("total_working_years", int(self.total_working_years)),
            ("years_at_company", int(self.years_at_company)),
            ("years_in_current_role", int(self.years_in_current_role)),
            ("years_since_last_promotion", int(self.years_since_last_promotion)),
            ("years_with_curr_manager", int(self.years_with_curr_manager)),
            ("training_times_last_year", int(self.training_times_last_year)),
            ("environment_satisfaction", int(self.environment_satisfaction)),
            ("job_satisfaction", int(self.job_satisfaction)),
            ("relationship_satisfaction", int(self.relationship_satisfaction)),
            ("work_life_balance", int(self.work_life_balance)),
            ("job_involvement", int(self.job_involvement)),
            ("performance_rating", int(self.performance_rating)),
        ];

        let mut raw = RawAttributes::new();
        for (key, value) in fields {
            raw.insert(key, value);
        }
        raw
    }
}
