// abacus-core/src/domain/dataset/rules.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Structural expectations for a claims dataset: which column is the key,
/// which fields are mandatory and which columns carry a fixed format.
#[derive(Debug, Deserialize, Serialize, Clone, Validate, PartialEq)]
pub struct DatasetRules {
    #[validate(length(min = 1, message = "id_column cannot be empty"))]
    #[serde(default = "default_id_column")]
    pub id_column: String,

    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<String>,

    /// `null` disables the postal-code check.
    #[serde(default = "default_postal_code_column")]
    pub postal_code_column: Option<String>,

    /// `null` disables the date check.
    #[serde(default = "default_date_column")]
    pub date_column: Option<String>,

    #[serde(default = "default_amount_columns")]
    pub amount_columns: Vec<String>,

    #[validate(length(min = 1, message = "postal_code_pattern cannot be empty"))]
    #[serde(default = "default_postal_code_pattern")]
    pub postal_code_pattern: String,

    #[validate(length(min = 1, message = "date_pattern cannot be empty"))]
    #[serde(default = "default_date_pattern")]
    pub date_pattern: String,
}

impl DatasetRules {
    /// Every column the rules refer to, in check order, without duplicates.
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = vec![self.id_column.as_str()];
        columns.extend(self.required_fields.iter().map(String::as_str));
        columns.extend(self.postal_code_column.as_deref());
        columns.extend(self.date_column.as_deref());
        columns.extend(self.amount_columns.iter().map(String::as_str));

        let mut seen = std::collections::HashSet::new();
        columns.retain(|c| seen.insert(*c));
        columns
    }

    /// Columns whose values must keep their textual form (keys and formatted codes).
    pub fn is_text_column(&self, name: &str) -> bool {
        name == self.id_column
            || self.postal_code_column.as_deref() == Some(name)
            || self.date_column.as_deref() == Some(name)
    }

    pub fn is_amount_column(&self, name: &str) -> bool {
        self.amount_columns.iter().any(|c| c == name)
    }
}

impl Default for DatasetRules {
    fn default() -> Self {
        Self {
            id_column: default_id_column(),
            required_fields: default_required_fields(),
            postal_code_column: default_postal_code_column(),
            date_column: default_date_column(),
            amount_columns: default_amount_columns(),
            postal_code_pattern: default_postal_code_pattern(),
            date_pattern: default_date_pattern(),
        }
    }
}

fn default_id_column() -> String {
    "claim_id".to_string()
}

fn default_required_fields() -> Vec<String> {
    vec![
        "patient_name".to_string(),
        "dob".to_string(),
        "zip_code".to_string(),
    ]
}

fn default_postal_code_column() -> Option<String> {
    Some("zip_code".to_string())
}

fn default_date_column() -> Option<String> {
    Some("dob".to_string())
}

fn default_amount_columns() -> Vec<String> {
    vec!["claim_amount".to_string()]
}

// ASCII digits only: `\d` would also accept other Unicode digits.
fn default_postal_code_pattern() -> String {
    "^[0-9]{5}$".to_string()
}

fn default_date_pattern() -> String {
    "^[0-9]{4}-[0-9]{2}-[0-9]{2}$".to_string()
}
