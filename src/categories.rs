use crate::error::ConfigError;

pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "Insurance Card",
    "Doctor's Letter",
    "Vaccination Card",
    "Lab Report",
    "Anything else?",
];

/// One required document type. `position` is 1-based and doubles as identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCategory {
    pub position: usize,
    pub label: String,
}

/// The ordered list of categories a patient is walked through.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    categories: Vec<DocumentCategory>,
}

impl CategoryCatalog {
    pub fn new<I, S>(labels: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut categories = Vec::new();
        for label in labels {
            let label = label.into();
            if label.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "document categories must not be blank".to_string(),
                ));
            }
            categories.push(DocumentCategory {
                position: categories.len() + 1,
                label,
            });
        }

        if categories.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one document category is required".to_string(),
            ));
        }

        Ok(Self { categories })
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Category at a 1-based step.
    pub fn get(&self, step: usize) -> Option<&DocumentCategory> {
        step.checked_sub(1).and_then(|i| self.categories.get(i))
    }

    /// Like `get`, but clamped into the catalog. Never fails since the
    /// catalog is never empty.
    pub fn at_step(&self, step: usize) -> &DocumentCategory {
        self.get(step.clamp(1, self.categories.len()))
            .unwrap_or(&self.categories[0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentCategory> {
        self.categories.iter()
    }
}
