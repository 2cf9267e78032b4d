//! Company records.

use serde::{Deserialize, Serialize};

use super::entity::{StoreEntity, limit_text, require_text};
use crate::error::ValidationError;

/// Kind of tax document identifying a company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocType {
    /// Taxpayer identification number.
    Tin,
    /// IRS number.
    Irs,
    /// Employer identification number.
    Ein,
    /// Social security number.
    #[default]
    Ssn,
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tin => write!(f, "TIN"),
            Self::Irs => write!(f, "IRS"),
            Self::Ein => write!(f, "EIN"),
            Self::Ssn => write!(f, "SSN"),
        }
    }
}

impl std::str::FromStr for DocType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TIN" => Ok(Self::Tin),
            "IRS" => Ok(Self::Irs),
            "EIN" => Ok(Self::Ein),
            "SSN" => Ok(Self::Ssn),
            _ => Err(ValidationError::new(
                "doctype",
                format!("'{s}' is not one of TIN, IRS, EIN, SSN"),
            )),
        }
    }
}

/// A company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Company name.
    pub name: String,

    /// Last 4 digits of the TIN/IRS/EIN/SSN.
    #[serde(default)]
    pub tax_document: Option<String>,

    /// Which document `tax_document` refers to.
    #[serde(default)]
    pub doctype: DocType,
}

impl Company {
    /// Create a company with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tax_document: None,
            doctype: DocType::default(),
        }
    }

    /// Attach a tax document.
    #[must_use]
    pub fn with_tax_document(mut self, doctype: DocType, tax_document: impl Into<String>) -> Self {
        self.doctype = doctype;
        self.tax_document = Some(tax_document.into());
        self
    }
}

impl StoreEntity for Company {
    const STORE_CODE_PREFIX: &'static str = "COMP";
    const TABLE: &'static str = "companies";
    const NAME: &'static str = "Company";

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, 50)?;
        if let Some(doc) = &self.tax_document {
            limit_text("tax_document", doc, 50)?;
        }
        Ok(())
    }

    fn unique_fields(&self) -> Vec<(&'static str, String)> {
        self.tax_document
            .iter()
            .map(|doc| ("tax_document", doc.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doctype_parse_and_display() {
        assert_eq!("ein".parse::<DocType>().unwrap(), DocType::Ein);
        assert_eq!(DocType::Tin.to_string(), "TIN");
        assert_eq!("VAT".parse::<DocType>().unwrap_err().field, "doctype");
    }

    #[test]
    fn test_company_validation() {
        assert!(Company::new("Acme").validate().is_ok());
        assert!(Company::new("").validate().is_err());
        assert!(Company::new("x".repeat(51)).validate().is_err());

        let company = Company::new("Acme").with_tax_document(DocType::Ein, "1".repeat(51));
        assert_eq!(company.validate().unwrap_err().field, "tax_document");
    }

    #[test]
    fn test_company_defaults_to_ssn() {
        let company: Company = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        assert_eq!(company.doctype, DocType::Ssn);
        assert_eq!(company.tax_document, None);
    }

    #[test]
    fn test_only_present_tax_document_is_unique() {
        assert!(Company::new("Acme").unique_fields().is_empty());

        let company = Company::new("Acme").with_tax_document(DocType::Tin, "1234");
        assert_eq!(
            company.unique_fields(),
            vec![("tax_document", "1234".to_string())]
        );
    }
}
