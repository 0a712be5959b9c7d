//! Customers

use std::fmt;

use thiserror::Error;

use crate::ids::TypedId;

/// Customer Id
pub type CustomerId = TypedId<Customer>;

/// Pricing classification of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    /// Pays the unit retail price.
    #[default]
    Retail,

    /// Pays the wholesale price on bulk lines.
    Wholesale,
}

impl Classification {
    /// Parse the backend's customer type label.
    ///
    /// Only `"Mayorista"` (any case) is wholesale; every other label is retail.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("mayorista") {
            Self::Wholesale
        } else {
            Self::Retail
        }
    }

    /// Return the backend's label for this classification.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Retail => "Minorista",
            Self::Wholesale => "Mayorista",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tax registration of a customer that invoices as a business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxRegistration {
    /// RUC number
    pub ruc: String,

    /// Registered business name
    pub business_name: Option<String>,
}

/// Contact phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone {
    /// Phone number
    pub number: String,

    /// Free-form label, e.g. "Personal"
    pub description: String,
}

/// Geographic location of the customer's shop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude
    pub latitude: f64,

    /// Longitude
    pub longitude: f64,
}

/// Customer snapshot fetched from the customer directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    /// Customer id
    pub id: CustomerId,

    /// Business-facing customer code
    pub code: String,

    /// First name
    pub first_name: String,

    /// Last names
    pub last_name: String,

    /// Street address
    pub address: String,

    /// District
    pub district: Option<String>,

    /// Pricing classification
    pub classification: Classification,

    /// National identity document number
    pub dni: Option<String>,

    /// Tax registration, when the customer invoices as a business
    pub tax: Option<TaxRegistration>,

    /// Contact numbers
    pub phones: Vec<Phone>,

    /// Shop location
    pub coordinates: Option<Coordinates>,

    /// Customer photo path
    pub photo: Option<String>,
}

impl Customer {
    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Whether this customer matches a search criterion exactly by document number.
    fn matches_document(&self, criterion: &str) -> bool {
        self.dni.as_deref() == Some(criterion)
            || self.tax.as_ref().is_some_and(|tax| tax.ruc == criterion)
    }

    /// Whether either name contains the criterion, ignoring case.
    fn matches_name(&self, criterion: &str) -> bool {
        let needle = criterion.to_lowercase();

        self.first_name.to_lowercase().contains(&needle)
            || self.last_name.to_lowercase().contains(&needle)
    }
}

/// Find the customer a search criterion names.
///
/// An exact DNI or RUC match wins over a name match. Returns `None` when no customer matches,
/// so callers acting on a single customer never pick one the criterion does not name.
pub fn match_customer<'a>(customers: &'a [Customer], criterion: &str) -> Option<&'a Customer> {
    let criterion = criterion.trim();

    if criterion.is_empty() {
        return None;
    }

    customers
        .iter()
        .find(|customer| customer.matches_document(criterion))
        .or_else(|| {
            customers
                .iter()
                .find(|customer| customer.matches_name(criterion))
        })
}

/// Pick the customer a search criterion most likely refers to.
///
/// Like [`match_customer`], but when nothing matches the first result returned by the
/// directory is used. Returns `None` only for an empty list.
pub fn find_customer<'a>(customers: &'a [Customer], criterion: &str) -> Option<&'a Customer> {
    match_customer(customers, criterion).or_else(|| customers.first())
}

/// Facade Photo Id
pub type FacadePhotoId = TypedId<FacadePhoto>;

/// Photo of a customer's shop front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacadePhoto {
    /// Photo id
    pub id: FacadePhotoId,

    /// Stored file name, also used to delete the photo
    pub file_name: String,
}

/// Reasons a customer form cannot be sent.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    /// The first name is blank.
    #[error("the customer name is required")]
    MissingName,

    /// The DNI is blank.
    #[error("the customer DNI is required")]
    MissingDni,
}

/// Customer data entered to register a new customer or edit an existing one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerDraft {
    /// First name
    pub first_name: String,

    /// Last names
    pub last_name: String,

    /// National identity document number
    pub dni: String,

    /// Street address
    pub address: String,

    /// District
    pub district: Option<String>,

    /// Pricing classification
    pub classification: Classification,

    /// Tax registration, when the customer invoices as a business
    pub tax: Option<TaxRegistration>,

    /// Contact numbers
    pub phones: Vec<Phone>,

    /// Shop location
    pub coordinates: Option<Coordinates>,
}

impl CustomerDraft {
    /// Check the fields a new customer cannot be registered without.
    ///
    /// # Errors
    ///
    /// Returns a [`DraftError`] when the first name or the DNI is blank.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.first_name.trim().is_empty() {
            return Err(DraftError::MissingName);
        }

        if self.dni.trim().is_empty() {
            return Err(DraftError::MissingDni);
        }

        Ok(())
    }
}

impl From<&Customer> for CustomerDraft {
    fn from(customer: &Customer) -> Self {
        Self {
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            dni: customer.dni.clone().unwrap_or_default(),
            address: customer.address.clone(),
            district: customer.district.clone(),
            classification: customer.classification,
            tax: customer.tax.clone(),
            phones: customer.phones.clone(),
            coordinates: customer.coordinates,
        }
    }
}
