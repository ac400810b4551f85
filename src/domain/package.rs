use serde::{Deserialize, Serialize};

use super::Minor;

/// A service package offered by the business. The package number is
/// assigned by the repository on insert; the price is stored in minor
/// currency units and must never be negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub package_number: i64,
    pub package_name: String,
    pub package_description: String,
    pub package_price: Minor,
}

impl Package {
    /// Create a new package. The package number must be assigned by the
    /// repository.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Minor,
    ) -> Self {
        assert!(price >= 0, "Package price must be non-negative");
        Self {
            package_number: 0, // Will be set by repository
            package_name: name.into(),
            package_description: description.into(),
            package_price: price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_package() {
        let pkg = Package::new("Deluxe", "Wax+wash", 1500000);
        assert_eq!(pkg.package_number, 0);
        assert_eq!(pkg.package_price, 1500000);
    }

    #[test]
    #[should_panic(expected = "Package price must be non-negative")]
    fn test_package_requires_non_negative_price() {
        Package::new("Broken", "Invalid", -1);
    }
}
