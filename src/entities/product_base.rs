use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Field set shared by catalog products and purchase line items.
///
/// The two entities persist the same columns under different identities: the
/// catalog keys on the barcode, line items carry a surrogate id so the same
/// barcode can recur across orders. Composition over inheritance — each
/// entity declares its own columns and uses this struct at the seam where
/// the shared fields travel (product creation input, line-item snapshots).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProductBase {
    /// Sized for EAN-8/EAN-13/UPC-A/UPC-E codes with headroom.
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    pub barcode: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,

    pub description: String,

    /// Opaque handle to an externally stored image asset.
    #[validate(length(min = 1, max = 1024, message = "must be 1-1024 characters"))]
    pub image: String,

    #[validate(custom = "crate::validation::validate_money")]
    pub price: Decimal,

    pub category_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base() -> ProductBase {
        ProductBase {
            barcode: "7891000100103".to_string(),
            title: "Condensed Milk".to_string(),
            description: "Sweetened condensed milk, 395g".to_string(),
            image: "products/condensed-milk.png".to_string(),
            price: dec!(5.99),
            category_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn valid_base_passes() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn barcode_over_20_chars_rejected() {
        let mut b = base();
        b.barcode = "1".repeat(21);
        assert!(b.validate().is_err());
    }

    #[test]
    fn empty_title_rejected() {
        let mut b = base();
        b.title = String::new();
        assert!(b.validate().is_err());
    }

    #[test]
    fn nine_digit_price_rejected() {
        let mut b = base();
        b.price = dec!(1234567.89);
        assert!(b.validate().is_err());
    }

    #[test]
    fn eight_digit_price_accepted() {
        let mut b = base();
        b.price = dec!(12345.678);
        assert!(b.validate().is_ok());
    }
}
