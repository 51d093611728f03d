//! Deterministic keyword-rule categorizer.
//!
//! Uppercase substring rules cover the bulk of retail line items without a
//! network hop. Description rules take priority over store-name hints.

use super::{CategorizeRequest, Categorizer, ClassifiedItem, ExpenseCategory};
use crate::error::CategorizeError;

/// Description keyword rules, first match wins.
const DESCRIPTION_RULES: &[(&[&str], ExpenseCategory)] = &[
    (
        &["MILK", "BREAD", "EGG", "CHEESE", "PRODUCE", "FRUIT", "VEGGIE", "MEAT", "CEREAL", "JUICE", "YOGURT", "RICE", "PASTA"],
        ExpenseCategory::Groceries,
    ),
    (
        &["DETERGENT", "PAPER TOWEL", "CLEANER", "TRASH BAG", "FOIL", "SPONGE", "BLEACH"],
        ExpenseCategory::Household,
    ),
    (
        &["SHAMPOO", "SOAP", "TOOTHPASTE", "DEODORANT", "LOTION", "RAZOR"],
        ExpenseCategory::PersonalCare,
    ),
    (
        &["VITAMIN", "MEDICINE", "IBUPROFEN", "ASPIRIN", "BANDAGE", "RX "],
        ExpenseCategory::Health,
    ),
    (
        &["USB", "CABLE", "CHARGER", "BATTERY", "HEADPHONE", "HDMI", "MOUSE", "KEYBOARD"],
        ExpenseCategory::Electronics,
    ),
    (
        &["SHIRT", "PANTS", "SOCK", "JACKET", "SHOE", "JEANS"],
        ExpenseCategory::Clothing,
    ),
    (
        &["MOVIE", "TICKET", "STREAMING", "BOOK", "PUZZLE"],
        ExpenseCategory::Entertainment,
    ),
    (
        &["BURGER", "PIZZA", "COFFEE", "LATTE", "SANDWICH", "TACO", "FRIES"],
        ExpenseCategory::Dining,
    ),
    (
        &["DOG ", "CAT ", "LITTER", "KIBBLE", "PET "],
        ExpenseCategory::Pets,
    ),
    (
        &["FUEL", "GASOLINE", "DIESEL", "PARKING", "TOLL", "CAR WASH"],
        ExpenseCategory::Transportation,
    ),
    (
        &["ELECTRIC BILL", "WATER BILL", "INTERNET", "PHONE BILL"],
        ExpenseCategory::Utilities,
    ),
    (
        &["PEN", "NOTEBOOK", "STAPLER", "PRINTER", "ENVELOPE", "FOLDER"],
        ExpenseCategory::Office,
    ),
];

/// Store-name hints applied when no description rule fires.
const STORE_HINTS: &[(&[&str], ExpenseCategory)] = &[
    (&["GROCER", "MARKET", "FOODS"], ExpenseCategory::Groceries),
    (&["PHARMACY", "DRUG"], ExpenseCategory::Health),
    (&["CAFE", "COFFEE", "GRILL", "DINER", "RESTAURANT", "PIZZERIA"], ExpenseCategory::Dining),
    (&["HARDWARE", "HOME IMPROVEMENT"], ExpenseCategory::Household),
    (&["PET"], ExpenseCategory::Pets),
];

/// Rule-based [`Categorizer`]; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordCategorizer;

impl KeywordCategorizer {
    pub fn new() -> Self {
        Self
    }

    fn classify_one(description: &str, store_hint: Option<ExpenseCategory>) -> (ExpenseCategory, f32, String) {
        let upper = description.to_uppercase();

        for (keywords, category) in DESCRIPTION_RULES {
            if let Some(keyword) = keywords.iter().find(|k| upper.contains(*k)) {
                return (
                    *category,
                    0.9,
                    format!("matched keyword {:?}", keyword.trim()),
                );
            }
        }

        if let Some(category) = store_hint {
            return (category, 0.5, "inferred from store name".to_string());
        }

        (
            ExpenseCategory::Miscellaneous,
            0.3,
            "no keyword rule matched".to_string(),
        )
    }

    fn store_hint(store_name: &str) -> Option<ExpenseCategory> {
        let upper = store_name.to_uppercase();
        STORE_HINTS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| upper.contains(k)))
            .map(|(_, category)| *category)
    }
}

impl Categorizer for KeywordCategorizer {
    fn categorize(
        &self,
        request: &CategorizeRequest,
    ) -> Result<Vec<ClassifiedItem>, CategorizeError> {
        let hint = Self::store_hint(&request.store_name);

        Ok(request
            .items
            .iter()
            .map(|item| {
                let (category, confidence, reasoning) =
                    Self::classify_one(&item.description, hint);
                ClassifiedItem {
                    description: item.description.clone(),
                    category,
                    confidence,
                    reasoning,
                    original_price: item.price,
                }
            })
            .collect())
    }
}
