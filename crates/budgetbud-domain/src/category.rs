//! The fixed category catalog that line items reference by id.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category id whose forecasted items count as savings.
pub const SAVINGS_CATEGORY_ID: &str = "savings";

/// Categorises budget activity for reporting.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: CategoryKind,
    pub icon: Option<&'static str>,
    pub color: Option<&'static str>,
}

impl Category {
    const fn new(
        id: &'static str,
        name: &'static str,
        kind: CategoryKind,
        icon: &'static str,
        color: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            icon: Some(icon),
            color: Some(color),
        }
    }

    /// Looks up a catalog entry by its exact id.
    pub fn find(id: &str) -> Option<&'static Category> {
        CATALOG.iter().find(|category| category.id == id)
    }

    /// Returns the whole catalog in display order.
    pub fn catalog() -> &'static [Category] {
        &CATALOG
    }

    /// Lists the categories a line item may be filed under.
    pub fn expense_categories() -> impl Iterator<Item = &'static Category> {
        CATALOG
            .iter()
            .filter(|category| category.kind == CategoryKind::Expense)
    }

    /// Label for a category id, falling back to the raw id when it is not in the catalog.
    pub fn label_for(id: &str) -> String {
        Self::find(id)
            .map(|category| category.name.to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.icon {
            Some(icon) => write!(f, "{} {}", icon, self.name),
            None => f.write_str(self.name),
        }
    }
}

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Income => "Income",
            CategoryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

static CATALOG: [Category; 10] = [
    Category::new("income", "Income", CategoryKind::Income, "💰", "#4CAF50"),
    Category::new("tithes", "Tithes/Offering", CategoryKind::Expense, "🙏", "#9C27B0"),
    Category::new("savings", "Savings", CategoryKind::Expense, "💎", "#2196F3"),
    Category::new("food", "Food Cost", CategoryKind::Expense, "🍽", "#FF9800"),
    Category::new("education", "Education", CategoryKind::Expense, "📚", "#03A9F4"),
    Category::new("entertainment", "Entertainment", CategoryKind::Expense, "🎬", "#E91E63"),
    Category::new("business", "Business Expenses", CategoryKind::Expense, "💼", "#607D8B"),
    Category::new("utilities", "Utilities", CategoryKind::Expense, "🔌", "#795548"),
    Category::new("family", "Family Support", CategoryKind::Expense, "👨‍👩‍👧‍👦", "#8BC34A"),
    Category::new("misc", "Miscellaneous", CategoryKind::Expense, "📦", "#9E9E9E"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup_and_fallback_label() {
        assert_eq!(Category::find("food").map(|c| c.name), Some("Food Cost"));
        assert!(Category::find("Food").is_none());
        assert_eq!(Category::label_for("transport"), "transport");
    }

    #[test]
    fn expense_categories_skip_income() {
        let ids: Vec<_> = Category::expense_categories().map(|c| c.id).collect();
        assert_eq!(ids.len(), 9);
        assert!(!ids.contains(&"income"));
        assert_eq!(ids.first(), Some(&"tithes"));
    }
}
