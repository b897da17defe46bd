// CutoffScout - core/catalog.rs
//
// Branch-code lookup backing the multi-select filter.
// The catalog only offers choices; it never constrains which codes the
// dataset may contain.

use crate::core::model::BranchOption;
use std::collections::BTreeSet;

/// Ordered list of branch choices.
#[derive(Debug, Clone, Default)]
pub struct BranchCatalog {
    options: Vec<BranchOption>,
}

impl BranchCatalog {
    pub fn new(options: Vec<BranchOption>) -> Self {
        Self { options }
    }

    /// All options in lookup order.
    pub fn options(&self) -> &[BranchOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Type-ahead search: options whose label contains `input`, case-insensitive.
    /// An empty input returns every option.
    pub fn search(&self, input: &str) -> Vec<&BranchOption> {
        let needle = input.trim().to_lowercase();
        self.options
            .iter()
            .filter(|opt| opt.label.to_lowercase().contains(&needle))
            .collect()
    }

    /// Display label for a code, if the catalog knows it.
    pub fn label_for(&self, code: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|opt| opt.value == code)
            .map(|opt| opt.label.as_str())
    }

    /// Codes from `selected` that the catalog does not offer.
    ///
    /// Such codes are still valid filter values; callers use this to warn.
    pub fn unknown_codes<'s>(&self, selected: &'s BTreeSet<String>) -> Vec<&'s str> {
        selected
            .iter()
            .filter(|code| self.label_for(code).is_none())
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> BranchCatalog {
        BranchCatalog::new(vec![
            BranchOption {
                value: "CS".to_string(),
                label: "CS - Computer Science and Engineering".to_string(),
            },
            BranchOption {
                value: "EE".to_string(),
                label: "EE - Electrical and Electronics Engineering".to_string(),
            },
            BranchOption {
                value: "ME".to_string(),
                label: "ME - Mechanical Engineering".to_string(),
            },
        ])
    }

    #[test]
    fn test_search_is_case_insensitive_on_label() {
        let cat = catalog();
        let hits: Vec<_> = cat.search("ELECTRICAL").into_iter().map(|o| o.value.as_str()).collect();
        assert_eq!(hits, vec!["EE"]);
        let hits: Vec<_> = cat.search("engineering").into_iter().map(|o| o.value.as_str()).collect();
        assert_eq!(hits, vec!["CS", "EE", "ME"]);
    }

    #[test]
    fn test_empty_search_returns_all_in_order() {
        assert_eq!(catalog().search("").len(), 3);
    }

    #[test]
    fn test_label_for_and_unknown_codes() {
        let cat = catalog();
        assert_eq!(cat.label_for("ME"), Some("ME - Mechanical Engineering"));
        assert_eq!(cat.label_for("XX"), None);
        let selected = BTreeSet::from(["CS".to_string(), "XX".to_string()]);
        assert_eq!(cat.unknown_codes(&selected), vec!["XX"]);
    }
}
