use unicode_segmentation::UnicodeSegmentation;

use crate::model::config::ValidationConfig;
use crate::model::tool::{Category, Inventory, ToolDefinition};

/// Raw add-tool input, before validation.
#[derive(Debug, Clone)]
pub struct NewTool {
    pub name: String,
    pub quantity: i64,
    pub category: Category,
}

/// Check a new tool against the configured bounds.
///
/// Returns the definition to append, or every problem found as a
/// human-readable message. The inventory is never touched here.
pub fn validate_new_tool(
    input: &NewTool,
    inventory: &Inventory,
    bounds: &ValidationConfig,
) -> Result<ToolDefinition, Vec<String>> {
    let mut errors = Vec::new();
    let name = input.name.trim();
    let len = name.graphemes(true).count();

    if len == 0 {
        errors.push("Tool name is required".to_string());
    } else if len < bounds.name_min {
        errors.push(format!(
            "Tool name must be at least {} characters",
            bounds.name_min
        ));
    } else if len > bounds.name_max {
        errors.push(format!(
            "Tool name must be {} characters or fewer",
            bounds.name_max
        ));
    }

    if name.chars().any(char::is_control) {
        errors.push("Tool name cannot contain control characters".to_string());
    }

    if len > 0 && let Some(existing) = inventory.find_ignore_case(name) {
        errors.push(format!(
            "A tool named \"{}\" already exists in {}",
            existing.name,
            existing.category.label()
        ));
    }

    let min = i64::from(bounds.quantity_min);
    let max = i64::from(bounds.quantity_max);
    if input.quantity < min || input.quantity > max {
        errors.push(format!("Quantity must be between {} and {}", min, max));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ToolDefinition::new(
        name,
        input.quantity as u32,
        input.category,
    ))
}

/// Parse a quantity typed into a form. Anything unparsable is 0, which
/// validation then rejects with the bounds message.
pub fn parse_quantity(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(name: &str, quantity: i64) -> Result<ToolDefinition, Vec<String>> {
        validate_new_tool(
            &NewTool {
                name: name.into(),
                quantity,
                category: Category::Hammers,
            },
            &Inventory::builtin(),
            &ValidationConfig::default(),
        )
    }

    #[test]
    fn empty_name_rejected() {
        let errs = attempt("   ", 1).unwrap_err();
        assert_eq!(errs, vec!["Tool name is required"]);
    }

    #[test]
    fn quantity_bounds() {
        assert!(attempt("Pry Bar", 0).is_err());
        assert!(attempt("Pry Bar", -3).is_err());
        assert_eq!(attempt("Pry Bar", 999).unwrap().quantity, 999);
        let errs = attempt("Pry Bar", 1000).unwrap_err();
        assert_eq!(errs, vec!["Quantity must be between 1 and 999"]);
    }

    #[test]
    fn name_length_counts_graphemes() {
        let fifty = "é".repeat(50);
        assert!(attempt(&fifty, 1).is_ok());
        let fifty_one = "é".repeat(51);
        assert_eq!(
            attempt(&fifty_one, 1).unwrap_err(),
            vec!["Tool name must be 50 characters or fewer"]
        );
    }

    #[test]
    fn name_is_trimmed() {
        let def = attempt("  Pry Bar ", 2).unwrap();
        assert_eq!(def.name, "Pry Bar");
        assert_eq!(def.category, Category::Hammers);
    }

    #[test]
    fn control_characters_rejected() {
        let errs = attempt("Bad\u{1b}[31mName", 1).unwrap_err();
        assert_eq!(errs, vec!["Tool name cannot contain control characters"]);
    }

    #[test]
    fn duplicate_names_rejected_case_insensitively() {
        let errs = attempt("claw hammer", 2).unwrap_err();
        assert_eq!(errs, vec!["A tool named \"Claw Hammer\" already exists in Hammers"]);
    }

    #[test]
    fn reports_every_problem() {
        let errs = attempt("", 0).unwrap_err();
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn parse_quantity_is_lenient() {
        assert_eq!(parse_quantity(" 12 "), 12);
        assert_eq!(parse_quantity("twelve"), 0);
        assert_eq!(parse_quantity(""), 0);
    }
}
