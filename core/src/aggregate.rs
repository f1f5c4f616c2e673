//! Derived views computed over an already-fetched employee list.
//!
//! Nothing here can fail; these are pure functions over a slice.

use crate::types::Employee;

/// How many names `top_earner_names` returns at most.
pub const TOP_EARNERS: usize = 10;

/// Records whose name contains `needle`, case-insensitively, in input order.
///
/// A blank needle matches nothing.
pub fn search_by_name(employees: &[Employee], needle: &str) -> Vec<Employee> {
    if needle.trim().is_empty() {
        return Vec::new();
    }
    let needle = needle.to_lowercase();
    employees
        .iter()
        .filter(|employee| {
            employee
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Maximum salary among records that have one, or 0.
pub fn highest_salary(employees: &[Employee]) -> i64 {
    employees
        .iter()
        .filter_map(|employee| employee.salary)
        .max()
        .unwrap_or(0)
}

/// Names of the best-paid records, salary descending.
///
/// Records missing a name or salary are skipped. The sort is stable, so
/// equal salaries keep their input order.
pub fn top_earner_names(employees: &[Employee]) -> Vec<String> {
    let mut ranked: Vec<(&str, i64)> = employees
        .iter()
        .filter_map(|employee| Some((employee.name.as_deref()?, employee.salary?)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(TOP_EARNERS)
        .map(|(name, _)| name.to_string())
        .collect()
}
