use crate::models::{CategoryFilter, Tool};
use crate::utils::{cmp_ignore_case, contains_ignore_case};

/// Free-text search over the catalog.
///
/// Case-insensitive substring match against name, description, and the
/// category heading. An empty or whitespace-only query returns the full
/// catalog in its original order.
pub fn search(catalog: &[Tool], query: &str) -> Vec<Tool> {
    let query = query.trim();
    if query.is_empty() {
        return catalog.to_vec();
    }
    catalog
        .iter()
        .filter(|tool| matches_query(tool, query))
        .cloned()
        .collect()
}

fn matches_query(tool: &Tool, query: &str) -> bool {
    contains_ignore_case(&tool.name, query)
        || contains_ignore_case(&tool.description, query)
        || contains_ignore_case(tool.category.display_name(), query)
}

/// Search truncated to `limit` results, for preview surfaces like the
/// header dropdown.
pub fn preview(catalog: &[Tool], query: &str, limit: usize) -> Vec<Tool> {
    let mut results = search(catalog, query);
    results.truncate(limit);
    results
}

/// Restrict to one category; `CategoryFilter::All` is the identity.
pub fn filter_by_category(tools: &[Tool], filter: CategoryFilter) -> Vec<Tool> {
    tools
        .iter()
        .filter(|tool| filter.matches(tool.category))
        .cloned()
        .collect()
}

/// Combined query + category view. The result is the intersection of both
/// restrictions, so the order of application is not observable.
pub fn search_and_filter(catalog: &[Tool], query: &str, filter: CategoryFilter) -> Vec<Tool> {
    filter_by_category(&search(catalog, query), filter)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Category,
    Popularity,
}

/// Sort a result set in place. All sorts are stable, so ties keep their
/// catalog order.
pub fn sort_tools(tools: &mut [Tool], key: SortKey) {
    match key {
        SortKey::Name => tools.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name)),
        SortKey::Category => tools.sort_by_key(|tool| tool.category),
        SortKey::Popularity => tools.sort_by_key(|tool| !tool.is_popular),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn tool(id: &str, name: &str, description: &str, category: Category, popular: bool) -> Tool {
        Tool {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category,
            icon: String::new(),
            is_popular: popular,
            href: format!("/games/{}", id),
        }
    }

    fn catalog() -> Vec<Tool> {
        vec![
            tool(
                "addition-race",
                "Addition Race",
                "Race against time to solve addition problems",
                Category::Math,
                true,
            ),
            tool(
                "vocabulary-builder",
                "Vocabulary Builder",
                "Learn new words through interactive games",
                Category::Language,
                false,
            ),
            tool(
                "periodic-table-quest",
                "Periodic Table Quest",
                "Explore chemical elements",
                Category::Science,
                false,
            ),
            tool(
                "pattern-master",
                "Pattern Master",
                "Identify and complete patterns",
                Category::Logic,
                true,
            ),
        ]
    }

    #[test]
    fn test_empty_query_returns_catalog_in_order() {
        let catalog = catalog();
        assert_eq!(search(&catalog, ""), catalog);
        assert_eq!(search(&catalog, "   "), catalog);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = catalog();
        let results = search(&catalog, "ADDITION");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "addition-race");
    }

    #[test]
    fn test_search_matches_description_and_category() {
        let catalog = catalog();
        assert_eq!(search(&catalog, "chemical")[0].id, "periodic-table-quest");
        // "Logic & Puzzles" is the category heading, not in name or description
        assert_eq!(search(&catalog, "puzzles")[0].id, "pattern-master");
    }

    #[test]
    fn test_search_no_results_is_empty_not_error() {
        assert!(search(&catalog(), "nonexistent-xyz").is_empty());
    }

    #[test]
    fn test_filter_all_is_identity() {
        let catalog = catalog();
        assert_eq!(filter_by_category(&catalog, CategoryFilter::All), catalog);
    }

    #[test]
    fn test_search_and_filter_order_is_unobservable() {
        let catalog = catalog();
        let filter = CategoryFilter::Only(Category::Math);

        let combined = search_and_filter(&catalog, "race", filter);
        let filter_first = search(&filter_by_category(&catalog, filter), "race");

        assert_eq!(combined, filter_first);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].id, "addition-race");
    }

    #[test]
    fn test_preview_truncates() {
        let results = preview(&catalog(), "", 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "addition-race");
    }

    #[test]
    fn test_sort_by_name() {
        let mut tools = catalog();
        sort_tools(&mut tools, SortKey::Name);
        assert_eq!(tools[0].id, "addition-race");
        assert_eq!(tools[1].id, "pattern-master");
    }

    #[test]
    fn test_sort_by_popularity_is_stable() {
        let mut tools = catalog();
        sort_tools(&mut tools, SortKey::Popularity);
        // Popular tools first, otherwise catalog order preserved
        assert_eq!(tools[0].id, "addition-race");
        assert_eq!(tools[1].id, "pattern-master");
        assert_eq!(tools[2].id, "vocabulary-builder");
        assert_eq!(tools[3].id, "periodic-table-quest");
    }
}
