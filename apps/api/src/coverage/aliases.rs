//! Static alias table for coverage keywords.
//!
//! Each group lists a canonical term first, then its known spelling/format
//! variants. Groups are bidirectional: a keyword equal to any member expands to
//! every member. Members are stored already normalized (lowercase, single spaces).

const ALIAS_GROUPS: &[&[&str]] = &[
    &[".net", "dotnet", "dot net"],
    &["asp.net", "aspnet", "asp net"],
    &["c#", "csharp", "c sharp"],
    &["c++", "cpp"],
    &["node.js", "nodejs", "node js"],
    &["react", "react.js", "reactjs"],
    &["vue", "vue.js", "vuejs"],
    &["next.js", "nextjs"],
    &["javascript", "java script", "ecmascript"],
    &["typescript", "type script"],
    &["postgresql", "postgres", "postgre sql"],
    &["mysql", "my sql"],
    &["sql server", "ms sql", "mssql", "microsoft sql server"],
    &["nosql", "no sql", "no-sql"],
    &["ci/cd", "cicd", "ci cd", "ci-cd"],
    &["kubernetes", "k8s"],
    &["amazon web services", "aws"],
    &["google cloud platform", "gcp", "google cloud"],
    &["microsoft azure", "azure"],
    &["machine learning", "ml"],
    &["artificial intelligence", "ai"],
    &["power bi", "powerbi"],
    &["microsoft excel", "excel", "ms excel"],
    &["front end", "frontend", "front-end"],
    &["back end", "backend", "back-end"],
    &["full stack", "fullstack", "full-stack"],
    &["user experience", "ux"],
    &["user interface", "ui"],
    &["search engine optimization", "seo", "search engine optimisation"],
    &["customer relationship management", "crm"],
    &["key performance indicators", "kpis", "kpi"],
    &["project management", "project manager"],
    &["stakeholder management", "stakeholder engagement"],
    &["agile", "scrum", "agile methodology"],
    &["rest api", "restful api", "rest apis", "restful apis"],
    &["e-commerce", "ecommerce", "e commerce"],
    &["data visualization", "data visualisation"],
    &["organization", "organisation"],
];

/// Lowercases, collapses whitespace runs, and trims.
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// The alias group containing `term`, matched on its normalized form.
pub fn alias_group(term: &str) -> Option<&'static [&'static str]> {
    let normalized = normalize_term(term);
    ALIAS_GROUPS
        .iter()
        .copied()
        .find(|group| group.contains(&normalized.as_str()))
}

/// Every surface form a keyword should be matched by: itself, its aliases, and
/// simple morphological variants of single-word alphabetic forms.
///
/// The keyword's original spelling comes first; duplicates (normalized) are dropped.
pub fn expand_keyword(keyword: &str) -> Vec<String> {
    let trimmed = keyword.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut forms: Vec<String> = vec![trimmed.to_string()];
    if let Some(group) = alias_group(trimmed) {
        forms.extend(group.iter().map(|s| s.to_string()));
    }

    let base = forms.clone();
    for form in &base {
        forms.extend(morphological_variants(form));
    }

    let mut seen = std::collections::HashSet::new();
    forms.retain(|f| seen.insert(normalize_term(f)));
    forms
}

/// Plural/singular variants for a single alphabetic word of three or more letters.
fn morphological_variants(term: &str) -> Vec<String> {
    let lower = term.to_lowercase();
    if lower.chars().count() < 3 || !lower.chars().all(|c| c.is_ascii_alphabetic()) {
        return Vec::new();
    }

    // Latin-style -is / -us words are left alone.
    if lower.ends_with("is") || lower.ends_with("us") {
        return Vec::new();
    }

    let plain_plural = lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss");
    if plain_plural {
        let singular = match lower.strip_suffix("ies") {
            Some(stem) => format!("{stem}y"),
            None => lower[..lower.len() - 1].to_string(),
        };
        return vec![singular];
    }

    let consonant_y = lower.ends_with('y')
        && !matches!(lower.chars().rev().nth(1), Some('a' | 'e' | 'i' | 'o' | 'u'));
    let sibilant = ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s));

    let plural = if consonant_y {
        format!("{}ies", &lower[..lower.len() - 1])
    } else if sibilant {
        format!("{lower}es")
    } else {
        format!("{lower}s")
    };
    vec![plural]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("  Power   BI \n"), "power bi");
        assert_eq!(normalize_term(".NET"), ".net");
    }

    #[test]
    fn test_alias_groups_are_normalized() {
        for group in ALIAS_GROUPS {
            for member in *group {
                assert_eq!(*member, normalize_term(member), "alias {member:?} not normalized");
            }
        }
    }

    #[test]
    fn test_expand_is_bidirectional() {
        let from_canonical = expand_keyword("Kubernetes");
        assert!(from_canonical.iter().any(|f| f == "k8s"));

        let from_alias = expand_keyword("K8s");
        assert!(from_alias.iter().any(|f| f == "kubernetes"));
        assert_eq!(from_alias[0], "K8s");
    }

    #[test]
    fn test_expand_keeps_original_spelling_first() {
        let forms = expand_keyword(" .NET ");
        assert_eq!(forms[0], ".NET");
        assert!(forms.contains(&"dotnet".to_string()));
        assert!(!forms.contains(&".net".to_string()), "duplicate of .NET after normalization");
    }

    #[test]
    fn test_morphological_variants() {
        assert!(expand_keyword("API").contains(&"apis".to_string()));
        assert!(expand_keyword("analytics").contains(&"analytic".to_string()));
        assert!(expand_keyword("strategy").contains(&"strategies".to_string()));
        assert!(expand_keyword("process").contains(&"processes".to_string()));
        assert!(expand_keyword("policies").contains(&"policy".to_string()));
        assert_eq!(expand_keyword("analysis"), vec!["analysis"]);
        assert_eq!(expand_keyword("Go"), vec!["Go"]);
    }

    #[test]
    fn test_blank_keyword_expands_to_nothing() {
        assert!(expand_keyword("   ").is_empty());
    }
}
