use crate::provider::{
    LaunchAction, LaunchResult, LauncherProvider, Preview, PreviewProvider, SearchContext,
};

const WEB_ICON: &str = "web-browser";
const KEYWORD_PREFIXES: [&str; 2] = ["g ", "google "];

/// Web search for `g <terms>`, `google <terms>` and long free-text queries.
pub struct WebSearchProvider {
    url_template: String,
}

impl WebSearchProvider {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
        }
    }

    pub fn search_url(&self, terms: &str) -> String {
        self.url_template
            .replace("{query}", &urlencoding::encode(terms))
    }
}

impl Default for WebSearchProvider {
    fn default() -> Self {
        Self::new("https://www.google.com/search?q={query}")
    }
}

/// Search terms carried by `query`, if it is a web search at all.
pub fn extract_terms(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    for prefix in KEYWORD_PREFIXES {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            let terms = rest.trim();
            return (!terms.is_empty()).then_some(terms);
        }
    }
    is_long_query(trimmed).then_some(trimmed)
}

fn is_long_query(trimmed: &str) -> bool {
    trimmed.split(' ').count() > 3
}

impl LauncherProvider for WebSearchProvider {
    fn name(&self) -> &'static str {
        "web"
    }

    fn priority(&self) -> i32 {
        80
    }

    fn can_handle(&self, query: &str) -> bool {
        let trimmed = query.trim();
        KEYWORD_PREFIXES
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
            || is_long_query(trimmed)
    }

    fn search(&self, query: &str, _ctx: &SearchContext<'_>) -> Vec<LaunchResult> {
        let Some(terms) = extract_terms(query) else {
            return Vec::new();
        };
        vec![LaunchResult {
            id: format!("web-{terms}"),
            title: format!("Search: {terms}"),
            subtitle: Some("Search the web in your browser".to_string()),
            icon: WEB_ICON.to_string(),
            score: 900,
            action: LaunchAction::OpenUrl(self.search_url(terms)),
        }]
    }
}

impl PreviewProvider for WebSearchProvider {
    fn preview(&self, query: &str, _ctx: &SearchContext<'_>) -> Option<Preview> {
        let terms = extract_terms(query)?;
        Some(Preview {
            text: format!(" → Search: \"{terms}\""),
            icon: Some(WEB_ICON.to_string()),
        })
    }
}
