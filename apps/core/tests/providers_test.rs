use quicklaunch_core::model::ApplicationEntry;
use quicklaunch_core::provider::{
    LaunchAction, LaunchResult, LauncherProvider, Preview, PreviewProvider, ProviderRegistry,
    SearchContext,
};
use quicklaunch_core::providers::{
    extract_terms, AppProvider, CalculatorProvider, WebSearchProvider,
};
use quicklaunch_core::usage::UsageHistory;

fn catalog() -> Vec<ApplicationEntry> {
    vec![
        ApplicationEntry::new("Terminal")
            .with_executable("kitty")
            .with_icon("utilities-terminal"),
        ApplicationEntry::new("Firefox")
            .with_executable("firefox")
            .with_description("Browse the web"),
        ApplicationEntry::new("Notes"),
    ]
}

fn ctx<'a>(catalog: &'a [ApplicationEntry], usage: &'a UsageHistory) -> SearchContext<'a> {
    SearchContext {
        catalog,
        usage,
        max_results: 8,
    }
}

struct Fixed {
    name: &'static str,
    priority: i32,
}

impl LauncherProvider for Fixed {
    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn can_handle(&self, _query: &str) -> bool {
        true
    }

    fn search(&self, _query: &str, _ctx: &SearchContext<'_>) -> Vec<LaunchResult> {
        vec![LaunchResult {
            id: self.name.to_string(),
            title: self.name.to_string(),
            subtitle: None,
            icon: "x".into(),
            score: 1,
            action: LaunchAction::CopyText(self.name.to_string()),
        }]
    }
}

impl PreviewProvider for Fixed {
    fn preview(&self, _query: &str, _ctx: &SearchContext<'_>) -> Option<Preview> {
        Some(Preview {
            text: self.name.to_string(),
            icon: None,
        })
    }
}

#[test]
fn registry_orders_by_priority_then_registration() {
    let mut registry = ProviderRegistry::new();
    registry.register(Fixed { name: "low", priority: 10 });
    registry.register(Fixed { name: "high", priority: 300 });
    registry.register(Fixed { name: "mid-a", priority: 100 });
    registry.register(Fixed { name: "mid-b", priority: 100 });

    assert_eq!(registry.names(), vec!["high", "mid-a", "mid-b", "low"]);
}

#[test]
fn preview_capability_is_fixed_at_registration() {
    let apps = catalog();
    let usage = UsageHistory::new();
    let mut registry = ProviderRegistry::new();
    registry.register(Fixed { name: "silent", priority: 500 });
    registry.register_with_preview(Fixed { name: "chatty", priority: 1 });

    let preview = registry.preview("anything", &ctx(&apps, &usage)).unwrap();

    assert_eq!(preview.text, "chatty");
    let flags: Vec<bool> = registry.iter().map(|entry| entry.preview().is_some()).collect();
    assert_eq!(flags, vec![false, true]);
}

#[test]
fn app_provider_maps_ranked_entries() {
    let apps = catalog();
    let usage = UsageHistory::new();
    let provider = AppProvider::default();

    let results = provider.search("ter", &ctx(&apps, &usage));

    assert_eq!(results.len(), 1);
    let terminal = &results[0];
    assert_eq!(terminal.id, "app-kitty");
    assert_eq!(terminal.title, "Terminal");
    assert_eq!(terminal.icon, "utilities-terminal");
    assert_eq!(
        terminal.action,
        LaunchAction::LaunchApp {
            identity: "kitty".into(),
            display_name: "Terminal".into(),
            command: "kitty".into(),
        }
    );
}

#[test]
fn app_provider_resolves_missing_icons() {
    let apps = catalog();
    let usage = UsageHistory::new();
    let provider = AppProvider::default();

    let firefox = provider.search("firef", &ctx(&apps, &usage)).remove(0);
    let notes = provider.search("notes", &ctx(&apps, &usage)).remove(0);

    assert_eq!(firefox.icon, "firefox");
    assert_eq!(firefox.subtitle.as_deref(), Some("Browse the web"));
    assert_eq!(notes.icon, "application-x-executable");
}

#[test]
fn app_provider_preview_is_inline_completion() {
    let apps = catalog();
    let usage = UsageHistory::new();
    let provider = AppProvider::default();

    let preview = provider.preview("Ter", &ctx(&apps, &usage)).unwrap();
    assert_eq!(preview.text, "minal");
    assert_eq!(preview.icon.as_deref(), Some("utilities-terminal"));
    assert!(provider.preview("kit", &ctx(&apps, &usage)).is_none());
    assert!(!provider.can_handle("   "));
}

#[test]
fn calculator_handles_only_arithmetic_with_operators() {
    let calc = CalculatorProvider;

    assert!(calc.can_handle("2 + 2"));
    assert!(calc.can_handle("(4)"));
    assert!(calc.can_handle(" 1,5 * 2 "));
    assert!(!calc.can_handle("42"));
    assert!(!calc.can_handle("2 + x"));
    assert!(!calc.can_handle(""));
}

#[test]
fn calculator_result_copies_value() {
    let apps = catalog();
    let usage = UsageHistory::new();
    let calc = CalculatorProvider;

    let results = calc.search("12 * (3 + 4)", &ctx(&apps, &usage));

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "12 * (3 + 4) = 84");
    assert_eq!(results[0].score, 1000);
    assert_eq!(results[0].action, LaunchAction::CopyText("84".into()));
    assert_eq!(
        calc.preview("1/3", &ctx(&apps, &usage)).map(|p| p.text),
        Some(" = 0.333333".to_string())
    );
}

#[test]
fn calculator_swallows_invalid_expressions() {
    let apps = catalog();
    let usage = UsageHistory::new();
    let calc = CalculatorProvider;

    assert!(calc.search("1 / 0", &ctx(&apps, &usage)).is_empty());
    assert!(calc.search("(1 + ", &ctx(&apps, &usage)).is_empty());
    assert!(calc.preview("* 3", &ctx(&apps, &usage)).is_none());

    let pasted = format!("{}1", "(".repeat(20_000));
    assert!(calc.can_handle(&pasted));
    assert!(calc.search(&pasted, &ctx(&apps, &usage)).is_empty());
    let signs = format!("{}2 * 3", "-".repeat(20_000));
    assert_eq!(
        calc.preview(&signs, &ctx(&apps, &usage)).map(|p| p.text),
        Some(" = 6".to_string())
    );
}

#[test]
fn web_search_terms_come_from_keyword_or_long_query() {
    assert_eq!(extract_terms("g rust traits"), Some("rust traits"));
    assert_eq!(extract_terms("  google   borrow checker "), Some("borrow checker"));
    assert_eq!(extract_terms("how do lifetimes work"), Some("how do lifetimes work"));
    assert_eq!(extract_terms("g "), None);
    assert_eq!(extract_terms("firefox"), None);
    assert_eq!(extract_terms("gimp"), None);
}

#[test]
fn web_search_builds_encoded_url() {
    let apps = catalog();
    let usage = UsageHistory::new();
    let web = WebSearchProvider::new("https://duckduckgo.com/?q={query}");

    assert!(web.can_handle("g rust & cargo"));
    let results = web.search("g rust & cargo", &ctx(&apps, &usage));

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Search: rust & cargo");
    assert_eq!(results[0].score, 900);
    assert_eq!(
        results[0].action,
        LaunchAction::OpenUrl("https://duckduckgo.com/?q=rust%20%26%20cargo".into())
    );
    assert_eq!(
        web.preview("google crabs", &ctx(&apps, &usage)).map(|p| p.text),
        Some(" → Search: \"crabs\"".to_string())
    );
}
