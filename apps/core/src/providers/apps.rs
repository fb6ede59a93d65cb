use crate::icon::{IconResolver, FALLBACK_ICON};
use crate::model::ApplicationEntry;
use crate::provider::{
    LaunchAction, LaunchResult, LauncherProvider, Preview, PreviewProvider, SearchContext,
};
use crate::search::{best_completion, best_match, search_scored};

pub struct AppProvider {
    icons: IconResolver,
}

impl Default for AppProvider {
    fn default() -> Self {
        Self::new(IconResolver::default())
    }
}

impl AppProvider {
    pub fn new(icons: IconResolver) -> Self {
        Self { icons }
    }

    fn icon_for(&self, entry: &ApplicationEntry) -> String {
        match entry.icon_name() {
            Some(icon) => icon.to_string(),
            None => entry
                .executable()
                .map(|executable| self.icons.resolve(executable))
                .unwrap_or_else(|| FALLBACK_ICON.to_string()),
        }
    }
}

pub fn launch_result(entry: &ApplicationEntry, icon: String, score: u32) -> LaunchResult {
    LaunchResult {
        id: format!("app-{}", entry.identity()),
        title: entry.display_name().to_string(),
        subtitle: entry.description().map(str::to_string),
        icon,
        score,
        action: LaunchAction::LaunchApp {
            identity: entry.identity().to_string(),
            display_name: entry.display_name().to_string(),
            command: entry.launch_command().to_string(),
        },
    }
}

impl LauncherProvider for AppProvider {
    fn name(&self) -> &'static str {
        "apps"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn can_handle(&self, query: &str) -> bool {
        !query.trim().is_empty()
    }

    fn search(&self, query: &str, ctx: &SearchContext<'_>) -> Vec<LaunchResult> {
        search_scored(ctx.catalog, query, ctx.usage, ctx.max_results)
            .into_iter()
            .map(|(entry, score)| launch_result(entry, self.icon_for(entry), score))
            .collect()
    }
}

impl PreviewProvider for AppProvider {
    fn preview(&self, query: &str, ctx: &SearchContext<'_>) -> Option<Preview> {
        let completion = best_completion(ctx.catalog, query, ctx.usage)?;
        let icon = best_match(ctx.catalog, query, ctx.usage).map(|entry| self.icon_for(entry));
        Some(Preview {
            text: completion,
            icon,
        })
    }
}
