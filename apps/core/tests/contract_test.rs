use quicklaunch_core::contract::{
    ActionDto, AppDto, AppListResponse, CompletionResponse, SearchResponse, SearchResultDto,
};
use quicklaunch_core::model::ApplicationEntry;
use quicklaunch_core::provider::{LaunchAction, LaunchResult};
use quicklaunch_core::usage::UsageTracker;

#[test]
fn serializes_and_deserializes_search_response() {
    let response = SearchResponse {
        query: "code".to_string(),
        results: vec![SearchResultDto {
            id: "app-code".into(),
            title: "Visual Studio Code".into(),
            subtitle: None,
            icon: "code".into(),
            score: 186,
            action: ActionDto::LaunchApp {
                identity: "code".into(),
                command: "code --new-window".into(),
            },
        }],
        preview: None,
    };

    let encoded = serde_json::to_string(&response).unwrap();
    let decoded: SearchResponse = serde_json::from_str(&encoded).unwrap();

    assert_eq!(decoded, response);
    assert!(!encoded.contains("subtitle"));
    assert!(encoded.contains("\"kind\":\"launch_app\""));
}

#[test]
fn launch_result_converts_without_display_name() {
    let result = LaunchResult {
        id: "web-crabs".into(),
        title: "Search: crabs".into(),
        subtitle: Some("Search the web in your browser".into()),
        icon: "web-browser".into(),
        score: 900,
        action: LaunchAction::OpenUrl("https://www.google.com/search?q=crabs".into()),
    };

    let dto = SearchResultDto::from(result);

    assert_eq!(
        dto.action,
        ActionDto::OpenUrl {
            url: "https://www.google.com/search?q=crabs".into()
        }
    );
    assert_eq!(dto.subtitle.as_deref(), Some("Search the web in your browser"));

    let launch: ActionDto = LaunchAction::LaunchApp {
        identity: "kitty".into(),
        display_name: "Terminal".into(),
        command: "kitty -1".into(),
    }
    .into();
    assert_eq!(
        serde_json::to_value(&launch).unwrap(),
        serde_json::json!({ "kind": "launch_app", "identity": "kitty", "command": "kitty -1" })
    );
}

#[test]
fn copy_text_action_is_tagged() {
    let dto: ActionDto = LaunchAction::CopyText("42".into()).into();

    assert_eq!(
        serde_json::to_value(&dto).unwrap(),
        serde_json::json!({ "kind": "copy_text", "text": "42" })
    );
}

#[test]
fn app_list_reports_launch_counts() {
    let mut tracker = UsageTracker::in_memory();
    tracker.record_launch("firefox", "Firefox");
    tracker.record_launch("firefox", "Firefox");
    let firefox = ApplicationEntry::new("Firefox").with_executable("firefox");
    let notes = ApplicationEntry::new("Notes");

    let response = AppListResponse {
        apps: vec![
            AppDto::from_entry(&firefox, &tracker),
            AppDto::from_entry(&notes, &tracker),
        ],
    };

    assert_eq!(response.apps[0].launch_count, 2);
    assert_eq!(response.apps[1].identity, "Notes");
    assert_eq!(response.apps[1].launch_count, 0);
}

#[test]
fn completion_response_keeps_null_completion() {
    let response = CompletionResponse {
        query: "kit".into(),
        completion: None,
    };

    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        r#"{"query":"kit","completion":null}"#
    );
}
