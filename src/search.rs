//! Inline query matching.
//!
//! A query matches an entry when its case-folded form is a substring of the
//! entry name's case-folded form, so the empty query matches everything.
//! Folding is full Unicode case folding, so `STRASSE` finds `straße`.
//! Results are grouped: methods first, then types, both in document order,
//! then the fixed "Using a Local Bot API Server" entry when the query is a
//! substring of that title.
//!
//! Matching is pure and never fails; an empty description simply produces
//! no method or type results.

use caseless::default_case_fold_str;
use teloxide::utils::markdown;

use crate::format::{format_method, format_type};
use crate::models::{ApiDescription, ParseMode, SearchResult};
use crate::paginate::{paginate, Page};

/// Schema used by the document for error responses; never offered as a result.
pub const SENTINEL_TYPE: &str = "Error";

/// Reserved result id of the local Bot API server entry.
pub const LOCAL_API_ID: &str = "localapi";

pub const LOCAL_API_TITLE: &str = "Using a Local Bot API Server";

/// Case-insensitive substring test used for every entry.
pub fn matches(query: &str, name: &str) -> bool {
    default_case_fold_str(name).contains(&default_case_fold_str(query))
}

/// Run a query against the description and return every match in order.
pub fn search(query: &str, api: &ApiDescription) -> Vec<SearchResult> {
    let hit = |name: &str| matches(query, name);

    let mut results: Vec<SearchResult> = api
        .methods
        .iter()
        .filter(|m| hit(&m.name))
        .map(format_method)
        .collect();

    results.extend(
        api.types
            .iter()
            .filter(|t| t.name != SENTINEL_TYPE && hit(&t.name))
            .map(format_type),
    );

    if hit(LOCAL_API_TITLE) {
        results.push(local_api_result());
    }

    results
}

/// Search and slice out the page addressed by `offset`.
pub fn answer(query: &str, offset: &str, api: &ApiDescription) -> Page<SearchResult> {
    paginate(&search(query, api), offset)
}

/// The informational entry about running a local Bot API server.
pub fn local_api_result() -> SearchResult {
    SearchResult {
        id: LOCAL_API_ID.to_string(),
        title: LOCAL_API_TITLE.to_string(),
        description: None,
        body: local_api_body(),
        parse_mode: ParseMode::MarkdownV2,
        disable_link_preview: true,
    }
}

fn local_api_body() -> String {
    let e = markdown::escape;
    let features = [
        e("Download files without a size limit."),
        e("Upload files up to 2000 MB."),
        format!(
            "{} {}{}",
            e("Upload files using their local path and"),
            markdown::link(
                "https://en.wikipedia.org/wiki/File_URI_scheme",
                &e("the file URI scheme")
            ),
            e(".")
        ),
        e("Use an HTTP URL for the webhook."),
        e("Use any local IP address for the webhook."),
        e("Use any port for the webhook."),
        e("Set max_webhook_connections up to 100000."),
        format!(
            "{} {} {}",
            e("Receive the absolute local path as a value of the file_path field without the need to download the file after a"),
            markdown::link("https://core.telegram.org/bots/api/#getfile", &e("getFile")),
            e("request.")
        ),
    ];

    let mut text = String::new();
    text.push_str(&markdown::link(
        "https://core.telegram.org/bots/api/#using-a-local-bot-api-server",
        &e(LOCAL_API_TITLE),
    ));
    text.push_str("\n\n");
    text.push_str(&format!(
        "{} {}{} {} {}\n\n",
        e("The Bot API server source code is available at"),
        markdown::link(
            "https://github.com/tdlib/telegram-bot-api",
            &e("telegram-bot-api")
        ),
        e(". You can run it locally and send the requests to your own server instead of"),
        markdown::code_inline("https://api.telegram.org"),
        e(". If you switch to a local Bot API server, your bot will be able to:"),
    ));
    for feature in &features {
        text.push('>');
        text.push_str(feature);
        text.push('\n');
    }
    text.push('\n');
    text.push_str(&markdown::link(
        "https://core.telegram.org/bots/api/#do-i-need-a-local-bot-api-server",
        &e("Do I need a Local Bot API Server"),
    ));
    text.push_str("\n\n");
    text.push_str(&format!(
        "{} {}{}\n",
        e("The majority of bots will be OK with the default configuration, running on our servers. But if you feel that you need one of"),
        markdown::link(
            "https://core.telegram.org/bots/api/#using-a-local-bot-api-server",
            &e("these features")
        ),
        e(", you're welcome to switch to your own at any time."),
    ));
    text
}
