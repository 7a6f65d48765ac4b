use crate::slack::SlackMessage;

pub const SEARCH_BASE_URL: &str = "https://www.youtube.com/results?search_query=";

/// Builds the YouTube search URL for a query.
///
/// The query is appended verbatim, without percent-encoding.
pub fn build_search_url(query: &str) -> String {
    format!("{}{}", SEARCH_BASE_URL, query)
}

/// Message posted in response to `/play <query>`.
pub fn search_results_message(query: &str) -> SlackMessage {
    let search_url = build_search_url(query);
    SlackMessage::in_channel(format!(
        "Check out the search results for your query: <{}|Click here>",
        search_url
    ))
}
