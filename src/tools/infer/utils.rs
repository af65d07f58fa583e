use super::types::ParseOutcome;
use crate::types::{SelectorMap, SelectorRole};
use scraper::Selector;
use serde_json::{Map, Value};

/// Longest prefix of `html` holding at most `budget` characters.
pub(super) fn truncate_chars(html: &str, budget: usize) -> &str {
    match html.char_indices().nth(budget) {
        Some((idx, _)) => &html[..idx],
        None => html,
    }
}

pub(super) fn compose_prompt(html_prefix: &str) -> String {
    format!(
        "Analyze the following HTML content and identify the CSS selectors for reviews, \
review titles, review body text, ratings, and reviewer names.\n\
Answer with a single JSON object and nothing else, in the format:\n\
{{\n  \"review\": \"<CSS selector for review container>\",\n  \
\"title\": \"<CSS selector for review title>\",\n  \
\"body\": \"<CSS selector for review body>\",\n  \
\"rating\": \"<CSS selector for review rating>\",\n  \
\"reviewer\": \"<CSS selector for reviewer name>\"\n}}\n\
HTML Content: {html_prefix}\n"
    )
}

/// First complete JSON object in `text`. Parsing stops at the end of that
/// object, so code fences, prose and stray braces around it are ignored.
fn first_object(text: &str) -> std::result::Result<Map<String, Value>, String> {
    let mut last_error = "no JSON object in model output".to_string();
    for (idx, _) in text.match_indices('{') {
        let mut objects =
            serde_json::Deserializer::from_str(&text[idx..]).into_iter::<Map<String, Value>>();
        match objects.next() {
            Some(Ok(object)) => return Ok(object),
            Some(Err(e)) => last_error = format!("not a JSON object: {e}"),
            None => {}
        }
    }
    Err(last_error)
}

pub(super) fn parse_generated(text: &str) -> ParseOutcome {
    let object = match first_object(text) {
        Ok(obj) => obj,
        Err(reason) => return ParseOutcome::Unparseable(reason),
    };

    let mut values: Vec<String> = Vec::with_capacity(SelectorRole::ALL.len());
    for role in SelectorRole::ALL {
        match object.get(role.key()).and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => values.push(s.to_string()),
            Some(_) => return ParseOutcome::Unparseable(format!("empty selector for '{role}'")),
            None => return ParseOutcome::Unparseable(format!("missing selector for '{role}'")),
        }
    }

    let [review, title, body, rating, reviewer]: [String; 5] = match values.try_into() {
        Ok(arr) => arr,
        Err(_) => return ParseOutcome::Unparseable("wrong number of selectors".into()),
    };

    let map = match SelectorMap::new(review, title, body, rating, reviewer) {
        Ok(map) => map,
        Err(e) => return ParseOutcome::Unparseable(e.to_string()),
    };

    for role in SelectorRole::ALL {
        if let Err(e) = Selector::parse(map.get(role)) {
            return ParseOutcome::Unparseable(format!("invalid CSS for '{role}': {e:?}"));
        }
    }

    ParseOutcome::Parsed(map)
}
