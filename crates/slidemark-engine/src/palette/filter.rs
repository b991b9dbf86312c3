//! Fuzzy ranking of palette entries against the typed query.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use super::registry::SlashCommand;

/// Filters and ranks commands for a query.
///
/// An empty query returns the whole registry in registry order. Otherwise
/// each command is scored by its best fuzzy match across title,
/// description, and search terms; non-matching commands drop out and ties
/// keep registry order. Exact ranking is not load-bearing, only that a
/// clearly relevant command beats unrelated ones.
pub fn filter_commands<'a>(query: &str, commands: &'a [SlashCommand]) -> Vec<&'a SlashCommand> {
    if query.is_empty() {
        return commands.iter().collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, usize, &SlashCommand)> = commands
        .iter()
        .enumerate()
        .filter_map(|(index, command)| {
            score(&matcher, command, query).map(|s| (s, index, command))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, _, command)| command).collect()
}

fn score(matcher: &SkimMatcherV2, command: &SlashCommand, query: &str) -> Option<i64> {
    let mut best = matcher.fuzzy_match(command.title, query);
    if let Some(s) = matcher.fuzzy_match(command.description, query) {
        best = Some(best.map_or(s, |b| b.max(s)));
    }
    for term in command.search_terms {
        if let Some(s) = matcher.fuzzy_match(term, query) {
            best = Some(best.map_or(s, |b| b.max(s)));
        }
    }
    best
}
