//! Card search links for the community card database.

use once_cell::sync::Lazy;
use url::Url;

static HUB_BASE: Lazy<Url> = Lazy::new(|| {
    Url::parse("https://dunecardshub.com/").expect("failed to parse card hub base url")
});

/// Map a bucket display name to the hub's card-type parameter.
fn hub_type(resource_type: &str) -> &str {
    match resource_type {
        "Imperium Cards" => "Imperium",
        "Intrigue Cards" => "Intrigue",
        "Reserve Cards" => "Reserve",
        "Tech Tiles" => "Tech",
        "Contracts" => "Contract",
        "Leaders" => "Leader",
        "Starter Cards" => "Starter",
        "Conflict Cards" => "Conflict",
        "Sardaukar" => "Sardaukar",
        "Tleilax Cards" => "Tleilax",
        other => other,
    }
}

/// Build a card search URL from a rendered item name, its bucket display
/// name, and its expansion.
///
/// The name may arrive as a full rendered line fragment: a leading
/// `<count>×` marker and a trailing `(Source)` suffix are stripped before
/// the search term is lowercased and encoded. The expansion filter is
/// omitted when empty or `Unknown`.
pub fn card_search_url(card_name: &str, resource_type: &str, expansion: &str) -> Url {
    let mut clean = card_name.trim();
    if let Some((_, rest)) = clean.split_once('×') {
        clean = rest.trim_start();
    }
    let clean = match clean.rfind('(') {
        Some(index) if clean.contains(')') => clean[..index].trim_end(),
        _ => clean,
    };

    let mut url = HUB_BASE.clone();
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("search", &clean.to_lowercase());
        query.append_pair("types", hub_type(resource_type));
        if !expansion.is_empty() && expansion != "Unknown" {
            query.append_pair("expansions", expansion);
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_count_marker_and_source_suffix() {
        let url = card_search_url("3× Sandworm (Uprising)", "Imperium Cards", "Uprising");
        assert_eq!(
            url.as_str(),
            "https://dunecardshub.com/?search=sandworm&types=Imperium&expansions=Uprising"
        );
    }

    #[test]
    fn keeps_plain_names_and_maps_types() {
        let url = card_search_url("Holtzman Engine", "Tech Tiles", "Rise of Ix");
        assert_eq!(
            url.as_str(),
            "https://dunecardshub.com/?search=holtzman+engine&types=Tech&expansions=Rise+of+Ix"
        );
    }

    #[test]
    fn unknown_expansion_is_omitted() {
        let url = card_search_url("Mystery Card", "Contracts", "Unknown");
        assert_eq!(
            url.as_str(),
            "https://dunecardshub.com/?search=mystery+card&types=Contract"
        );
    }

    #[test]
    fn unmapped_bucket_names_pass_through() {
        let url = card_search_url("Something", "Homebrew Pile", "");
        assert_eq!(
            url.as_str(),
            "https://dunecardshub.com/?search=something&types=Homebrew+Pile"
        );
    }
}
