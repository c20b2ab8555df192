use once_cell::sync::Lazy;
use regex::Regex;

static POKEMON_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/pokemon/(\d+)/?$").expect("valid pokemon url pattern"));

static SPECIES_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/pokemon-species/(\d+)/?$").expect("valid species url pattern"));

static CHAIN_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/evolution-chain/(\d+)").expect("valid chain url pattern"));

/// Extract a pokemon id from the trailing path segment of a resource URL.
///
/// Returns `None` when the URL does not match `.../pokemon/{id}/`.
pub fn pokemon_id_from_url(url: &str) -> Option<String> {
    POKEMON_URL
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Extract a species id from a `.../pokemon-species/{id}/` URL.
pub fn species_id_from_url(url: &str) -> Option<i64> {
    SPECIES_URL
        .captures(url)
        .and_then(|caps| caps[1].parse().ok())
}

/// Extract an evolution chain id from a `.../evolution-chain/{id}` URL.
pub fn chain_id_from_url(url: &str) -> Option<u32> {
    CHAIN_URL
        .captures(url)
        .and_then(|caps| caps[1].parse().ok())
}
