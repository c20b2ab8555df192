//! Remote resource client for the upstream Pokemon data provider.
//!
//! This module is a pure transport adapter: it issues read-only GETs,
//! decodes wire-shaped DTOs, and reports failures as [`crate::error::ApiError`].
//! Caching, retries, and taxonomy mapping all live in the query cache
//! layer above it.

mod client;
mod types;
mod urls;

pub use client::PokeApiClient;
pub use types::{
    AbilitySlot, ChainLink, EvolutionChain, EvolutionDetail, NamedResource, PokemonDetail,
    PokemonListResponse, PokemonSpecies, ResourceRef, StatSlot, TypeSlot,
};
pub use urls::{chain_id_from_url, pokemon_id_from_url, species_id_from_url};
