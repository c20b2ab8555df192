use serde::{Deserialize, Serialize};

/// A named resource reference as the API embeds it everywhere:
/// a name plus the URL the full resource lives at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    /// Resource name.
    pub name: String,
    /// Resource URL; identifiers ride in the trailing path segment.
    pub url: String,
}

/// One page of the paginated pokemon listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonListResponse {
    /// Total number of pokemon the source knows about.
    pub count: u32,
    /// The entries of this page.
    pub results: Vec<NamedResource>,
}

/// Full pokemon detail as served by the remote provider.
///
/// Wire-shaped; unknown fields are ignored. Measured fields keep the
/// provider's units: weight in tenths of a kilogram, height in tenths
/// of a meter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonDetail {
    /// Positive integer id.
    pub id: i64,
    /// Lowercase resource name.
    pub name: String,
    /// Base experience yield; absent for some forms.
    #[serde(default)]
    pub base_experience: Option<i64>,
    /// Weight in tenths of kilograms.
    #[serde(default)]
    pub weight: Option<i64>,
    /// Height in tenths of meters.
    #[serde(default)]
    pub height: Option<i64>,
    /// Typing, in slot order.
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    /// Abilities, in slot order.
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    /// Base stats, in the provider's order.
    #[serde(default)]
    pub stats: Vec<StatSlot>,
}

/// A typing entry on a pokemon detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSlot {
    /// The type resource.
    #[serde(rename = "type")]
    pub type_ref: NamedResource,
}

/// An ability entry on a pokemon detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySlot {
    /// The ability resource.
    pub ability: NamedResource,
}

/// A base stat entry on a pokemon detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatSlot {
    /// Base value of this stat.
    pub base_stat: i64,
    /// The stat resource.
    pub stat: NamedResource,
}

impl PokemonDetail {
    /// Type names in slot order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.type_ref.name.as_str()).collect()
    }

    /// Ability names in slot order.
    pub fn ability_names(&self) -> Vec<&str> {
        self.abilities.iter().map(|a| a.ability.name.as_str()).collect()
    }

    /// `(stat name, base value)` pairs in the provider's order.
    pub fn stat_values(&self) -> Vec<(&str, i64)> {
        self.stats
            .iter()
            .map(|s| (s.stat.name.as_str(), s.base_stat))
            .collect()
    }
}

/// Pokemon species detail; carries the evolution chain reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonSpecies {
    /// Species name.
    pub name: String,
    /// Reference to the evolution chain resource.
    pub evolution_chain: ResourceRef,
}

/// A bare URL reference to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Resource URL.
    pub url: String,
}

/// An evolution chain: a recursive tree of species links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionChain {
    /// Chain id.
    pub id: u32,
    /// Root of the tree.
    pub chain: ChainLink,
}

/// One node of the evolution tree. Multiple children represent
/// branching evolutions (e.g. Eevee).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainLink {
    /// The species at this node.
    pub species: NamedResource,
    /// Conditions for evolving into this node.
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
    /// Child nodes, in source order.
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

/// Conditions attached to one evolution edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionDetail {
    /// Minimum level, when the evolution is level-gated.
    #[serde(default)]
    pub min_level: Option<i64>,
}
