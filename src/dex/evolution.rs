use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{normalize_name, with_retry, DexClient};
use crate::api::{chain_id_from_url, species_id_from_url, ChainLink, PokemonSpecies};
use crate::cache::{QueryState, QueryStatus};
use crate::error::{DataError, DataResult};

/// One step of a flattened evolution chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionStep {
    /// Species id.
    pub id: i64,
    /// Species name.
    pub name: String,
    /// Minimum level for this evolution, when level-gated.
    pub min_level: Option<i64>,
}

/// Flatten an evolution tree into pre-order steps.
///
/// A node is emitted before any of its children; children are visited
/// in source order (branching evolutions keep their listed order).
/// Nodes whose species URL does not yield a positive id, or whose name
/// is empty, are dropped.
pub(crate) fn flatten_chain(root: &ChainLink) -> Vec<EvolutionStep> {
    let mut steps = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let id = species_id_from_url(&node.species.url).unwrap_or(0);
        if id > 0 && !node.species.name.is_empty() {
            steps.push(EvolutionStep {
                id,
                name: node.species.name.clone(),
                min_level: node.evolution_details.first().and_then(|d| d.min_level),
            });
        }
        // Reversed push so the leftmost child is visited first.
        for child in node.evolves_to.iter().rev() {
            stack.push(child);
        }
    }

    steps
}

impl DexClient {
    /// Resolve a pokemon name into its flattened evolution chain.
    ///
    /// Three dependent stages, each independently cached: species by
    /// normalized name, chain tree by chain id, flattened steps by
    /// chain id. The first failing stage surfaces its error; a species
    /// whose evolution chain URL does not match the expected pattern
    /// fails with [`DataError::Parse`].
    pub async fn evolution_steps(&self, name: &str) -> DataResult<Arc<Vec<EvolutionStep>>> {
        let name = normalize_name(name);
        let species = self.species_by_name(name).await?;
        let chain_id = parse_chain_id(&species)?;
        self.steps_by_chain_id(chain_id).await
    }

    /// Snapshot the union of the three resolver stages.
    ///
    /// Loading while any stage is loading; the first error across
    /// stages wins.
    pub fn evolution_state(&self, name: &str) -> QueryState<Vec<EvolutionStep>> {
        let name = normalize_name(name);
        let species = self.species.peek(&name);

        let chain_id = match species.data.as_deref() {
            Some(data) => match parse_chain_id(data) {
                Ok(id) => id,
                Err(e) => {
                    return QueryState {
                        data: None,
                        status: QueryStatus::Error,
                        error: Some(e),
                    }
                }
            },
            None => {
                return QueryState {
                    data: None,
                    status: species.status,
                    error: species.error,
                }
            }
        };

        let chain = self.chains.peek(&chain_id);
        let steps = self.steps.peek(&chain_id);

        let error = species.error.or(chain.error).or(steps.error.clone());
        let status = if species.status == QueryStatus::Loading
            || chain.status == QueryStatus::Loading
            || steps.status == QueryStatus::Loading
        {
            QueryStatus::Loading
        } else if error.is_some() {
            QueryStatus::Error
        } else if steps.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Idle
        };

        QueryState {
            data: steps.data,
            status,
            error,
        }
    }

    async fn species_by_name(&self, name: String) -> DataResult<Arc<PokemonSpecies>> {
        let api = self.api.clone();
        let request = self.request.clone();

        self.species
            .get_or_fetch(name.clone(), async move {
                let resource = format!("pokemon-species/{}", name);
                with_retry(&request, &resource, || api.get_species_by_name(&name)).await
            })
            .await
    }

    async fn steps_by_chain_id(&self, chain_id: u32) -> DataResult<Arc<Vec<EvolutionStep>>> {
        let chains = self.chains.clone();
        let api = self.api.clone();
        let request = self.request.clone();

        self.steps
            .get_or_fetch(chain_id, async move {
                let fetch_chain = async move {
                    let resource = format!("evolution-chain/{}", chain_id);
                    with_retry(&request, &resource, || {
                        api.get_evolution_chain_by_id(chain_id)
                    })
                    .await
                };
                let chain = chains.get_or_fetch(chain_id, fetch_chain).await?;
                Ok(flatten_chain(&chain.chain))
            })
            .await
    }
}

fn parse_chain_id(species: &PokemonSpecies) -> DataResult<u32> {
    chain_id_from_url(&species.evolution_chain.url).ok_or_else(|| DataError::Parse {
        message: format!(
            "no evolution-chain id in '{}'",
            species.evolution_chain.url
        ),
    })
}
