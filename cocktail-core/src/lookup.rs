//! Recipe lookups against TheCocktailDB.
//!
//! Two endpoints are used:
//! - `search.php?s=` returns full drink entries for a name query.
//! - `filter.php?i=` returns lightweight stubs (name, thumbnail, id) for an
//!   ingredient, which are then resolved one by one through a name search.
//!
//! Both wrap their results as `{"drinks": [...]}`. "Nothing found" shows up as
//! `null`, an empty array, a placeholder string, or an empty body depending on
//! the endpoint, and every one of those maps to [`LookupError::NotFound`].

use std::num::NonZeroUsize;

use serde_json::{Map, Value};

use crate::error::{FetchError, LookupError, QueryKind};
use crate::http::HttpClient;
use crate::normalize::{normalize, RawDrink, NAME_KEY};
use crate::recipe::Recipe;

pub const DEFAULT_BASE_URL: &str = "https://www.thecocktaildb.com/api/json/v1/1";

/// Looks up recipes through an injected [`HttpClient`]. Transport errors are
/// returned as-is; retrying is up to the caller.
pub struct LookupClient<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> LookupClient<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Use `COCKTAIL_DB_BASE_URL` when set, the public API otherwise.
    pub fn from_env(client: C) -> Self {
        match std::env::var("COCKTAIL_DB_BASE_URL") {
            Ok(base) if !base.is_empty() => Self::with_base_url(client, base),
            _ => Self::new(client),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn search_url(&self, name: &str) -> Result<String, FetchError> {
        self.endpoint("search.php", "s", name)
    }

    pub fn filter_url(&self, ingredient: &str) -> Result<String, FetchError> {
        self.endpoint("filter.php", "i", ingredient)
    }

    fn endpoint(&self, path: &str, param: &str, value: &str) -> Result<String, FetchError> {
        url::Url::parse_with_params(&format!("{}/{}", self.base_url, path), &[(param, value)])
            .map(String::from)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }

    /// Recipe for the closest match to `name`.
    ///
    /// The API ranks the matches; the first one wins, so the returned drink's
    /// name may differ from the query.
    pub async fn lookup_by_name(&self, name: &str) -> Result<Recipe, LookupError> {
        let url = self.search_url(name)?;
        let body = self.client.fetch_text(&url).await?;

        let first = drink_entries(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound {
                kind: QueryKind::Name,
                query: name.to_string(),
            })?;

        let recipe = normalize(&to_raw_drink(first))?;
        tracing::debug!(query = name, found = recipe.name(), "name lookup");
        Ok(recipe)
    }

    /// Up to `limit` recipes that use `ingredient`, in API order.
    pub async fn lookup_by_ingredient(
        &self,
        ingredient: &str,
        limit: NonZeroUsize,
    ) -> Result<Vec<Recipe>, LookupError> {
        let url = self.filter_url(ingredient)?;
        let body = self.client.fetch_text(&url).await?;

        let stubs = drink_entries(&body)?;
        if stubs.is_empty() {
            return Err(LookupError::NotFound {
                kind: QueryKind::Ingredient,
                query: ingredient.to_string(),
            });
        }

        let names: Vec<String> = stubs
            .iter()
            .filter_map(|stub| stub.get(NAME_KEY).and_then(Value::as_str))
            .take(limit.get())
            .map(str::to_string)
            .collect();
        tracing::debug!(
            ingredient,
            available = stubs.len(),
            resolving = names.len(),
            "ingredient lookup"
        );

        let mut recipes = Vec::with_capacity(names.len());
        for name in &names {
            recipes.push(self.lookup_by_name(name).await?);
        }
        Ok(recipes)
    }
}

/// Entries of the top-level `drinks` collection; empty when there are none.
fn drink_entries(body: &str) -> Result<Vec<Map<String, Value>>, FetchError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let json: Value =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidJson(e.to_string()))?;

    match json.get("drinks") {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(Vec::new()),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| match entry {
                Value::Object(map) => Ok(map.clone()),
                other => Err(FetchError::InvalidJson(format!(
                    "expected drink object, got {}",
                    other
                ))),
            })
            .collect(),
        Some(other) => Err(FetchError::InvalidJson(format!(
            "unexpected drinks value: {}",
            other
        ))),
    }
}

fn to_raw_drink(entry: Map<String, Value>) -> RawDrink {
    entry
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            };
            (key, value)
        })
        .collect()
}
