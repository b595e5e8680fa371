//! Canonical cocktail recipe built from a CocktailDB response.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::MalformedResponse;

/// Amount recorded for an ingredient that has no measure upstream.
pub const TO_TASTE: &str = "To Taste";

/// A validated cocktail recipe.
///
/// Built once by [`crate::normalize::normalize`] and immutable afterwards.
/// Ingredients keep the order of the numbered response slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    name: String,
    glass: String,
    ingredients: IndexMap<String, String>,
    instructions: Vec<String>,
}

impl Recipe {
    /// Build a recipe from already-extracted parts.
    ///
    /// Blank amounts become [`TO_TASTE`]. Instructions are kept as given.
    pub fn new(
        name: impl Into<String>,
        glass: impl Into<String>,
        ingredients: impl IntoIterator<Item = (String, Option<String>)>,
        instructions: Vec<String>,
    ) -> Result<Self, MalformedResponse> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MalformedResponse::MissingValue("strDrink"));
        }

        let mut map = IndexMap::new();
        for (ingredient, amount) in ingredients {
            let amount = amount
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| TO_TASTE.to_string());
            // A repeated ingredient keeps its first position.
            map.insert(ingredient, amount);
        }

        Ok(Self {
            name,
            glass: glass.into(),
            ingredients: map,
            instructions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn glass(&self) -> &str {
        &self.glass
    }

    pub fn ingredients(&self) -> &IndexMap<String, String> {
        &self.ingredients
    }

    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Ingredients:")?;
        for (ingredient, amount) in &self.ingredients {
            writeln!(f, "- {} : {}", ingredient, amount)?;
        }
        writeln!(f, "Instructions:")?;
        for (i, step) in self.instructions.iter().enumerate() {
            writeln!(f, "{}) {}", i + 1, step)?;
        }
        Ok(())
    }
}
