//! Builders for CocktailDB-shaped test data.

use serde_json::{Map, Value};

use crate::normalize::{
    ingredient_key, measure_key, RawDrink, GLASS_KEY, INGREDIENT_SLOTS, INSTRUCTIONS_KEY,
    NAME_KEY,
};
use crate::recipe::Recipe;

/// A complete drink entry: all 15 slot pairs present, unused ones null.
pub fn raw_drink(
    name: &str,
    glass: &str,
    instructions: &str,
    ingredients: &[(&str, Option<&str>)],
) -> RawDrink {
    let mut raw = RawDrink::new();
    raw.insert(NAME_KEY.to_string(), Some(name.to_string()));
    raw.insert(GLASS_KEY.to_string(), Some(glass.to_string()));
    raw.insert(INSTRUCTIONS_KEY.to_string(), Some(instructions.to_string()));
    for slot in 1..=INGREDIENT_SLOTS {
        let (ingredient, amount) = match ingredients.get(slot - 1) {
            Some((ingredient, amount)) => {
                (Some(ingredient.to_string()), amount.map(str::to_string))
            }
            None => (None, None),
        };
        raw.insert(ingredient_key(slot), ingredient);
        raw.insert(measure_key(slot), amount);
    }
    raw
}

/// Same as [`raw_drink`], as the JSON object the API would send.
pub fn drink_json(
    name: &str,
    glass: &str,
    instructions: &str,
    ingredients: &[(&str, Option<&str>)],
) -> Value {
    let object: Map<String, Value> = raw_drink(name, glass, instructions, ingredients)
        .into_iter()
        .map(|(key, value)| (key, value.map(Value::String).unwrap_or(Value::Null)))
        .collect();
    Value::Object(object)
}

/// A recipe with `n` ingredients and `steps` instruction steps.
pub fn recipe(name: &str, n: usize, steps: usize) -> Recipe {
    Recipe::new(
        name,
        "Cocktail glass",
        (1..=n).map(|i| (format!("{} ingredient {}", name, i), Some(format!("{} oz", i)))),
        (1..=steps).map(|i| format!("{} step {}", name, i)).collect(),
    )
    .expect("valid test recipe")
}
