//! Normalization of raw CocktailDB drink entries into [`Recipe`]s.
//!
//! The API flattens each recipe into `strIngredient1..15` / `strMeasure1..15`
//! slot pairs and a single `strInstructions` blob. The blob comes in two
//! shapes: steps separated by `\r\n`, or sentences separated by `". "`.

use std::collections::HashMap;

use crate::error::MalformedResponse;
use crate::recipe::Recipe;

/// One drink entry as returned by the API, before validation.
pub type RawDrink = HashMap<String, Option<String>>;

pub const NAME_KEY: &str = "strDrink";
pub const GLASS_KEY: &str = "strGlass";
pub const INSTRUCTIONS_KEY: &str = "strInstructions";

/// The API exposes at most 15 ingredient slots.
pub const INGREDIENT_SLOTS: usize = 15;

const LINE_DELIMITER: &str = "\r\n";
const SENTENCE_DELIMITER: &str = ". ";

pub fn ingredient_key(slot: usize) -> String {
    format!("strIngredient{}", slot)
}

pub fn measure_key(slot: usize) -> String {
    format!("strMeasure{}", slot)
}

/// How a `strInstructions` blob separates its steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionFormat {
    /// Steps separated by `\r\n`. Empty segments are dropped.
    LineDelimited,
    /// Sentences separated by `". "`, split verbatim.
    SentenceDelimited,
}

impl InstructionFormat {
    /// Any `\r\n` anywhere in the blob makes it line-delimited.
    pub fn detect(raw: &str) -> Self {
        if raw.contains(LINE_DELIMITER) {
            InstructionFormat::LineDelimited
        } else {
            InstructionFormat::SentenceDelimited
        }
    }

    fn parser(self) -> fn(&str) -> Vec<String> {
        match self {
            InstructionFormat::LineDelimited => split_lines,
            InstructionFormat::SentenceDelimited => split_sentences,
        }
    }

    pub fn split(self, raw: &str) -> Vec<String> {
        (self.parser())(raw)
    }
}

fn split_lines(raw: &str) -> Vec<String> {
    raw.split(LINE_DELIMITER)
        .filter(|step| !step.is_empty())
        .map(str::to_string)
        .collect()
}

// Unlike split_lines this keeps empty segments, e.g. "Stir. . Serve".
fn split_sentences(raw: &str) -> Vec<String> {
    raw.split(SENTENCE_DELIMITER).map(str::to_string).collect()
}

/// Split an instructions blob into ordered steps.
pub fn parse_instructions(raw: &str) -> Vec<String> {
    InstructionFormat::detect(raw).split(raw)
}

/// Every key a well-formed drink entry must carry, even with a null value.
pub fn required_keys() -> Vec<String> {
    let mut keys = vec![
        NAME_KEY.to_string(),
        GLASS_KEY.to_string(),
        INSTRUCTIONS_KEY.to_string(),
    ];
    for slot in 1..=INGREDIENT_SLOTS {
        keys.push(ingredient_key(slot));
        keys.push(measure_key(slot));
    }
    keys
}

/// Validate a raw drink entry and convert it into a [`Recipe`].
pub fn normalize(raw: &RawDrink) -> Result<Recipe, MalformedResponse> {
    let missing: Vec<String> = required_keys()
        .into_iter()
        .filter(|key| !raw.contains_key(key))
        .collect();
    if !missing.is_empty() {
        return Err(MalformedResponse::MissingKeys(missing));
    }

    let name = value(raw, NAME_KEY).ok_or(MalformedResponse::MissingValue(NAME_KEY))?;
    let glass = value(raw, GLASS_KEY).ok_or(MalformedResponse::MissingValue(GLASS_KEY))?;
    let instructions =
        value(raw, INSTRUCTIONS_KEY).ok_or(MalformedResponse::MissingValue(INSTRUCTIONS_KEY))?;

    Recipe::new(
        name,
        glass,
        parse_ingredients(raw),
        parse_instructions(instructions),
    )
}

fn value<'a>(raw: &'a RawDrink, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(|v| v.as_deref())
}

fn parse_ingredients(raw: &RawDrink) -> Vec<(String, Option<String>)> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let ingredient = value(raw, &ingredient_key(slot))?;
            if ingredient.trim().is_empty() {
                return None;
            }
            let amount = value(raw, &measure_key(slot)).map(str::to_string);
            Some((ingredient.to_string(), amount))
        })
        .collect()
}
