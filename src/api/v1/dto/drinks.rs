/*
 * Responsibility
 * - Drinks の request/response DTO
 * - short 形式 (recipe は color/parts のみ) と long 形式 (name を含む) の整形
 * - validate() で 422 にする条件をまとめる
 */
use serde::{Deserialize, Serialize};

use crate::repos::{Drink, DrinkChanges, Ingredient};

const TITLE_MAX_CHARS: usize = 80;

fn validate_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("title cannot be empty");
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err("title must be <= 80 chars");
    }
    Ok(())
}

fn validate_recipe(recipe: &[Ingredient]) -> Result<(), &'static str> {
    if recipe.is_empty() {
        return Err("recipe needs at least one ingredient");
    }
    if recipe
        .iter()
        .any(|i| i.name.trim().is_empty() || i.color.trim().is_empty())
    {
        return Err("ingredient name and color are required");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

impl CreateDrinkRequest {
    /// Returns the validated `(title, recipe)` pair.
    pub fn validate(self) -> Result<(String, Vec<Ingredient>), &'static str> {
        let title = self.title.ok_or("title is required")?;
        let recipe = self.recipe.ok_or("recipe is required")?;
        validate_title(&title)?;
        validate_recipe(&recipe)?;
        Ok((title, recipe))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

impl UpdateDrinkRequest {
    pub fn validate(self) -> Result<DrinkChanges, &'static str> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(recipe) = &self.recipe {
            validate_recipe(recipe)?;
        }
        Ok(DrinkChanges {
            title: self.title,
            recipe: self.recipe,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

/// Public listing form: the recipe shape without ingredient names.
#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

impl From<Drink> for DrinkShort {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink
                .recipe
                .into_iter()
                .map(|i| ShortIngredient {
                    color: i.color,
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<Drink> for DrinkLong {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink.recipe,
        }
    }
}

/// `{ "success": true, "drinks": ... }`
#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: T,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: T) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(name: &str) -> Ingredient {
        Ingredient {
            color: "brown".to_string(),
            name: name.to_string(),
            parts: 2,
        }
    }

    #[test]
    fn short_form_drops_ingredient_names() {
        let drink = Drink {
            id: 7,
            title: "flat white".to_string(),
            recipe: vec![ingredient("espresso")],
        };

        let json = serde_json::to_value(DrinkShort::from(drink)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "flat white",
                "recipe": [{"color": "brown", "parts": 2}]
            })
        );
    }

    #[test]
    fn create_requires_title_and_recipe() {
        let missing_title = CreateDrinkRequest {
            title: None,
            recipe: Some(vec![ingredient("milk")]),
        };
        assert_eq!(missing_title.validate().unwrap_err(), "title is required");

        let missing_recipe = CreateDrinkRequest {
            title: Some("latte".to_string()),
            recipe: None,
        };
        assert_eq!(missing_recipe.validate().unwrap_err(), "recipe is required");

        let long_title = CreateDrinkRequest {
            title: Some("x".repeat(81)),
            recipe: Some(vec![ingredient("milk")]),
        };
        assert!(long_title.validate().is_err());
    }

    #[test]
    fn update_accepts_partial_changes() {
        let req = UpdateDrinkRequest {
            title: Some("mocha".to_string()),
            recipe: None,
        };
        let changes = req.validate().unwrap();
        assert_eq!(changes.title.as_deref(), Some("mocha"));
        assert!(changes.recipe.is_none());

        let empty = UpdateDrinkRequest {
            title: Some("  ".to_string()),
            recipe: None,
        };
        assert!(empty.validate().is_err());
    }
}
