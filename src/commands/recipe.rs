use clap::Subcommand;
use std::io::{self, Write};

use recipesync::api::RecipeApi;
use recipesync::models::{Recipe, RecipeId};
use recipesync::sync::RecipeForm;

use super::{describe_failure, OutputFormat};

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// List all recipes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only show favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Add a new recipe
    Add {
        /// Name of the recipe
        name: String,

        /// Cuisine (e.g. "French")
        #[arg(long)]
        cuisine: String,

        /// Ingredients, free text
        #[arg(long)]
        ingredients: String,

        /// Mark as favorite
        #[arg(long)]
        favorite: bool,
    },

    /// Edit an existing recipe
    Edit {
        /// Recipe ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New cuisine
        #[arg(long)]
        cuisine: Option<String>,

        /// New ingredients
        #[arg(long)]
        ingredients: Option<String>,

        /// Set or clear the favorite flag
        #[arg(long)]
        favorite: Option<bool>,
    },

    /// Delete a recipe
    Delete {
        /// Recipe ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl RecipeSubcommand {
    /// Runs the command against a form that has already fetched the collection.
    pub async fn run<A: RecipeApi>(
        &self,
        form: &mut RecipeForm<A>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            RecipeSubcommand::List { format, favorites } => {
                let recipes: Vec<&Recipe> = form
                    .recipes()
                    .iter()
                    .filter(|r| !favorites || r.is_favorite())
                    .collect();

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipes)?);
                    }
                    OutputFormat::Text => {
                        if recipes.is_empty() {
                            println!("No recipes found");
                            return Ok(());
                        }
                        println!("{:<36}  {:<30}  {:<15}  FAV", "ID", "NAME", "CUISINE");
                        println!("{}", "-".repeat(90));
                        for recipe in &recipes {
                            println!(
                                "{:<36}  {:<30}  {:<15}  {}",
                                recipe.id,
                                truncate(recipe.name(), 30),
                                truncate(recipe.cuisine(), 15),
                                if recipe.is_favorite() { "*" } else { "" }
                            );
                        }
                        println!("\nTotal: {} recipe(s)", recipes.len());
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Add {
                name,
                cuisine,
                ingredients,
                favorite,
            } => {
                form.set_name(name.trim());
                form.set_cuisine(cuisine.trim());
                form.set_ingredients(ingredients.trim());
                form.set_favorite(*favorite);

                let created = form
                    .submit()
                    .await
                    .map_err(|e| describe_failure(form, &e))?;
                println!("Created recipe {}:", created.id);
                println!("{}", created);
                Ok(())
            }

            RecipeSubcommand::Edit {
                id,
                name,
                cuisine,
                ingredients,
                favorite,
            } => {
                let has_updates = name.is_some()
                    || cuisine.is_some()
                    || ingredients.is_some()
                    || favorite.is_some();
                if !has_updates {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let id = RecipeId::from(id.as_str());
                if let Err(e) = form.begin_edit(&id).map(|_| ()) {
                    return Err(describe_failure(form, &e).into());
                }

                if let Some(name) = name {
                    form.set_name(name.trim());
                }
                if let Some(cuisine) = cuisine {
                    form.set_cuisine(cuisine.trim());
                }
                if let Some(ingredients) = ingredients {
                    form.set_ingredients(ingredients.trim());
                }
                if let Some(favorite) = favorite {
                    form.set_favorite(*favorite);
                }

                let updated = form
                    .submit()
                    .await
                    .map_err(|e| describe_failure(form, &e))?;
                println!("Updated recipe {}:", updated.id);
                println!("{}", updated);
                Ok(())
            }

            RecipeSubcommand::Delete { id, force } => {
                let id = RecipeId::from(id.as_str());
                let label = form
                    .get(&id)
                    .map(|r| r.name().to_string())
                    .unwrap_or_else(|| id.to_string());

                if !force {
                    print!("Delete recipe '{}'? [y/N] ", label);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                form.remove(&id)
                    .await
                    .map_err(|e| describe_failure(form, &e))?;
                println!("Deleted recipe: {}", label);
                Ok(())
            }
        }
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
