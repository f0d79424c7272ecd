use askama::Template;

use crate::session::Flash;

use super::repo::Recipe;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub flash: Option<Flash>,
    pub logged_in: bool,
    pub recipes: Vec<Recipe>,
    pub page: i64,
    pub pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Template)]
#[template(path = "recipe_detail.html")]
pub struct DetailTemplate {
    pub flash: Option<Flash>,
    pub logged_in: bool,
    pub recipe: Recipe,
    pub can_edit: bool,
}

#[derive(Template)]
#[template(path = "new_recipe.html")]
pub struct NewRecipeTemplate {
    pub flash: Option<Flash>,
    pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "edit_recipe.html")]
pub struct EditRecipeTemplate {
    pub flash: Option<Flash>,
    pub logged_in: bool,
    pub recipe: Recipe,
}

#[derive(Template)]
#[template(path = "user_recipes.html")]
pub struct UserRecipesTemplate {
    pub flash: Option<Flash>,
    pub logged_in: bool,
    pub username: String,
    pub recipes: Vec<Recipe>,
}
