use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::session::{Flash, Identity, RequireUser, Session};
use crate::state::AppState;

use super::forms::{PageQuery, RecipeForm};
use super::repo::Recipe;
use super::views::{
    DetailTemplate, EditRecipeTemplate, IndexTemplate, NewRecipeTemplate, UserRecipesTemplate,
};

pub const PAGE_SIZE: i64 = 10;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/recipe/:id", get(detail))
        .route("/recipe/new", get(new_page).post(create))
        .route("/recipe/edit/:id", get(edit_page).post(update))
        .route("/recipe/delete/:id", post(delete))
        .route("/user/recipes", get(my_recipes))
}

#[instrument(skip(state, session, identity))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    identity: Identity,
    Query(query): Query<PageQuery>,
) -> Result<IndexTemplate, AppError> {
    if query.page < 1 {
        return Err(AppError::NotFound);
    }
    // Checked math: an absurdly large page number is just another page that
    // doesn't exist.
    let offset = query
        .page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(PAGE_SIZE))
        .ok_or(AppError::NotFound)?;
    let recipes = Recipe::list_page(&state.db, PAGE_SIZE, offset).await?;
    // A page past the end is a 404, but an empty first page just renders empty.
    if recipes.is_empty() && query.page != 1 {
        return Err(AppError::NotFound);
    }
    let total = Recipe::count(&state.db).await?;
    let pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    Ok(IndexTemplate {
        flash: session.take_flash(),
        logged_in: identity.is_known(),
        recipes,
        page: query.page,
        pages,
        has_prev: query.page > 1,
        has_next: query.page < pages,
    })
}

#[instrument(skip(state, session, identity))]
pub async fn detail(
    State(state): State<AppState>,
    session: Session,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<DetailTemplate, AppError> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let can_edit = matches!(identity, Identity::Known(user_id) if user_id == recipe.created_by);
    Ok(DetailTemplate {
        flash: session.take_flash(),
        logged_in: identity.is_known(),
        recipe,
        can_edit,
    })
}

pub async fn new_page(RequireUser(_user): RequireUser, session: Session) -> NewRecipeTemplate {
    NewRecipeTemplate {
        flash: session.take_flash(),
        logged_in: true,
    }
}

#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
    Form(form): Form<RecipeForm>,
) -> Result<Redirect, AppError> {
    let recipe = Recipe::create(
        &state.db,
        &form.title,
        &form.description,
        &form.ingredients,
        &form.instructions,
        user.id,
    )
    .await?;
    info!(recipe_id = recipe.id, user_id = user.id, "recipe created");
    session.flash(Flash::success("Recipe created successfully!"));
    Ok(Redirect::to("/user/recipes"))
}

#[instrument(skip_all)]
pub async fn edit_page(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    if recipe.created_by != user.id {
        warn!(recipe_id = id, user_id = user.id, "edit denied");
        session.flash(Flash::danger("You are not authorized to edit this recipe."));
        return Ok(Redirect::to("/").into_response());
    }
    Ok(EditRecipeTemplate {
        flash: session.take_flash(),
        logged_in: true,
        recipe,
    }
    .into_response())
}

#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<RecipeForm>,
) -> Result<Redirect, AppError> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    if recipe.created_by != user.id {
        warn!(recipe_id = id, user_id = user.id, "edit denied");
        session.flash(Flash::danger("You are not authorized to edit this recipe."));
        return Ok(Redirect::to("/"));
    }
    Recipe::update(
        &state.db,
        id,
        &form.title,
        &form.description,
        &form.ingredients,
        &form.instructions,
    )
    .await?;
    info!(recipe_id = id, user_id = user.id, "recipe updated");
    session.flash(Flash::success("Recipe updated successfully!"));
    Ok(Redirect::to("/user/recipes"))
}

#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    if recipe.created_by != user.id {
        warn!(recipe_id = id, user_id = user.id, "delete denied");
        session.flash(Flash::danger(
            "You are not authorized to delete this recipe.",
        ));
        return Ok(Redirect::to("/"));
    }
    Recipe::delete(&state.db, id).await?;
    info!(recipe_id = id, user_id = user.id, "recipe deleted");
    session.flash(Flash::success("Recipe deleted successfully!"));
    Ok(Redirect::to("/user/recipes"))
}

#[instrument(skip_all)]
pub async fn my_recipes(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
) -> Result<UserRecipesTemplate, AppError> {
    let recipes = Recipe::list_by_owner(&state.db, user.id).await?;
    Ok(UserRecipesTemplate {
        flash: session.take_flash(),
        logged_in: true,
        username: user.username,
        recipes,
    })
}
