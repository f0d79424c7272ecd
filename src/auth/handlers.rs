use axum::{
    extract::State,
    response::Redirect,
    routing::get,
    Form, Router,
};
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::session::{Flash, Identity, RequireUser, Session};
use crate::state::AppState;

use super::forms::{LoginForm, RegisterForm};
use super::repo::User;
use super::views::{LoginTemplate, RegisterTemplate};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout).post(logout))
}

pub async fn register_page(session: Session, identity: Identity) -> RegisterTemplate {
    RegisterTemplate {
        flash: session.take_flash(),
        logged_in: identity.is_known(),
    }
}

#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    if form.password != form.confirm_password {
        session.flash(Flash::danger("Passwords do not match."));
        return Ok(Redirect::to("/register"));
    }

    if User::find_by_username(&state.db, &form.username)
        .await?
        .is_some()
    {
        warn!(username = %form.username, "username already taken");
        session.flash(Flash::danger("Username already exists."));
        return Ok(Redirect::to("/register"));
    }

    let user = User::create(&state.db, &form.username, &form.password).await?;
    info!(user_id = user.id, username = %user.username, "user registered");
    session.flash(Flash::success("Registration successful. You can now login."));
    Ok(Redirect::to("/login"))
}

pub async fn login_page(session: Session, identity: Identity) -> LoginTemplate {
    LoginTemplate {
        flash: session.take_flash(),
        logged_in: identity.is_known(),
    }
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    match User::find_by_username(&state.db, &form.username).await? {
        Some(user) if user.password == form.password => {
            session.log_in(user.id);
            info!(user_id = user.id, username = %user.username, "user logged in");
            session.flash(Flash::success("Login successful."));
            Ok(Redirect::to("/user/recipes"))
        }
        _ => {
            warn!(username = %form.username, "invalid credentials");
            session.flash(Flash::plain("Invalid username or password."));
            Ok(Redirect::to("/login"))
        }
    }
}

#[instrument(skip_all)]
pub async fn logout(RequireUser(user): RequireUser, session: Session) -> Redirect {
    session.log_out();
    info!(user_id = user.id, "user logged out");
    session.flash(Flash::info("You have been logged out."));
    Redirect::to("/")
}
