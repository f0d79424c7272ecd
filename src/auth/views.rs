use askama::Template;

use crate::session::Flash;

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub flash: Option<Flash>,
    pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub flash: Option<Flash>,
    pub logged_in: bool,
}
