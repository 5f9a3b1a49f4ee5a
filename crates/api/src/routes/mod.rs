//! Route definitions, one module per resource.

pub mod adoptions;
pub mod animals;
pub mod dashboard;
pub mod health;
pub mod import;
pub mod rescues;
pub mod trash;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /users                              list, create
/// /users/{id}                         get
/// /users/{id}/disable                 disable account
///
/// /rescues                            list, create
/// /rescues/{id}                       get
/// /rescues/{id}/transition            engine transition
///
/// /animals                            list (?available=true), create
/// /animals/{id}                       get
/// /animals/{id}/transition            health transition
///
/// /adoptions                          list, create
/// /adoptions/{id}                     get
/// /adoptions/{id}/approve             approve + cascade auto-denial
/// /adoptions/{id}/deny                admin denial (reason required)
/// /adoptions/{id}/cancel              requester withdrawal
///
/// /trash                              hidden items (?kind=)
/// /trash/{kind}/{id}/archive          reversible soft-delete
/// /trash/{kind}/{id}/restore          undo archive
/// /trash/{kind}/{id}/remove           irreversible soft-delete
/// /trash/{kind}/{id}/purge            physical delete of removed rows
///
/// /dashboard                          cached summary counts
/// /import/animals                     CSV intake
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/rescues", rescues::router())
        .nest("/animals", animals::router())
        .nest("/adoptions", adoptions::router())
        .nest("/trash", trash::router())
        .nest("/dashboard", dashboard::router())
        .nest("/import", import::router())
}
